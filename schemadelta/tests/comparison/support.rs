#![allow(dead_code)]

//! Shared snapshot fixtures.

use schemadelta::snapshot::{
    Column, ExtendedProperty, Index, MinorItem, Permission, Relation, RoutineKind, SchemaSnapshot, Table, Trigger,
    UserType,
};

/// A small but complete sales database: two tables with nested objects, a
/// user type, one object of every definition-bearing kind, and metadata at
/// database, object and column level.
pub fn sales(server: &str) -> SchemaSnapshot {
    let customer = Table::new("dbo", "Customer")
        .with_column(Column {
            ordinal_position: 1,
            is_nullable: false,
            is_identity: true,
            identity_seed: Some(1),
            identity_increment: Some(1),
            ..Column::new("ID", "int")
        })
        .with_column(Column {
            ordinal_position: 2,
            character_maximum_length: Some(100),
            collation_name: Some("Latin1_General_CI_AS".to_string()),
            ..Column::new("Name", "nvarchar")
        })
        .with_index(
            Index {
                is_primary_key: true,
                is_unique: true,
                ..Index::new("PK_Customer", "CLUSTERED")
            }
            .with_column("ID", false),
        )
        .with_trigger(Trigger {
            is_insert: true,
            ..Trigger::new(
                "TR_Customer_Audit",
                "CREATE TRIGGER dbo.TR_Customer_Audit ON dbo.Customer AFTER INSERT AS SELECT 1",
            )
        });

    let order = Table::new("sales", "Order")
        .with_column(Column {
            ordinal_position: 1,
            is_nullable: false,
            ..Column::new("ID", "int")
        })
        .with_column(Column {
            ordinal_position: 2,
            ..Column::new("CustomerID", "int")
        })
        .with_relation(Relation::new("FK_Order_Customer", "[dbo].[Customer]").with_pair("CustomerID", "ID"));

    SchemaSnapshot::new(server, "Sales")
        .with_table(customer)
        .with_table(order)
        .with_user_type(UserType {
            max_length: Some(20),
            ..UserType::new("dbo", "Phone", "varchar")
        })
        .with_view(
            "[dbo].[CustomerNames]",
            "CREATE VIEW dbo.CustomerNames AS SELECT Name FROM dbo.Customer",
        )
        .with_routine(
            "[dbo].[GetCustomer]",
            RoutineKind::Procedure,
            "CREATE PROCEDURE dbo.GetCustomer @ID int AS SELECT * FROM dbo.Customer WHERE ID = @ID",
        )
        .with_routine(
            "[dbo].[FullName]",
            RoutineKind::Function,
            "CREATE FUNCTION dbo.FullName(@a nvarchar(50)) RETURNS nvarchar(50) AS BEGIN RETURN @a END",
        )
        .with_synonym("[dbo].[Clients]", "[dbo].[Customer]")
        .with_permission(Permission::new("reporting", "SELECT", "GRANT").on_object("dbo", "CustomerNames"))
        .with_permission(Permission::new("app", "CONNECT", "GRANT"))
        .with_property(ExtendedProperty::new("Version", "1.0"))
        .with_property(ExtendedProperty::new("MS_Description", "Customer master").on_object("dbo", "Customer"))
        .with_property(
            ExtendedProperty::new("MS_Description", "Display name")
                .on_object("dbo", "Customer")
                .on_minor(MinorItem::Column("Name".to_string())),
        )
}

/// Snapshot with a single table `[dbo].[T]` holding one nullable column `C`.
pub fn single_table(server: &str) -> SchemaSnapshot {
    SchemaSnapshot::new(server, "App").with_table(Table::new("dbo", "T").with_column(Column::new("C", "int")))
}
