use schemadelta::snapshot::{ExtendedProperty, MinorItem, Permission, SchemaSnapshot};
use schemadelta::{CompareOptions, NoProgress, build, render_report};

use crate::support::sales;

/// Side 2 of the report fixtures: a changed database property, a wider
/// column, a descending key, a changed view, a new procedure grant, and a
/// dropped table.
fn drifted() -> SchemaSnapshot {
    let mut second = sales("SQL02");
    second.extended_properties[0] = ExtendedProperty::new("Version", "1.1");

    let customer = &mut second.tables["[dbo].[Customer]"];
    customer.columns["Name"].character_maximum_length = Some(200);
    let key = &mut customer.indexes["PK_Customer"].columns["ID"];
    key.is_descending = true;

    second.views["[dbo].[CustomerNames]"] =
        "CREATE VIEW dbo.CustomerNames AS SELECT Name FROM dbo.Customer WHERE ID > 0".to_string();
    second.tables.shift_remove("[sales].[Order]");
    second.with_permission(Permission::new("app", "EXECUTE", "GRANT").on_object("dbo", "GetCustomer"))
}

#[test]
fn test_full_report_layout() {
    let outcome = build(&sales("SQL01"), &drifted(), &CompareOptions::all(), &NoProgress).unwrap();

    let expected = "\
Database 1: SQL01.Sales
Database 2: SQL02.Sales
Extended properties:
  Property: database: Version value is different: database 1 value: 1.0, database 2 value: 1.1
Tables:
  Table: [dbo].[Customer]
    Columns:
      Column: Name
        character maximum length is different: database 1 value: 100, database 2 value: 200
    Indexes:
      Index: PK_Customer
        key column ID is ascending in database 1 and descending in database 2
  Table: [sales].[Order] does not exist in database 2
Views:
  View: [dbo].[CustomerNames]
    Definition is different
Procedures:
  Procedure: [dbo].[GetCustomer]
    Permissions:
      Permission: GRANT EXECUTE on [dbo].[GetCustomer] to app does not exist in database 1
";
    assert_eq!(render_report(&outcome.differences), expected);
    assert_eq!(
        outcome.definition_pairs.keys().collect::<Vec<_>>(),
        vec!["[dbo].[CustomerNames]"]
    );
}

#[test]
fn test_report_with_every_phase_disabled() {
    let outcome = build(&sales("SQL01"), &drifted(), &CompareOptions::none(), &NoProgress).unwrap();

    assert_eq!(
        outcome.differences.to_string(),
        "\
Database 1: SQL01.Sales
Database 2: SQL02.Sales
Tables:
  Table: [sales].[Order] does not exist in database 2
"
    );
}

#[test]
fn test_column_property_nests_under_column() {
    let mut second = sales("SQL02");
    second.extended_properties[2].value = "Legal name".to_string();

    let outcome = build(&sales("SQL01"), &second, &CompareOptions::all(), &NoProgress).unwrap();

    let expected = "\
Database 1: SQL01.Sales
Database 2: SQL02.Sales
Tables:
  Table: [dbo].[Customer]
    Columns:
      Column: Name
        Extended properties:
          Property: [dbo].[Customer] column [Name]: MS_Description value is different: database 1 value: Display name, database 2 value: Legal name
";
    assert_eq!(outcome.differences.to_string(), expected);
}

#[test]
fn test_objects_missing_on_either_side() {
    let mut first = sales("SQL01");
    first.synonyms.clear();
    let mut second = sales("SQL02");
    second.routines.shift_remove("[dbo].[FullName]");

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();

    let expected = "\
Database 1: SQL01.Sales
Database 2: SQL02.Sales
Functions:
  Function: [dbo].[FullName] does not exist in database 2
Synonyms:
  Synonym: [dbo].[Clients] does not exist in database 1
";
    assert_eq!(outcome.differences.to_string(), expected);
}

/// Both sides of the sales fixture with one `MS_Description` on `minor` of
/// `object`, valued differently per side.
fn described(object: &str, minor: MinorItem, value1: &str, value2: &str) -> (SchemaSnapshot, SchemaSnapshot) {
    let describe = |server: &str, value: &str| {
        sales(server).with_property(
            ExtendedProperty::new("MS_Description", value)
                .on_object("dbo", object)
                .on_minor(minor.clone()),
        )
    };
    (describe("SQL01", value1), describe("SQL02", value2))
}

#[test]
fn test_index_property_nests_under_index() {
    let (first, second) = described(
        "Customer",
        MinorItem::Index("PK_Customer".to_string()),
        "Primary key",
        "Clustered key",
    );
    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();

    let expected = "\
Database 1: SQL01.Sales
Database 2: SQL02.Sales
Tables:
  Table: [dbo].[Customer]
    Indexes:
      Index: PK_Customer
        Extended properties:
          Property: [dbo].[Customer] index [PK_Customer]: MS_Description value is different: database 1 value: Primary key, database 2 value: Clustered key
";
    assert_eq!(outcome.differences.to_string(), expected);
}

#[test]
fn test_index_property_moves_to_table_when_indexes_are_off() {
    let (first, second) = described(
        "Customer",
        MinorItem::Index("PK_Customer".to_string()),
        "Primary key",
        "Clustered key",
    );
    let options = CompareOptions {
        indexes: false,
        ..CompareOptions::all()
    };
    let outcome = build(&first, &second, &options, &NoProgress).unwrap();

    let expected = "\
Database 1: SQL01.Sales
Database 2: SQL02.Sales
Tables:
  Table: [dbo].[Customer]
    Extended properties:
      Property: [dbo].[Customer] index [PK_Customer]: MS_Description value is different: database 1 value: Primary key, database 2 value: Clustered key
";
    assert_eq!(outcome.differences.to_string(), expected);
    assert!(outcome.differences.tables["[dbo].[Customer]"].indexes.is_empty());
}

#[test]
fn test_parameter_property_nests_under_routine() {
    let (first, second) = described(
        "GetCustomer",
        MinorItem::Parameter("@ID".to_string()),
        "Customer id",
        "Customer key",
    );
    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();

    let expected = "\
Database 1: SQL01.Sales
Database 2: SQL02.Sales
Procedures:
  Procedure: [dbo].[GetCustomer]
    Extended properties:
      Property: [dbo].[GetCustomer] parameter @ID: MS_Description value is different: database 1 value: Customer id, database 2 value: Customer key
";
    assert_eq!(outcome.differences.to_string(), expected);
}
