use schemadelta::differences::{Diff, Existence};
use schemadelta::snapshot::{Column, Permission, SchemaSnapshot, Table};
use schemadelta::{CompareOptions, NoProgress, Side, build};

use crate::support::{sales, single_table};

// ============================================================================
// Existence and identity
// ============================================================================

#[test]
fn test_nullability_change_is_a_single_column_discrepancy() {
    let first = single_table("SQL01");
    let mut second = single_table("SQL02");
    second.tables["[dbo].[T]"].columns["C"].is_nullable = false;

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let table = &outcome.differences.tables["[dbo].[T]"];
    let column = &table.columns["C"];

    assert_eq!(column.attributes.discrepancies.len(), 1);
    assert!(column.attributes.discrepancies[0].contains("allowed null"));
    assert!(table.is_different());
    assert!(outcome.differences.has_differences());
}

#[test]
fn test_table_only_in_second_database() {
    let first = SchemaSnapshot::new("SQL01", "App");
    let second = single_table("SQL02");

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let table = &outcome.differences.tables["[dbo].[T]"];

    assert_eq!(table.existence(), Existence::new(false, true));
    assert!(table.columns.is_empty());
    assert!(
        outcome
            .differences
            .to_string()
            .contains("Table: [dbo].[T] does not exist in database 1")
    );
}

#[test]
fn test_comment_only_view_change_is_not_a_difference() {
    let first = SchemaSnapshot::new("SQL01", "App").with_view("[dbo].[V]", "CREATE VIEW V AS SELECT 1 -- first");
    let second = SchemaSnapshot::new("SQL02", "App").with_view("[dbo].[V]", "CREATE VIEW V AS /* second */ SELECT 1");

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let view = &outcome.differences.views["[dbo].[V]"];

    assert!(!view.definitions_are_different());
    assert!(!view.is_different());
    assert!(outcome.definition_pairs.is_empty());
    assert!(!outcome.differences.has_differences());
}

#[test]
fn test_extra_database_level_grant() {
    let first = SchemaSnapshot::new("SQL01", "App");
    let second =
        SchemaSnapshot::new("SQL02", "App").with_permission(Permission::new("app", "SELECT", "GRANT").on_object("dbo", "T"));

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let differences = &outcome.differences;

    assert_eq!(differences.permissions.len(), 1);
    let grant = &differences.permissions["GRANT SELECT on [dbo].[T] to app"];
    assert_eq!(grant.existence(), Existence::new(false, true));
    assert!(differences.properties.is_empty());
    assert!(differences.tables.is_empty());
    assert!(differences.user_types.is_empty());
    assert!(differences.views.is_empty());
    assert!(differences.functions.is_empty());
    assert!(differences.procedures.is_empty());
    assert!(differences.synonyms.is_empty());
}

#[test]
fn test_extra_grant_on_table_is_reported_on_the_table() {
    let first = single_table("SQL01");
    let second = single_table("SQL02").with_permission(Permission::new("app", "SELECT", "GRANT").on_object("dbo", "T"));

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let table = &outcome.differences.tables["[dbo].[T]"];

    assert!(outcome.differences.permissions.is_empty());
    assert_eq!(table.permissions.len(), 1);
    assert_eq!(
        table.permissions["GRANT SELECT on [dbo].[T] to app"].existence(),
        Existence::only(Side::Two)
    );
    assert!(!table.columns["C"].is_different());
}

// ============================================================================
// Self comparison
// ============================================================================

#[test]
fn test_identical_snapshots_have_no_differences() {
    let first = sales("SQL01");
    let second = sales("SQL02");

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let differences = &outcome.differences;

    assert!(!differences.has_differences());
    for count in differences.summary() {
        assert_eq!(count.different, 0, "{:?}", count.category);
    }
    assert_eq!(differences.tables.len(), 2);
    assert_eq!(differences.tables["[dbo].[Customer]"].columns.len(), 2);
    assert_eq!(differences.views.len(), 1);
    assert_eq!(differences.functions.len(), 1);
    assert_eq!(differences.procedures.len(), 1);
    assert!(outcome.definition_pairs.is_empty());
    assert_eq!(
        differences.to_string(),
        "No differences found between SQL01.Sales and SQL02.Sales.\n"
    );
}

#[test]
fn test_deserialized_copy_has_no_differences() {
    let first = sales("SQL01");
    let json = serde_json::to_string(&first).unwrap();
    let mut second: SchemaSnapshot = serde_json::from_str(&json).unwrap();
    second.server = "SQL01-REPLICA".to_string();

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    assert!(!outcome.differences.has_differences());
}

// ============================================================================
// Ordering and options
// ============================================================================

#[test]
fn test_second_only_keys_follow_first_side_keys() {
    let first = SchemaSnapshot::new("SQL01", "App")
        .with_table(Table::new("dbo", "B"))
        .with_table(Table::new("dbo", "A"));
    let second = SchemaSnapshot::new("SQL02", "App")
        .with_table(Table::new("dbo", "Z"))
        .with_table(Table::new("dbo", "A"));

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let keys: Vec<&String> = outcome.differences.tables.keys().collect();
    assert_eq!(keys, vec!["[dbo].[B]", "[dbo].[A]", "[dbo].[Z]"]);
}

#[test]
fn test_disabled_phases_leave_categories_empty() {
    let first = sales("SQL01");
    let mut second = sales("SQL02");
    second.views.clear();
    second.tables["[dbo].[Customer]"].columns.shift_remove("Name");

    let outcome = build(&first, &second, &CompareOptions::none(), &NoProgress).unwrap();
    let differences = &outcome.differences;

    assert!(differences.views.is_empty());
    assert!(differences.properties.is_empty());
    assert!(differences.permissions.is_empty());
    assert!(differences.tables["[dbo].[Customer]"].columns.is_empty());
    assert!(!differences.has_differences());
}

#[test]
fn test_changed_trigger_body_is_recorded_as_a_pair() {
    let first = sales("SQL01");
    let mut second = sales("SQL02");
    second.tables["[dbo].[Customer]"].triggers["TR_Customer_Audit"].definition =
        "CREATE TRIGGER dbo.TR_Customer_Audit ON dbo.Customer AFTER INSERT AS SELECT 2".to_string();

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let pair = &outcome.definition_pairs["[dbo].[TR_Customer_Audit]"];
    assert!(pair.before.ends_with("SELECT 1"));
    assert!(pair.after.ends_with("SELECT 2"));
}

#[test]
fn test_column_added_on_second_side() {
    let first = single_table("SQL01");
    let mut second = single_table("SQL02");
    second.tables["[dbo].[T]"]
        .columns
        .insert("D".to_string(), Column::new("D", "int"));

    let outcome = build(&first, &second, &CompareOptions::all(), &NoProgress).unwrap();
    let columns = &outcome.differences.tables["[dbo].[T]"].columns;
    assert_eq!(columns["D"].existence(), Existence::only(Side::Two));
    assert!(!columns["C"].is_different());
}
