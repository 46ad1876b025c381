use indexmap::IndexMap;

use super::checks::Checks;
use crate::differences::AttributeDifference;
use crate::snapshot::{Index, IndexColumn};

/// Compare the attributes and column lists of an index present on both sides.
pub(super) fn compare(first: &Index, second: &Index) -> AttributeDifference {
    let mut checks = Checks::new();

    checks.value("index type", first.kind.as_str(), second.kind.as_str());
    checks.flag(("was primary key", "was not primary key"), first.is_primary_key, second.is_primary_key);
    checks.flag(("was unique", "was not unique"), first.is_unique, second.is_unique);
    checks.flag(
        ("was unique constraint", "was not unique constraint"),
        first.is_unique_constraint,
        second.is_unique_constraint,
    );
    checks.flag(("was disabled", "was enabled"), first.is_disabled, second.is_disabled);
    checks.optional("fill factor", &first.fill_factor, &second.fill_factor);
    checks.optional("filter definition", &first.filter_definition, &second.filter_definition);

    compare_columns(&mut checks, "key column", &first.columns, &second.columns);
    compare_key_order(&mut checks, &first.columns, &second.columns);
    compare_columns(&mut checks, "included column", &first.included_columns, &second.included_columns);

    checks.finish()
}

/// Presence and sort direction of each column, database 1 columns first.
fn compare_columns(
    checks: &mut Checks,
    label: &str,
    first: &IndexMap<String, IndexColumn>,
    second: &IndexMap<String, IndexColumn>,
) {
    let direction = |column: &IndexColumn| if column.is_descending { "descending" } else { "ascending" };

    for (name, column1) in first {
        match second.get(name) {
            Some(column2) if column1.is_descending != column2.is_descending => checks.push(format!(
                "{label} {name} is {} in database 1 and {} in database 2",
                direction(column1),
                direction(column2)
            )),
            Some(_) => {}
            None => checks.push(format!("{label} {name} does not exist in database 2")),
        }
    }
    for name in second.keys().filter(|name| !first.contains_key(*name)) {
        checks.push(format!("{label} {name} does not exist in database 1"));
    }
}

/// Same key columns listed in a different order.
fn compare_key_order(checks: &mut Checks, first: &IndexMap<String, IndexColumn>, second: &IndexMap<String, IndexColumn>) {
    let same_set = first.len() == second.len() && first.keys().all(|name| second.contains_key(name));
    if same_set && !first.keys().eq(second.keys()) {
        let listed = |columns: &IndexMap<String, IndexColumn>| columns.keys().cloned().collect::<Vec<_>>().join(", ");
        checks.value("key column order", listed(first).as_str(), listed(second).as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_included_columns() {
        let first = Index::new("IX_T", "NONCLUSTERED")
            .with_column("A", false)
            .with_column("B", true)
            .with_included_column("X");
        let second = Index::new("IX_T", "NONCLUSTERED")
            .with_column("A", true)
            .with_column("C", false)
            .with_included_column("Y");

        assert_eq!(
            compare(&first, &second).discrepancies,
            vec![
                "key column A is ascending in database 1 and descending in database 2",
                "key column B does not exist in database 2",
                "key column C does not exist in database 1",
                "included column X does not exist in database 2",
                "included column Y does not exist in database 1",
            ]
        );
    }

    #[test]
    fn test_key_order() {
        let first = Index::new("PK_T", "CLUSTERED").with_column("A", false).with_column("B", false);
        let second = Index::new("PK_T", "CLUSTERED").with_column("B", false).with_column("A", false);
        assert_eq!(
            compare(&first, &second).discrepancies,
            vec!["key column order is different: database 1 value: A, B, database 2 value: B, A"]
        );
    }

    #[test]
    fn test_attributes() {
        let first = Index {
            is_unique: true,
            fill_factor: Some(80),
            ..Index::new("IX", "NONCLUSTERED")
        };
        let second = Index::new("IX", "CLUSTERED");
        assert_eq!(
            compare(&first, &second).discrepancies,
            vec![
                "index type is different: database 1 value: NONCLUSTERED, database 2 value: CLUSTERED",
                "was unique in database 1 and was not unique in database 2",
                "fill factor is different: database 1 value: 80, database 2 value: (none)",
            ]
        );
    }
}
