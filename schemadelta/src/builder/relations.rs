use super::checks::Checks;
use crate::differences::AttributeDifference;
use crate::snapshot::Relation;

/// Compare a foreign-key relation present on both sides.
pub(super) fn compare(first: &Relation, second: &Relation) -> AttributeDifference {
    let mut checks = Checks::new();

    checks.value("referenced table", first.referenced_table.as_str(), second.referenced_table.as_str());
    if first.column_pairs != second.column_pairs {
        checks.value("columns", column_list(first).as_str(), column_list(second).as_str());
    }
    checks.value("delete rule", first.delete_rule.as_str(), second.delete_rule.as_str());
    checks.value("update rule", first.update_rule.as_str(), second.update_rule.as_str());
    checks.flag(("was disabled", "was enabled"), first.is_disabled, second.is_disabled);
    checks.flag(("was not trusted", "was trusted"), first.is_not_trusted, second.is_not_trusted);

    checks.finish()
}

fn column_list(relation: &Relation) -> String {
    relation
        .column_pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_checks() {
        let first = Relation::new("FK_Order_Customer", "[dbo].[Customer]").with_pair("CustomerID", "ID");
        let second = Relation {
            delete_rule: "CASCADE".to_string(),
            is_not_trusted: true,
            ..Relation::new("FK_Order_Customer", "[dbo].[Customer]").with_pair("ClientID", "ID")
        };

        assert_eq!(
            compare(&first, &second).discrepancies,
            vec![
                "columns is different: database 1 value: [CustomerID] -> [ID], database 2 value: [ClientID] -> [ID]",
                "delete rule is different: database 1 value: NO_ACTION, database 2 value: CASCADE",
                "was trusted in database 1 and was not trusted in database 2",
            ]
        );
    }

    #[test]
    fn test_identical_relations() {
        let relation = Relation::new("FK", "[dbo].[Parent]").with_pair("ParentID", "ID");
        assert!(compare(&relation, &relation.clone()).discrepancies.is_empty());
    }
}
