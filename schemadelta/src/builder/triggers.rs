use super::checks::Checks;
use crate::definition::definitions_differ;
use crate::differences::AttributeDifference;
use crate::options::CompareOptions;
use crate::snapshot::Trigger;

pub(super) struct TriggerComparison {
    pub(super) node: AttributeDifference,
    /// Cleaned bodies differ; the raw pair belongs in the side channel
    pub(super) definition_differs: bool,
}

/// Compare a trigger present on both sides.
pub(super) fn compare(first: &Trigger, second: &Trigger, options: &CompareOptions) -> TriggerComparison {
    let mut checks = Checks::new();

    checks.flag(("fired on insert", "did not fire on insert"), first.is_insert, second.is_insert);
    checks.flag(("fired on update", "did not fire on update"), first.is_update, second.is_update);
    checks.flag(("fired on delete", "did not fire on delete"), first.is_delete, second.is_delete);
    checks.flag(("was AFTER", "was INSTEAD OF"), first.is_after, second.is_after);
    checks.flag(("was disabled", "was enabled"), first.is_disabled, second.is_disabled);

    let definition_differs = definitions_differ(&first.definition, &second.definition, options.ignore_whitespace);
    if definition_differs {
        checks.push("definition is different");
    }

    TriggerComparison {
        node: checks.finish(),
        definition_differs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_flags_and_body() {
        let first = Trigger {
            is_insert: true,
            ..Trigger::new("TR_Audit", "CREATE TRIGGER TR_Audit ON T AFTER INSERT AS SELECT 1")
        };
        let second = Trigger {
            is_insert: true,
            is_after: false,
            ..Trigger::new("TR_Audit", "CREATE TRIGGER TR_Audit ON T INSTEAD OF INSERT AS SELECT 1")
        };

        let compared = compare(&first, &second, &CompareOptions::all());
        assert!(compared.definition_differs);
        assert_eq!(
            compared.node.discrepancies,
            vec!["was AFTER in database 1 and was INSTEAD OF in database 2", "definition is different"]
        );
    }

    #[test]
    fn test_comment_only_change_is_ignored() {
        let first = Trigger::new("TR", "CREATE TRIGGER TR ON T AFTER UPDATE AS SELECT 1 -- v1");
        let second = Trigger::new("TR", "CREATE TRIGGER TR ON T AFTER UPDATE AS SELECT 1 /* v2 */");
        let compared = compare(&first, &second, &CompareOptions::all());
        assert!(!compared.definition_differs);
        assert!(compared.node.discrepancies.is_empty());
    }
}
