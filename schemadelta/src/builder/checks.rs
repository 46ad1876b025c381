use std::fmt::Display;

use crate::definition::definitions_differ;
use crate::differences::AttributeDifference;

const NONE: &str = "(none)";

/// Accumulates one discrepancy per failed attribute check.
///
/// Checks never short-circuit: every attribute is compared and each mismatch
/// adds its own line.
#[derive(Debug, Default)]
pub(crate) struct Checks {
    discrepancies: Vec<String>,
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, discrepancy: impl Into<String>) {
        self.discrepancies.push(discrepancy.into());
    }

    /// Compare two plain values.
    pub(crate) fn value<T: Display + PartialEq + ?Sized>(&mut self, label: &str, first: &T, second: &T) {
        if first != second {
            self.push(value_discrepancy(label, first, second));
        }
    }

    /// Compare two optional values; an absent value renders as `(none)`.
    pub(crate) fn optional<T: Display + PartialEq>(&mut self, label: &str, first: &Option<T>, second: &Option<T>) {
        if first != second {
            self.push(value_discrepancy(label, &Shown(first), &Shown(second)));
        }
    }

    /// Compare two flags, describing each side with `phrases.0` when set and
    /// `phrases.1` when not.
    pub(crate) fn flag(&mut self, phrases: (&str, &str), first: bool, second: bool) {
        if first != second {
            let describe = |flag: bool| if flag { phrases.0 } else { phrases.1 };
            self.push(format!(
                "{} in database 1 and {} in database 2",
                describe(first),
                describe(second)
            ));
        }
    }

    /// Compare two definition bodies after cleaning.
    pub(crate) fn definition(&mut self, label: &str, first: &str, second: &str, strip_whitespace: bool) {
        if definitions_differ(first, second, strip_whitespace) {
            self.push(format!("{label} is different"));
        }
    }

    pub(crate) fn finish(self) -> AttributeDifference {
        let mut node = AttributeDifference::matched();
        node.discrepancies = self.discrepancies;
        node
    }
}

fn value_discrepancy<T: Display + ?Sized>(label: &str, first: &T, second: &T) -> String {
    format!("{label} is different: database 1 value: {first}, database 2 value: {second}")
}

struct Shown<'a, T>(&'a Option<T>);

impl<T: Display> Display for Shown<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(NONE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks_collect_every_mismatch() {
        let mut checks = Checks::new();
        checks.value("data type", "int", "bigint");
        checks.optional("numeric scale", &Some(2), &None);
        checks.flag(("allowed null", "did not allow null"), true, false);
        checks.value("collation", "x", "x");

        let node = checks.finish();
        assert_eq!(
            node.discrepancies,
            vec![
                "data type is different: database 1 value: int, database 2 value: bigint",
                "numeric scale is different: database 1 value: 2, database 2 value: (none)",
                "allowed null in database 1 and did not allow null in database 2",
            ]
        );
    }

    #[test]
    fn test_definition_check_ignores_comments() {
        let mut checks = Checks::new();
        checks.definition("definition", "SELECT 1 -- a", "SELECT 1", true);
        assert!(checks.finish().discrepancies.is_empty());
    }
}
