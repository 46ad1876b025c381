use indexmap::IndexMap;

use super::metadata::Slot;
use super::{Builder, sweep};
use crate::differences::{Diff, ObjectDifference};
use crate::snapshot::{RoutineKind, SchemaSnapshot};

impl Builder<'_> {
    /// Compare one category of definition-bearing objects (views, functions,
    /// procedures or synonyms), keyed by qualified name.
    pub(super) fn objects(
        &mut self,
        first: &IndexMap<String, String>,
        second: &IndexMap<String, String>,
    ) -> IndexMap<String, ObjectDifference> {
        let ignore_whitespace = self.options.ignore_whitespace;
        let mut objects = sweep(first, second, |_, definition1, definition2| {
            ObjectDifference::new(definition1.as_str(), definition2.as_str(), ignore_whitespace)
        });

        for (name, object) in objects.iter_mut().filter(|(_, object)| object.existence().in_both()) {
            if object.definitions_are_different()
                && let (Some(before), Some(after)) = (&object.definition1, &object.definition2)
            {
                self.record_pair(name, before, after);
            }
            let slot = Slot::Object(name.clone());
            object.properties = self.metadata.properties(&slot);
            object.permissions = self.metadata.permissions(&slot);
        }
        objects
    }
}

/// Definitions of a snapshot's functions and procedures, in snapshot order.
pub(super) fn split_routines(snapshot: &SchemaSnapshot) -> (IndexMap<String, String>, IndexMap<String, String>) {
    let mut functions = IndexMap::new();
    let mut procedures = IndexMap::new();
    for (name, routine) in &snapshot.routines {
        let target = match routine.kind {
            RoutineKind::Function => &mut functions,
            RoutineKind::Procedure => &mut procedures,
        };
        target.insert(name.clone(), routine.definition.clone());
    }
    (functions, procedures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_routines_keeps_order() {
        let snapshot = SchemaSnapshot::new("SQL01", "Sales")
            .with_routine("[dbo].[P2]", RoutineKind::Procedure, "CREATE PROCEDURE P2 AS RETURN")
            .with_routine("[dbo].[F]", RoutineKind::Function, "CREATE FUNCTION F() RETURNS INT AS BEGIN RETURN 1 END")
            .with_routine("[dbo].[P1]", RoutineKind::Procedure, "CREATE PROCEDURE P1 AS RETURN");

        let (functions, procedures) = split_routines(&snapshot);
        assert_eq!(functions.keys().collect::<Vec<_>>(), vec!["[dbo].[F]"]);
        assert_eq!(procedures.keys().collect::<Vec<_>>(), vec!["[dbo].[P2]", "[dbo].[P1]"]);
    }
}
