use indexmap::IndexMap;

use super::metadata::Slot;
use super::{Builder, columns, indexes, relations, sweep, triggers};
use crate::differences::{DetailedDifference, Diff, Existence, FromExistence, TableDifference};
use crate::keys::qualified_name;
use crate::snapshot::Table;

impl Builder<'_> {
    /// Tables are compared in two phases: existence for every table, then
    /// nested details for tables present on both sides.
    pub(super) fn tables(&mut self) -> IndexMap<String, TableDifference> {
        let (first, second) = (self.first, self.second);
        self.report("Comparing tables");
        let mut tables = sweep(&first.tables, &second.tables, |_, _, _| {
            TableDifference::from_existence(Existence::both())
        });

        self.report("Comparing table details");
        for (key, node) in tables.iter_mut() {
            if let (Some(table1), Some(table2)) = (first.tables.get(key), second.tables.get(key)) {
                self.table_details(key, table1, table2, node);
            }
        }
        tables
    }

    fn table_details(&mut self, key: &str, table1: &Table, table2: &Table, node: &mut TableDifference) {
        let options = self.options;

        if options.columns {
            node.columns = sweep(&table1.columns, &table2.columns, |_, column1, column2| {
                DetailedDifference::new(columns::compare(column1, column2, options))
            });
            for (name, column) in node.columns.iter_mut().filter(|(_, column)| column.existence().in_both()) {
                column.properties = self.metadata.properties(&Slot::column(key, name));
            }
        }

        if options.indexes {
            node.indexes = sweep(&table1.indexes, &table2.indexes, |_, index1, index2| {
                DetailedDifference::new(indexes::compare(index1, index2))
            });
            for (name, index) in node.indexes.iter_mut().filter(|(_, index)| index.existence().in_both()) {
                index.properties = self.metadata.properties(&Slot::index(key, name));
            }
        }

        if options.relations {
            node.relations = sweep(&table1.relations, &table2.relations, |_, relation1, relation2| {
                relations::compare(relation1, relation2)
            });
        }

        if options.triggers {
            let mut pairs = Vec::new();
            node.triggers = sweep(&table1.triggers, &table2.triggers, |_, trigger1, trigger2| {
                let compared = triggers::compare(trigger1, trigger2, options);
                if compared.definition_differs {
                    pairs.push((
                        qualified_name(&table1.schema, &trigger1.name),
                        trigger1.definition.clone(),
                        trigger2.definition.clone(),
                    ));
                }
                compared.node
            });
            for (name, before, after) in pairs {
                self.record_pair(&name, &before, &after);
            }
        }

        let slot = Slot::Object(key.to_string());
        node.properties = self.metadata.properties(&slot);
        node.permissions = self.metadata.permissions(&slot);
    }
}
