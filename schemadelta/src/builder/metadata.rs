//! Routing of flat permission and extended-property records to the nodes
//! that own them.
//!
//! Records arrive as two flat lists per side. Each record is filed under the
//! slot of the node it will be reported on: a table or object, a column, an
//! index, or the database itself. Records owned by something that no enabled
//! category compares fall back to the database level so nothing is lost.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::sweep;
use crate::differences::{Existence, FromExistence, PermissionDifference, ValueDifference};
use crate::options::CompareOptions;
use crate::snapshot::{Keyed, Owner, SchemaSnapshot, Table};

/// Node a record is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Slot {
    Database,
    /// Table, view, routine or synonym (routine parameters included)
    Object(String),
    Column { object: String, column: String },
    Index { object: String, index: String },
}

impl Slot {
    pub(crate) fn column(object: &str, column: &str) -> Self {
        Slot::Column {
            object: object.to_string(),
            column: column.to_string(),
        }
    }

    pub(crate) fn index(object: &str, index: &str) -> Self {
        Slot::Index {
            object: object.to_string(),
            index: index.to_string(),
        }
    }
}

/// Decides which slot an owner maps to, given what both snapshots contain
/// and which phases are enabled.
struct Router<'a> {
    first: &'a SchemaSnapshot,
    second: &'a SchemaSnapshot,
    options: &'a CompareOptions,
}

impl Router<'_> {
    fn tables<'t>(&'t self, object: &str) -> impl Iterator<Item = &'t Table> {
        self.first
            .tables
            .get(object)
            .into_iter()
            .chain(self.second.tables.get(object))
    }

    fn either(&self, check: impl Fn(&SchemaSnapshot) -> bool) -> bool {
        check(self.first) || check(self.second)
    }

    fn is_table(&self, object: &str) -> bool {
        self.either(|snapshot| snapshot.tables.contains_key(object))
    }

    fn is_routine(&self, object: &str) -> bool {
        self.options.objects && self.either(|snapshot| snapshot.routines.contains_key(object))
    }

    fn is_object(&self, object: &str) -> bool {
        self.is_routine(object)
            || (self.options.objects && self.either(|snapshot| snapshot.views.contains_key(object)))
            || (self.options.synonyms && self.either(|snapshot| snapshot.synonyms.contains_key(object)))
    }

    fn slot(&self, owner: &Owner) -> Slot {
        match owner {
            Owner::Object(object) if self.is_table(object) || self.is_object(object) => Slot::Object(object.clone()),
            Owner::Parameter { object, .. } if self.is_routine(object) => Slot::Object(object.clone()),
            Owner::Column { object, column } if self.is_table(object) => {
                let compared =
                    self.options.columns && self.tables(object).any(|table| table.columns.contains_key(column));
                if compared {
                    Slot::column(object, column)
                } else {
                    Slot::Object(object.clone())
                }
            }
            Owner::Index { object, index } if self.is_table(object) => {
                let compared =
                    self.options.indexes && self.tables(object).any(|table| table.indexes.contains_key(index));
                if compared {
                    Slot::index(object, index)
                } else {
                    Slot::Object(object.clone())
                }
            }
            _ => Slot::Database,
        }
    }
}

/// Records of one side grouped by slot, in their original order.
struct Buckets<V> {
    slots: HashMap<Slot, IndexMap<String, V>>,
}

impl<V> Default for Buckets<V> {
    fn default() -> Self {
        Self { slots: HashMap::new() }
    }
}

impl<V> Buckets<V> {
    fn insert(&mut self, slot: Slot, key: String, value: V) {
        self.slots.entry(slot).or_default().insert(key, value);
    }

    fn take(&mut self, slot: &Slot) -> IndexMap<String, V> {
        self.slots.remove(slot).unwrap_or_default()
    }
}

#[derive(Default)]
struct SideRecords {
    properties: Buckets<String>,
    permissions: Buckets<()>,
}

impl SideRecords {
    fn route(snapshot: &SchemaSnapshot, router: &Router<'_>) -> Self {
        let mut records = SideRecords::default();
        for property in &snapshot.extended_properties {
            let slot = router.slot(&property.owner());
            records.properties.insert(slot, property.key(), property.value.clone());
        }
        for permission in &snapshot.permissions {
            let slot = router.slot(&permission.owner());
            records.permissions.insert(slot, permission.key(), ());
        }
        records
    }
}

/// Routed records of both sides. Each slot is handed out once.
pub(crate) struct Metadata {
    first: SideRecords,
    second: SideRecords,
    properties_enabled: bool,
    permissions_enabled: bool,
}

impl Metadata {
    pub(crate) fn route(first: &SchemaSnapshot, second: &SchemaSnapshot, options: &CompareOptions) -> Self {
        let router = Router { first, second, options };
        Self {
            first: SideRecords::route(first, &router),
            second: SideRecords::route(second, &router),
            properties_enabled: options.properties,
            permissions_enabled: options.permissions,
        }
    }

    /// Extended-property differences for one node; empty when the phase is off.
    pub(crate) fn properties(&mut self, slot: &Slot) -> IndexMap<String, ValueDifference> {
        if !self.properties_enabled {
            return IndexMap::new();
        }
        let first = self.first.properties.take(slot);
        let second = self.second.properties.take(slot);
        sweep(&first, &second, |_, value1, value2| ValueDifference::new(value1.as_str(), value2.as_str()))
    }

    /// Permission differences for one node; empty when the phase is off.
    pub(crate) fn permissions(&mut self, slot: &Slot) -> IndexMap<String, PermissionDifference> {
        if !self.permissions_enabled {
            return IndexMap::new();
        }
        let first = self.first.permissions.take(slot);
        let second = self.second.permissions.take(slot);
        sweep(&first, &second, |_, _, _| PermissionDifference::from_existence(Existence::both()))
    }
}
