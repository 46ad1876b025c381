//! Difference builder.
//!
//! Walks two snapshots category by category and assembles the
//! [`Differences`] tree. Building is synchronous and performs no I/O; the
//! only outputs besides the tree are advisory progress updates and the raw
//! definition pairs of objects whose bodies differ.

mod checks;
mod columns;
mod indexes;
mod metadata;
mod objects;
mod relations;
mod tables;
mod triggers;
mod user_types;

use indexmap::IndexMap;
use serde::Serialize;

use crate::differences::{DefinitionPair, Differences, Existence, FromExistence};
use crate::errors::CompareError;
use crate::options::CompareOptions;
use crate::progress::{ProgressReporter, ProgressUpdate};
use crate::snapshot::SchemaSnapshot;
use crate::types::Side;

use metadata::{Metadata, Slot};

/// Result of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub differences: Differences,

    /// Raw bodies of views, routines, synonyms and triggers whose cleaned
    /// definitions differ, keyed by qualified name
    pub definition_pairs: IndexMap<String, DefinitionPair>,
}

/// Compare two snapshots.
///
/// Both snapshots are validated and must describe different databases;
/// otherwise nothing is compared and the error is returned. Phases run in a
/// fixed order: database properties, database permissions, tables, user
/// types, synonyms, views, functions, procedures. A phase disabled in
/// `options` leaves its maps empty.
pub fn build(
    first: &SchemaSnapshot,
    second: &SchemaSnapshot,
    options: &CompareOptions,
    progress: &dyn ProgressReporter,
) -> Result<ComparisonOutcome, CompareError> {
    first.validate(Side::One)?;
    second.validate(Side::Two)?;

    let (name1, name2) = (first.friendly_name(), second.friendly_name());
    if name1.eq_ignore_ascii_case(&name2) {
        return Err(CompareError::SameDatabase { name: name1 });
    }

    let mut builder = Builder {
        first,
        second,
        options,
        progress,
        metadata: Metadata::route(first, second, options),
        definition_pairs: IndexMap::new(),
    };
    let mut differences = Differences::new(name1, name2);

    builder.report("Comparing extended properties");
    differences.properties = builder.metadata.properties(&Slot::Database);

    builder.report("Comparing permissions");
    differences.permissions = builder.metadata.permissions(&Slot::Database);

    differences.tables = builder.tables();

    if options.user_types {
        builder.report("Comparing user types");
        differences.user_types = sweep(&first.user_types, &second.user_types, |_, type1, type2| {
            user_types::compare(type1, type2, options)
        });
    }

    if options.synonyms {
        builder.report("Comparing synonyms");
        differences.synonyms = builder.objects(&first.synonyms, &second.synonyms);
    }

    if options.objects {
        builder.report("Comparing views");
        differences.views = builder.objects(&first.views, &second.views);

        let (functions1, procedures1) = objects::split_routines(first);
        let (functions2, procedures2) = objects::split_routines(second);

        builder.report("Comparing functions");
        differences.functions = builder.objects(&functions1, &functions2);

        builder.report("Comparing procedures");
        differences.procedures = builder.objects(&procedures1, &procedures2);
    }

    builder.report("Comparison complete");
    Ok(ComparisonOutcome {
        differences,
        definition_pairs: builder.definition_pairs,
    })
}

/// State shared by the comparison phases of one run.
struct Builder<'a> {
    first: &'a SchemaSnapshot,
    second: &'a SchemaSnapshot,
    options: &'a CompareOptions,
    progress: &'a dyn ProgressReporter,
    metadata: Metadata,
    definition_pairs: IndexMap<String, DefinitionPair>,
}

impl Builder<'_> {
    fn report(&self, message: &str) {
        self.progress.report(ProgressUpdate::new(message));
    }

    fn record_pair(&mut self, name: &str, before: &str, after: &str) {
        self.definition_pairs.insert(
            name.to_string(),
            DefinitionPair {
                before: before.to_string(),
                after: after.to_string(),
            },
        );
    }
}

/// Two-pass symmetric sweep over one keyed category.
///
/// Keys of `first` come first, in their order; keys found only in `second`
/// follow in theirs. Items present on both sides are handed to `compare`;
/// the rest become existence-only nodes.
pub(crate) fn sweep<T, D, F>(first: &IndexMap<String, T>, second: &IndexMap<String, T>, mut compare: F) -> IndexMap<String, D>
where
    D: FromExistence,
    F: FnMut(&str, &T, &T) -> D,
{
    let mut nodes = IndexMap::with_capacity(first.len().max(second.len()));
    for (key, item1) in first {
        let node = match second.get(key) {
            Some(item2) => compare(key, item1, item2),
            None => D::from_existence(Existence::only(Side::One)),
        };
        nodes.insert(key.clone(), node);
    }
    for key in second.keys() {
        if !first.contains_key(key) {
            nodes.insert(key.clone(), D::from_existence(Existence::only(Side::Two)));
        }
    }
    nodes
}
