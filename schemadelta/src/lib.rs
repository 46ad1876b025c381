//! schemadelta core library.
//!
//! Snapshot model, loaders, and the difference engine that compares two
//! SQL Server schema snapshots and renders a deterministic text report.

pub mod builder;
pub mod definition;
pub mod differences;
pub mod errors;
pub mod keys;
pub mod options;
pub mod progress;
pub mod snapshot;
pub mod types;

pub use builder::{ComparisonOutcome, build};
pub use definition::{clean_definition, definitions_differ};
pub use differences::{Category, CategoryCount, DefinitionPair, Diff, Differences, Existence, render_report};
pub use errors::*;
pub use options::CompareOptions;
pub use progress::{NoProgress, ProgressReporter, ProgressUpdate};
pub use snapshot::loader::{SnapshotSource, load_pair, load_snapshot_dir, load_snapshot_file};
pub use snapshot::SchemaSnapshot;
pub use types::Side;
