use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::Side;

/// Errors that stop a comparison before it starts.
///
/// The builder performs no I/O, so every variant is a precondition failure:
/// nothing is compared and no partial report exists when one is returned.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Both snapshots describe the same database instance.
    #[error("both sides resolve to the same database '{name}'; choose two different databases")]
    SameDatabase { name: String },

    /// A snapshot lacks the server or database name that identifies it.
    #[error("{side} has no {field} name")]
    MissingIdentity { side: Side, field: &'static str },

    /// A snapshot's collections are not keyed the way their items identify themselves.
    #[error("{side} snapshot is inconsistent in {category}: {detail}")]
    InconsistentSnapshot {
        side: Side,
        category: &'static str,
        detail: String,
    },
}

/// Errors raised while loading a snapshot from disk.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required category (or a definition body it names) is missing.
    #[error("{side} snapshot is incomplete: {category} not found at {}", path.display())]
    Incomplete {
        side: Side,
        category: &'static str,
        path: PathBuf,
    },

    /// Loading did not finish before the configured deadline.
    #[error("snapshot loading timed out after {}s", after.as_secs())]
    Timeout { after: Duration },

    /// A loader task panicked or was cancelled.
    #[error("snapshot loader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
