//! Snapshot loading from static JSON dumps.
//!
//! A snapshot is stored either as one JSON document or as a directory with
//! one file per category plus a `definitions/` folder of `.sql` bodies.
//! Directory dumps are loaded in two generations: every category file is read
//! concurrently, and only once all of them are in are the definition bodies
//! they name fetched, again concurrently. Any missing piece fails the whole
//! load; a partially loaded snapshot is never handed out.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, trace};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinSet;

use super::{ExtendedProperty, Permission, Routine, RoutineKind, SchemaSnapshot, Table, UserType, keyed};
use crate::errors::SnapshotError;
use crate::keys::{canonical_name, definition_file_name};
use crate::progress::{ProgressReporter, ProgressUpdate};
use crate::types::Side;

/// Category files every directory dump must contain.
const CATEGORY_FILES: [&str; 8] = [
    "database",
    "tables",
    "user_types",
    "views",
    "synonyms",
    "routines",
    "permissions",
    "properties",
];

const DEFINITIONS_DIR: &str = "definitions";

/// Where a snapshot is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Single JSON document holding a whole snapshot
    File(PathBuf),
    /// Directory dump with one file per category
    Directory(PathBuf),
}

impl SnapshotSource {
    /// Directories are read as dumps; anything else as a single document.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            SnapshotSource::Directory(path)
        } else {
            SnapshotSource::File(path)
        }
    }

    pub async fn load(&self, side: Side, progress: &dyn ProgressReporter) -> Result<SchemaSnapshot, SnapshotError> {
        match self {
            SnapshotSource::File(path) => {
                progress.report(ProgressUpdate::for_side(side, format!("Reading {}", path.display())));
                load_snapshot_file(path).await
            }
            SnapshotSource::Directory(dir) => load_snapshot_dir(dir, side, progress).await,
        }
    }
}

/// Load a snapshot stored as one JSON document.
pub async fn load_snapshot_file(path: &Path) -> Result<SchemaSnapshot, SnapshotError> {
    debug!("Loading snapshot file {}", path.display());
    let text = read_text(path).await?;
    parse(path, &text)
}

/// Identity record stored in `database.json`.
#[derive(Debug, Deserialize)]
struct DatabaseIdentity {
    server: String,
    database: String,
    #[serde(default)]
    captured_at: Option<DateTime<Utc>>,
}

/// Entry of `routines.json`; the body lives under `definitions/`.
#[derive(Debug, Deserialize)]
struct RoutineEntry {
    name: String,
    kind: RoutineKind,
}

/// Name -> text object (`synonyms.json`) whose keys must not repeat.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct NamedTexts(#[serde(deserialize_with = "keyed::unique_map")] IndexMap<String, String>);

/// Raw category files collected by the first generation.
#[derive(Default)]
struct CategoryTexts {
    texts: IndexMap<&'static str, (PathBuf, String)>,
}

impl CategoryTexts {
    fn parse<T: DeserializeOwned>(&self, category: &str) -> Result<T, SnapshotError> {
        let (path, text) = &self.texts[category];
        parse(path, text)
    }

    fn parse_keyed<T>(&self, category: &str) -> Result<IndexMap<String, T>, SnapshotError>
    where
        T: DeserializeOwned + keyed::Keyed,
    {
        let items: Vec<T> = self.parse(category)?;
        keyed::collect(items).map_err(|key| self.duplicate(category, &key))
    }

    /// Canonical `[schema].[name]` forms of `names`, in order; a name that
    /// repeats (after canonicalization) is a parse error of `category`.
    fn unique_names<'n>(
        &self,
        category: &str,
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<Vec<String>, SnapshotError> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for name in names {
            let canonical = canonical_name(name);
            if !seen.insert(canonical.clone()) {
                return Err(self.duplicate(category, &canonical));
            }
            unique.push(canonical);
        }
        Ok(unique)
    }

    fn duplicate(&self, category: &str, key: &str) -> SnapshotError {
        SnapshotError::Parse {
            path: self.texts[category].0.clone(),
            source: serde::de::Error::custom(format!("duplicate entry '{key}'")),
        }
    }
}

/// Load a directory dump.
///
/// Generation one reads every category file; generation two reads the view
/// and routine bodies named by generation one. Bodies keep the order in which
/// their names were listed.
pub async fn load_snapshot_dir(
    dir: &Path,
    side: Side,
    progress: &dyn ProgressReporter,
) -> Result<SchemaSnapshot, SnapshotError> {
    debug!("Loading snapshot directory {} for {side}", dir.display());
    progress.report(ProgressUpdate::for_side(side, "Loading catalog categories"));

    let mut categories = JoinSet::new();
    for category in CATEGORY_FILES {
        let path = dir.join(format!("{category}.json"));
        categories.spawn(async move {
            let text = read_required(&path, side, category).await?;
            Ok::<_, SnapshotError>((category, path, text))
        });
    }

    let mut loaded = CategoryTexts::default();
    while let Some(joined) = categories.join_next().await {
        let (category, path, text) = joined??;
        trace!("{side}: read {category} ({} bytes)", text.len());
        loaded.texts.insert(category, (path, text));
    }

    let identity: DatabaseIdentity = loaded.parse("database")?;
    let tables: IndexMap<String, Table> = loaded.parse_keyed("tables")?;
    let user_types: IndexMap<String, UserType> = loaded.parse_keyed("user_types")?;
    let listed_views: Vec<String> = loaded.parse("views")?;
    let NamedTexts(listed_synonyms) = loaded.parse("synonyms")?;
    let routine_entries: Vec<RoutineEntry> = loaded.parse("routines")?;
    let permissions: Vec<Permission> = loaded.parse("permissions")?;
    let extended_properties: Vec<ExtendedProperty> = loaded.parse("properties")?;

    let synonym_names = loaded.unique_names("synonyms", listed_synonyms.keys().map(String::as_str))?;
    let synonyms = synonym_names.into_iter().zip(listed_synonyms.into_values()).collect();

    // Views and routines share one namespace and one definitions folder.
    let view_names = loaded.unique_names("views", listed_views.iter().map(String::as_str))?;
    let names = loaded.unique_names(
        "routines",
        view_names
            .iter()
            .map(String::as_str)
            .chain(routine_entries.iter().map(|entry| entry.name.as_str())),
    )?;
    progress.report(ProgressUpdate::for_side(
        side,
        format!("Loading {} definitions", names.len()),
    ));
    let mut bodies = load_definitions(&dir.join(DEFINITIONS_DIR), side, &names).await?;

    let routine_bodies = bodies.split_off(view_names.len());
    let routines = names[view_names.len()..]
        .iter()
        .zip(routine_entries)
        .zip(routine_bodies)
        .map(|((name, entry), definition)| {
            (
                name.clone(),
                Routine {
                    kind: entry.kind,
                    definition,
                },
            )
        })
        .collect();
    let views = view_names.into_iter().zip(bodies).collect();

    debug!("{side}: loaded {} tables", tables.len());
    Ok(SchemaSnapshot {
        server: identity.server,
        database: identity.database,
        captured_at: identity.captured_at,
        tables,
        user_types,
        views,
        synonyms,
        routines,
        permissions,
        extended_properties,
    })
}

/// Read every named definition body concurrently, returning them in the
/// order the names were given.
async fn load_definitions(dir: &Path, side: Side, names: &[String]) -> Result<Vec<String>, SnapshotError> {
    let mut reads = JoinSet::new();
    for (position, name) in names.iter().enumerate() {
        let path = dir.join(definition_file_name(name));
        reads.spawn(async move {
            let text = read_required(&path, side, "definitions").await?;
            Ok::<_, SnapshotError>((position, text))
        });
    }

    let mut bodies = vec![String::new(); names.len()];
    while let Some(joined) = reads.join_next().await {
        let (position, text) = joined??;
        bodies[position] = text;
    }
    Ok(bodies)
}

/// Load both sides in parallel under one deadline.
///
/// The first failure on either side fails the pair; the other side's
/// outstanding reads are abandoned.
pub async fn load_pair(
    source1: &SnapshotSource,
    source2: &SnapshotSource,
    limit: Duration,
    progress: &dyn ProgressReporter,
) -> Result<(SchemaSnapshot, SchemaSnapshot), SnapshotError> {
    with_deadline(limit, async {
        tokio::try_join!(source1.load(Side::One, progress), source2.load(Side::Two, progress))
    })
    .await
}

pub(crate) async fn with_deadline<T, F>(limit: Duration, work: F) -> Result<T, SnapshotError>
where
    F: Future<Output = Result<T, SnapshotError>>,
{
    tokio::time::timeout(limit, work)
        .await
        .map_err(|_| SnapshotError::Timeout { after: limit })?
}

async fn read_text(path: &Path) -> Result<String, SnapshotError> {
    tokio::fs::read_to_string(path).await.map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file that must exist; absence means the dump is incomplete.
async fn read_required(path: &Path, side: Side, category: &'static str) -> Result<String, SnapshotError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(SnapshotError::Incomplete {
            side,
            category,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, SnapshotError> {
    serde_json::from_str(text).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
