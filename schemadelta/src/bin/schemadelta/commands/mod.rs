pub mod clean;
pub mod compare;
pub mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use schemadelta::{CompareOptions, ComparisonOutcome, ProgressUpdate, SnapshotSource, build, load_pair};

use crate::context::RunContext;
use crate::output::OutputManager;

/// The two snapshots to compare and the switches that shape the comparison
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Snapshot of database 1 (JSON file or dump directory)
    #[arg(value_name = "SIDE1")]
    pub side1: PathBuf,

    /// Snapshot of database 2 (JSON file or dump directory)
    #[arg(value_name = "SIDE2")]
    pub side2: PathBuf,

    /// Seconds allowed for loading both snapshots
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub toggles: ToggleArgs,
}

/// Switches that turn individual comparison phases off
#[derive(Args, Debug, Default)]
pub struct ToggleArgs {
    /// Skip table columns
    #[arg(long)]
    pub no_columns: bool,

    /// Skip foreign-key relations
    #[arg(long)]
    pub no_relations: bool,

    /// Skip views, functions and procedures
    #[arg(long)]
    pub no_objects: bool,

    /// Skip indexes
    #[arg(long)]
    pub no_indexes: bool,

    /// Skip permissions
    #[arg(long)]
    pub no_permissions: bool,

    /// Skip extended properties
    #[arg(long)]
    pub no_properties: bool,

    /// Skip triggers
    #[arg(long)]
    pub no_triggers: bool,

    /// Skip synonyms
    #[arg(long)]
    pub no_synonyms: bool,

    /// Ignore column ordinal positions
    #[arg(long)]
    pub no_ordinals: bool,

    /// Skip user-defined types
    #[arg(long)]
    pub no_user_types: bool,

    /// Ignore collations
    #[arg(long)]
    pub no_collation: bool,

    /// Compare definition bodies without collapsing whitespace
    #[arg(long)]
    pub keep_whitespace: bool,
}

impl ToggleArgs {
    /// Apply the switches on top of configured options
    pub fn apply(&self, base: CompareOptions) -> CompareOptions {
        CompareOptions {
            columns: base.columns && !self.no_columns,
            relations: base.relations && !self.no_relations,
            objects: base.objects && !self.no_objects,
            indexes: base.indexes && !self.no_indexes,
            permissions: base.permissions && !self.no_permissions,
            properties: base.properties && !self.no_properties,
            triggers: base.triggers && !self.no_triggers,
            synonyms: base.synonyms && !self.no_synonyms,
            ordinal_positions: base.ordinal_positions && !self.no_ordinals,
            user_types: base.user_types && !self.no_user_types,
            collation: base.collation && !self.no_collation,
            ignore_whitespace: base.ignore_whitespace && !self.keep_whitespace,
        }
    }
}

/// Load both snapshots and build their differences, showing progress
pub async fn run_comparison(args: &SnapshotArgs, ctx: &RunContext, output: &OutputManager) -> Result<ComparisonOutcome> {
    if let Some(path) = &ctx.config_path {
        output.detail(&format!("Using configuration from {}", path.display()));
    }

    let options = args.toggles.apply(ctx.config.compare);
    let source1 = SnapshotSource::from_path(&args.side1);
    let source2 = SnapshotSource::from_path(&args.side2);
    let reporter = |update: ProgressUpdate| output.progress(&update.to_string());

    let (first, second) = load_pair(&source1, &source2, ctx.timeout(args.timeout), &reporter)
        .await
        .context("Failed to load snapshots")?;
    output.clear_progress();
    output.detail(&format!(
        "Loaded {} ({} tables) and {} ({} tables)",
        first.friendly_name(),
        first.tables.len(),
        second.friendly_name(),
        second.tables.len()
    ));

    let outcome = build(&first, &second, &options, &reporter)?;
    output.clear_progress();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_only_disable() {
        let toggles = ToggleArgs {
            no_indexes: true,
            keep_whitespace: true,
            ..Default::default()
        };
        let base = CompareOptions {
            permissions: false,
            ..CompareOptions::all()
        };
        let options = toggles.apply(base);
        assert!(!options.indexes);
        assert!(!options.permissions);
        assert!(!options.ignore_whitespace);
        assert!(options.columns);
    }
}
