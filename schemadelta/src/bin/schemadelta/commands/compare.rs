use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use schemadelta::differences::Differences;
use schemadelta::keys::definition_file_name;
use schemadelta::ComparisonOutcome;

use super::{SnapshotArgs, run_comparison};
use crate::context::RunContext;
use crate::help::ExampleGroup;
use crate::output::{OutputFormat, OutputManager};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Compare Snapshots",
        commands: &[
            "schemadelta compare prod.json staging.json          # Full report",
            "schemadelta compare dumps/prod dumps/staging        # Directory dumps",
            "schemadelta compare a.json b.json --output json     # Machine-readable tree",
        ],
    },
    ExampleGroup {
        title: "Narrow the Comparison",
        commands: &[
            "schemadelta compare a.json b.json --no-permissions --no-properties",
            "schemadelta compare a.json b.json --no-ordinals --no-collation",
        ],
    },
    ExampleGroup {
        title: "Inspect Definition Changes",
        commands: &["schemadelta compare a.json b.json --diff-dir out/   # Write changed bodies for a diff tool"],
    },
];

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub snapshots: SnapshotArgs,

    /// Write the raw bodies of changed definitions to this directory as
    /// NAME.1.sql and NAME.2.sql
    #[arg(long, value_name = "DIR")]
    pub diff_dir: Option<PathBuf>,
}

pub async fn handle_compare(args: CompareArgs, ctx: &RunContext, output: &OutputManager) -> Result<()> {
    let outcome = run_comparison(&args.snapshots, ctx, output).await?;

    match output.format() {
        OutputFormat::Text => output.report(&outcome.differences.to_string()),
        OutputFormat::Json => output.json(&outcome)?,
        OutputFormat::Compact => output.report(&format!("{}\n", compact_line(&outcome.differences))),
    }

    if let Some(dir) = &args.diff_dir {
        write_definition_pairs(dir, &outcome, output)?;
    }

    Ok(())
}

/// One-line summary: `db1 vs db2: 3 differences (tables 2, views 1)`.
fn compact_line(differences: &Differences) -> String {
    let summary = differences.summary();
    let total: usize = summary.iter().map(|count| count.different).sum();
    let counts: Vec<String> = summary
        .iter()
        .filter(|count| count.different > 0)
        .map(|count| format!("{} {}", count.category.heading().to_lowercase(), count.different))
        .collect();

    if total == 0 {
        format!("{} vs {}: no differences", differences.database1, differences.database2)
    } else {
        let noun = if total == 1 { "difference" } else { "differences" };
        format!(
            "{} vs {}: {total} {noun} ({})",
            differences.database1,
            differences.database2,
            counts.join(", ")
        )
    }
}

fn write_definition_pairs(dir: &Path, outcome: &ComparisonOutcome, output: &OutputManager) -> Result<()> {
    if outcome.definition_pairs.is_empty() {
        output.notice("No definition bodies differ; nothing written");
        return Ok(());
    }

    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    for (name, pair) in &outcome.definition_pairs {
        let file_name = definition_file_name(name);
        let stem = file_name.strip_suffix(".sql").unwrap_or(&file_name);
        for (suffix, body) in [("1", &pair.before), ("2", &pair.after)] {
            let path = dir.join(format!("{stem}.{suffix}.sql"));
            std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {}", path.display());
        }
        output.item(&format!("{stem}.1.sql / {stem}.2.sql"));
    }

    output.notice(&format!(
        "Wrote {} definition pair(s) to {}",
        outcome.definition_pairs.len(),
        dir.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadelta::differences::{Existence, FromExistence, ObjectDifference, TableDifference};
    use schemadelta::types::Side;

    #[test]
    fn test_compact_line() {
        let mut differences = Differences::new("a.x", "b.x");
        assert_eq!(compact_line(&differences), "a.x vs b.x: no differences");

        differences.tables.insert(
            "[dbo].[T]".to_string(),
            TableDifference::from_existence(Existence::only(Side::One)),
        );
        assert_eq!(compact_line(&differences), "a.x vs b.x: 1 difference (tables 1)");

        differences.views.insert(
            "[dbo].[V]".to_string(),
            ObjectDifference::from_existence(Existence::only(Side::Two)),
        );
        assert_eq!(compact_line(&differences), "a.x vs b.x: 2 differences (tables 1, views 1)");
    }
}
