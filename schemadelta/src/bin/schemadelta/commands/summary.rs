use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use schemadelta::CategoryCount;
use serde::Serialize;

use super::{SnapshotArgs, run_comparison};
use crate::context::RunContext;
use crate::help::ExampleGroup;
use crate::output::{OutputManager, Tabular};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Summarize Differences",
    commands: &[
        "schemadelta summary prod.json staging.json                 # Counts per category",
        "schemadelta summary prod.json staging.json --output compact",
    ],
}];

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub snapshots: SnapshotArgs,
}

/// Per-category counts for one comparison
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub database1: String,
    pub database2: String,
    pub definition_pairs: usize,
    pub categories: Vec<CategoryCount>,
}

impl Tabular for SummaryReport {
    fn to_table(&self, manager: &OutputManager) -> Table {
        let mut table = manager.table(&["Category", "Compared", "Different"]);
        for count in &self.categories {
            table.add_row(vec![
                Cell::new(count.category.heading()),
                Cell::new(count.compared),
                manager.count_cell(count.different),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.categories
            .iter()
            .map(|count| format!("{}={}", count.category.key(), count.different))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub async fn handle_summary(args: SummaryArgs, ctx: &RunContext, output: &OutputManager) -> Result<()> {
    let outcome = run_comparison(&args.snapshots, ctx, output).await?;
    let differences = &outcome.differences;

    let report = SummaryReport {
        database1: differences.database1.clone(),
        database2: differences.database2.clone(),
        definition_pairs: outcome.definition_pairs.len(),
        categories: differences.summary(),
    };

    if output.is_text() {
        output.databases(&report.database1, &report.database2);
    }
    output.emit(&report)?;

    if output.is_text() {
        if differences.has_differences() {
            output.different("The databases differ; run 'schemadelta compare' for details");
        } else {
            output.same("No differences found");
        }
    }
    Ok(())
}
