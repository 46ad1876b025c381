use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use schemadelta::{clean_definition, definitions_differ};

use crate::help::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Inspect a Definition",
        commands: &[
            "schemadelta clean dbo.CustomerSummary.sql                    # Body as compared",
            "schemadelta clean dbo.CustomerSummary.sql --keep-whitespace",
        ],
    },
    ExampleGroup {
        title: "Check Two Bodies",
        commands: &["schemadelta clean out/dbo.V.1.sql out/dbo.V.2.sql   # Do they differ once cleaned?"],
    },
];

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Definition file to clean
    pub file: PathBuf,

    /// Second definition file; report whether the two differ once cleaned
    pub other: Option<PathBuf>,

    /// Keep whitespace runs instead of collapsing them
    #[arg(long)]
    pub keep_whitespace: bool,
}

pub async fn handle_clean(args: CleanArgs, output: &OutputManager) -> Result<()> {
    let strip_whitespace = !args.keep_whitespace;
    let first = read_definition(&args.file).await?;

    match &args.other {
        None => output.report(&format!("{}\n", clean_definition(&first, strip_whitespace))),
        Some(other) => {
            let second = read_definition(other).await?;
            if definitions_differ(&first, &second, strip_whitespace) {
                output.different("Definitions differ after cleaning");
            } else {
                output.same("Definitions match after cleaning");
            }
        }
    }
    Ok(())
}

async fn read_definition(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}
