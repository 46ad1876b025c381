mod commands;
mod context;
mod help;
mod output;
mod theme;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use commands::{
    clean::{CleanArgs, handle_clean},
    compare::{CompareArgs, handle_compare},
    summary::{SummaryArgs, handle_summary},
};
use context::RunContext;
use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "schemadelta")]
#[command(version)]
#[command(
    about = "Compare two SQL Server schema snapshots",
    long_about = r#"Compare two SQL Server schema snapshots and report every difference:

• Tables, columns, indexes, relations and triggers
• Views, functions, stored procedures and synonyms (comment-insensitive)
• User types, extended properties and permissions

Snapshots are JSON documents or directory dumps with one file per category.

Commands:
  compare   Print the full difference report
  summary   Show per-category difference counts
  clean     Show a definition body as it is compared
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Show configuration and loading details on stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (defaults to .schemadelta/config.toml in the
    /// current directory or a parent)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two snapshots and print the difference report
    Compare(CompareArgs),

    /// Show how many objects differ in each category
    Summary(SummaryArgs),

    /// Print a definition body the way it is compared
    Clean(CleanArgs),
}

impl Cli {
    fn parse_decorated() -> Self {
        let matches = help::decorate(Cli::command()).get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }

    fn output(&self) -> OutputManager {
        OutputManager::new(GlobalOptions {
            output_format: self.output,
            quiet: self.quiet,
            verbose: self.verbose,
            no_color: self.no_color,
        })
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse_decorated();
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = execute(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let output = cli.output();

    match cli.command {
        Commands::Compare(args) => {
            let ctx = RunContext::load(cli.config.as_deref())?;
            handle_compare(args, &ctx, &output).await
        }
        Commands::Summary(args) => {
            let ctx = RunContext::load(cli.config.as_deref())?;
            handle_summary(args, &ctx, &output).await
        }
        Commands::Clean(args) => handle_clean(args, &output).await,
    }
}
