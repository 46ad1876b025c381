use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as CellColor, Table, presets};
use schemadelta::Side;
use serde::Serialize;

use crate::theme::{MARKS, PALETTE};

/// How command results are written to stdout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Report text or a table (default)
    #[default]
    Text,
    /// Pretty JSON of the full result
    Json,
    /// One line per run, for scripts and CI logs
    Compact,
}

/// Global flags that shape output
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// A command result with a table form for text output and a one-line form
pub trait Tabular: Serialize {
    fn to_table(&self, output: &OutputManager) -> Table;
    fn to_compact(&self) -> String;
}

#[derive(Clone, Copy)]
enum Tone {
    Same,
    Different,
    Notice,
    Detail,
}

impl Tone {
    fn mark(self) -> (&'static str, Color) {
        match self {
            Tone::Same => (MARKS.same, PALETTE.same),
            Tone::Different => (MARKS.different, PALETTE.different),
            Tone::Notice => (MARKS.notice, PALETTE.notice),
            Tone::Detail => (MARKS.detail, PALETTE.muted),
        }
    }
}

/// Writes every piece of CLI output, honouring format, quiet and colour flags
pub struct OutputManager {
    options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn format(&self) -> OutputFormat {
        self.options.output_format
    }

    pub fn is_text(&self) -> bool {
        self.options.output_format == OutputFormat::Text
    }

    /// Write a result in the configured format
    pub fn emit<T: Tabular>(&self, data: &T) -> Result<()> {
        match self.options.output_format {
            OutputFormat::Json => self.json(data)?,
            OutputFormat::Text => self.report(&format!("{}\n", data.to_table(self))),
            OutputFormat::Compact => self.report(&format!("{}\n", data.to_compact())),
        }
        Ok(())
    }

    pub fn json<T: Serialize>(&self, data: &T) -> Result<()> {
        if !self.options.quiet {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        Ok(())
    }

    /// Write pre-rendered report text untouched
    pub fn report(&self, text: &str) {
        if !self.options.quiet {
            print!("{text}");
            std::io::stdout().flush().ok();
        }
    }

    pub fn same(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.tone_line(Tone::Same, message));
        }
    }

    pub fn different(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.tone_line(Tone::Different, message));
        }
    }

    pub fn notice(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.tone_line(Tone::Notice, message));
        }
    }

    /// Diagnostic line on stderr, shown only with --verbose
    pub fn detail(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.tone_line(Tone::Detail, message));
        }
    }

    /// The `Database 1: …` / `Database 2: …` header, each side in its colour
    pub fn databases(&self, first: &str, second: &str) {
        if self.options.quiet {
            return;
        }
        for (side, name) in [(Side::One, first), (Side::Two, second)] {
            let label = format!("Database {}:", side.number());
            println!("{} {name}", self.paint(&label, PALETTE.side(side), true));
        }
    }

    /// One written file in a list
    pub fn item(&self, text: &str) {
        if !self.options.quiet {
            println!("  {} {text}", self.paint(MARKS.item, PALETTE.muted, false));
        }
    }

    /// Empty table with bold headers and a preset matching the colour mode
    pub fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.options.no_color {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL_CONDENSED
        });
        table.set_header(headers.iter().map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if self.options.no_color { cell } else { cell.fg(CellColor::Blue) }
        }));
        table
    }

    /// Count of differing objects, highlighted when non-zero
    pub fn count_cell(&self, count: usize) -> Cell {
        let cell = Cell::new(count);
        if self.options.no_color || count == 0 {
            cell
        } else {
            cell.fg(CellColor::Yellow).add_attribute(Attribute::Bold)
        }
    }

    /// Overwrite the stderr status line with a loading or comparison step
    pub fn progress(&self, message: &str) {
        if !self.shows_progress() {
            return;
        }
        let mark = self.paint(MARKS.progress, PALETTE.progress, true);
        let text = self.paint(message, PALETTE.progress, false);
        eprint!("\r\x1b[2K{mark} {text}...");
        std::io::stderr().flush().ok();
    }

    pub fn clear_progress(&self) {
        if self.shows_progress() {
            eprint!("\r\x1b[2K");
            std::io::stderr().flush().ok();
        }
    }

    fn shows_progress(&self) -> bool {
        !self.options.quiet && self.options.output_format != OutputFormat::Json
    }

    fn tone_line(&self, tone: Tone, message: &str) -> String {
        let (mark, color) = tone.mark();
        format!("{} {}", self.paint(mark, color, false), self.paint(message, color, false))
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        match (self.options.no_color, bold) {
            (true, _) => text.to_string(),
            (false, true) => text.color(color).bold().to_string(),
            (false, false) => text.color(color).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> OutputManager {
        OutputManager::new(GlobalOptions {
            no_color: true,
            ..Default::default()
        })
    }

    #[derive(Serialize)]
    struct Counts {
        tables: usize,
    }

    impl Tabular for Counts {
        fn to_table(&self, output: &OutputManager) -> Table {
            let mut table = output.table(&["Category", "Different"]);
            table.add_row(vec![Cell::new("Tables"), output.count_cell(self.tables)]);
            table
        }

        fn to_compact(&self) -> String {
            format!("tables={}", self.tables)
        }
    }

    #[test]
    fn test_plain_tone_lines() {
        let output = plain();
        assert_eq!(output.tone_line(Tone::Same, "No differences"), "✓ No differences");
        assert_eq!(output.tone_line(Tone::Different, "Tables differ"), "≠ Tables differ");
    }

    #[test]
    fn test_plain_table_uses_ascii_preset() {
        let output = plain();
        let rendered = Counts { tables: 2 }.to_table(&output).to_string();
        assert!(rendered.contains("| Tables"));
        assert!(rendered.contains("| 2"));
    }

    #[test]
    fn test_emit_in_every_format() {
        for output_format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Compact] {
            let output = OutputManager::new(GlobalOptions {
                output_format,
                quiet: true,
                ..Default::default()
            });
            assert!(output.emit(&Counts { tables: 0 }).is_ok());
        }
        assert!(OutputManager::new(GlobalOptions::default()).shows_progress());
    }
}
