//! Long-help decoration: per-command example groups, the environment
//! appendix, and clap styles drawn from the palette.

use std::fmt::Write;

use clap::Command;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Color as ClapColor, RgbColor, Style};
use colored::{Color, Colorize, control::ShouldColorize};

use crate::commands::{clean, compare, summary};
use crate::theme::{MARKS, PALETTE};

/// A titled set of sample invocations
#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("RUST_LOG", "Diagnostic log filter, e.g. schemadelta=debug"),
    ("NO_COLOR", "Disable colored output when set"),
];

fn examples_for(command: &str) -> &'static [ExampleGroup] {
    match command {
        "compare" => compare::EXAMPLES,
        "summary" => summary::EXAMPLES,
        "clean" => clean::EXAMPLES,
        _ => &[],
    }
}

/// Attach examples and the appendix to `command`, coloured when the terminal allows
pub fn decorate(command: Command) -> Command {
    let help = Help {
        color: ShouldColorize::from_env().should_colorize(),
    };

    let mut command = command.after_long_help(help.appendix());
    let names: Vec<String> = command.get_subcommands().map(|sub| sub.get_name().to_string()).collect();
    for name in names {
        let groups = examples_for(&name);
        if let Some(subcommand) = command.find_subcommand_mut(&name)
            && !groups.is_empty()
        {
            *subcommand = subcommand.clone().after_long_help(help.examples(groups));
        }
    }
    if help.color { command.styles(styles()) } else { command.color(clap::ColorChoice::Never) }
}

struct Help {
    color: bool,
}

impl Help {
    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        match (self.color, bold) {
            (false, _) => text.to_string(),
            (true, true) => text.color(color).bold().to_string(),
            (true, false) => text.color(color).to_string(),
        }
    }

    fn examples(&self, groups: &[ExampleGroup]) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.paint("Examples:", PALETTE.heading, true));

        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                buffer.push('\n');
            }
            let _ = writeln!(buffer, "  {}", self.paint(group.title, PALETTE.heading, false));
            for line in group.commands {
                let _ = writeln!(
                    buffer,
                    "    {} {}",
                    self.paint(MARKS.detail, PALETTE.muted, false),
                    self.paint(line, PALETTE.command, false)
                );
            }
        }
        buffer
    }

    fn appendix(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.paint("Environment Variables:", PALETTE.heading, true));
        for (name, description) in ENVIRONMENT_VARIABLES {
            let _ = writeln!(buffer, "  {}  {description}", self.paint(name, PALETTE.command, true));
        }
        let _ = writeln!(
            buffer,
            "\n{} {}",
            self.paint("Tip:", PALETTE.heading, true),
            "Use 'schemadelta <command> --help' to view examples for each command."
        );
        buffer
    }
}

fn styles() -> Styles {
    let style = |color: Color| Style::new().fg_color(Some(clap_color(color)));
    Styles::styled()
        .usage(style(PALETTE.heading).bold())
        .header(style(PALETTE.heading).bold())
        .literal(style(PALETTE.command))
        .placeholder(style(PALETTE.placeholder))
        .valid(style(PALETTE.same))
        .invalid(style(PALETTE.different))
        .error(style(PALETTE.error).bold())
}

fn clap_color(color: Color) -> ClapColor {
    let ansi = match color {
        Color::Black => AnsiColor::Black,
        Color::Red => AnsiColor::Red,
        Color::Green => AnsiColor::Green,
        Color::Yellow => AnsiColor::Yellow,
        Color::Blue => AnsiColor::Blue,
        Color::Magenta => AnsiColor::Magenta,
        Color::Cyan => AnsiColor::Cyan,
        Color::White => AnsiColor::White,
        Color::BrightBlack => AnsiColor::BrightBlack,
        Color::BrightRed => AnsiColor::BrightRed,
        Color::BrightGreen => AnsiColor::BrightGreen,
        Color::BrightYellow => AnsiColor::BrightYellow,
        Color::BrightBlue => AnsiColor::BrightBlue,
        Color::BrightMagenta => AnsiColor::BrightMagenta,
        Color::BrightCyan => AnsiColor::BrightCyan,
        Color::BrightWhite => AnsiColor::BrightWhite,
        Color::TrueColor { r, g, b } => return ClapColor::Rgb(RgbColor(r, g, b)),
    };
    ClapColor::Ansi(ansi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_has_examples() {
        for name in ["compare", "summary", "clean"] {
            assert!(!examples_for(name).is_empty(), "{name}");
        }
        assert!(examples_for("unknown").is_empty());
    }

    #[test]
    fn test_plain_examples_layout() {
        let help = Help { color: false };
        let text = help.examples(&[ExampleGroup {
            title: "Compare Snapshots",
            commands: &["schemadelta compare a.json b.json"],
        }]);
        assert_eq!(text, "Examples:\n  Compare Snapshots\n    → schemadelta compare a.json b.json\n");
    }
}
