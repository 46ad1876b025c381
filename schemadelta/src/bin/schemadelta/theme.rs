use colored::Color;
use once_cell::sync::Lazy;
use schemadelta::Side;

/// Colours for the roles that appear in CLI output and help
pub struct Palette {
    pub heading: Color,
    pub command: Color,
    pub placeholder: Color,
    pub database1: Color,
    pub database2: Color,
    pub same: Color,
    pub different: Color,
    pub notice: Color,
    pub progress: Color,
    pub muted: Color,
    pub error: Color,
}

impl Palette {
    /// Colour that marks everything belonging to one side of a comparison
    pub fn side(&self, side: Side) -> Color {
        match side {
            Side::One => self.database1,
            Side::Two => self.database2,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            heading: Color::BrightBlue,
            command: Color::Cyan,
            placeholder: Color::BrightBlack,
            database1: Color::BrightMagenta,
            database2: Color::BrightCyan,
            same: Color::Green,
            different: Color::Yellow,
            notice: Color::Blue,
            progress: Color::Cyan,
            muted: Color::BrightBlack,
            error: Color::Red,
        }
    }
}

pub static PALETTE: Lazy<Palette> = Lazy::new(Palette::default);

/// Leading glyphs for status lines
pub struct Marks {
    pub same: &'static str,
    pub different: &'static str,
    pub notice: &'static str,
    pub detail: &'static str,
    pub item: &'static str,
    pub progress: &'static str,
}

pub const MARKS: Marks = Marks {
    same: "✓",
    different: "≠",
    notice: "ℹ",
    detail: "→",
    item: "•",
    progress: "⟳",
};
