use colored::{Color, Colorize};

use crate::record::Level;

/// Styling configuration carried by each handler.
///
/// Deliberately a plain value rather than process-global state: a handler
/// writing colorized lines to a terminal and a handler writing plain lines
/// to a capture buffer can coexist in one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    colors: bool,
}

impl Theme {
    /// Styled output, the default.
    pub fn colored() -> Self {
        Theme { colors: true }
    }

    /// Plain text, byte-for-byte deterministic. Use this for tests and for
    /// sinks that are not terminals.
    pub fn plain() -> Self {
        Theme { colors: false }
    }

    pub fn is_colored(&self) -> bool {
        self.colors
    }

    /// `[HH:MM:SS] ` span, bracket and trailing space included.
    pub fn timestamp(&self, s: &str) -> String {
        self.paint(s, Color::BrightBlue)
    }

    /// Level tag span.
    pub fn level(&self, level: Level, s: &str) -> String {
        let color = match level {
            Level::DEBUG => Color::BrightCyan,
            Level::INFO => Color::Green,
            Level::WARN => Color::BrightYellow,
            Level::ERROR => Color::BrightRed,
            _ => Color::White,
        };
        self.paint(s, color)
    }

    /// Message span. Debug and Info reuse the level hue, higher severities
    /// switch to a neutral bright tone so the tag stays the loud part.
    pub fn message(&self, level: Level, s: &str) -> String {
        let color = match level {
            Level::DEBUG => Color::BrightCyan,
            Level::INFO => Color::Green,
            _ => Color::BrightWhite,
        };
        self.paint(s, color)
    }

    /// One `name.` group-path segment.
    pub fn group(&self, s: &str) -> String {
        self.paint(s, Color::BrightBlue)
    }

    /// ` key=` span, leading space and equals sign included.
    pub fn key(&self, s: &str) -> String {
        self.paint(s, Color::BrightGreen)
    }

    /// Formatted attribute value span.
    pub fn value(&self, s: &str) -> String {
        self.paint(s, Color::BrightYellow)
    }

    fn paint(&self, s: &str, color: Color) -> String {
        if self.colors {
            s.color(color).to_string()
        } else {
            s.to_string()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::colored()
    }
}
