use serde::{Deserialize, Serialize};

/// ANSI open/close pair applied around text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub open: String,
    pub close: String,
}

impl Style {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    fn sgr(open: u8, close: u8) -> Self {
        Self::new(format!("\u{1b}[{open}m"), format!("\u{1b}[{close}m"))
    }

    pub fn paint(&self, text: &str) -> String {
        format!("{}{}{}", self.open, text, self.close)
    }
}

const BUILTIN: &[(&str, u8, u8)] = &[
    ("bold", 1, 22),
    ("dim", 2, 22),
    ("italic", 3, 23),
    ("underline", 4, 24),
    ("inverse", 7, 27),
    ("red", 31, 39),
    ("green", 32, 39),
    ("yellow", 33, 39),
    ("blue", 34, 39),
    ("magenta", 35, 39),
    ("cyan", 36, 39),
    ("white", 37, 39),
    ("gray", 90, 39),
];

/// Built-in styles in registration order.
pub fn builtin_styles() -> impl Iterator<Item = (&'static str, Style)> {
    BUILTIN
        .iter()
        .map(|(name, open, close)| (*name, Style::sgr(*open, *close)))
}

pub fn builtin(name: &str) -> Option<Style> {
    BUILTIN
        .iter()
        .find(|(candidate, _, _)| *candidate == name)
        .map(|(_, open, close)| Style::sgr(*open, *close))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_wraps_text() {
        let red = builtin("red").unwrap();
        assert_eq!(red.paint("x"), "\u{1b}[31mx\u{1b}[39m");
    }

    #[test]
    fn unknown_style_is_none() {
        assert!(builtin("sparkly").is_none());
        assert_eq!(builtin_styles().count(), BUILTIN.len());
    }
}
