//! Line-level types produced by extraction sources.

use serde::{Deserialize, Serialize};

/// One line of extracted text with its source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// The line text as emitted by the extractor
    pub text: String,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Vertical position from the top of the page.
    ///
    /// Sources without geometry use the line's ordinal within its page.
    #[serde(default)]
    pub y: f32,
}

fn default_page() -> u32 {
    1
}

impl RawLine {
    /// Create a new line.
    pub fn new(text: impl Into<String>, page: u32, y: f32) -> Self {
        Self {
            text: text.into(),
            page,
            y,
        }
    }

    /// Create a line on page 1 positioned by its ordinal.
    pub fn text_only(text: impl Into<String>, ordinal: usize) -> Self {
        Self::new(text, 1, ordinal as f32)
    }

    /// Check whether the line carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Build page-1 lines from plain strings, positioned by ordinal.
pub fn lines_from_strs<S: AsRef<str>>(texts: &[S]) -> Vec<RawLine> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| RawLine::text_only(t.as_ref(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_line_defaults_from_json() {
        let line: RawLine = serde_json::from_str(r#"{"text": "1. Hello"}"#).unwrap();
        assert_eq!(line.page, 1);
        assert_eq!(line.y, 0.0);
    }

    #[test]
    fn test_lines_from_strs_ordinals() {
        let lines = lines_from_strs(&["a", "b", "c"]);
        assert_eq!(lines[2].y, 2.0);
        assert!(lines.iter().all(|l| l.page == 1));
    }

    #[test]
    fn test_is_blank() {
        assert!(RawLine::text_only("   ", 0).is_blank());
        assert!(!RawLine::text_only(" x ", 0).is_blank());
    }
}
