//! Question records and their ordered labels.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordered identifier behind a record's `number`.
///
/// A bare question sorts before its sub-parts: `3 < 3a < 3b < 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionLabel {
    /// Question number
    pub number: u32,
    /// Sub-part letter (lowercase)
    pub part: Option<char>,
}

impl QuestionLabel {
    /// A top-level question.
    pub fn question(number: u32) -> Self {
        Self { number, part: None }
    }

    /// A lettered sub-part of a question.
    pub fn sub_part(number: u32, part: char) -> Self {
        Self {
            number,
            part: Some(part.to_ascii_lowercase()),
        }
    }

    /// Parse a label such as `"3"` or `"3b"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits_end = s
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        if digits_end == 0 {
            return None;
        }

        let number: u32 = s[..digits_end].parse().ok()?;
        let mut rest = s[digits_end..].chars();
        match (rest.next(), rest.next()) {
            (None, _) => Some(Self::question(number)),
            (Some(c), None) if c.is_ascii_alphabetic() => Some(Self::sub_part(number, c)),
            _ => None,
        }
    }

    /// The letter that follows this label's part in sequence.
    pub fn next_part(&self) -> Option<char> {
        match self.part {
            None => Some('a'),
            Some('z') => None,
            Some(c) => char::from_u32(c as u32 + 1),
        }
    }
}

impl Ord for QuestionLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.part.cmp(&other.part))
    }
}

impl PartialOrd for QuestionLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QuestionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part {
            Some(p) => write!(f, "{}{}", self.number, p),
            None => write!(f, "{}", self.number),
        }
    }
}

/// One question or sub-question extracted from a paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Sequence identifier, e.g. "3" or "3b"
    pub number: String,

    /// Concatenated question body
    pub text: String,

    /// Mark value, if one was detected
    pub marks: Option<u32>,

    /// Page the record starts on (1-indexed)
    pub page: u32,

    /// Vertical position of the record's first line
    #[serde(default)]
    pub y: f32,

    /// Ids of figure regions attached to this record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub figures: Vec<String>,
}

impl QuestionRecord {
    /// Create an empty record for a label.
    pub fn new(label: QuestionLabel, page: u32, y: f32) -> Self {
        Self {
            number: label.to_string(),
            text: String::new(),
            marks: None,
            page,
            y,
            figures: Vec::new(),
        }
    }

    /// Parsed form of `number`.
    pub fn label(&self) -> Option<QuestionLabel> {
        QuestionLabel::parse(&self.number)
    }

    /// The top-level question number this record belongs to.
    pub fn question_number(&self) -> Option<u32> {
        self.label().map(|l| l.number)
    }

    /// Whether this record is a lettered sub-part.
    pub fn is_sub_part(&self) -> bool {
        self.label().is_some_and(|l| l.part.is_some())
    }

    /// Rebuild a single source line that segments back into this record.
    pub fn to_line(&self) -> String {
        let mut line = format!("{}. {}", self.number, self.text);
        if let Some(marks) = self.marks {
            line.push_str(&format!(" [{}]", marks));
        }
        line.trim_end().to_string()
    }
}
