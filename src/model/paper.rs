//! Paper-level types.

use super::{FigureRegion, QuestionRecord, RawLine};
use crate::detect::InputFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A segmented exam paper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paper {
    /// Source and extraction metadata
    pub metadata: PaperMetadata,

    /// Questions in reading order
    pub questions: Vec<QuestionRecord>,

    /// Declared "Total for Question N" values, keyed by question number
    #[serde(default)]
    pub totals: BTreeMap<u32, u32>,

    /// Declared total for the whole paper
    pub paper_total: Option<u32>,

    /// Detected figure regions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub figures: Vec<FigureRegion>,

    /// Segmentation statistics
    pub stats: SegmentStats,
}

impl Paper {
    /// Create an empty paper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records (questions and sub-parts).
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Number of distinct top-level questions.
    pub fn top_level_count(&self) -> usize {
        self.questions
            .iter()
            .filter_map(|q| q.question_number())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Sum of all detected marks.
    pub fn total_marks(&self) -> u32 {
        self.questions.iter().filter_map(|q| q.marks).sum()
    }

    /// Look up a record by its number.
    pub fn get(&self, number: &str) -> Option<&QuestionRecord> {
        self.questions.iter().find(|q| q.number == number)
    }

    /// Check if no questions were found.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Rebuild one line per record; segmenting them again yields the same records.
    pub fn flatten(&self) -> Vec<RawLine> {
        flatten_records(&self.questions)
    }
}

/// Rebuild one source line per record, keeping each record's position.
pub fn flatten_records(records: &[QuestionRecord]) -> Vec<RawLine> {
    records
        .iter()
        .map(|r| RawLine::new(r.to_line(), r.page, r.y))
        .collect()
}

/// Paper metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperMetadata {
    /// Source file path, if read from disk
    pub source: Option<String>,

    /// Detected input format
    pub format: Option<InputFormat>,

    /// Total number of pages in the source
    pub page_count: u32,

    /// When the paper was segmented
    pub extracted_at: Option<DateTime<Utc>>,

    /// Text-layer coverage of the source
    pub text_layer: TextLayerReport,

    /// Lines carry page coordinates, so figures could be placed
    #[serde(default)]
    pub positioned: bool,
}

/// Which pages of a document carry extractable text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLayerReport {
    /// Pages in the document
    pub page_count: u32,

    /// Pages with at least one non-blank line
    pub text_pages: u32,

    /// Pages with no text (1-indexed)
    pub empty_pages: Vec<u32>,

    /// Non-blank lines across the document
    pub line_count: u32,
}

impl TextLayerReport {
    /// Build a report from extracted lines.
    ///
    /// `page_count` covers pages that produced no lines at all.
    pub fn from_lines(lines: &[RawLine], page_count: u32) -> Self {
        let mut per_page: BTreeMap<u32, u32> = BTreeMap::new();
        for line in lines.iter().filter(|l| !l.is_blank()) {
            *per_page.entry(line.page).or_insert(0) += 1;
        }

        let page_count = page_count.max(per_page.keys().copied().max().unwrap_or(0));
        let empty_pages: Vec<u32> = (1..=page_count)
            .filter(|p| !per_page.contains_key(p))
            .collect();

        Self {
            page_count,
            text_pages: per_page.len() as u32,
            empty_pages,
            line_count: per_page.values().sum(),
        }
    }

    /// Check if any page has text.
    pub fn has_text_layer(&self) -> bool {
        self.text_pages > 0
    }

    /// No page has text; the document is likely scanned images.
    pub fn is_probably_scanned(&self) -> bool {
        self.page_count > 0 && self.text_pages == 0
    }
}

/// Counters collected during one segmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Lines received
    pub lines_seen: u32,

    /// Lines discarded before the first question
    pub header_lines: u32,

    /// Page furniture dropped by cleanup
    pub noise_lines: u32,

    /// Question-start candidates rejected by the ordering guard
    pub rejected_tokens: u32,

    /// Bracketed mark candidates with non-integer content
    pub malformed_marks: u32,

    /// Total lines recognized
    pub total_lines: u32,

    /// Records produced
    pub records: u32,

    /// Records with a mark value
    pub records_with_marks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionLabel;

    fn record(number: u32, part: Option<char>, marks: Option<u32>) -> QuestionRecord {
        let label = match part {
            Some(p) => QuestionLabel::sub_part(number, p),
            None => QuestionLabel::question(number),
        };
        let mut r = QuestionRecord::new(label, 1, 0.0);
        r.text = "text".to_string();
        r.marks = marks;
        r
    }

    #[test]
    fn test_paper_counts() {
        let mut paper = Paper::new();
        paper.questions = vec![
            record(1, None, Some(2)),
            record(2, Some('a'), Some(3)),
            record(2, Some('b'), None),
        ];

        assert_eq!(paper.question_count(), 3);
        assert_eq!(paper.top_level_count(), 2);
        assert_eq!(paper.total_marks(), 5);
        assert!(paper.get("2b").is_some());
        assert!(paper.get("3").is_none());
    }

    #[test]
    fn test_text_layer_report() {
        let lines = vec![
            RawLine::new("Cover", 1, 0.0),
            RawLine::new("   ", 2, 0.0),
            RawLine::new("1. Question", 3, 0.0),
            RawLine::new("more", 3, 1.0),
        ];
        let report = TextLayerReport::from_lines(&lines, 4);

        assert_eq!(report.page_count, 4);
        assert_eq!(report.text_pages, 2);
        assert_eq!(report.empty_pages, vec![2, 4]);
        assert_eq!(report.line_count, 3);
        assert!(report.has_text_layer());
        assert!(!report.is_probably_scanned());
    }

    #[test]
    fn test_scanned_report() {
        let report = TextLayerReport::from_lines(&[], 3);
        assert!(report.is_probably_scanned());
        assert_eq!(report.empty_pages, vec![1, 2, 3]);
    }
}
