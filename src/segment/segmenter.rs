//! Single-pass question segmentation.

use std::collections::BTreeMap;

use super::cleanup::{CleanLine, CleanupPipeline};
use super::options::SegmentOptions;
use super::token::{MarkExtractor, StartToken, TokenScanner, TotalLine, TotalMatcher};
use crate::model::{QuestionLabel, QuestionRecord, RawLine, SegmentStats};

/// Output of one segmentation pass.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    /// Records in reading order, labels strictly increasing
    pub records: Vec<QuestionRecord>,

    /// Declared per-question totals
    pub totals: BTreeMap<u32, u32>,

    /// Declared paper total
    pub paper_total: Option<u32>,

    /// Pass statistics
    pub stats: SegmentStats,
}

/// Converts ordered text lines into question records.
///
/// Segmentation is pure and infallible: input that never starts a question
/// yields no records.
///
/// # Example
///
/// ```
/// use exampaper::model::lines_from_strs;
/// use exampaper::segment::QuestionSegmenter;
///
/// let lines = lines_from_strs(&["1. What is X? [5]", "continued.", "2. What is Y?"]);
/// let records = QuestionSegmenter::default().segment_records(&lines);
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].text, "What is X? continued.");
/// assert_eq!(records[0].marks, Some(5));
/// assert_eq!(records[1].marks, None);
/// ```
pub struct QuestionSegmenter {
    options: SegmentOptions,
    cleanup: CleanupPipeline,
    scanner: TokenScanner,
    marks: MarkExtractor,
    totals: TotalMatcher,
}

impl QuestionSegmenter {
    /// Create a segmenter with the given options.
    pub fn new(options: SegmentOptions) -> Self {
        Self {
            cleanup: CleanupPipeline::new(options.cleanup.clone()),
            scanner: TokenScanner::new(options.allow_prefix, options.sub_parts),
            marks: MarkExtractor::new(options.mark_styles),
            totals: TotalMatcher::new(),
            options,
        }
    }

    /// Options this segmenter was built with.
    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// Segment lines and return only the records.
    pub fn segment_records(&self, lines: &[RawLine]) -> Vec<QuestionRecord> {
        self.segment(lines).records
    }

    /// Segment lines in reading order.
    pub fn segment(&self, lines: &[RawLine]) -> Segmentation {
        let mut out = Segmentation::default();
        let mut current: Option<(QuestionLabel, QuestionRecord)> = None;

        for line in lines {
            out.stats.lines_seen += 1;

            let text = match self.cleanup.process(&line.text) {
                CleanLine::Blank => continue,
                CleanLine::Noise => {
                    out.stats.noise_lines += 1;
                    continue;
                }
                CleanLine::Text(text) => text,
            };

            if self.options.detect_totals {
                if let Some(total) = self.totals.match_line(&text) {
                    match total {
                        TotalLine::Question { number, marks } => {
                            out.totals.insert(number, marks);
                        }
                        TotalLine::Paper { marks } => out.paper_total = Some(marks),
                    }
                    out.stats.total_lines += 1;
                    continue;
                }
            }

            let mut body = text.as_str();
            if let Some((token, rest)) = self.scanner.scan(&text) {
                let current_label = current.as_ref().map(|(label, _)| *label);
                match self.accept(token, current_label) {
                    Some(label) => {
                        if let Some((_, record)) = current.take() {
                            out.records.push(record);
                        }
                        let (label, rest) = self.leading_part(label, rest);
                        current = Some((label, QuestionRecord::new(label, line.page, line.y)));
                        body = rest;
                    }
                    None => {
                        out.stats.rejected_tokens += 1;
                        log::debug!(
                            "Page {}: treating {:?} as body text after {:?}",
                            line.page,
                            token,
                            current_label.map(|l| l.to_string())
                        );
                    }
                }
            }

            let Some((_, record)) = current.as_mut() else {
                out.stats.header_lines += 1;
                continue;
            };

            let found = self.marks.extract(body);
            if found.malformed {
                out.stats.malformed_marks += 1;
                log::debug!("Question {}: ignoring non-numeric mark bracket", record.number);
            }
            if let Some(marks) = found.marks {
                record.marks = Some(record.marks.unwrap_or(0).saturating_add(marks));
            }
            self.cleanup.join(&mut record.text, found.text);
        }

        if let Some((_, record)) = current {
            out.records.push(record);
        }

        out.stats.records = out.records.len() as u32;
        out.stats.records_with_marks = out.records.iter().filter(|r| r.marks.is_some()).count() as u32;
        out
    }

    /// `1. (a) Name it.` opens part `1a` directly.
    fn leading_part<'a>(&self, label: QuestionLabel, rest: &'a str) -> (QuestionLabel, &'a str) {
        if label.part.is_some() {
            return (label, rest);
        }
        match self.scanner.scan(rest) {
            Some((StartToken::SubPart(part), after)) if label.next_part() == Some(part) => {
                (QuestionLabel::sub_part(label.number, part), after)
            }
            _ => (label, rest),
        }
    }

    /// Resolve a token against the current label; `None` means body text.
    fn accept(&self, token: StartToken, current: Option<QuestionLabel>) -> Option<QuestionLabel> {
        let label = match token {
            StartToken::Question(label) => label,
            StartToken::SubPart(part) => {
                let current = current?;
                if current.next_part() != Some(part) {
                    return None;
                }
                QuestionLabel::sub_part(current.number, part)
            }
        };

        let Some(current) = current else {
            return Some(label);
        };
        if label <= current {
            return None;
        }
        if let Some(gap) = self.options.max_number_gap {
            if label.number > current.number.saturating_add(gap) {
                return None;
            }
        }
        Some(label)
    }
}

impl Default for QuestionSegmenter {
    fn default() -> Self {
        Self::new(SegmentOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{flatten_records, lines_from_strs};

    fn segment(texts: &[&str]) -> Segmentation {
        QuestionSegmenter::default().segment(&lines_from_strs(texts))
    }

    fn numbers(seg: &Segmentation) -> Vec<&str> {
        seg.records.iter().map(|r| r.number.as_str()).collect()
    }

    #[test]
    fn test_basic_example() {
        let seg = segment(&["1. What is X? [5]", "continued.", "2. What is Y?"]);
        assert_eq!(numbers(&seg), vec!["1", "2"]);
        assert_eq!(seg.records[0].text, "What is X? continued.");
        assert_eq!(seg.records[0].marks, Some(5));
        assert_eq!(seg.records[1].text, "What is Y?");
        assert_eq!(seg.records[1].marks, None);
    }

    #[test]
    fn test_no_question_is_empty() {
        let seg = segment(&["Physics Paper 1", "Instructions", "Answer all questions."]);
        assert!(seg.records.is_empty());
        assert_eq!(seg.stats.header_lines, 3);
    }

    #[test]
    fn test_empty_input() {
        let seg = segment(&[]);
        assert!(seg.records.is_empty());
        assert_eq!(seg.stats, SegmentStats::default());
    }

    #[test]
    fn test_header_discarded() {
        let seg = segment(&["GCSE Physics", "Time: 1 hour 45 minutes", "1. First question"]);
        assert_eq!(numbers(&seg), vec!["1"]);
        assert_eq!(seg.records[0].text, "First question");
        assert_eq!(seg.stats.header_lines, 2);
    }

    #[test]
    fn test_malformed_mark_kept_in_text() {
        let seg = segment(&["1. Count to [five]"]);
        assert_eq!(seg.records[0].marks, None);
        assert_eq!(seg.records[0].text, "Count to [five]");
        assert_eq!(seg.stats.malformed_marks, 1);
    }

    #[test]
    fn test_sub_parts() {
        let seg = segment(&[
            "3. The diagram shows a circuit.",
            "(a) Name component X. [1]",
            "(b) Explain why the bulb is dim. [2]",
            "3(c) Calculate the current. [3]",
            "4. Next question",
        ]);
        assert_eq!(numbers(&seg), vec!["3", "3a", "3b", "3c", "4"]);
        assert_eq!(seg.records[1].text, "Name component X.");
        assert_eq!(seg.records[3].marks, Some(3));
    }

    #[test]
    fn test_roman_sub_sub_parts_stay_in_text() {
        let seg = segment(&["5. Question", "(a) Part", "(i) first", "(ii) second", "(b) Next part"]);
        assert_eq!(numbers(&seg), vec!["5", "5a", "5b"]);
        assert_eq!(seg.records[1].text, "Part (i) first (ii) second");
        assert_eq!(seg.stats.rejected_tokens, 1);
    }

    #[test]
    fn test_sub_part_before_question_is_header() {
        let seg = segment(&["(a) orphan", "1. Real question"]);
        assert_eq!(numbers(&seg), vec!["1"]);
        assert_eq!(seg.stats.header_lines, 1);
    }

    #[test]
    fn test_decreasing_number_is_body_text() {
        let seg = segment(&["5. Follow the method:", "1. heat the water", "2. record the time", "6. Next"]);
        assert_eq!(numbers(&seg), vec!["5", "6"]);
        assert_eq!(
            seg.records[0].text,
            "Follow the method: 1. heat the water 2. record the time"
        );
    }

    #[test]
    fn test_duplicate_number_is_body_text() {
        let seg = segment(&["2. First", "2. Again"]);
        assert_eq!(numbers(&seg), vec!["2"]);
        assert_eq!(seg.records[0].text, "First 2. Again");
    }

    #[test]
    fn test_max_number_gap() {
        let options = SegmentOptions::new().with_max_number_gap(3);
        let seg = QuestionSegmenter::new(options)
            .segment(&lines_from_strs(&["1. Add the value", "60. Then subtract", "2. Next"]));
        assert_eq!(numbers(&seg), vec!["1", "2"]);
        assert_eq!(seg.records[0].text, "Add the value 60. Then subtract");
        assert_eq!(seg.stats.rejected_tokens, 1);
    }

    #[test]
    fn test_marks_summed_across_lines() {
        let seg = segment(&["1. Part one [2]", "and part two [3]"]);
        assert_eq!(seg.records[0].marks, Some(5));
        assert_eq!(seg.records[0].text, "Part one and part two");
    }

    #[test]
    fn test_mark_only_line() {
        let seg = segment(&["1. Explain.", "[4]"]);
        assert_eq!(seg.records[0].marks, Some(4));
        assert_eq!(seg.records[0].text, "Explain.");
    }

    #[test]
    fn test_totals_recorded_and_excluded() {
        let seg = segment(&[
            "1. (a) Name it. [1]",
            "(b) Explain it. [2]",
            "(Total for Question 1 = 3 marks)",
            "TOTAL FOR PAPER = 3 MARKS",
        ]);
        assert_eq!(numbers(&seg), vec!["1a", "1b"]);
        assert_eq!(seg.totals.get(&1), Some(&3));
        assert_eq!(seg.paper_total, Some(3));
        assert_eq!(seg.stats.total_lines, 2);
        assert!(seg.records.iter().all(|r| !r.text.contains("Total")));
    }

    #[test]
    fn test_leading_part_not_in_sequence() {
        let seg = segment(&["1. (c) Odd start"]);
        assert_eq!(numbers(&seg), vec!["1"]);
        assert_eq!(seg.records[0].text, "(c) Odd start");
    }

    #[test]
    fn test_idempotent_resegment() {
        let seg = segment(&[
            "Header",
            "1. (a) Name it. [1]",
            "(b) Explain, with care. [2]",
            "2. Count to [five]",
            "3.",
        ]);
        let again = QuestionSegmenter::default().segment_records(&flatten_records(&seg.records));
        assert_eq!(again, seg.records);
    }

    #[test]
    fn test_numbered_sub_part_first() {
        let seg = segment(&["1 (a) Name it. [1]", "(b) Explain it. [2]"]);
        assert_eq!(numbers(&seg), vec!["1a", "1b"]);
    }

    #[test]
    fn test_position_recorded() {
        let lines = vec![
            RawLine::new("Header", 1, 10.0),
            RawLine::new("1. First", 1, 120.0),
            RawLine::new("2. Second", 2, 64.0),
        ];
        let records = QuestionSegmenter::default().segment_records(&lines);
        assert_eq!((records[0].page, records[0].y), (1, 120.0));
        assert_eq!((records[1].page, records[1].y), (2, 64.0));
    }

    #[test]
    fn test_standard_cleanup_drops_furniture() {
        let segmenter = QuestionSegmenter::new(SegmentOptions::standard());
        let seg = segmenter.segment(&lines_from_strs(&[
            "1. Describe the experi-",
            "ment.",
            "Turn over",
            "12",
            "*P58373A0328*",
            "[3]",
        ]));
        assert_eq!(seg.records[0].text, "Describe the experiment.");
        assert_eq!(seg.records[0].marks, Some(3));
        assert_eq!(seg.stats.noise_lines, 3);
    }

    #[test]
    fn test_stats_counts() {
        let seg = segment(&["Header", "1. A [1]", "", "2. B", "(a) C [2]"]);
        assert_eq!(seg.stats.lines_seen, 5);
        assert_eq!(seg.stats.header_lines, 1);
        assert_eq!(seg.stats.records, 3);
        assert_eq!(seg.stats.records_with_marks, 2);
    }
}
