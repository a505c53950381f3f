//! Segmentation options and presets.

use super::{CleanupOptions, CleanupPreset, MarkStyles};

/// Options for question segmentation.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Per-line cleanup applied before detection
    pub cleanup: CleanupOptions,

    /// Accept `Q3.` / `Question 3.` prefixes
    pub allow_prefix: bool,

    /// Accept bare lettered sub-parts such as `(a)`
    pub sub_parts: bool,

    /// Recognized trailing mark notations
    pub mark_styles: MarkStyles,

    /// Recognize "Total for Question N = M marks" lines
    pub detect_totals: bool,

    /// Reject question numbers more than this far above the current one
    pub max_number_gap: Option<u32>,
}

impl SegmentOptions {
    /// Create segment options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard cleanup: page furniture dropped, hyphenation fixed.
    pub fn standard() -> Self {
        Self::new().with_cleanup_preset(CleanupPreset::Standard)
    }

    /// Pearson Edexcel layout: standard cleanup, rotated margins, `(N)` marks.
    pub fn edexcel() -> Self {
        Self::new()
            .with_cleanup_preset(CleanupPreset::Aggressive)
            .with_bare_parenthesis_marks(true)
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = CleanupOptions::from_preset(preset);
        self
    }

    /// Enable or disable `Q` / `Question` prefixes.
    pub fn with_prefix(mut self, allow: bool) -> Self {
        self.allow_prefix = allow;
        self
    }

    /// Enable or disable bare lettered sub-parts.
    pub fn with_sub_parts(mut self, enabled: bool) -> Self {
        self.sub_parts = enabled;
        self
    }

    /// Set mark notations.
    pub fn with_mark_styles(mut self, styles: MarkStyles) -> Self {
        self.mark_styles = styles;
        self
    }

    /// Enable or disable bare `(N)` marks.
    pub fn with_bare_parenthesis_marks(mut self, enabled: bool) -> Self {
        self.mark_styles.bare_parentheses = enabled;
        self
    }

    /// Enable or disable total-line recognition.
    pub fn with_totals(mut self, enabled: bool) -> Self {
        self.detect_totals = enabled;
        self
    }

    /// Set the largest accepted jump between question numbers.
    pub fn with_max_number_gap(mut self, gap: u32) -> Self {
        self.max_number_gap = Some(gap);
        self
    }
}

/// Minimal cleanup, so no line is dropped as page furniture.
///
/// Recognition stays on: `[5 marks]` and `(2 marks)` are stripped like `[5]`,
/// and "Total for ..." lines are consumed into the declared totals. Use
/// [`with_mark_styles`](SegmentOptions::with_mark_styles) and
/// [`with_totals`](SegmentOptions::with_totals) to keep that text as body.
impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            cleanup: CleanupOptions::minimal(),
            allow_prefix: true,
            sub_parts: true,
            mark_styles: MarkStyles::default(),
            detect_totals: true,
            max_number_gap: None,
        }
    }
}

/// Segmentation presets, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentPreset {
    /// Whitespace normalization only; no furniture is dropped, but marks
    /// with a suffix and total lines are still recognized
    Minimal,
    /// Page furniture dropped, hyphenation fixed
    #[default]
    Standard,
    /// Pearson Edexcel papers
    Edexcel,
}

impl From<SegmentPreset> for SegmentOptions {
    fn from(preset: SegmentPreset) -> Self {
        match preset {
            SegmentPreset::Minimal => SegmentOptions::default(),
            SegmentPreset::Standard => SegmentOptions::standard(),
            SegmentPreset::Edexcel => SegmentOptions::edexcel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lines_from_strs;
    use crate::segment::QuestionSegmenter;

    #[test]
    fn test_default_keeps_all_lines() {
        let options = SegmentOptions::default();
        assert!(!options.cleanup.drops_lines());
        assert!(options.allow_prefix);
        assert!(options.sub_parts);
        assert!(!options.mark_styles.bare_parentheses);
        assert_eq!(options.max_number_gap, None);
    }

    #[test]
    fn test_default_recognizes_suffix_marks_and_totals() {
        let options = SegmentOptions::default();
        assert!(options.mark_styles.with_suffix);
        assert!(options.detect_totals);

        let lines = lines_from_strs(&[
            "1. Explain. [2 marks]",
            "(Total for Question 1 = 2 marks)",
        ]);
        let seg = QuestionSegmenter::new(options).segment(&lines);
        assert_eq!(seg.records[0].text, "Explain.");
        assert_eq!(seg.records[0].marks, Some(2));
        assert_eq!(seg.totals.get(&1), Some(&2));

        // Opting out keeps both as body text
        let plain = SegmentOptions::default()
            .with_mark_styles(MarkStyles {
                with_suffix: false,
                ..MarkStyles::default()
            })
            .with_totals(false);
        let seg = QuestionSegmenter::new(plain).segment(&lines);
        assert_eq!(
            seg.records[0].text,
            "Explain. [2 marks] (Total for Question 1 = 2 marks)"
        );
        assert!(seg.totals.is_empty());
    }

    #[test]
    fn test_segment_options_builder() {
        let options = SegmentOptions::new()
            .with_prefix(false)
            .with_sub_parts(false)
            .with_totals(false)
            .with_max_number_gap(5);

        assert!(!options.allow_prefix);
        assert!(!options.sub_parts);
        assert!(!options.detect_totals);
        assert_eq!(options.max_number_gap, Some(5));
    }

    #[test]
    fn test_presets() {
        let edexcel: SegmentOptions = SegmentPreset::Edexcel.into();
        assert!(edexcel.mark_styles.bare_parentheses);
        assert!(edexcel.cleanup.remove_rotated_margins);

        let standard: SegmentOptions = SegmentPreset::Standard.into();
        assert!(standard.cleanup.remove_page_numbers);
        assert!(!standard.mark_styles.bare_parentheses);
    }
}
