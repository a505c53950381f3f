//! Options for a full parse: source, segmentation and figures.

use crate::figure::FigureOptions;
use crate::segment::{CleanupPreset, SegmentOptions, SegmentPreset};
use crate::source::{PageSelection, SourceOptions};

/// Options for parsing exam papers.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// How lines are read
    pub source: SourceOptions,

    /// How lines become questions
    pub segment: SegmentOptions,

    /// Figure detection thresholds
    pub figures: FigureOptions,

    /// Detect figure regions when the source provides drawings
    pub detect_figures: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set segmentation options.
    pub fn with_segment_options(mut self, segment: SegmentOptions) -> Self {
        self.segment = segment;
        self
    }

    /// Set segmentation preset.
    pub fn with_preset(mut self, preset: SegmentPreset) -> Self {
        self.segment = preset.into();
        self
    }

    /// Set cleanup preset, keeping the other segmentation options.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.segment = self.segment.with_cleanup_preset(preset);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.source = self.source.with_pages(pages);
        self
    }

    /// Set figure detection thresholds.
    pub fn with_figure_options(mut self, figures: FigureOptions) -> Self {
        self.figures = figures;
        self
    }

    /// Enable or disable figure detection.
    pub fn with_figures(mut self, detect: bool) -> Self {
        self.detect_figures = detect;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source: SourceOptions::default(),
            segment: SegmentOptions::standard(),
            figures: FigureOptions::default(),
            detect_figures: true,
        }
    }
}
