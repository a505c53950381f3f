//! # exampaper
//!
//! Segment exam-paper text into structured question records.
//!
//! Text is extracted by an external library (`pdf-extract` for PDFs) or read
//! from JSON line dumps and plain text. This crate turns the ordered lines
//! into numbered questions with their text and mark values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use exampaper::{export, parse_file};
//!
//! fn main() -> exampaper::Result<()> {
//!     let paper = parse_file("physics-paper-1.pdf")?;
//!
//!     for q in &paper.questions {
//!         println!("{} [{:?}] {}", q.number, q.marks, q.text);
//!     }
//!     std::fs::write("questions.csv", export::to_csv(&paper.questions)?)?;
//!     Ok(())
//! }
//! ```
//!
//! The segmenter can also run on lines from any other extractor:
//!
//! ```
//! use exampaper::model::lines_from_strs;
//!
//! let records = exampaper::segment(&lines_from_strs(&["1. What is X? [5]", "2. What is Y?"]));
//! assert_eq!(records[0].marks, Some(5));
//! ```
//!
//! ## Features
//!
//! - **Question segmentation**: `1.`, `3b)`, `Q4.`, `(a)` starts with an ordering guard
//! - **Mark extraction**: `[5]`, `[5 marks]`, `(2 marks)`, and `(2)` for Pearson papers
//! - **Cleanup presets**: page numbers, barcodes and margin furniture dropped
//! - **Mark totals**: "Total for Question N" lines checked against extracted marks
//! - **Figure regions**: drawing primitives clustered and attached to questions
//! - **Export**: JSON and CSV
//! - **Parallel batches**: Uses Rayon across documents

pub mod detect;
pub mod error;
pub mod export;
pub mod figure;
pub mod model;
pub mod options;
pub mod segment;
pub mod source;
pub mod validate;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use export::{ExportFormat, JsonFormat};
pub use figure::{assign_figures, FigureDetector, FigureOptions};
pub use model::{
    FigureRegion, PageLayout, Paper, PaperMetadata, QuestionLabel, QuestionRecord, RawLine, Rect,
    SegmentStats, TextLayerReport,
};
pub use options::ParseOptions;
pub use segment::{
    CleanupOptions, CleanupPreset, QuestionSegmenter, SegmentOptions, SegmentPreset, Segmentation,
};
pub use source::{Extraction, LineSource, PageSelection, SourceOptions};
pub use validate::{check_totals, MarkDiscrepancy};

use chrono::Utc;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Segment lines into question records with default options.
///
/// Header lines before the first question are dropped; input without any
/// question start yields an empty vector.
pub fn segment(lines: &[RawLine]) -> Vec<QuestionRecord> {
    QuestionSegmenter::default().segment_records(lines)
}

/// Parse an exam paper file (PDF, JSON line dump or text).
///
/// # Example
///
/// ```no_run
/// use exampaper::parse_file;
///
/// let paper = parse_file("paper.pdf").unwrap();
/// println!("Questions: {}", paper.question_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Paper> {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Parse an exam paper file with custom options.
///
/// # Example
///
/// ```no_run
/// use exampaper::{parse_file_with_options, ParseOptions, SegmentPreset};
///
/// let options = ParseOptions::new().with_preset(SegmentPreset::Edexcel);
/// let paper = parse_file_with_options("paper.pdf", &options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Paper> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    parse_path_bytes(path, &data, options)
}

/// Parse an exam paper from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Paper> {
    parse_bytes_with_options(data, &ParseOptions::default())
}

/// Parse an exam paper from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: &ParseOptions) -> Result<Paper> {
    let (format, extraction) = source::extract_bytes(data, &options.source)?;
    Ok(build_paper(format, extraction, options))
}

/// Parse an exam paper from a reader.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Paper> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_bytes(&data)
}

/// Parse many files in parallel.
///
/// Results keep the order of `paths`; one failing file does not stop the others.
pub fn parse_files<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &ParseOptions,
) -> Vec<(PathBuf, Result<Paper>)> {
    paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            (path.to_path_buf(), parse_file_with_options(path, options))
        })
        .collect()
}

/// Parse an exam paper file, reading it asynchronously.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Paper> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    parse_path_bytes(path, &data, options)
}

fn parse_path_bytes(path: &Path, data: &[u8], options: &ParseOptions) -> Result<Paper> {
    let (format, extraction) = source::extract_file_bytes(path, data, &options.source)?;
    let mut paper = build_paper(format, extraction, options);
    paper.metadata.source = Some(path.display().to_string());
    Ok(paper)
}

fn build_paper(format: InputFormat, extraction: Extraction, options: &ParseOptions) -> Paper {
    let segmentation = QuestionSegmenter::new(options.segment.clone()).segment(&extraction.lines);
    log::info!(
        "Segmented {} lines into {} records",
        segmentation.stats.lines_seen,
        segmentation.records.len()
    );

    let mut paper = Paper {
        metadata: PaperMetadata {
            source: None,
            format: Some(format),
            page_count: extraction.page_count,
            extracted_at: Some(Utc::now()),
            text_layer: extraction.text_layer(),
            positioned: extraction.positioned,
        },
        questions: segmentation.records,
        totals: segmentation.totals,
        paper_total: segmentation.paper_total,
        figures: Vec::new(),
        stats: segmentation.stats,
    };

    if options.detect_figures && !extraction.layouts.is_empty() {
        attach_figures(&mut paper, &extraction, &options.figures);
    }

    paper
}

fn attach_figures(paper: &mut Paper, extraction: &Extraction, options: &FigureOptions) {
    let figures = FigureDetector::with_options(options.clone()).detect_all(&extraction.layouts);

    // Ordinal y values cannot be compared with page coordinates
    if !extraction.positioned {
        log::warn!(
            "Found {} figure regions, but the lines carry no page positions; leaving them unassigned",
            figures.len()
        );
    } else {
        let unassigned = assign_figures(&mut paper.questions, &figures);
        if !unassigned.is_empty() {
            log::debug!("{} figures precede the first question", unassigned.len());
        }
    }
    paper.figures = figures;
}

/// Builder for parsing exam papers.
///
/// # Example
///
/// ```no_run
/// use exampaper::{ExamParser, JsonFormat, PageSelection, SegmentPreset};
///
/// let json = ExamParser::new()
///     .with_preset(SegmentPreset::Edexcel)
///     .with_pages(PageSelection::Range(2..=24))
///     .parse("paper.pdf")?
///     .to_json(JsonFormat::Pretty)?;
/// # Ok::<(), exampaper::Error>(())
/// ```
pub struct ExamParser {
    options: ParseOptions,
    layouts: Vec<PageLayout>,
}

impl ExamParser {
    /// Create a new parser builder.
    pub fn new() -> Self {
        Self {
            options: ParseOptions::default(),
            layouts: Vec::new(),
        }
    }

    /// Replace all options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Set segmentation preset.
    pub fn with_preset(mut self, preset: SegmentPreset) -> Self {
        self.options = self.options.with_preset(preset);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.options = self.options.with_cleanup(preset);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Enable or disable figure detection.
    pub fn with_figures(mut self, detect: bool) -> Self {
        self.options = self.options.with_figures(detect);
        self
    }

    /// Use page geometry from another tool instead of the source's own.
    ///
    /// Regions are only attached to questions when the lines carry page
    /// positions, as in a JSON dump with a `y` on every line. Otherwise
    /// they are reported in `Paper::figures` and left unassigned.
    pub fn with_layouts(mut self, layouts: Vec<PageLayout>) -> Self {
        self.layouts = layouts;
        self
    }

    /// Parse a file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<ParsedPaper> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let extracted = source::extract_file_bytes(path, &data, &self.options.source)?;
        let mut parsed = self.finish(extracted);
        parsed.paper.metadata.source = Some(path.display().to_string());
        Ok(parsed)
    }

    /// Parse bytes and return a result wrapper.
    pub fn parse_bytes(self, data: &[u8]) -> Result<ParsedPaper> {
        let extracted = source::extract_bytes(data, &self.options.source)?;
        Ok(self.finish(extracted))
    }

    fn finish(self, (format, mut extraction): (InputFormat, Extraction)) -> ParsedPaper {
        if !self.layouts.is_empty() {
            extraction.layouts = self.layouts;
            extraction.retain_pages(&self.options.source.pages);
        }
        ParsedPaper {
            paper: build_paper(format, extraction, &self.options),
        }
    }
}

impl Default for ExamParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing an exam paper.
pub struct ParsedPaper {
    /// The segmented paper
    pub paper: Paper,
}

impl ParsedPaper {
    /// Convert the whole paper to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        export::to_json(&self.paper, format)
    }

    /// Convert the question array to JSON.
    pub fn records_to_json(&self, format: JsonFormat) -> Result<String> {
        export::records_to_json(&self.paper.questions, format)
    }

    /// Convert the questions to CSV.
    pub fn to_csv(&self) -> Result<String> {
        export::to_csv(&self.paper.questions)
    }

    /// Compare declared totals with extracted marks.
    pub fn check_totals(&self) -> Vec<MarkDiscrepancy> {
        validate::check_totals(&self.paper)
    }

    /// Get the paper.
    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    pub fn into_paper(self) -> Paper {
        self.paper
    }
}
