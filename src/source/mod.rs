//! Line sources: where [`RawLine`]s come from.
//!
//! Each source turns raw input bytes into ordered lines plus any page
//! geometry it knows about. The format is sniffed with
//! [`detect_format_from_bytes`](crate::detect::detect_format_from_bytes).
//!
//! # Example
//!
//! ```no_run
//! use exampaper::source::{extract_bytes, SourceOptions};
//!
//! fn main() -> exampaper::Result<()> {
//!     let data = std::fs::read("paper.pdf")?;
//!     let (format, extraction) = extract_bytes(&data, &SourceOptions::default())?;
//!     println!("{}: {} lines", format, extraction.lines.len());
//!     Ok(())
//! }
//! ```

mod json;
mod options;
mod pdf;
mod text;

pub use json::{load_layouts, JsonLayoutSource};
pub use options::{PageSelection, SourceOptions};
pub use pdf::PdfTextSource;
pub use text::PlainTextSource;

use std::path::Path;

use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::error::Result;
use crate::model::{PageLayout, RawLine, TextLayerReport};

/// Lines and geometry read from one document.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Non-blank lines in reading order
    pub lines: Vec<RawLine>,

    /// Pages in the document, selected or not
    pub page_count: u32,

    /// Page geometry, when the source provides it
    pub layouts: Vec<PageLayout>,

    /// Every line carries a real page coordinate rather than its ordinal.
    ///
    /// Figure regions can only be placed against positioned lines.
    pub positioned: bool,
}

impl Extraction {
    /// Keep only the selected pages.
    pub fn retain_pages(&mut self, selection: &PageSelection) {
        if selection.is_all() {
            return;
        }
        self.lines.retain(|l| selection.includes(l.page));
        self.layouts.retain(|l| selection.includes(l.page));
    }

    /// Summarize which pages carry text.
    pub fn text_layer(&self) -> TextLayerReport {
        TextLayerReport::from_lines(&self.lines, self.page_count)
    }
}

/// A reader that turns input bytes into lines.
pub trait LineSource: Send + Sync {
    /// Short name of this source.
    fn name(&self) -> &str;

    /// File extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Read every page of the input.
    fn extract(&self, data: &[u8]) -> Result<Extraction>;

    /// Check if this source handles the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext)
    }
}

/// The source that reads a detected format.
pub fn source_for(format: &InputFormat) -> Box<dyn LineSource> {
    match format {
        InputFormat::Pdf { .. } => Box::new(PdfTextSource::new()),
        InputFormat::Json => Box::new(JsonLayoutSource::new()),
        InputFormat::Text => Box::new(PlainTextSource::new()),
    }
}

/// All built-in sources.
pub fn sources() -> Vec<Box<dyn LineSource>> {
    vec![
        Box::new(PdfTextSource::new()),
        Box::new(JsonLayoutSource::new()),
        Box::new(PlainTextSource::new()),
    ]
}

/// Check if any built-in source reads files with this extension.
pub fn is_supported_extension(ext: &str) -> bool {
    sources().iter().any(|s| s.supports_extension(ext))
}

/// Detect the format of `data`, read it and apply the page selection.
///
/// Text that opens with `[` or `{` but is not valid JSON is read as plain
/// text, so a paper starting with "[Total: 80 marks]" still segments.
pub fn extract_bytes(data: &[u8], options: &SourceOptions) -> Result<(InputFormat, Extraction)> {
    let format = match detect_format_from_bytes(data)? {
        InputFormat::Json if !json::is_json(data) => {
            log::debug!("Input looks like JSON but does not parse; reading it as text");
            InputFormat::Text
        }
        format => format,
    };
    extract_bytes_as(data, format, options)
}

/// Like [`extract_bytes`], but a `.txt` or `.text` extension on `path`
/// keeps the input as plain text even when it parses as JSON.
pub fn extract_file_bytes(
    path: &Path,
    data: &[u8],
    options: &SourceOptions,
) -> Result<(InputFormat, Extraction)> {
    let text_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PlainTextSource::new().supports_extension(e));

    if text_extension && detect_format_from_bytes(data)? == InputFormat::Json {
        return extract_bytes_as(data, InputFormat::Text, options);
    }
    extract_bytes(data, options)
}

/// Read `data` as `format` and apply the page selection.
pub fn extract_bytes_as(
    data: &[u8],
    format: InputFormat,
    options: &SourceOptions,
) -> Result<(InputFormat, Extraction)> {
    let source = source_for(&format);
    log::debug!("Reading {} input with the {} source", format, source.name());

    let mut extraction = source.extract(data)?;
    extraction.retain_pages(&options.pages);

    let report = extraction.text_layer();
    if report.is_probably_scanned() {
        log::warn!(
            "No text layer on any of {} pages; the document is probably scanned",
            report.page_count
        );
    } else if !report.empty_pages.is_empty() && options.pages.is_all() {
        log::warn!("Pages without text: {:?}", report.empty_pages);
    }

    Ok((format, extraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes_dispatch() {
        let (format, extraction) =
            extract_bytes(b"1. A\n\x0c2. B\n", &SourceOptions::default()).unwrap();
        assert_eq!(format, InputFormat::Text);
        assert_eq!(extraction.lines.len(), 2);

        let (format, _) = extract_bytes(br#"[{"text": "1. A"}]"#, &SourceOptions::default()).unwrap();
        assert_eq!(format, InputFormat::Json);
    }

    #[test]
    fn test_bracketed_text_falls_back() {
        let (format, extraction) =
            extract_bytes(b"[Total: 80 marks]\n1. A\n", &SourceOptions::default()).unwrap();
        assert_eq!(format, InputFormat::Text);
        assert_eq!(extraction.lines.len(), 2);
        assert!(!extraction.positioned);

        // Well-formed JSON of the wrong shape is still an error
        let result = extract_bytes(br#"{"pages": 1}"#, &SourceOptions::default());
        assert!(matches!(result, Err(crate::Error::Layout(_))));
    }

    #[test]
    fn test_text_extension_wins() {
        let data = br#"["1. A", "2. B"]"#;
        let options = SourceOptions::default();

        let (format, extraction) = extract_file_bytes(Path::new("paper.txt"), data, &options).unwrap();
        assert_eq!(format, InputFormat::Text);
        assert_eq!(extraction.lines.len(), 1);

        let result = extract_file_bytes(Path::new("paper.json"), data, &options);
        assert!(matches!(result, Err(crate::Error::Layout(_))));
    }

    #[test]
    fn test_extract_bytes_page_selection() {
        let options = SourceOptions::new().with_page_list(vec![2]);
        let (_, extraction) = extract_bytes(b"1. A\n\x0c2. B\n\x0c3. C", &options).unwrap();
        assert_eq!(extraction.page_count, 3);
        assert_eq!(extraction.lines, vec![RawLine::new("2. B", 2, 0.0)]);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("PDF"));
        assert!(is_supported_extension("json"));
        assert!(is_supported_extension("txt"));
        assert!(!is_supported_extension("docx"));
    }

    #[test]
    fn test_text_layer_report() {
        let (_, extraction) = extract_bytes(b"1. A\n\x0c\n\x0c3. C", &SourceOptions::default()).unwrap();
        let report = extraction.text_layer();
        assert_eq!(report.page_count, 3);
        assert_eq!(report.text_pages, 2);
        assert_eq!(report.empty_pages, vec![2]);
    }
}
