//! Plain text with form-feed page breaks, as written by `pdftotext`.

use crate::error::Result;

use super::pdf::pages_to_extraction;
use super::{Extraction, LineSource};

/// Reads UTF-8 text; `\x0c` separates pages.
#[derive(Debug, Clone, Default)]
pub struct PlainTextSource {
    _private: (),
}

impl PlainTextSource {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl LineSource for PlainTextSource {
    fn name(&self) -> &str {
        "text"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let text = String::from_utf8_lossy(data);
        let text = text.trim_start_matches('\u{FEFF}');
        // pdftotext ends every page, including the last, with a form feed
        let text = text.strip_suffix('\x0c').unwrap_or(text);
        Ok(pages_to_extraction(text.split('\x0c')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawLine;

    #[test]
    fn test_form_feed_pages() {
        let data = "Header\n1. First\n\x0c2. Second\n\x0c";
        let extraction = PlainTextSource::new().extract(data.as_bytes()).unwrap();
        assert_eq!(extraction.page_count, 2);
        assert_eq!(
            extraction.lines,
            vec![
                RawLine::new("Header", 1, 0.0),
                RawLine::new("1. First", 1, 1.0),
                RawLine::new("2. Second", 2, 0.0),
            ]
        );
    }

    #[test]
    fn test_single_page_with_bom() {
        let data = "\u{FEFF}1. Only\r\nmore";
        let extraction = PlainTextSource::new().extract(data.as_bytes()).unwrap();
        assert_eq!(extraction.page_count, 1);
        assert_eq!(extraction.lines[0].text, "1. Only");
        assert_eq!(extraction.lines[1].text, "more");
    }
}
