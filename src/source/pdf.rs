//! PDF text through `pdf-extract`.

use crate::error::Result;
use crate::model::RawLine;

use super::{Extraction, LineSource};

/// Reads PDF text layers with `pdf-extract`.
///
/// `pdf-extract` reports no geometry, so each line's `y` is its ordinal
/// within the page.
#[derive(Debug, Clone, Default)]
pub struct PdfTextSource {
    _private: (),
}

impl PdfTextSource {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl LineSource for PdfTextSource {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(data)?;
        log::info!("pdf-extract returned {} pages", pages.len());
        Ok(pages_to_extraction(pages.iter().map(String::as_str)))
    }
}

/// Split page texts into lines; blank lines keep their ordinal but are not emitted.
pub(crate) fn pages_to_extraction<'a>(pages: impl Iterator<Item = &'a str>) -> Extraction {
    let mut extraction = Extraction::default();
    for (index, text) in pages.enumerate() {
        let page = index as u32 + 1;
        extraction.page_count = page;
        extraction.lines.extend(
            text.lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(ordinal, line)| RawLine::new(line, page, ordinal as f32)),
        );
    }
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_to_extraction() {
        let extraction = pages_to_extraction(["Header\n\n1. First", "", "2. Second"].into_iter());
        assert_eq!(extraction.page_count, 3);
        assert_eq!(extraction.lines.len(), 3);
        assert_eq!(extraction.lines[1], RawLine::new("1. First", 1, 2.0));
        assert_eq!(extraction.lines[2].page, 3);
    }
}
