//! JSON dumps from external layout tools.
//!
//! Two shapes are accepted:
//!
//! ```json
//! [{ "text": "1. What is X? [5]", "page": 1, "y": 120.5 }]
//! ```
//!
//! ```json
//! { "pages": [{ "page": 1, "width": 595, "height": 842,
//!               "lines": [{ "text": "1. What is X? [5]", "y": 120.5 }],
//!               "drawings": [[100, 300, 300, 450]] }] }
//! ```

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{PageLayout, RawLine, Rect};

use super::{Extraction, LineSource};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayoutDump {
    Pages { pages: Vec<PageDump> },
    Lines(Vec<FlatLine>),
}

#[derive(Debug, Deserialize)]
struct FlatLine {
    text: String,
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    y: Option<f32>,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct PageDump {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    lines: Vec<LineDump>,
    #[serde(default)]
    drawings: Vec<Rect>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LineDump {
    Text(String),
    Positioned {
        text: String,
        #[serde(default)]
        y: Option<f32>,
    },
}

/// Reads line and layout dumps in JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonLayoutSource {
    _private: (),
}

impl JsonLayoutSource {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl LineSource for JsonLayoutSource {
    fn name(&self) -> &str {
        "json"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        match parse_dump(data)? {
            LayoutDump::Lines(lines) => {
                let page_count = lines.iter().map(|l| l.page).max().unwrap_or(0);
                let positioned = !lines.is_empty() && lines.iter().all(|l| l.y.is_some());
                Ok(Extraction {
                    lines: lines
                        .into_iter()
                        .map(|l| RawLine::new(l.text, l.page, l.y.unwrap_or(0.0)))
                        .collect(),
                    page_count,
                    layouts: Vec::new(),
                    positioned,
                })
            }
            LayoutDump::Pages { pages } => Ok(pages_to_extraction(pages)),
        }
    }
}

/// Read only the page geometry from a JSON dump.
///
/// Used to pair drawing primitives with lines read from another source.
pub fn load_layouts(data: &[u8]) -> Result<Vec<PageLayout>> {
    match parse_dump(data)? {
        LayoutDump::Pages { pages } => Ok(pages_to_extraction(pages).layouts),
        LayoutDump::Lines(_) => Err(Error::Layout(
            "expected an object with a \"pages\" array".to_string(),
        )),
    }
}

/// Check that `data` is well-formed JSON of any shape.
pub(crate) fn is_json(data: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(strip_bom(data)).is_ok()
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}

fn parse_dump(data: &[u8]) -> Result<LayoutDump> {
    serde_json::from_slice(strip_bom(data)).map_err(|e| Error::Layout(e.to_string()))
}

fn pages_to_extraction(pages: Vec<PageDump>) -> Extraction {
    let mut extraction = Extraction::default();
    let mut positioned = true;

    for (index, dump) in pages.into_iter().enumerate() {
        let page = dump.page.unwrap_or(index as u32 + 1);
        extraction.page_count = extraction.page_count.max(page);

        for (ordinal, line) in dump.lines.into_iter().enumerate() {
            let (text, y) = match line {
                LineDump::Text(text) => (text, None),
                LineDump::Positioned { text, y } => (text, y),
            };
            if text.trim().is_empty() {
                continue;
            }
            positioned &= y.is_some();
            extraction
                .lines
                .push(RawLine::new(text, page, y.unwrap_or(ordinal as f32)));
        }

        if dump.width > 0.0 && dump.height > 0.0 {
            extraction.layouts.push(PageLayout {
                page,
                width: dump.width,
                height: dump.height,
                drawings: dump.drawings,
            });
        } else if !dump.drawings.is_empty() {
            log::warn!("Page {}: drawings without page size are ignored", page);
        }
    }

    extraction.positioned = positioned && !extraction.lines.is_empty();
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_lines() {
        let data = br#"[{"text": "1. A", "page": 2, "y": 10.5}, {"text": "2. B"}]"#;
        let extraction = JsonLayoutSource::new().extract(data).unwrap();
        assert_eq!(extraction.page_count, 2);
        assert_eq!(extraction.lines[0], RawLine::new("1. A", 2, 10.5));
        assert_eq!(extraction.lines[1], RawLine::new("2. B", 1, 0.0));
        assert!(extraction.layouts.is_empty());
        // "2. B" has no position of its own
        assert!(!extraction.positioned);

        let data = br#"[{"text": "1. A", "y": 10}, {"text": "2. B", "y": 30}]"#;
        assert!(JsonLayoutSource::new().extract(data).unwrap().positioned);
    }

    #[test]
    fn test_pages_shape() {
        let data = br#"{"pages": [
            {"page": 1, "width": 595, "height": 842,
             "lines": [{"text": "Header", "y": 40}, {"text": "1. Graph", "y": 120}],
             "drawings": [[100, 300, 300, 450]]},
            {"lines": ["", "2. Plain"]}
        ]}"#;
        let extraction = JsonLayoutSource::new().extract(data).unwrap();
        assert_eq!(extraction.page_count, 2);
        assert_eq!(extraction.lines.len(), 3);
        assert_eq!(extraction.lines[1], RawLine::new("1. Graph", 1, 120.0));
        assert_eq!(extraction.lines[2], RawLine::new("2. Plain", 2, 1.0));
        assert_eq!(extraction.layouts.len(), 1);
        assert_eq!(
            extraction.layouts[0].drawings,
            vec![Rect::new(100.0, 300.0, 300.0, 450.0)]
        );
        assert!(!extraction.positioned);
    }

    #[test]
    fn test_load_layouts() {
        let data = br#"{"pages": [{"page": 4, "width": 595, "height": 842, "drawings": []}]}"#;
        let layouts = load_layouts(data).unwrap();
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].page, 4);

        assert!(matches!(load_layouts(b"[]"), Err(Error::Layout(_))));
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(b"\xEF\xBB\xBF[1, 2]"));
        assert!(is_json(br#"{"pages": 3}"#));
        assert!(!is_json(b"[Total: 80 marks]\n1. What is X? [5]\n"));
        assert!(!is_json(b"{a} Complete the table.\n"));
    }

    #[test]
    fn test_malformed_dump() {
        let result = JsonLayoutSource::new().extract(br#"{"pages": 3}"#);
        assert!(matches!(result, Err(Error::Layout(_))));
    }
}
