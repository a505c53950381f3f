//! Input format detection.
//!
//! Sniffs the leading bytes of an input to decide which line source reads it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Detected input format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputFormat {
    /// A PDF document
    Pdf {
        /// PDF version (e.g., "1.7", "2.0")
        version: String,
    },
    /// A JSON dump of lines or page layouts
    Json,
    /// UTF-8 text, pages separated by form feeds
    Text,
}

impl InputFormat {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Pdf { .. } => "pdf",
            InputFormat::Json => "json",
            InputFormat::Text => "text",
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, InputFormat::Pdf { .. })
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Pdf { version } => write!(f, "PDF {}", version),
            InputFormat::Json => write!(f, "JSON layout"),
            InputFormat::Text => write!(f, "Plain text"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Bytes read from disk when sniffing a file.
const SNIFF_LEN: u64 = 8192;

/// Detect the input format of a file.
///
/// # Example
/// ```no_run
/// use exampaper::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("paper.pdf").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let file = File::open(path)?;
    let mut head = Vec::new();
    file.take(SNIFF_LEN).read_to_end(&mut head)?;
    detect_format_from_bytes(&head)
}

/// Detect the input format from leading bytes.
///
/// # Returns
/// * `Ok(InputFormat)` for PDF, JSON or UTF-8 text
/// * `Err(Error::UnsupportedVersion)` for a PDF header with a malformed version
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if data.starts_with(PDF_MAGIC) {
        let end = PDF_MAGIC.len() + VERSION_LEN;
        if data.len() < end {
            return Err(Error::UnknownFormat);
        }
        let version = String::from_utf8_lossy(&data[PDF_MAGIC.len()..end]).to_string();
        if !is_valid_version(&version) {
            return Err(Error::UnsupportedVersion(version));
        }
        return Ok(InputFormat::Pdf { version });
    }

    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        // A multi-byte character cut off at the sniff boundary is still text
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&data[..e.valid_up_to()]).map_err(|_| Error::UnknownFormat)?
        }
        Err(_) => return Err(Error::UnknownFormat),
    };

    let text = text.trim_start_matches('\u{FEFF}');
    if text.trim().is_empty() || text.contains('\0') {
        return Err(Error::UnknownFormat);
    }

    match text.trim_start().chars().next() {
        Some('[') | Some('{') => Ok(InputFormat::Json),
        _ => Ok(InputFormat::Text),
    }
}

/// Check if a version string looks like "1.7".
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(InputFormat::Pdf { .. }))
}
