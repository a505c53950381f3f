//! Error types for the exampaper library.

use std::io;
use thiserror::Error;

/// Result type alias for exampaper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, segmenting or exporting a paper.
///
/// Segmentation itself never fails; these cover the surrounding I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a PDF, a JSON layout dump, nor text.
    #[error("Unknown input format")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The external extractor failed to produce text.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// A JSON layout dump could not be read.
    #[error("Layout error: {0}")]
    Layout(String),

    /// Error while serializing records.
    #[error("Export error: {0}")]
    Export(String),

    /// Invalid page range such as `5-2`.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<pdf_extract::OutputError> for Error {
    fn from(err: pdf_extract::OutputError) -> Self {
        Error::TextExtract(err.to_string())
    }
}
