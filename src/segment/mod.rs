//! Question segmentation.
//!
//! Turns ordered [`RawLine`](crate::model::RawLine)s into
//! [`QuestionRecord`](crate::model::QuestionRecord)s in one pass:
//! cleanup, total-line recognition, question-start detection and mark
//! extraction.

mod cleanup;
mod options;
mod segmenter;
mod token;

pub use cleanup::{CleanLine, CleanupOptions, CleanupPipeline, CleanupPreset};
pub use options::{SegmentOptions, SegmentPreset};
pub use segmenter::{QuestionSegmenter, Segmentation};
pub use token::{MarkExtractor, MarkMatch, MarkStyles, StartToken, TokenScanner, TotalLine, TotalMatcher};
