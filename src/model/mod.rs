//! Data model for extracted exam papers.
//!
//! Sources produce [`RawLine`]s, the segmenter turns them into
//! [`QuestionRecord`]s, and a [`Paper`] bundles the records with the
//! metadata and statistics of one parse.

mod layout;
mod line;
mod paper;
mod question;

pub use layout::{FigureRegion, PageLayout, Rect};
pub use line::{lines_from_strs, RawLine};
pub use paper::{flatten_records, Paper, PaperMetadata, SegmentStats, TextLayerReport};
pub use question::{QuestionLabel, QuestionRecord};
