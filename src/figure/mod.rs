//! Figure regions from vector drawing primitives.

mod assign;
mod detector;

pub use assign::assign_figures;
pub use detector::{merge_rects, FigureDetector, FigureOptions};
