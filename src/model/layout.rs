//! Page geometry supplied by external layout tools.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in PDF points, y growing downward.
///
/// Serialized as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Grow every edge outward by `pad`.
    pub fn padded(&self, pad: f32) -> Rect {
        Rect {
            x0: self.x0 - pad,
            y0: self.y0 - pad,
            x1: self.x1 + pad,
            y1: self.y1 + pad,
        }
    }

    /// Check overlap after expanding `self` by `tolerance` on every side.
    pub fn overlaps_within(&self, other: &Rect, tolerance: f32) -> bool {
        let grown = self.padded(tolerance);
        let overlap_x = !(grown.x1 < other.x0 || other.x1 < grown.x0);
        let overlap_y = !(grown.y1 < other.y0 || other.y1 < grown.y0);
        overlap_x && overlap_y
    }
}

impl From<[f32; 4]> for Rect {
    fn from(v: [f32; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [f32; 4] {
    fn from(r: Rect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

/// Drawing primitives of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub page: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Bounding boxes of vector drawing primitives
    #[serde(default)]
    pub drawings: Vec<Rect>,
}

impl PageLayout {
    /// Create an empty layout for a page.
    pub fn new(page: u32, width: f32, height: f32) -> Self {
        Self {
            page,
            width,
            height,
            drawings: Vec::new(),
        }
    }

    /// Create an A4 layout (595 x 842 points).
    pub fn a4(page: u32) -> Self {
        Self::new(page, 595.0, 842.0)
    }

    /// Add a drawing primitive.
    pub fn add_drawing(&mut self, rect: Rect) {
        self.drawings.push(rect);
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// A padded cluster of drawing primitives, likely a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRegion {
    /// Region id, `p{page}-d{index}`
    pub id: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Padded bounding box
    pub rect: Rect,

    /// Unpadded width relative to the page
    pub width_ratio: f32,

    /// Unpadded height relative to the page
    pub height_ratio: f32,

    /// Unpadded area in square points
    pub area: f32,
}
