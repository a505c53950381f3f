//! Figure detection by clustering drawing primitives.
//!
//! Diagrams in exam papers are drawn as many small vector paths (axes, tick
//! marks, curve segments). Grouping their bounding boxes yields one region per
//! diagram, after page frames, footer bars and long rules are removed.

use crate::model::{FigureRegion, PageLayout, Rect};

/// Figure detector configuration. Distances are in PDF points.
#[derive(Debug, Clone)]
pub struct FigureOptions {
    /// Gap within which two primitives still touch
    pub proximity_tolerance: f32,
    /// Largest vertical distance between centers of merged primitives
    pub max_vertical_gap: f32,
    /// Padding added around each detected region
    pub padding: f32,
    /// Smallest region area kept (square points)
    pub min_area: f32,
    /// Primitives larger than this in both ratios are page frames
    pub frame_ratio: f32,
    /// Clusters larger than this in both ratios are page panes
    pub cluster_ratio: f32,
    /// Height of the top edge band holding headers and barcodes
    pub edge_band: f32,
    /// Wide primitives in the edge band are dropped above this width ratio
    pub edge_width_ratio: f32,
    /// Horizontal rules are at least this wide (width ratio)
    pub rule_width_ratio: f32,
    /// Horizontal rules are at most this tall
    pub rule_max_height: f32,
    /// Primitives ending below this fraction of the page height define the figure band
    pub band_start_ratio: f32,
    /// Rules ending more than this far above the figure band are dropped
    pub band_margin: f32,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            proximity_tolerance: 2.0,
            max_vertical_gap: 20.0,
            padding: 5.0,
            min_area: 1000.0,
            frame_ratio: 0.9,
            cluster_ratio: 0.7,
            edge_band: 50.0,
            edge_width_ratio: 0.5,
            rule_width_ratio: 0.6,
            rule_max_height: 3.0,
            band_start_ratio: 0.6,
            band_margin: 60.0,
        }
    }
}

impl FigureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the proximity tolerance.
    pub fn with_proximity_tolerance(mut self, tolerance: f32) -> Self {
        self.proximity_tolerance = tolerance;
        self
    }

    /// Set the maximum vertical center gap for merging.
    pub fn with_max_vertical_gap(mut self, gap: f32) -> Self {
        self.max_vertical_gap = gap;
        self
    }

    /// Set region padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the minimum region area.
    pub fn with_min_area(mut self, area: f32) -> Self {
        self.min_area = area;
        self
    }
}

/// Detects figure regions on a page.
pub struct FigureDetector {
    options: FigureOptions,
}

impl FigureDetector {
    /// Create a detector with default thresholds.
    pub fn new() -> Self {
        Self::with_options(FigureOptions::default())
    }

    /// Create a detector with custom thresholds.
    pub fn with_options(options: FigureOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FigureOptions {
        &self.options
    }

    /// Detect figure regions on every page, in page order.
    pub fn detect_all(&self, layouts: &[PageLayout]) -> Vec<FigureRegion> {
        layouts.iter().flat_map(|layout| self.detect(layout)).collect()
    }

    /// Detect figure regions on one page.
    ///
    /// Region ids are `p{page}-d{index}` with a per-page index.
    pub fn detect(&self, layout: &PageLayout) -> Vec<FigureRegion> {
        let kept = self.filter_primitives(layout);
        log::debug!(
            "FigureDetector: page {} kept {} of {} primitives",
            layout.page,
            kept.len(),
            layout.drawings.len()
        );

        let merged = merge_rects(
            kept,
            self.options.proximity_tolerance,
            self.options.max_vertical_gap,
        );

        let mut regions = Vec::new();
        for rect in merged {
            let area = rect.area();
            if area <= 0.0 || rect.width() <= 0.0 || rect.height() <= 0.0 {
                log::debug!("FigureDetector: dropping empty cluster {:?}", rect);
                continue;
            }

            let (width_ratio, height_ratio) = ratios(&rect, layout);
            if width_ratio > self.options.cluster_ratio && height_ratio > self.options.cluster_ratio {
                log::debug!(
                    "FigureDetector: dropping page-sized cluster {:?} ({:.2} x {:.2})",
                    rect,
                    width_ratio,
                    height_ratio
                );
                continue;
            }
            if area < self.options.min_area {
                log::debug!("FigureDetector: dropping small cluster {:?} (area {:.1})", rect, area);
                continue;
            }

            regions.push(FigureRegion {
                id: format!("p{}-d{}", layout.page, regions.len()),
                page: layout.page,
                rect: rect.padded(self.options.padding),
                width_ratio,
                height_ratio,
                area,
            });
        }

        regions
    }

    /// Top of the band holding the main figure, or 0 when no primitive reaches it.
    fn figure_band_top(&self, layout: &PageLayout) -> f32 {
        let limit = layout.height * self.options.band_start_ratio;
        layout
            .drawings
            .iter()
            .filter(|r| r.y1 > limit)
            .map(|r| r.y0)
            .reduce(f32::min)
            .unwrap_or(0.0)
    }

    fn filter_primitives(&self, layout: &PageLayout) -> Vec<Rect> {
        let band_top = self.figure_band_top(layout);
        let o = &self.options;

        layout
            .drawings
            .iter()
            .filter(|r| {
                let (w, h) = (r.width(), r.height());
                if w <= 0.0 || h <= 0.0 {
                    return false;
                }
                let (w_ratio, h_ratio) = ratios(r, layout);

                if w_ratio > o.frame_ratio && h_ratio > o.frame_ratio {
                    return false;
                }
                if r.y0 < o.edge_band && w_ratio > o.edge_width_ratio {
                    return false;
                }
                let rule = w_ratio > o.rule_width_ratio && h < o.rule_max_height;
                !(rule && r.y1 < band_top - o.band_margin)
            })
            .copied()
            .collect()
    }
}

impl Default for FigureDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn ratios(rect: &Rect, layout: &PageLayout) -> (f32, f32) {
    let w = if layout.width > 0.0 {
        rect.width() / layout.width
    } else {
        0.0
    };
    let h = if layout.height > 0.0 {
        rect.height() / layout.height
    } else {
        0.0
    };
    (w, h)
}

/// Union rectangles that touch and sit at a similar height, until stable.
///
/// Each candidate is compared with the base rectangle as it was at the start
/// of its sweep, so one sweep never chains across the whole page.
pub fn merge_rects(mut rects: Vec<Rect>, tolerance: f32, max_vertical_gap: f32) -> Vec<Rect> {
    let close = |a: &Rect, b: &Rect| {
        a.overlaps_within(b, tolerance) && (a.center_y() - b.center_y()).abs() <= max_vertical_gap
    };

    let mut changed = true;
    while changed {
        changed = false;
        let mut next = Vec::with_capacity(rects.len());

        while let Some(base) = rects.pop() {
            let mut merged = base;
            rects.retain(|other| {
                if close(&base, other) {
                    merged = merged.union(other);
                    changed = true;
                    false
                } else {
                    true
                }
            });
            next.push(merged);
        }

        rects = next;
    }

    rects
}
