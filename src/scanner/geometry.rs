use crate::dom::ClientRect;
use crate::scanner::viewport::ViewportMetrics;
use serde::{Deserialize, Serialize};

/// A client rectangle clamped to the visible viewport.
///
/// Only rectangles with a positive width and height are ever constructed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClippedRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClippedRect {
    /// Clamp `raw` to `[0, width] x [0, height]`, returning `None` when
    /// nothing of it is left on screen
    pub fn clip(raw: &ClientRect, viewport: &ViewportMetrics) -> Option<Self> {
        // f64::max would turn a NaN edge into 0 and keep the rect
        if [raw.left, raw.top, raw.right, raw.bottom].iter().any(|edge| edge.is_nan()) {
            return None;
        }

        let left = raw.left.max(0.0);
        let top = raw.top.max(0.0);
        let width = raw.right.min(viewport.width) - left;
        let height = raw.bottom.min(viewport.height) - top;

        if width > 0.0 && height > 0.0 {
            Some(Self { left, top, width, height })
        } else {
            None
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point `(x, y)`
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Clip every raw rectangle, keeping the ones still visible
pub fn clip_all(raw: &[ClientRect], viewport: &ViewportMetrics) -> Vec<ClippedRect> {
    raw.iter()
        .filter_map(|rect| ClippedRect::clip(rect, viewport))
        .collect()
}

/// Sum of rectangle areas. Overlap between rectangles is counted twice.
pub fn total_area(rects: &[ClippedRect]) -> f64 {
    rects.iter().map(ClippedRect::area).sum()
}
