use crate::dom::ViewportSources;
use serde::{Deserialize, Serialize};

/// Viewport size in CSS pixels, computed fresh for every scan
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewportMetrics {
    pub width: f64,
    pub height: f64,
}

impl ViewportMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Take the larger of the document client size and the window inner size
    /// on each axis. A missing source counts as 0.
    pub fn from_sources(sources: &ViewportSources) -> Self {
        Self::new(
            larger(sources.client_width, sources.inner_width),
            larger(sources.client_height, sources.inner_height),
        )
    }
}

fn larger(a: Option<f64>, b: Option<f64>) -> f64 {
    a.unwrap_or(0.0).max(b.unwrap_or(0.0))
}
