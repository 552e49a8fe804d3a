use crate::dom::DocumentSnapshot;
use crate::error::{BrowserError, Result};
use crate::marker::{Marker, MarkerRenderer, MarkerStyle, SnapshotSource, marker_boxes};
use crate::scanner::CandidateItem;
use headless_chrome::Tab;
use serde::Serialize;
use std::sync::Arc;

/// Attribute carried by every marker element injected into the page.
///
/// The snapshot script uses it to flag overlay content.
pub const MARKER_ATTRIBUTE: &str = "data-page-marker";

const DRAW_MARKERS_JS: &str = include_str!("draw_markers.js");
const ERASE_MARKERS_JS: &str = include_str!("erase_markers.js");

#[derive(Debug, Serialize)]
struct DrawBox<'a> {
    handle: &'a str,
    index: usize,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Serialize)]
struct DrawPayload<'a> {
    attribute: &'a str,
    style: &'a MarkerStyle,
    boxes: Vec<DrawBox<'a>>,
}

#[derive(Debug, Serialize)]
struct ErasePayload<'a> {
    attribute: &'a str,
    handles: Vec<&'a str>,
}

/// Draws markers as fixed-position elements inside the live page
pub struct DomOverlay {
    tab: Arc<Tab>,
    style: MarkerStyle,
    generation: u64,
}

impl DomOverlay {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self::with_style(tab, MarkerStyle::default())
    }

    pub fn with_style(tab: Arc<Tab>, style: MarkerStyle) -> Self {
        Self {
            tab,
            style,
            generation: 0,
        }
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    fn next_handles(&mut self, count: usize) -> Vec<String> {
        self.generation += 1;
        (0..count).map(|n| format!("{}-{}", self.generation, n)).collect()
    }

    fn run(&self, function: &str, payload: &impl Serialize) -> Result<u64> {
        let payload = serde_json::to_string(payload)
            .map_err(|e| BrowserError::RenderFailed(format!("Failed to serialize marker payload: {}", e)))?;
        let script = build_script(function, &payload);

        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| BrowserError::EvaluationFailed(e.to_string()))?;

        Ok(result.value.and_then(|value| value.as_u64()).unwrap_or(0))
    }
}

fn build_script(function: &str, payload: &str) -> String {
    format!("({})({})", function.trim(), payload)
}

impl MarkerRenderer for DomOverlay {
    fn draw(&mut self, candidates: &[CandidateItem]) -> Result<Vec<Marker>> {
        let boxes: Vec<_> = marker_boxes(candidates).collect();
        if boxes.is_empty() {
            return Ok(Vec::new());
        }

        let handles = self.next_handles(boxes.len());
        let payload = DrawPayload {
            attribute: MARKER_ATTRIBUTE,
            style: &self.style,
            boxes: boxes
                .iter()
                .zip(&handles)
                .map(|((index, rect), handle)| DrawBox {
                    handle,
                    index: *index,
                    left: rect.left,
                    top: rect.top,
                    width: rect.width,
                    height: rect.height,
                })
                .collect(),
        };

        let drawn = self.run(DRAW_MARKERS_JS, &payload)?;
        if drawn as usize != boxes.len() {
            log::warn!("Requested {} markers but the page drew {}", boxes.len(), drawn);
        }

        Ok(boxes
            .into_iter()
            .zip(handles)
            .map(|((index, rect), handle)| Marker { handle, index, rect })
            .collect())
    }

    fn erase(&mut self, markers: &[Marker]) -> Result<()> {
        if markers.is_empty() {
            return Ok(());
        }

        let payload = ErasePayload {
            attribute: MARKER_ATTRIBUTE,
            handles: markers.iter().map(|m| m.handle.as_str()).collect(),
        };
        let removed = self.run(ERASE_MARKERS_JS, &payload)?;
        if (removed as usize) < markers.len() {
            log::debug!(
                "{} of {} markers were already gone from the page",
                markers.len() - removed as usize,
                markers.len()
            );
        }
        Ok(())
    }
}

impl SnapshotSource for Arc<Tab> {
    fn capture(&self) -> Result<DocumentSnapshot> {
        DocumentSnapshot::from_tab(self)
    }
}

impl SnapshotSource for DomOverlay {
    fn capture(&self) -> Result<DocumentSnapshot> {
        DocumentSnapshot::from_tab(&self.tab)
    }
}
