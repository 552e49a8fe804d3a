//! Interactive element scanner
//!
//! Turns a [`DocumentSnapshot`] into the ordered list of elements worth
//! marking. One pass over the document:
//! - measures the viewport once,
//! - clips each element's rectangles to it and sums the visible area,
//! - classifies the element as interactive or not,
//! - keeps elements passing the two-stage area test,
//! - drops candidates that contain another candidate.
//!
//! The position of a candidate in [`ScanResult::candidates`] is its marker
//! index; [`ScanResult::targets`] flattens candidates into click points.

pub mod candidate;
pub mod classify;
pub mod geometry;
pub mod target;
pub mod text;
pub mod viewport;

pub use candidate::{CandidateItem, CandidateSet, MIN_VISIBLE_AREA, SOFT_AREA_FLOOR, qualifies};
pub use classify::{ElementView, INTERACTIVE_TAGS, InteractivityProbe, LIST_CONTEXT_TAGS, is_interactive};
pub use geometry::ClippedRect;
pub use target::{Target, find_by_text};
pub use text::normalize_text;
pub use viewport::ViewportMetrics;

use crate::dom::DocumentSnapshot;
use serde::{Deserialize, Serialize};

/// Outcome of one scan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub viewport: ViewportMetrics,
    candidates: Vec<CandidateItem>,
}

impl ScanResult {
    /// Surviving candidates; the slice position is the marker index
    pub fn candidates(&self) -> &[CandidateItem] {
        &self.candidates
    }

    /// Candidate with the given marker index
    pub fn get(&self, index: usize) -> Option<&CandidateItem> {
        self.candidates.get(index)
    }

    /// Click targets, one per visible rectangle, in marker index order
    pub fn targets(&self) -> Vec<Target> {
        self.candidates.iter().flat_map(CandidateItem::targets).collect()
    }

    /// Number of candidates (distinct marker indices)
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of targets [`Self::targets`] would produce
    pub fn target_count(&self) -> usize {
        self.candidates.iter().map(|c| c.rects.len()).sum()
    }
}

/// Scan a document snapshot for interactive targets
pub fn scan(document: &DocumentSnapshot) -> ScanResult {
    let viewport = ViewportMetrics::from_sources(&document.viewport);
    let mut candidates = CandidateSet::new();
    let mut skipped_overlay = 0usize;

    for (id, element) in document.iter() {
        if element.overlay {
            skipped_overlay += 1;
            continue;
        }

        let rects = geometry::clip_all(&element.client_rects, &viewport);
        let area = geometry::total_area(&rects);

        let interactive = ElementView::new(document, id).is_some_and(|view| is_interactive(&view));

        if !qualifies(interactive, area) {
            continue;
        }

        candidates.insert(CandidateItem {
            element: id,
            is_interactive: interactive,
            area,
            rects,
            text: normalize_text(&element.text),
            tag_name: element.tag_name.to_ascii_lowercase(),
            aria_label: element.aria_label_or_empty().to_string(),
        });
    }

    if skipped_overlay > 0 {
        log::warn!(
            "Snapshot still contained {} marker overlay elements; they were left out of the scan",
            skipped_overlay
        );
    }

    let qualified = candidates.len();
    let removed = candidates.remove_containers(document);
    log::debug!(
        "Scanned {} elements in {}x{} viewport: {} qualified, {} containers removed",
        document.len(),
        viewport.width,
        viewport.height,
        qualified,
        removed
    );

    ScanResult {
        viewport,
        candidates: candidates.into_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSnapshot, ViewportSources};

    fn page() -> DocumentSnapshot {
        DocumentSnapshot::new(ViewportSources::window(800.0, 600.0))
    }

    #[test]
    fn test_empty_document() {
        let result = scan(&page());
        assert!(result.is_empty());
        assert!(result.targets().is_empty());
        assert_eq!(result.viewport, ViewportMetrics::new(800.0, 600.0));
    }

    #[test]
    fn test_button_inside_div() {
        let mut doc = page();
        let div = doc.push(ElementSnapshot::new("div").with_text(" Go ").with_rect(0.0, 0.0, 50.0, 20.0));
        doc.push_child(
            div,
            ElementSnapshot::new("button")
                .with_text("Go")
                .with_aria_label("Start")
                .with_rect(10.0, 5.0, 25.0, 20.0),
        );

        let result = scan(&doc);
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.targets(),
            vec![Target {
                x: 22.5,
                y: 15.0,
                text: "Go".to_string(),
                tag_name: "button".to_string(),
                aria_label: "Start".to_string(),
            }]
        );
        assert!(result.candidates()[0].is_interactive);
    }

    #[test]
    fn test_area_boundary() {
        let mut doc = page();
        doc.push(ElementSnapshot::new("div").with_rect(0.0, 0.0, 5.0, 2.0));
        doc.push(ElementSnapshot::new("button").with_rect(100.0, 0.0, 5.0, 1.0));
        doc.push(ElementSnapshot::new("div").with_text("ok").with_rect(200.0, 0.0, 10.01, 1.0));

        let result = scan(&doc);
        assert_eq!(result.len(), 1);
        assert_eq!(result.candidates()[0].text, "ok");
    }

    #[test]
    fn test_offscreen_element_excluded() {
        let mut doc = page();
        doc.push(ElementSnapshot::new("button").with_rect(-300.0, 10.0, 100.0, 40.0));
        doc.push(ElementSnapshot::new("button").with_rect(10.0, 900.0, 100.0, 40.0));
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn test_element_without_rects_is_excluded() {
        let mut doc = page();
        doc.push(ElementSnapshot::new("a").with_text("hidden"));
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn test_overlay_elements_are_skipped() {
        let mut doc = page();
        let body = doc.push(ElementSnapshot::new("body"));
        let marker = doc.push_child(body, ElementSnapshot::new("div").with_rect(0.0, 0.0, 100.0, 100.0).as_overlay());
        doc.push_child(marker, ElementSnapshot::new("span").with_text("0").with_rect(0.0, -20.0, 20.0, 20.0).as_overlay());

        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn test_self_parented_element_terminates() {
        let mut doc = page();
        let div = doc.push(ElementSnapshot::new("div").with_rect(0.0, 0.0, 50.0, 20.0));
        let button = doc.push_child(div, ElementSnapshot::new("button").with_rect(10.0, 0.0, 25.0, 20.0));
        doc.elements[div.index()].parent = Some(div);
        doc.elements[button.index()].parent = Some(button);

        let result = scan(&doc);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_indices_follow_document_order() {
        let mut doc = page();
        let body = doc.push(ElementSnapshot::new("body"));
        doc.push_child(body, ElementSnapshot::new("a").with_text("first").with_rect(0.0, 0.0, 40.0, 10.0));
        doc.push_child(body, ElementSnapshot::new("input").with_rect(0.0, 20.0, 40.0, 10.0));
        doc.push_child(body, ElementSnapshot::new("a").with_text("third").with_rect(0.0, 40.0, 40.0, 10.0));

        let result = scan(&doc);
        let texts: Vec<_> = result.candidates().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "", "third"]);
        assert_eq!(result.get(2).map(|c| c.tag_name.as_str()), Some("a"));
        assert_eq!(result.target_count(), 3);
    }
}
