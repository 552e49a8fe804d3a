//! Marker rendering
//!
//! Markers are the numbered boxes drawn over each scanned candidate so that
//! a person or an agent can refer to elements by index. This module holds:
//! - MarkerRenderer: something that can draw and erase markers
//! - SnapshotSource: something that can capture the page being marked
//! - MarkerSet: the Clean/Marked state of the markers currently drawn
//! - PageMarker: a source, a renderer and their MarkerSet driving `mark`/`unmark`
//!
//! Two renderers ship with the crate: [`DomOverlay`] injects boxes into the
//! live page, [`ScreenshotOverlay`] paints them onto a captured image.

pub mod overlay;
pub mod screenshot;
pub mod style;

pub use overlay::{DomOverlay, MARKER_ATTRIBUTE};
pub use screenshot::ScreenshotOverlay;
pub use style::MarkerStyle;

use crate::dom::DocumentSnapshot;
use crate::error::Result;
use crate::scanner::{self, CandidateItem, ClippedRect, ScanResult, Target};
use serde::{Deserialize, Serialize};

/// One drawn box with its label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    /// Renderer-specific handle used to erase the marker
    pub handle: String,

    /// Label shown on the box
    pub index: usize,

    pub rect: ClippedRect,
}

/// Draws markers for scanned candidates and removes them again
pub trait MarkerRenderer {
    /// Called with the snapshot that is about to be drawn, before `draw`
    fn prepare(&mut self, _snapshot: &DocumentSnapshot) -> Result<()> {
        Ok(())
    }

    /// Draw one marker per rectangle of every candidate, labelled with the
    /// candidate's position in `candidates`
    fn draw(&mut self, candidates: &[CandidateItem]) -> Result<Vec<Marker>>;

    /// Remove previously drawn markers. Markers that are already gone are ignored.
    fn erase(&mut self, markers: &[Marker]) -> Result<()>;
}

/// Provides a fresh snapshot of the page being marked
pub trait SnapshotSource {
    fn capture(&self) -> Result<DocumentSnapshot>;
}

impl SnapshotSource for DocumentSnapshot {
    fn capture(&self) -> Result<DocumentSnapshot> {
        Ok(self.clone())
    }
}

/// `(index, rect)` for every box a renderer has to draw, in index order
pub fn marker_boxes(candidates: &[CandidateItem]) -> impl Iterator<Item = (usize, ClippedRect)> + '_ {
    candidates
        .iter()
        .enumerate()
        .flat_map(|(index, candidate)| candidate.rects.iter().map(move |rect| (index, *rect)))
}

/// Markers currently on screen.
///
/// `unmark` is always legal and leaves the set `Clean`; `mark` unmarks first.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MarkerSet {
    #[default]
    Clean,
    Marked(Vec<Marker>),
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::Clean
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    pub fn markers(&self) -> &[Marker] {
        match self {
            Self::Clean => &[],
            Self::Marked(markers) => markers.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.markers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers().is_empty()
    }

    /// Erase every tracked marker. On failure the set keeps its markers so
    /// the caller can retry.
    pub fn unmark<R: MarkerRenderer + ?Sized>(&mut self, renderer: &mut R) -> Result<()> {
        if let Self::Marked(markers) = self {
            renderer.erase(markers)?;
            log::debug!("Erased {} markers", markers.len());
        }
        *self = Self::Clean;
        Ok(())
    }

    /// Unmark, capture the page, scan it and draw markers for the result
    pub fn mark<S, R>(&mut self, source: &S, renderer: &mut R) -> Result<ScanResult>
    where
        S: SnapshotSource + ?Sized,
        R: MarkerRenderer + ?Sized,
    {
        self.unmark(renderer)?;

        // Geometry is taken only after the previous markers are gone
        let snapshot = source.capture()?;
        let result = scanner::scan(&snapshot);

        renderer.prepare(&snapshot)?;
        let markers = renderer.draw(result.candidates())?;
        log::info!(
            "Marked {} elements ({} boxes, {} targets)",
            result.len(),
            markers.len(),
            result.target_count()
        );

        *self = if markers.is_empty() {
            Self::Clean
        } else {
            Self::Marked(markers)
        };
        Ok(result)
    }
}

/// A page that can be marked: where snapshots come from, how markers are
/// drawn, and which markers are currently drawn
pub struct PageMarker<S, R> {
    source: S,
    renderer: R,
    markers: MarkerSet,
}

impl<S: SnapshotSource, R: MarkerRenderer> PageMarker<S, R> {
    pub fn new(source: S, renderer: R) -> Self {
        Self {
            source,
            renderer,
            markers: MarkerSet::Clean,
        }
    }

    /// Scan the page, draw markers and return the click targets
    pub fn mark(&mut self) -> Result<Vec<Target>> {
        Ok(self.mark_scan()?.targets())
    }

    /// Like [`Self::mark`] but returns the full scan result
    pub fn mark_scan(&mut self) -> Result<ScanResult> {
        self.markers.mark(&self.source, &mut self.renderer)
    }

    /// Remove all markers drawn by this page marker
    pub fn unmark(&mut self) -> Result<()> {
        self.markers.unmark(&mut self.renderer)
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Split into parts, keeping whatever markers are drawn
    pub fn into_parts(self) -> (S, R, MarkerSet) {
        (self.source, self.renderer, self.markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSnapshot, ViewportSources};
    use crate::error::BrowserError;

    #[derive(Default)]
    struct RecordingRenderer {
        drawn: Vec<Marker>,
        draw_calls: usize,
        erase_calls: usize,
        fail_erase: bool,
        prepared_with: Vec<usize>,
    }

    impl MarkerRenderer for RecordingRenderer {
        fn prepare(&mut self, snapshot: &DocumentSnapshot) -> Result<()> {
            // Everything drawn earlier must already be erased
            assert!(self.drawn.is_empty());
            self.prepared_with.push(snapshot.len());
            Ok(())
        }

        fn draw(&mut self, candidates: &[CandidateItem]) -> Result<Vec<Marker>> {
            self.draw_calls += 1;
            let markers: Vec<_> = marker_boxes(candidates)
                .enumerate()
                .map(|(n, (index, rect))| Marker {
                    handle: format!("m{}-{}", self.draw_calls, n),
                    index,
                    rect,
                })
                .collect();
            self.drawn.extend(markers.iter().cloned());
            Ok(markers)
        }

        fn erase(&mut self, markers: &[Marker]) -> Result<()> {
            if self.fail_erase {
                return Err(BrowserError::RenderFailed("page detached".to_string()));
            }
            self.erase_calls += 1;
            self.drawn.retain(|m| !markers.contains(m));
            Ok(())
        }
    }

    fn two_link_page() -> DocumentSnapshot {
        let mut doc = DocumentSnapshot::new(ViewportSources::window(800.0, 600.0));
        let body = doc.push(ElementSnapshot::new("body"));
        doc.push_child(body, ElementSnapshot::new("a").with_text("One").with_rect(0.0, 0.0, 50.0, 20.0));
        doc.push_child(
            body,
            ElementSnapshot::new("a")
                .with_text("Two")
                .with_rect(0.0, 40.0, 50.0, 20.0)
                .with_rect(0.0, 60.0, 30.0, 20.0),
        );
        doc
    }

    #[test]
    fn test_marker_boxes_repeat_index_per_rect() {
        let result = scanner::scan(&two_link_page());
        let boxes: Vec<_> = marker_boxes(result.candidates()).map(|(index, _)| index).collect();
        assert_eq!(boxes, vec![0, 1, 1]);
    }

    #[test]
    fn test_mark_transitions_to_marked() {
        let page = two_link_page();
        let mut renderer = RecordingRenderer::default();
        let mut set = MarkerSet::new();

        let result = set.mark(&page, &mut renderer).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(set.len(), 3);
        assert!(!set.is_clean());
        assert_eq!(renderer.drawn.len(), 3);
        assert_eq!(renderer.erase_calls, 0);
    }

    #[test]
    fn test_mark_twice_erases_first_markers() {
        let page = two_link_page();
        let mut renderer = RecordingRenderer::default();
        let mut set = MarkerSet::new();

        let first = set.mark(&page, &mut renderer).unwrap();
        let second = set.mark(&page, &mut renderer).unwrap();

        assert_eq!(first, second);
        assert_eq!(renderer.erase_calls, 1);
        assert_eq!(renderer.drawn.len(), 3);
        assert!(renderer.drawn.iter().all(|m| m.handle.starts_with("m2-")));
    }

    #[test]
    fn test_unmark_is_idempotent() {
        let page = two_link_page();
        let mut renderer = RecordingRenderer::default();
        let mut set = MarkerSet::new();
        set.mark(&page, &mut renderer).unwrap();

        set.unmark(&mut renderer).unwrap();
        assert!(set.is_clean());
        assert!(renderer.drawn.is_empty());

        set.unmark(&mut renderer).unwrap();
        assert!(set.is_clean());
        assert!(renderer.drawn.is_empty());
        assert_eq!(renderer.erase_calls, 1);
    }

    #[test]
    fn test_failed_erase_keeps_markers() {
        let page = two_link_page();
        let mut renderer = RecordingRenderer::default();
        let mut set = MarkerSet::new();
        set.mark(&page, &mut renderer).unwrap();

        renderer.fail_erase = true;
        assert!(set.unmark(&mut renderer).is_err());
        assert_eq!(set.len(), 3);

        renderer.fail_erase = false;
        set.unmark(&mut renderer).unwrap();
        assert!(set.is_clean());
    }

    #[test]
    fn test_prepare_sees_each_fresh_snapshot() {
        let page = two_link_page();
        let mut renderer = RecordingRenderer::default();
        let mut set = MarkerSet::new();

        set.mark(&page, &mut renderer).unwrap();
        set.mark(&page, &mut renderer).unwrap();
        assert_eq!(renderer.prepared_with, vec![3, 3]);
        assert_eq!(renderer.draw_calls, 2);
    }

    #[test]
    fn test_empty_scan_stays_clean() {
        let page = DocumentSnapshot::new(ViewportSources::window(800.0, 600.0));
        let mut renderer = RecordingRenderer::default();
        let mut set = MarkerSet::new();

        let result = set.mark(&page, &mut renderer).unwrap();
        assert!(result.is_empty());
        assert!(set.is_clean());
    }

    #[test]
    fn test_page_marker_returns_flat_targets() {
        let mut marker = PageMarker::new(two_link_page(), RecordingRenderer::default());
        let targets = marker.mark().unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[1].text, "Two");
        assert_eq!(targets[2].text, "Two");
        assert_ne!(targets[1].y, targets[2].y);
        assert_eq!(marker.markers().len(), 3);

        marker.unmark().unwrap();
        assert!(marker.markers().is_clean());
        assert!(marker.renderer().drawn.is_empty());
    }
}
