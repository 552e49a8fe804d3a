use crate::dom::element::{ElementId, ElementSnapshot};
use crate::error::{BrowserError, Result};
use headless_chrome::Tab;
use serde::{Deserialize, Serialize};

/// Raw viewport measurements as read from the page.
///
/// Either source may be missing (e.g. a document without a root element);
/// the scanner takes the larger of the two per axis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewportSources {
    /// `document.documentElement.clientWidth`
    #[serde(default)]
    pub client_width: Option<f64>,

    /// `document.documentElement.clientHeight`
    #[serde(default)]
    pub client_height: Option<f64>,

    /// `window.innerWidth`
    #[serde(default)]
    pub inner_width: Option<f64>,

    /// `window.innerHeight`
    #[serde(default)]
    pub inner_height: Option<f64>,
}

impl ViewportSources {
    /// Sources where only the window size is known
    pub fn window(width: f64, height: f64) -> Self {
        Self {
            inner_width: Some(width),
            inner_height: Some(height),
            ..Default::default()
        }
    }

    /// Builder method: set the document element's client size
    pub fn with_client_size(mut self, width: f64, height: f64) -> Self {
        self.client_width = Some(width);
        self.client_height = Some(height);
        self
    }
}

fn default_device_pixel_ratio() -> f64 {
    1.0
}

/// Flat, document-ordered capture of every element on a page.
///
/// Elements live in an arena indexed by [`ElementId`]; the tree shape is kept
/// as a parent link on each element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub viewport: ViewportSources,

    /// CSS pixel to device pixel ratio at capture time
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,

    #[serde(default)]
    pub elements: Vec<ElementSnapshot>,
}

impl DocumentSnapshot {
    /// Create an empty snapshot
    pub fn new(viewport: ViewportSources) -> Self {
        Self {
            viewport,
            device_pixel_ratio: default_device_pixel_ratio(),
            elements: Vec::new(),
        }
    }

    /// Capture the document currently loaded in a browser tab
    pub fn from_tab(tab: &Tab) -> Result<Self> {
        let js_code = include_str!("capture_snapshot.js");

        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| BrowserError::DomParseFailed(format!("Failed to execute snapshot script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| BrowserError::DomParseFailed("No value returned from snapshot script".to_string()))?;

        // The script returns a JSON string rather than an object
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| BrowserError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        let snapshot = Self::from_json(&json_str)?;
        log::debug!(
            "Captured {} elements (device pixel ratio {})",
            snapshot.len(),
            snapshot.device_pixel_ratio
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from JSON, checking that parent links point backwards
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| BrowserError::DomParseFailed(format!("Failed to parse snapshot JSON: {}", e)))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        for (id, element) in self.iter() {
            if let Some(parent) = element.parent {
                if parent >= id {
                    return Err(BrowserError::DomParseFailed(format!(
                        "Element {} has parent {} that does not precede it",
                        id, parent
                    )));
                }
            }
        }
        Ok(())
    }

    /// Convert the snapshot to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BrowserError::DomParseFailed(format!("Failed to serialize snapshot to JSON: {}", e)))
    }

    /// Builder method: set device pixel ratio
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Append a root-level element
    pub fn push(&mut self, mut element: ElementSnapshot) -> ElementId {
        element.parent = None;
        self.insert(element)
    }

    /// Append an element as a child of `parent`.
    ///
    /// Children must be pushed after their parent to keep document order.
    pub fn push_child(&mut self, parent: ElementId, mut element: ElementSnapshot) -> ElementId {
        debug_assert!(parent.index() < self.elements.len(), "parent {} not yet pushed", parent);
        element.parent = Some(parent);
        self.insert(element)
    }

    fn insert(&mut self, element: ElementSnapshot) -> ElementId {
        let id = ElementId::new(self.elements.len());
        self.elements.push(element);
        id
    }

    /// Get element by id
    pub fn get(&self, id: ElementId) -> Option<&ElementSnapshot> {
        self.elements.get(id.index())
    }

    /// Iterate over all elements in document order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ElementSnapshot)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, element)| (ElementId::new(i), element))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|element| element.parent)
    }

    /// Proper ancestors of `id`, nearest first.
    ///
    /// The walk stops at the first parent link that does not point to an
    /// earlier element.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.parent(id).filter(|parent| *parent < id),
        }
    }

    /// DOM `Node.contains` semantics: true when `a` is `b` or an ancestor of `b`
    pub fn contains(&self, a: ElementId, b: ElementId) -> bool {
        // Ancestors always precede descendants
        if a > b {
            return false;
        }
        a == b || self.ancestors(b).any(|ancestor| ancestor == a)
    }

    /// DOM `Element.closest` over tag names: the element itself or its
    /// nearest ancestor whose tag is in `tags`
    pub fn closest(&self, id: ElementId, tags: &[&str]) -> Option<ElementId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| {
                self.get(candidate)
                    .is_some_and(|element| tags.iter().any(|tag| element.is_tag(tag)))
            })
    }

    /// Number of elements flagged as marker overlay content
    pub fn count_overlay(&self) -> usize {
        self.elements.iter().filter(|element| element.overlay).count()
    }
}

impl Default for DocumentSnapshot {
    fn default() -> Self {
        Self::new(ViewportSources::default())
    }
}

/// Iterator over the ancestor chain of an element
pub struct Ancestors<'a> {
    document: &'a DocumentSnapshot,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        // Only step backwards so a malformed parent link cannot cycle
        self.next = self.document.parent(current).filter(|parent| *parent < current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_snapshot() -> (DocumentSnapshot, [ElementId; 5]) {
        let mut doc = DocumentSnapshot::new(ViewportSources::window(800.0, 600.0));
        let html = doc.push(ElementSnapshot::new("html"));
        let body = doc.push_child(html, ElementSnapshot::new("body"));
        let list = doc.push_child(body, ElementSnapshot::new("ul"));
        let item = doc.push_child(list, ElementSnapshot::new("li"));
        let link = doc.push_child(item, ElementSnapshot::new("a").with_text("Home"));
        (doc, [html, body, list, item, link])
    }

    #[test]
    fn test_ids_follow_document_order() {
        let (doc, ids) = create_test_snapshot();
        assert_eq!(doc.len(), 5);
        for (expected, id) in ids.iter().enumerate() {
            assert_eq!(id.index(), expected);
        }
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (doc, [html, body, list, item, link]) = create_test_snapshot();
        let chain: Vec<_> = doc.ancestors(link).collect();
        assert_eq!(chain, vec![item, list, body, html]);
        assert_eq!(doc.ancestors(html).count(), 0);
    }

    #[test]
    fn test_contains_is_reflexive_and_directional() {
        let (doc, [html, body, _list, item, link]) = create_test_snapshot();
        assert!(doc.contains(link, link));
        assert!(doc.contains(html, link));
        assert!(doc.contains(body, item));
        assert!(!doc.contains(link, body));
    }

    #[test]
    fn test_contains_siblings() {
        let mut doc = DocumentSnapshot::new(ViewportSources::default());
        let root = doc.push(ElementSnapshot::new("div"));
        let left = doc.push_child(root, ElementSnapshot::new("span"));
        let right = doc.push_child(root, ElementSnapshot::new("span"));
        assert!(!doc.contains(left, right));
        assert!(!doc.contains(right, left));
    }

    #[test]
    fn test_closest_includes_self() {
        let (doc, [_html, body, list, item, link]) = create_test_snapshot();
        assert_eq!(doc.closest(item, &["li"]), Some(item));
        assert_eq!(doc.closest(link, &["ul", "li"]), Some(item));
        assert_eq!(doc.closest(link, &["ul"]), Some(list));
        assert_eq!(doc.closest(body, &["ul", "li", "option"]), None);
    }

    #[test]
    fn test_json_round_trip_keeps_tree() {
        let (doc, [_, _, _, item, link]) = create_test_snapshot();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"tag_name\": \"ul\""));

        let parsed = DocumentSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed.parent(link), Some(item));
        assert_eq!(parsed.viewport.inner_width, Some(800.0));
    }

    #[test]
    fn test_from_json_rejects_forward_parent() {
        let json = r#"{
            "viewport": {"inner_width": 100, "inner_height": 100},
            "elements": [
                {"tag_name": "div", "parent": 1},
                {"tag_name": "span"}
            ]
        }"#;
        let err = DocumentSnapshot::from_json(json).unwrap_err();
        assert!(matches!(err, BrowserError::DomParseFailed(_)));
    }

    #[test]
    fn test_from_json_defaults() {
        let snapshot = DocumentSnapshot::from_json("{}").unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.device_pixel_ratio, 1.0);
        assert_eq!(snapshot.viewport, ViewportSources::default());
    }

    #[test]
    fn test_ancestors_stop_at_backward_links() {
        // Plain deserialization skips the parent-order check
        let json = r#"{
            "elements": [
                {"tag_name": "div", "parent": 0},
                {"tag_name": "ul", "parent": 0},
                {"tag_name": "li", "parent": 3},
                {"tag_name": "a", "parent": 2}
            ]
        }"#;
        let doc: DocumentSnapshot = serde_json::from_str(json).unwrap();
        let id = ElementId::new;

        assert_eq!(doc.ancestors(id(0)).count(), 0);
        assert_eq!(doc.ancestors(id(1)).collect::<Vec<_>>(), vec![id(0)]);
        assert_eq!(doc.ancestors(id(3)).collect::<Vec<_>>(), vec![id(2)]);
        assert!(doc.contains(id(0), id(1)));
        assert!(!doc.contains(id(3), id(2)));
        assert_eq!(doc.closest(id(3), &["ul"]), None);
    }

    #[test]
    fn test_default_is_empty() {
        let doc = DocumentSnapshot::default();
        assert!(doc.is_empty());
        assert_eq!(doc.device_pixel_ratio, 1.0);
        assert_eq!(doc.viewport, ViewportSources::default());
    }

    #[test]
    fn test_count_overlay() {
        let mut doc = DocumentSnapshot::new(ViewportSources::window(100.0, 100.0));
        let body = doc.push(ElementSnapshot::new("body"));
        doc.push_child(body, ElementSnapshot::new("div").as_overlay());
        doc.push_child(body, ElementSnapshot::new("div"));
        assert_eq!(doc.count_overlay(), 1);
    }
}
