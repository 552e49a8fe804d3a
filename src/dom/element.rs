use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an element in document order.
///
/// Ids are assigned while walking the page, so a parent always has a smaller
/// id than any of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl ElementId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One rectangle as reported by `Element.getClientRects()`, in CSS pixels
/// relative to the viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ClientRect {
    /// Create a rectangle from its origin and size
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Read-only facts captured for a single DOM element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementSnapshot {
    /// Lowercased tag name (e.g., "div", "button", "input")
    pub tag_name: String,

    /// Raw `textContent`, normalized later by the scanner
    #[serde(default)]
    pub text: String,

    /// Value of the `aria-label` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,

    /// Whether an inline `onclick` handler is attached
    #[serde(default)]
    pub has_click_handler: bool,

    /// Computed `cursor` style, absent when styles could not be queried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    /// Rectangles the element occupies on screen
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub client_rects: Vec<ClientRect>,

    /// Parent element, `None` for the document root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,

    /// Set for elements that belong to a drawn marker overlay
    #[serde(default)]
    pub overlay: bool,
}

impl ElementSnapshot {
    /// Create a new ElementSnapshot with no geometry
    pub fn new(tag_name: impl Into<String>) -> Self {
        let tag_name: String = tag_name.into();
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            text: String::new(),
            aria_label: None,
            has_click_handler: false,
            cursor: None,
            client_rects: Vec::new(),
            parent: None,
            overlay: false,
        }
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder method: set aria-label
    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    /// Builder method: mark an inline click handler as present
    pub fn with_click_handler(mut self) -> Self {
        self.has_click_handler = true;
        self
    }

    /// Builder method: set computed cursor style
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Builder method: add a client rectangle
    pub fn with_rect(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.client_rects.push(ClientRect::new(left, top, width, height));
        self
    }

    /// Builder method: flag as marker overlay content
    pub fn as_overlay(mut self) -> Self {
        self.overlay = true;
        self
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// aria-label, or the empty string when the attribute is missing
    pub fn aria_label_or_empty(&self) -> &str {
        self.aria_label.as_deref().unwrap_or("")
    }
}
