use crate::dom::{DocumentSnapshot, ElementId, ElementSnapshot};

/// Native controls that are always interactive
pub const INTERACTIVE_TAGS: [&str; 6] = ["input", "textarea", "select", "button", "a", "option"];

/// An element inside (or being) one of these counts as a selectable item
pub const LIST_CONTEXT_TAGS: [&str; 3] = ["ul", "li", "option"];

/// The facts the interactivity heuristic looks at, independent of how they
/// were obtained
pub trait InteractivityProbe {
    /// Tag name of the element
    fn tag_name(&self) -> &str;

    /// Whether an inline click handler is attached
    fn has_click_handler(&self) -> bool;

    /// Computed cursor style, `None` when unknown
    fn cursor(&self) -> Option<&str>;

    /// Whether the element or any ancestor has one of `tags`
    fn ancestor_matches(&self, tags: &[&str]) -> bool;
}

/// Decide whether an element looks clickable
pub fn is_interactive<P: InteractivityProbe + ?Sized>(probe: &P) -> bool {
    let tag = probe.tag_name();
    INTERACTIVE_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t))
        || probe.has_click_handler()
        || probe.cursor() == Some("pointer")
        || probe.ancestor_matches(&LIST_CONTEXT_TAGS)
}

/// An element seen through its document, so ancestor queries can follow the
/// parent chain
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    document: &'a DocumentSnapshot,
    id: ElementId,
    element: &'a ElementSnapshot,
}

impl<'a> ElementView<'a> {
    pub fn new(document: &'a DocumentSnapshot, id: ElementId) -> Option<Self> {
        document.get(id).map(|element| Self { document, id, element })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn element(&self) -> &'a ElementSnapshot {
        self.element
    }
}

impl InteractivityProbe for ElementView<'_> {
    fn tag_name(&self) -> &str {
        &self.element.tag_name
    }

    fn has_click_handler(&self) -> bool {
        self.element.has_click_handler
    }

    fn cursor(&self) -> Option<&str> {
        self.element.cursor.as_deref()
    }

    fn ancestor_matches(&self, tags: &[&str]) -> bool {
        self.document.closest(self.id, tags).is_some()
    }
}
