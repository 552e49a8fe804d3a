use crate::dom::{DocumentSnapshot, ElementId};
use crate::scanner::geometry::ClippedRect;
use crate::scanner::target::Target;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Area that lets a non-interactive element qualify on size alone
pub const SOFT_AREA_FLOOR: f64 = 10.0;

/// Visible area every candidate must strictly exceed
pub const MIN_VISIBLE_AREA: f64 = 10.0;

/// Two-stage inclusion test.
///
/// The first clause uses `>=` and the final filter uses `>`, so an element
/// with exactly 10 px² of visible area never qualifies, and interactivity
/// alone never lets a tiny element through.
pub fn qualifies(is_interactive: bool, area: f64) -> bool {
    (is_interactive || area >= SOFT_AREA_FLOOR) && area > MIN_VISIBLE_AREA
}

/// An element that passed the inclusion test
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateItem {
    /// Element the candidate was built from
    pub element: ElementId,

    pub is_interactive: bool,

    /// Sum of the clipped rectangle areas
    pub area: f64,

    /// Visible rectangles, at least one
    pub rects: Vec<ClippedRect>,

    /// Normalized text content
    pub text: String,

    /// Lowercased tag name
    pub tag_name: String,

    /// aria-label, empty when absent
    pub aria_label: String,
}

impl CandidateItem {
    /// One target per rectangle, located at the rectangle's center
    pub fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.rects.iter().map(move |rect| {
            let (x, y) = rect.center();
            Target {
                x,
                y,
                text: self.text.clone(),
                tag_name: self.tag_name.clone(),
                aria_label: self.aria_label.clone(),
            }
        })
    }
}

/// Candidates keyed by element, in the order they were found.
/// Uses IndexMap to preserve insertion order
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    map: IndexMap<ElementId, CandidateItem>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    /// Add a candidate. A second insert for the same element replaces the first
    /// but keeps its position.
    pub fn insert(&mut self, item: CandidateItem) {
        self.map.insert(item.element, item);
    }

    pub fn get(&self, element: ElementId) -> Option<&CandidateItem> {
        self.map.get(&element)
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.map.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateItem> {
        self.map.values()
    }

    /// Drop every candidate whose element contains another candidate's
    /// element, so only the innermost match of each nested group survives.
    ///
    /// Returns the number of candidates removed.
    pub fn remove_containers(&mut self, document: &DocumentSnapshot) -> usize {
        let containers: HashSet<ElementId> = self
            .map
            .keys()
            .flat_map(|&id| document.ancestors(id))
            .filter(|ancestor| self.map.contains_key(ancestor))
            .collect();

        let before = self.map.len();
        self.map.retain(|id, _| !containers.contains(id));
        before - self.map.len()
    }

    /// Finish the set; the position in the returned vector is the marker index
    pub fn into_vec(self) -> Vec<CandidateItem> {
        self.map.into_values().collect()
    }
}
