//! Document capture module
//!
//! This module holds the read-only picture of a page the scanner works on:
//! - ElementSnapshot: facts captured for one DOM element
//! - DocumentSnapshot: arena of every element in document order, with parent links
//! - ViewportSources: the raw viewport measurements taken alongside

pub mod element;
pub mod snapshot;

pub use element::{ClientRect, ElementId, ElementSnapshot};
pub use snapshot::{Ancestors, DocumentSnapshot, ViewportSources};

use crate::error::Result;
use headless_chrome::Tab;

/// Capture a snapshot of the document loaded in a browser tab
pub fn capture_snapshot(tab: &Tab) -> Result<DocumentSnapshot> {
    DocumentSnapshot::from_tab(tab)
}
