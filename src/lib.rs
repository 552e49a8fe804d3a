//! # page-marker
//!
//! Finds the elements on a rendered page that a user (or an AI agent) can
//! interact with, measures where they are on screen, and overlays numbered
//! markers so they can be referred to by index ("set-of-mark" prompting).
//!
//! ## Features
//!
//! - **Scanner**: classification of interactive elements, viewport clipping,
//!   area thresholds and nested-duplicate removal over a captured DOM snapshot
//! - **Markers**: numbered boxes drawn into the live page or onto a screenshot
//! - **Browser Session Management**: Launch or connect to Chrome/Chromium instances
//!
//! ## Marking a Page
//!
//! ```rust,no_run
//! use page_marker::{BrowserSession, LaunchOptions};
//!
//! # fn main() -> page_marker::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//! session.wait_for_navigation()?;
//!
//! let mut marker = session.page_marker()?;
//! let targets = marker.mark()?;
//! for (i, target) in targets.iter().enumerate() {
//!     println!("{} <{}> {:?} at ({}, {})", i, target.tag_name, target.text, target.x, target.y);
//! }
//!
//! // Remove the overlay again
//! marker.unmark()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Scanning a Snapshot
//!
//! The scanner is a pure function of a [`DocumentSnapshot`], which makes it
//! usable without a browser:
//!
//! ```rust
//! use page_marker::dom::{DocumentSnapshot, ElementSnapshot, ViewportSources};
//!
//! let mut doc = DocumentSnapshot::new(ViewportSources::window(800.0, 600.0));
//! let div = doc.push(ElementSnapshot::new("div").with_rect(0.0, 0.0, 100.0, 50.0));
//! doc.push_child(div, ElementSnapshot::new("button").with_text("Go").with_rect(10.0, 10.0, 40.0, 20.0));
//!
//! let result = page_marker::scan(&doc);
//! let targets = result.targets();
//! assert_eq!(targets.len(), 1);
//! assert_eq!(targets[0].tag_name, "button");
//! assert_eq!((targets[0].x, targets[0].y), (30.0, 20.0));
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Document snapshot capture and the element arena
//! - [`scanner`]: Interactive element detection (the core algorithm)
//! - [`marker`]: Marker renderers and the Clean/Marked marker state
//! - [`browser`]: Browser session management and configuration
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod dom;
pub mod error;
pub mod marker;
pub mod scanner;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use dom::{DocumentSnapshot, ElementId, ElementSnapshot};
pub use error::{BrowserError, Result};
pub use marker::{DomOverlay, Marker, MarkerRenderer, MarkerSet, MarkerStyle, PageMarker, ScreenshotOverlay, SnapshotSource};
pub use scanner::{CandidateItem, ScanResult, Target, find_by_text, scan};
