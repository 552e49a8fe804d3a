//! Browser session management
//!
//! Launches or connects to a Chrome/Chromium instance and exposes the active
//! tab as a markable page.

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
