use thiserror::Error;

/// Errors raised by the browser session, snapshot capture and marker renderers.
///
/// Scanning itself never fails; these only surface at the edges where the
/// crate talks to Chrome or decodes/encodes images.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Failed to parse DOM snapshot: {0}")]
    DomParseFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Marker rendering failed: {0}")]
    RenderFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Input dispatch failed: {0}")]
    InputFailed(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BrowserError>;
