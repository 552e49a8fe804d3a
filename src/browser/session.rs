use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            dom::DocumentSnapshot,
            error::{BrowserError, Result},
            marker::{DomOverlay, MarkerStyle, PageMarker, ScreenshotOverlay, screenshot::capture_png},
            scanner::{self, ScanResult, Target}};
use headless_chrome::{Browser, Tab, browser::tab::point::Point};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Set the browser's idle timeout to 1 hour (default is 30 seconds) to prevent the session from closing too soon
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        browser.new_tab().map_err(|e| BrowserError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        log::info!(
            "Launched browser ({}, {}x{})",
            if options.headless { "headless" } else { "headed" },
            options.window_width,
            options.window_height
        );

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url.clone(), Duration::from_millis(options.timeout))
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        log::info!("Connected to browser at {}", options.ws_url);
        Ok(Self { browser })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| BrowserError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // First pass: check for both visibility and focus (strongest signal)
        for tab in &tabs {
            match evaluate_bool(tab, "document.visibilityState === 'visible' && document.hasFocus()") {
                Ok(true) => return Ok(tab.clone()),
                Ok(false) => {}
                Err(e) => log::debug!("Failed to check tab status: {}", e),
            }
        }

        // Second pass: check just for visibility (weaker signal, but better than nothing)
        for tab in &tabs {
            if let Ok(true) = evaluate_bool(tab, "document.visibilityState === 'visible'") {
                return Ok(tab.clone());
            }
        }

        Err(BrowserError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate to a URL using the active tab
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| BrowserError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Capture the document of the active tab
    pub fn capture_snapshot(&self) -> Result<DocumentSnapshot> {
        let tab = self.tab()?;
        DocumentSnapshot::from_tab(&tab)
    }

    /// Scan the active tab without drawing anything
    pub fn scan(&self) -> Result<ScanResult> {
        Ok(scanner::scan(&self.capture_snapshot()?))
    }

    /// Page marker that draws into the live active tab
    pub fn page_marker(&self) -> Result<PageMarker<Arc<Tab>, DomOverlay>> {
        self.page_marker_with_style(MarkerStyle::default())
    }

    /// Page marker that draws into the live active tab with a custom style
    pub fn page_marker_with_style(&self, style: MarkerStyle) -> Result<PageMarker<Arc<Tab>, DomOverlay>> {
        let tab = self.tab()?;
        Ok(PageMarker::new(tab.clone(), DomOverlay::with_style(tab, style)))
    }

    /// Page marker that paints onto a screenshot of the active tab, leaving
    /// the page untouched. Each mark takes a new screenshot.
    pub fn screenshot_marker(&self) -> Result<PageMarker<Arc<Tab>, ScreenshotOverlay>> {
        let tab = self.tab()?;
        let overlay = ScreenshotOverlay::from_tab(tab.clone())?;
        Ok(PageMarker::new(tab, overlay))
    }

    /// Capture a PNG screenshot of the visible part of the active tab
    pub fn screenshot(&self) -> Result<Vec<u8>> {
        let tab = self.tab()?;
        capture_png(&tab)
    }

    /// Click the center point of a scanned target
    pub fn click_target(&self, target: &Target) -> Result<()> {
        log::debug!("Clicking <{}> \"{}\" at ({}, {})", target.tag_name, target.text, target.x, target.y);
        self.tab()?
            .click_point(Point { x: target.x, y: target.y })
            .map_err(|e| BrowserError::InputFailed(format!("Failed to click at ({}, {}): {}", target.x, target.y, e)))?;

        Ok(())
    }

    /// Close the browser
    pub fn close(&self) -> Result<()> {
        // The Browser itself shuts down on drop; closing the tabs ends the session early
        let tabs = self.get_tabs()?;
        for tab in tabs {
            let _ = tab.close(false); // Ignore errors on individual tab closes
        }
        Ok(())
    }
}

fn evaluate_bool(tab: &Tab, expression: &str) -> Result<bool> {
    let remote_object = tab
        .evaluate(expression, false)
        .map_err(|e| BrowserError::EvaluationFailed(e.to_string()))?;
    Ok(remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false))
}
