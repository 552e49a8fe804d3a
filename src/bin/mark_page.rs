//! mark-page
//!
//! Opens a page in Chrome, marks its interactive elements and prints the
//! click targets as JSON.

use anyhow::{Context, Result, bail};
use clap::Parser;
use page_marker::{BrowserSession, ConnectionOptions, LaunchOptions, PageMarker, Target, find_by_text};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mark-page")]
#[command(version)]
#[command(about = "Mark interactive elements on a web page and print their click targets", long_about = None)]
struct Cli {
    /// URL to open
    url: String,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Window width
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Window height
    #[arg(long, default_value = "800")]
    height: u32,

    /// Milliseconds to wait after navigation before scanning
    #[arg(long, default_value = "1000")]
    settle_ms: u64,

    /// Paint markers onto a screenshot written to this PNG instead of the page
    #[arg(long, value_name = "PNG")]
    screenshot: Option<PathBuf>,

    /// TrueType font used for screenshot labels
    #[arg(long, value_name = "TTF", requires = "screenshot")]
    font: Option<PathBuf>,

    /// Print only the first target whose text contains this
    #[arg(long, value_name = "TEXT")]
    find: Option<String>,

    /// Click the first target whose text contains this
    #[arg(long, value_name = "TEXT")]
    click: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let session = match &cli.ws_endpoint {
        Some(endpoint) => BrowserSession::connect(ConnectionOptions::new(endpoint.as_str()))?,
        None => {
            let mut options = LaunchOptions::new()
                .headless(!cli.headed)
                .window_size(cli.width, cli.height);
            if let Some(path) = &cli.chrome_path {
                options = options.chrome_path(path);
            }
            BrowserSession::launch(options)?
        }
    };

    session.navigate(&cli.url)?;
    session.wait_for_navigation()?;
    std::thread::sleep(Duration::from_millis(cli.settle_ms));

    let targets = match &cli.screenshot {
        Some(path) => {
            let mut marker = session.screenshot_marker()?;
            if let Some(font_path) = &cli.font {
                let bytes = std::fs::read(font_path)
                    .with_context(|| format!("Failed to read font {}", font_path.display()))?;
                let (source, renderer, _) = marker.into_parts();
                marker = PageMarker::new(source, renderer.with_font_bytes(bytes)?);
            }
            let targets = marker.mark()?;
            marker.renderer().save(path)?;
            log::info!("Wrote annotated screenshot to {}", path.display());
            targets
        }
        None => session.page_marker()?.mark()?,
    };

    if let Some(label) = &cli.click {
        let Some(target) = find_by_text(&targets, label) else {
            bail!("No target matching \"{}\"", label);
        };
        session.click_target(target)?;
    }

    match &cli.find {
        Some(needle) => {
            let Some(target) = find_by_text(&targets, needle) else {
                bail!("No target matching \"{}\"", needle);
            };
            print_json(target)?;
        }
        None => print_json::<[Target]>(&targets)?,
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
