use crate::dom::DocumentSnapshot;
use crate::error::{BrowserError, Result};
use crate::marker::{Marker, MarkerRenderer, marker_boxes};
use crate::scanner::{CandidateItem, ClippedRect};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use headless_chrome::Tab;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

const OUTLINE_THICKNESS: i32 = 2;
const LABEL_OFFSET: f32 = 20.0;
const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_PAD_X: i32 = 4;
const LABEL_PAD_Y: i32 = 2;
// Plate width per digit when no font is loaded
const FALLBACK_DIGIT_WIDTH: i32 = 7;

/// Paints markers onto a screenshot instead of the live page.
///
/// The page is never touched, so erasing just repaints the remaining markers
/// over a fresh copy of the original image. When bound to a tab, every mark
/// paints onto a new screenshot taken right after the page was scanned.
pub struct ScreenshotOverlay {
    tab: Option<Arc<Tab>>,
    base: RgbaImage,
    canvas: RgbaImage,
    /// Device pixels per CSS pixel
    scale: f32,
    font: Option<Font<'static>>,
    live: Vec<Marker>,
    generation: u64,
    outline_color: Rgba<u8>,
    label_background: Rgba<u8>,
    label_color: Rgba<u8>,
}

impl ScreenshotOverlay {
    pub fn new(base: RgbaImage) -> Self {
        Self {
            tab: None,
            canvas: base.clone(),
            base,
            scale: 1.0,
            font: None,
            live: Vec::new(),
            generation: 0,
            outline_color: Rgba([255, 0, 0, 255]),
            label_background: Rgba([0, 0, 0, 255]),
            label_color: Rgba([255, 255, 255, 255]),
        }
    }

    /// Decode a PNG (or any format `image` recognizes) as the base image
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let base = image::load_from_memory(bytes)
            .map_err(|e| BrowserError::RenderFailed(format!("Failed to decode screenshot: {}", e)))?
            .to_rgba8();
        Ok(Self::new(base))
    }

    /// Screenshot the tab now and again before every draw
    pub fn from_tab(tab: Arc<Tab>) -> Result<Self> {
        let png = capture_png(&tab)?;
        let mut overlay = Self::from_png(&png)?;
        overlay.tab = Some(tab);
        Ok(overlay)
    }

    /// Replace the base image, repainting the markers still live on it
    pub fn set_base(&mut self, base: RgbaImage) {
        self.base = base;
        self.repaint();
    }

    /// Builder method: set the device pixel ratio of the screenshot
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = if scale > 0.0 { scale } else { 1.0 };
        self
    }

    /// Builder method: load a TrueType font for label text
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| BrowserError::RenderFailed("Failed to load label font".to_string()))?;
        self.font = Some(font);
        Ok(self)
    }

    /// Builder method: set outline and label colors
    pub fn with_colors(mut self, outline: Rgba<u8>, label_background: Rgba<u8>, label_color: Rgba<u8>) -> Self {
        self.outline_color = outline;
        self.label_background = label_background;
        self.label_color = label_color;
        self
    }

    /// Device pixels per CSS pixel
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The annotated image
    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Markers currently painted
    pub fn live_markers(&self) -> &[Marker] {
        &self.live
    }

    /// Encode the annotated image as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.canvas)
    }

    /// Encode the annotated image as base64 PNG
    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_png()?))
    }

    /// Write the annotated image to disk; the format follows the extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.canvas
            .save(path)
            .map_err(|e| BrowserError::RenderFailed(format!("Failed to save {}: {}", path.display(), e)))
    }

    fn repaint(&mut self) {
        self.canvas = self.base.clone();
        let markers = std::mem::take(&mut self.live);
        for marker in &markers {
            self.paint(marker);
        }
        self.live = markers;
    }

    fn paint(&mut self, marker: &Marker) {
        let Some(rect) = self.to_pixels(&marker.rect) else {
            return;
        };

        for inset in 0..OUTLINE_THICKNESS {
            let width = rect.width() as i32 - 2 * inset;
            let height = rect.height() as i32 - 2 * inset;
            if width <= 0 || height <= 0 {
                break;
            }
            let ring = Rect::at(rect.left() + inset, rect.top() + inset).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(&mut self.canvas, ring, self.outline_color);
        }

        self.paint_label(marker.index, rect.left(), rect.top());
    }

    fn paint_label(&mut self, index: usize, left: i32, top: i32) {
        let text = index.to_string();
        let font_scale = Scale::uniform(LABEL_FONT_SIZE * self.scale);

        let (text_width, text_height) = match &self.font {
            Some(font) => text_size(font_scale, font, &text),
            None => (
                ((FALLBACK_DIGIT_WIDTH * text.len() as i32) as f32 * self.scale).round() as i32,
                (LABEL_FONT_SIZE * self.scale).round() as i32,
            ),
        };

        let pad_x = (LABEL_PAD_X as f32 * self.scale).round() as i32;
        let pad_y = (LABEL_PAD_Y as f32 * self.scale).round() as i32;
        let plate_width = (text_width + 2 * pad_x).max(1) as u32;
        let plate_height = (text_height + 2 * pad_y).max(1) as u32;
        let plate_top = (top - (LABEL_OFFSET * self.scale).round() as i32).max(0);

        draw_filled_rect_mut(
            &mut self.canvas,
            Rect::at(left, plate_top).of_size(plate_width, plate_height),
            self.label_background,
        );

        if let Some(font) = &self.font {
            draw_text_mut(
                &mut self.canvas,
                self.label_color,
                left + pad_x,
                plate_top + pad_y,
                font_scale,
                font,
                &text,
            );
        }
    }

    /// Convert a CSS-pixel rectangle into image pixels, `None` when it
    /// rounds down to nothing
    fn to_pixels(&self, rect: &ClippedRect) -> Option<Rect> {
        let left = (rect.left as f32 * self.scale).round() as i32;
        let top = (rect.top as f32 * self.scale).round() as i32;
        let width = (rect.width as f32 * self.scale).round() as i32;
        let height = (rect.height as f32 * self.scale).round() as i32;

        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Rect::at(left, top).of_size(width as u32, height as u32))
    }
}

/// PNG of the visible part of a tab
pub(crate) fn capture_png(tab: &Tab) -> Result<Vec<u8>> {
    tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| BrowserError::RenderFailed(format!("Failed to encode PNG: {}", e)))?;
    Ok(bytes)
}

impl MarkerRenderer for ScreenshotOverlay {
    fn prepare(&mut self, snapshot: &DocumentSnapshot) -> Result<()> {
        self.scale = if snapshot.device_pixel_ratio > 0.0 {
            snapshot.device_pixel_ratio as f32
        } else {
            1.0
        };

        if let Some(tab) = self.tab.clone() {
            let png = capture_png(&tab)?;
            let base = image::load_from_memory(&png)
                .map_err(|e| BrowserError::RenderFailed(format!("Failed to decode screenshot: {}", e)))?
                .to_rgba8();
            log::debug!("Refreshed screenshot ({}x{})", base.width(), base.height());
            self.set_base(base);
        }
        Ok(())
    }

    fn draw(&mut self, candidates: &[CandidateItem]) -> Result<Vec<Marker>> {
        self.generation += 1;
        let generation = self.generation;

        let markers: Vec<Marker> = marker_boxes(candidates)
            .enumerate()
            .map(|(n, (index, rect))| Marker {
                handle: format!("shot-{}-{}", generation, n),
                index,
                rect,
            })
            .collect();

        for marker in &markers {
            self.paint(marker);
        }
        self.live.extend(markers.iter().cloned());
        Ok(markers)
    }

    fn erase(&mut self, markers: &[Marker]) -> Result<()> {
        let before = self.live.len();
        self.live
            .retain(|live| !markers.iter().any(|m| m.handle == live.handle));

        if self.live.len() != before {
            self.repaint();
        }
        Ok(())
    }
}
