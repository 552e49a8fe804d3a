use serde::{Deserialize, Serialize};

/// Appearance of drawn markers.
///
/// Values are CSS strings so they can be handed to the page as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerStyle {
    /// Outline of each box
    pub outline: String,

    pub label_background: String,

    pub label_color: String,

    pub label_font_size_px: u32,

    pub label_padding: String,

    pub label_border_radius_px: u32,

    /// Vertical offset of the label relative to the box top
    pub label_offset_px: i32,

    pub z_index: i64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            outline: "2px dashed red".to_string(),
            label_background: "black".to_string(),
            label_color: "white".to_string(),
            label_font_size_px: 12,
            label_padding: "2px 4px".to_string(),
            label_border_radius_px: 2,
            label_offset_px: -20,
            z_index: 2147483647,
        }
    }
}

impl MarkerStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set outline
    pub fn outline(mut self, outline: impl Into<String>) -> Self {
        self.outline = outline.into();
        self
    }

    /// Builder method: set label colors
    pub fn label_colors(mut self, background: impl Into<String>, color: impl Into<String>) -> Self {
        self.label_background = background.into();
        self.label_color = color.into();
        self
    }

    /// Builder method: set label font size
    pub fn label_font_size(mut self, px: u32) -> Self {
        self.label_font_size_px = px;
        self
    }
}
