use crate::window::{MAX_WINDOW, MIN_WINDOW};

pub const MIN_FONT_PX: u32 = 18;
pub const MAX_FONT_PX: u32 = 120;

/// Stroke is drawn as offset shadows; widths past this stop looking like an
/// outline.
pub const MAX_STROKE_PX: u32 = 20;

/// Caption typography and placement. One mutable record per session, read by
/// every render; out-of-range numeric input clamps to the nearest bound
/// instead of failing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionStyle {
    pub font_size_px: u32,
    /// Horizontal anchor as a percentage of the container width.
    pub pos_x_pct: u32,
    /// Vertical anchor as a percentage of the container height.
    pub pos_y_pct: u32,
    /// `#rrggbb` hex.
    pub text_color: String,
    pub highlight_color: String,
    pub stroke_color: String,
    pub stroke_width_px: u32,
    pub window_size: usize,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size_px: 48,
            pos_x_pct: 50,
            pos_y_pct: 80,
            text_color: "#ffffff".to_string(),
            highlight_color: "#fde047".to_string(),
            stroke_color: "#000000".to_string(),
            stroke_width_px: 2,
            window_size: 5,
        }
    }
}

impl CaptionStyle {
    pub fn set_font_size(&mut self, px: u32) {
        self.font_size_px = px.clamp(MIN_FONT_PX, MAX_FONT_PX);
    }

    pub fn set_pos_x(&mut self, pct: u32) {
        self.pos_x_pct = pct.min(100);
    }

    pub fn set_pos_y(&mut self, pct: u32) {
        self.pos_y_pct = pct.min(100);
    }

    pub fn set_stroke_width(&mut self, px: u32) {
        self.stroke_width_px = px.min(MAX_STROKE_PX);
    }

    pub fn set_window_size(&mut self, size: usize) {
        self.window_size = size.clamp(MIN_WINDOW, MAX_WINDOW);
    }
}
