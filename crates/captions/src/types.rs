use crate::style::CaptionStyle;

/// One timed caption word, in seconds relative to the clip start.
///
/// Sequences are chronological by construction; the selector's boundary
/// logic relies on insertion order and never re-sorts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionSpan {
    pub text: String,
    pub active: bool,
}

/// Complete snapshot of the caption overlay at a point in time.
///
/// This is the rendering contract: everything a surface needs to draw one
/// frame, whether that surface is the terminal preview, the markup export,
/// or a test assertion. Produced by [`crate::frame::render`] and
/// [`crate::preview::Preview::frame`]; identical inputs yield an identical
/// frame.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionFrame {
    /// The visible window, in order. At most one span is active.
    pub spans: Vec<CaptionSpan>,
    pub style: CaptionStyle,
}

impl CaptionFrame {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn active_text(&self) -> Option<&str> {
        self.spans
            .iter()
            .find(|s| s.active)
            .map(|s| s.text.as_str())
    }
}
