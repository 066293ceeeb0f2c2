use crate::style::CaptionStyle;
use crate::types::{CaptionFrame, CaptionSpan, Word};
use crate::window::Window;

/// Alpha suffix for the active-word badge tint, appended to the `#rrggbb`
/// highlight color (~35%).
const HIGHLIGHT_ALPHA_HEX: &str = "59";

const INACTIVE_OPACITY: &str = "0.75";

/// Render a selected window into a frame snapshot.
///
/// `None` renders an empty frame; the overlay shows nothing rather than
/// stale words. Otherwise the frame holds one span per word in
/// `[slice_start, slice_end)`, with exactly the active index marked.
pub fn render(window: Option<&Window>, words: &[Word], style: &CaptionStyle) -> CaptionFrame {
    let Some(window) = window else {
        return CaptionFrame {
            spans: Vec::new(),
            style: style.clone(),
        };
    };

    let spans = words[window.slice_start..window.slice_end]
        .iter()
        .enumerate()
        .map(|(offset, word)| CaptionSpan {
            text: word.text.clone(),
            active: window.slice_start + offset == window.active_index,
        })
        .collect();

    CaptionFrame {
        spans,
        style: style.clone(),
    }
}

/// Escape `&`, `<` and `>`. Words originate from user-edited captions and
/// must never read as structural markup on the rendered surface.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The eight directional offsets that approximate a glyph outline of
/// `width_px`: every `±w`/`0` combination except the origin. Width 0 means
/// no outline.
pub fn stroke_shadows(width_px: u32) -> Vec<(i32, i32)> {
    if width_px == 0 {
        return Vec::new();
    }
    let w = width_px as i32;
    let mut offsets = Vec::with_capacity(8);
    for dx in [-w, 0, w] {
        for dy in [-w, 0, w] {
            if (dx, dy) != (0, 0) {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

impl CaptionFrame {
    /// The frame as the overlay markup the service's web player uses:
    /// percentage-positioned container, shadow outline, highlight badge on
    /// the active word. Empty frame, empty string.
    pub fn markup(&self) -> String {
        if self.spans.is_empty() {
            return String::new();
        }

        let style = &self.style;
        let mut out = format!(
            "<div class=\"caption\" style=\"left:{}%;top:{}%;font-size:{}px;color:{}{}\">",
            style.pos_x_pct,
            style.pos_y_pct,
            style.font_size_px,
            style.text_color,
            shadow_css(style.stroke_width_px, &style.stroke_color),
        );

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let text = escape_markup(&span.text);
            if span.active {
                out.push_str(&format!(
                    "<span class=\"word active\" style=\"background:{}{HIGHLIGHT_ALPHA_HEX};border-radius:0.2em\">{text}</span>",
                    style.highlight_color,
                ));
            } else {
                out.push_str(&format!(
                    "<span class=\"word\" style=\"opacity:{INACTIVE_OPACITY}\">{text}</span>"
                ));
            }
        }

        out.push_str("</div>");
        out
    }
}

fn shadow_css(width_px: u32, color: &str) -> String {
    let offsets = stroke_shadows(width_px);
    if offsets.is_empty() {
        return String::new();
    }
    let shadows: Vec<String> = offsets
        .iter()
        .map(|(dx, dy)| format!("{dx}px {dy}px 0 {color}"))
        .collect();
    format!(";text-shadow:{}", shadows.join(", "))
}
