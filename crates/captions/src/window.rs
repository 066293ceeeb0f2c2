use crate::types::Word;

pub const MIN_WINDOW: usize = 1;
pub const MAX_WINDOW: usize = 5;

/// The karaoke window derived for one playback instant: which word is being
/// spoken and the contiguous slice of words shown around it.
///
/// Invariants (for non-empty input): `slice_start <= active_index <
/// slice_end <= words.len()` and `slice_end - slice_start ==
/// min(window_size, words.len())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub active_index: usize,
    pub slice_start: usize,
    pub slice_end: usize,
}

impl Window {
    pub fn width(&self) -> usize {
        self.slice_end - self.slice_start
    }
}

/// Select the window of words to display at `time`.
///
/// The active word is the first whose `[start, end]` interval contains
/// `time` (earliest index wins when intervals overlap). When no interval
/// contains `time`, the most recently finished word is active; when nothing
/// has finished yet, index 0 is. The slice is centered on the active word
/// (for even remainders the extra word goes after it) and pushed flush
/// against whichever sequence boundary it would otherwise overrun.
///
/// Pure: the result is derivable from the arguments alone.
pub fn select(time: f64, words: &[Word], window_size: usize) -> Option<Window> {
    if words.is_empty() {
        return None;
    }

    let active_index = active_index(time, words);
    let window_size = window_size.clamp(MIN_WINDOW, MAX_WINDOW);
    let width = window_size.min(words.len());

    let before = (window_size - 1) / 2;
    let slice_start = active_index.saturating_sub(before).min(words.len() - width);
    let slice_end = slice_start + width;

    Some(Window {
        active_index,
        slice_start,
        slice_end,
    })
}

fn active_index(time: f64, words: &[Word]) -> usize {
    if let Some(i) = words.iter().position(|w| time >= w.start && time <= w.end) {
        return i;
    }
    // Gap between words: fall back to the last word already finished. Before
    // the first word has finished there is no such word, and index 0 is
    // active rather than none.
    words.iter().rposition(|w| w.end <= time).unwrap_or(0)
}
