use crate::error::Error;
use crate::frame::render;
use crate::session::{ClipKey, Session};
use crate::store::WordStore;
use crate::style::CaptionStyle;
use crate::types::{CaptionFrame, Word};
use crate::window::select;

/// What became of a load result once it came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The key still matched the session; the store was updated.
    Applied,
    /// The session moved on while the load was in flight; the result was
    /// discarded.
    Stale,
}

/// Stateful driver for one preview surface: owns the session, the word
/// store, the style record, and the last known playback time.
///
/// Playback ticks call [`seek`](Self::seek) then [`frame`](Self::frame);
/// style changes and load completions re-call `frame` at the same time, so
/// the overlay re-renders without the clock moving. Word loads are
/// asynchronous and race the clock: callers snapshot a [`ClipKey`] with
/// [`begin_load`](Self::begin_load), fetch, then hand the result to
/// [`finish_load`](Self::finish_load) / [`fail_load`](Self::fail_load),
/// which discard anything the session has outgrown.
#[derive(Debug, Default)]
pub struct Preview {
    session: Session,
    store: WordStore,
    style: CaptionStyle,
    time: f64,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_job(&mut self, id: impl Into<String>) {
        self.session.set_job(id);
    }

    pub fn set_clip(&mut self, index: u32) {
        self.session.set_clip(index);
    }

    /// Key for a load about to be issued. Fails when no job/clip is
    /// selected; operations that depend on the session are guarded here
    /// rather than panicking later.
    pub fn begin_load(&self) -> Result<ClipKey, Error> {
        self.session.key().ok_or(Error::SessionIncomplete)
    }

    pub fn finish_load(&mut self, key: ClipKey, words: Vec<Word>) -> LoadOutcome {
        if self.session.key().as_ref() != Some(&key) {
            return LoadOutcome::Stale;
        }
        self.store.replace(key, words);
        LoadOutcome::Applied
    }

    pub fn fail_load(&mut self, key: &ClipKey) -> LoadOutcome {
        if self.session.key().as_ref() != Some(key) {
            return LoadOutcome::Stale;
        }
        self.store.clear();
        LoadOutcome::Applied
    }

    pub fn seek(&mut self, time: f64) {
        self.time = time;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut CaptionStyle {
        &mut self.style
    }

    /// Words currently eligible to render: the store's content when it was
    /// loaded for the current session, empty otherwise.
    pub fn words(&self) -> &[Word] {
        match self.session.key() {
            Some(key) => self.store.words_for(&key),
            None => &[],
        }
    }

    /// Render at the last known playback time. Cheap and idempotent: every
    /// caller gets a complete snapshot, last write wins on the surface.
    pub fn frame(&self) -> CaptionFrame {
        let words = self.words();
        let window = select(self.time, words, self.style.window_size);
        render(window.as_ref(), words, &self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<Word> {
        vec![
            Word::new("hi", 0.0, 1.0),
            Word::new("there", 1.0, 2.0),
            Word::new("friend", 2.0, 3.0),
        ]
    }

    fn loaded_preview() -> Preview {
        let mut preview = Preview::new();
        preview.set_job("j1");
        preview.set_clip(0);
        let key = preview.begin_load().unwrap();
        assert_eq!(preview.finish_load(key, words()), LoadOutcome::Applied);
        preview
    }

    #[test]
    fn begin_load_requires_job_and_clip() {
        let mut preview = Preview::new();
        assert!(matches!(
            preview.begin_load(),
            Err(Error::SessionIncomplete)
        ));

        preview.set_job("j1");
        assert!(matches!(
            preview.begin_load(),
            Err(Error::SessionIncomplete)
        ));

        preview.set_clip(0);
        assert!(preview.begin_load().is_ok());
    }

    #[test]
    fn frame_follows_playback_time() {
        let mut preview = loaded_preview();

        preview.seek(0.5);
        assert_eq!(preview.frame().active_text(), Some("hi"));

        preview.seek(1.5);
        assert_eq!(preview.frame().active_text(), Some("there"));

        preview.seek(5.0);
        assert_eq!(preview.frame().active_text(), Some("friend"));
    }

    #[test]
    fn style_change_rerenders_at_last_known_time() {
        let mut preview = loaded_preview();
        preview.seek(1.5);
        assert_eq!(preview.frame().spans.len(), 3);

        preview.style_mut().set_window_size(1);
        let frame = preview.frame();
        assert_eq!(frame.spans.len(), 1);
        assert_eq!(frame.active_text(), Some("there"));
        assert_eq!(preview.time(), 1.5);
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut preview = Preview::new();
        preview.set_job("j1");
        preview.set_clip(0);
        let stale_key = preview.begin_load().unwrap();

        // The user switches clips while the load is in flight.
        preview.set_clip(1);
        assert_eq!(preview.finish_load(stale_key, words()), LoadOutcome::Stale);

        preview.seek(0.5);
        assert!(preview.frame().is_empty());
    }

    #[test]
    fn stale_failure_leaves_current_words_alone() {
        let mut preview = loaded_preview();
        let old_key = ClipKey {
            job_id: "j1".to_string(),
            clip_index: 9,
        };
        assert_eq!(preview.fail_load(&old_key), LoadOutcome::Stale);

        preview.seek(0.5);
        assert!(!preview.frame().is_empty());
    }

    #[test]
    fn failed_load_renders_nothing_not_stale_words() {
        let mut preview = loaded_preview();
        preview.seek(0.5);
        assert!(!preview.frame().is_empty());

        let key = preview.begin_load().unwrap();
        assert_eq!(preview.fail_load(&key), LoadOutcome::Applied);
        assert!(preview.frame().is_empty());
    }

    #[test]
    fn clip_switch_blanks_overlay_before_reload() {
        let mut preview = loaded_preview();
        preview.seek(0.5);
        assert!(!preview.frame().is_empty());

        preview.set_clip(1);
        assert!(preview.frame().is_empty());

        let key = preview.begin_load().unwrap();
        preview.finish_load(key, vec![Word::new("next", 0.0, 1.0)]);
        assert_eq!(preview.frame().active_text(), Some("next"));
    }

    #[test]
    fn reload_after_edit_rerenders_at_last_time() {
        let mut preview = loaded_preview();
        preview.seek(1.5);
        assert_eq!(preview.frame().active_text(), Some("there"));

        // Captions were edited and saved; the store reloads.
        let key = preview.begin_load().unwrap();
        let edited = vec![
            Word::new("hello", 0.0, 1.0),
            Word::new("again", 1.0, 2.0),
            Word::new("friend", 2.0, 3.0),
        ];
        assert_eq!(preview.finish_load(key, edited), LoadOutcome::Applied);
        assert_eq!(preview.frame().active_text(), Some("again"));
        assert_eq!(preview.time(), 1.5);
    }

    #[test]
    fn no_session_renders_empty() {
        let mut preview = Preview::new();
        preview.seek(1.0);
        assert!(preview.frame().is_empty());
    }
}
