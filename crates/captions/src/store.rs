use crate::session::ClipKey;
use crate::types::Word;

/// Words for the currently previewed clip, tagged with the load that
/// produced them.
///
/// Content is only handed out for a matching key, so a clip switch
/// suppresses the previous clip's words immediately, before the next load
/// lands, instead of flashing them at the new position. Replacement is
/// wholesale; a render never observes a partially updated sequence.
#[derive(Debug, Default)]
pub struct WordStore {
    words: Vec<Word>,
    loaded_for: Option<ClipKey>,
}

impl WordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, key: ClipKey, words: Vec<Word>) {
        self.words = words;
        self.loaded_for = Some(key);
    }

    /// Failed loads reset to empty, never to stale words.
    pub fn clear(&mut self) {
        self.words.clear();
        self.loaded_for = None;
    }

    pub fn words_for(&self, key: &ClipKey) -> &[Word] {
        if self.loaded_for.as_ref() == Some(key) {
            &self.words
        } else {
            &[]
        }
    }

    pub fn loaded_for(&self) -> Option<&ClipKey> {
        self.loaded_for.as_ref()
    }
}
