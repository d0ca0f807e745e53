// src/input/repeat.rs  -  Non-repeating key filter over a raw key map
use super::{InputError, KeyMapSource, KeySnapshot, NonRepeatSource};
use crate::keys::KeySet;

/// Reports each key once, on the poll where it first appears held.
/// A key must be seen released before it is reported again.
pub struct KeyRepeatFilter {
    source: Box<dyn KeyMapSource>,
    held:   KeySet,
}

impl KeyRepeatFilter {
    pub fn new(source: Box<dyn KeyMapSource>) -> Self {
        Self { source, held: KeySet::new() }
    }
}

impl NonRepeatSource for KeyRepeatFilter {
    fn edge_keys(&mut self) -> Result<KeySnapshot, InputError> {
        let snap = self.source.key_strokes()?;
        let down: KeySet = snap.keys.iter().filter(|k| !self.held.contains(*k)).collect();
        self.held = snap.keys;
        Ok(KeySnapshot::new(snap.modifiers, down))
    }
}
