// src/keys/keyset.rs  -  Bounded set of held keys
use super::KeyCode;

/// Worst-case key rollover the aggregator reports in one snapshot
pub const KEY_MAP_SIZE: usize = 32;

/// Keys currently held. Order is not significant; capacity overflow is
/// dropped on insert, never reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: heapless::Vec<KeyCode, KEY_MAP_SIZE>,
}

impl KeySet {
    pub const fn new() -> Self { Self { keys: heapless::Vec::new() } }

    pub fn single(key: KeyCode) -> Self {
        let mut set = Self::new();
        set.insert(key);
        set
    }

    /// Insert a key; duplicates are ignored. Returns false if the set is full.
    pub fn insert(&mut self, key: KeyCode) -> bool {
        if self.contains(key) { return true; }
        self.keys.push(key).is_ok()
    }

    pub fn contains(&self, key: KeyCode) -> bool { self.keys.contains(&key) }

    /// The held key when exactly one is held
    pub fn sole(&self) -> Option<KeyCode> {
        match self.keys.as_slice() {
            [only] => Some(*only),
            _      => None,
        }
    }

    pub fn len(&self)      -> usize { self.keys.len() }
    pub fn is_empty(&self) -> bool  { self.keys.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ { self.keys.iter().copied() }
}

impl FromIterator<KeyCode> for KeySet {
    fn from_iter<I: IntoIterator<Item = KeyCode>>(iter: I) -> Self {
        let mut set = Self::new();
        for k in iter { set.insert(k); }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_silently_truncated() {
        let set: KeySet = (0..40u16).map(|i| KeyCode(0x7000 + i)).collect();
        assert_eq!(set.len(), KEY_MAP_SIZE);
        assert!(set.contains(KeyCode(0x7000)));
        assert!(!set.contains(KeyCode(0x7000 + 39)));
    }

    #[test]
    fn sole_only_for_single_key() {
        assert_eq!(KeySet::new().sole(), None);
        assert_eq!(KeySet::single(KeyCode::TAB).sole(), Some(KeyCode::TAB));
        let two: KeySet = [KeyCode::TAB, KeyCode::UP].into_iter().collect();
        assert_eq!(two.sole(), None);
    }

    #[test]
    fn duplicates_collapse() {
        let set: KeySet = [KeyCode::R, KeyCode::R].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
