// src/keys/mod.rs  -  Key codes, modifier map, bounded key set
pub mod codes;
pub mod keyset;
pub mod modifiers;

pub use codes::KeyCode;
pub use keyset::KeySet;
pub use modifiers::ModifierMap;
