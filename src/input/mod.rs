// src/input/mod.rs  -  Key source capability traits + adapter registry
//
// Three independently timed views of the keyboard feed the picker:
//   KeyMapSource    : raw modifier + held-key snapshot (level triggered)
//   TypingSource    : debounced keystrokes, at most one per call
//   NonRepeatSource : keys newly down since the last call (edge triggered)
// plus VariableStore for the one persistent setting the decoder reads.
//
// Sources are polled one after the other with no attempt to snapshot them
// atomically.  A key released between two queries is simply missed for
// that cycle; no locking is added to hide it.
pub mod noisy;
#[cfg(any(feature = "tui", test))]
pub mod repeat;
pub mod script;
#[cfg(feature = "tui")]
pub mod terminal;
pub mod variables;

use crate::keys::{KeyCode, KeySet, ModifierMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("key source unavailable")]
    Unavailable,
    #[error("variable {0:?} not found")]
    NotFound(String),
    #[error("session script exhausted")]
    Exhausted,
    #[error("terminal input: {0}")]
    Io(#[from] std::io::Error),
}

/// One view of the keyboard at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub modifiers: ModifierMap,
    pub keys:      KeySet,
}

impl KeySnapshot {
    pub fn new(modifiers: ModifierMap, keys: KeySet) -> Self { Self { modifiers, keys } }
}

/// A single debounced keystroke.  `key` is None when nothing was typed;
/// `modifiers` is still reported so held modifiers are visible every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingEvent {
    pub modifiers: ModifierMap,
    pub key:       Option<KeyCode>,
    pub ch:        Option<char>,
}

impl TypingEvent {
    /// The keystroke as a key set of zero or one keys
    pub fn keys(&self) -> KeySet {
        self.key.map(KeySet::single).unwrap_or_default()
    }
}

/// Raw key map aggregator
pub trait KeyMapSource {
    fn key_strokes(&mut self) -> Result<KeySnapshot, InputError>;
}

/// Typing stream (debounced, auto-repeat aware)
pub trait TypingSource {
    fn next_keystroke(&mut self) -> TypingEvent;
}

/// Non-repeating key stream
pub trait NonRepeatSource {
    fn edge_keys(&mut self) -> Result<KeySnapshot, InputError>;
}

/// Persistent firmware variables
pub trait VariableStore {
    fn read_u32(&self, name: &str) -> Result<u32, InputError>;
}

/// The adapters a picker session is built from
pub struct InputSources {
    pub key_map:    Box<dyn KeyMapSource>,
    pub typing:     Box<dyn TypingSource>,
    pub non_repeat: Box<dyn NonRepeatSource>,
}

/// Factory: build the configured input sources, wrapping the raw source in
/// fault injection when `fault_rate > 0`.
pub fn create_sources(cfg: &crate::config::AppConfig) -> anyhow::Result<InputSources> {
    use crate::config::AdapterType;

    let mut sources = match cfg.adapter {
        AdapterType::Script => {
            let path = cfg.script.as_ref()
                .ok_or_else(|| anyhow::anyhow!("adapter = \"script\" needs --script <PATH>"))?;
            script::Session::load(path)?.into_sources()
        }
        AdapterType::Terminal => {
            #[cfg(feature = "tui")]
            { terminal::sources()? }
            #[cfg(not(feature = "tui"))]
            { anyhow::bail!("adapter = \"terminal\" but this build has no terminal support, use --script") }
        }
    };

    if cfg.fault_rate > 0.0 {
        log::info!("[input] injecting key map faults at rate {:.2}", cfg.fault_rate);
        sources.key_map = Box::new(noisy::FaultyKeyMap::new(sources.key_map, cfg.fault_rate));
    }
    Ok(sources)
}
