// src/input/script.rs  -  Scripted replay of key snapshots (TOML session files)
//
// A session is a list of frames; each frame is what the three streams
// report on one poll cycle:
//
//   [[frame]]
//   modifiers = ["command"]        # raw + typing + edge modifiers
//   keys      = ["V"]              # raw held keys
//   typed     = "A"                # typing stream keystroke (key name)
//   char      = "a"                # typing stream character
//   edges     = ["Space"]          # non-repeat keys
//   fail      = false              # raw query fails this cycle
//   repeat    = 3                  # replay this frame N times
//
// Frames are split into three independent queues so each source advances
// only when it is queried.  Once exhausted the raw source keeps reporting
// its last snapshot; typing and edge sources report nothing new.
use super::{InputError, InputSources, KeyMapSource, KeySnapshot, NonRepeatSource, TypingEvent, TypingSource};
use crate::keys::{KeyCode, KeySet, ModifierMap};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;

// ── Session file ─────────────────────────────────────────────────────────────
#[derive(Debug, Deserialize, Default)]
struct SessionFile {
    #[serde(default)]
    frame: Vec<FrameEntry>,
}

#[derive(Debug, Deserialize, Default)]
struct FrameEntry {
    #[serde(default)]
    modifiers: Vec<String>,
    #[serde(default)]
    keys:      Vec<String>,
    typed:     Option<String>,
    #[serde(rename = "char")]
    ch:        Option<char>,
    #[serde(default)]
    edges:     Vec<String>,
    #[serde(default)]
    fail:      bool,
    repeat:    Option<u32>,
}

/// One decoded poll cycle of a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub raw:    Option<KeySnapshot>,   // None = query fails
    pub typing: TypingEvent,
    pub edges:  KeySnapshot,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub frames: Vec<Frame>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Reading session script {:?}", path))?;
        Self::parse(&raw).with_context(|| format!("Parsing session script {:?}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let file: SessionFile = toml::from_str(raw)?;
        let mut frames = Vec::new();
        for (i, entry) in file.frame.iter().enumerate() {
            let frame = entry.resolve().with_context(|| format!("frame #{}", i + 1))?;
            for _ in 0..entry.repeat.unwrap_or(1) {
                frames.push(frame.clone());
            }
        }
        log::info!("[script] loaded {} frames", frames.len());
        Ok(Self { frames })
    }

    pub fn into_sources(self) -> InputSources {
        let mut raw    = Vec::with_capacity(self.frames.len());
        let mut typing = Vec::with_capacity(self.frames.len());
        let mut edges  = Vec::with_capacity(self.frames.len());
        for f in self.frames {
            raw.push(f.raw);
            typing.push(f.typing);
            edges.push(f.edges);
        }
        InputSources {
            key_map:    Box::new(ScriptedKeyMap::with_failures(raw)),
            typing:     Box::new(ScriptedTyping::new(typing)),
            non_repeat: Box::new(ScriptedEdges::new(edges)),
        }
    }
}

impl FrameEntry {
    fn resolve(&self) -> Result<Frame> {
        let mut modifiers = ModifierMap::empty();
        for name in &self.modifiers {
            modifiers |= ModifierMap::parse_name(name)
                .ok_or_else(|| anyhow!("unknown modifier {name:?}"))?;
        }
        let keys  = parse_keys(&self.keys)?;
        let edges = parse_keys(&self.edges)?;
        let key = match &self.typed {
            Some(name) => Some(parse_key(name)?),
            None       => None,
        };
        let ch = self.ch.or_else(|| {
            // A printable single-character key name types itself
            self.typed.as_deref()
                .filter(|n| n.chars().count() == 1)
                .and_then(|n| n.chars().next())
        });

        Ok(Frame {
            raw:    (!self.fail).then(|| KeySnapshot::new(modifiers, keys)),
            typing: TypingEvent { modifiers, key, ch },
            edges:  KeySnapshot::new(modifiers, edges),
        })
    }
}

fn parse_key(name: &str) -> Result<KeyCode> {
    KeyCode::from_name(name).ok_or_else(|| anyhow!("unknown key {name:?}"))
}

fn parse_keys(names: &[String]) -> Result<KeySet> {
    names.iter().map(|n| parse_key(n)).collect()
}

// ── Scripted sources ─────────────────────────────────────────────────────────
/// Raw key map replay
pub struct ScriptedKeyMap {
    frames: VecDeque<Option<KeySnapshot>>,
    last:   Option<KeySnapshot>,
}

impl ScriptedKeyMap {
    #[cfg(test)]
    pub fn new(frames: Vec<KeySnapshot>) -> Self {
        Self::with_failures(frames.into_iter().map(Some).collect())
    }

    /// `None` entries fail the query for that cycle
    pub fn with_failures(frames: Vec<Option<KeySnapshot>>) -> Self {
        Self { frames: frames.into(), last: None }
    }
}

impl KeyMapSource for ScriptedKeyMap {
    fn key_strokes(&mut self) -> Result<KeySnapshot, InputError> {
        match self.frames.pop_front() {
            Some(Some(snap)) => {
                self.last = Some(snap.clone());
                Ok(snap)
            }
            Some(None) => Err(InputError::Unavailable),
            None => self.last.clone().ok_or(InputError::Exhausted),
        }
    }
}

/// Typing stream replay
pub struct ScriptedTyping {
    events:    VecDeque<TypingEvent>,
    modifiers: ModifierMap,
}

impl ScriptedTyping {
    pub fn new(events: Vec<TypingEvent>) -> Self {
        Self { events: events.into(), modifiers: ModifierMap::empty() }
    }
}

impl TypingSource for ScriptedTyping {
    fn next_keystroke(&mut self) -> TypingEvent {
        match self.events.pop_front() {
            Some(ev) => {
                self.modifiers = ev.modifiers;
                ev
            }
            None => TypingEvent { modifiers: self.modifiers, ..Default::default() },
        }
    }
}

/// Non-repeating key replay
pub struct ScriptedEdges {
    frames:    VecDeque<KeySnapshot>,
    modifiers: ModifierMap,
}

impl ScriptedEdges {
    pub fn new(frames: Vec<KeySnapshot>) -> Self {
        Self { frames: frames.into(), modifiers: ModifierMap::empty() }
    }
}

impl NonRepeatSource for ScriptedEdges {
    fn edge_keys(&mut self) -> Result<KeySnapshot, InputError> {
        match self.frames.pop_front() {
            Some(snap) => {
                self.modifiers = snap.modifiers;
                Ok(snap)
            }
            None => Ok(KeySnapshot::new(self.modifiers, KeySet::new())),
        }
    }
}
