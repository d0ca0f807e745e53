// src/input/terminal.rs  -  Terminal keyboard adapter (crossterm raw mode)
//
// Terminals only deliver press/repeat events, never releases.  A key is
// treated as held for a while after its last press or auto-repeat, which
// approximates the level-triggered view of a real key map.  A fresh press
// must outlive the OS auto-repeat delay so a continuously held key never
// drops out before its first repeat; once repeats arrive the window shrinks
// so a release is noticed quickly.  Two taps of one key inside the first
// window merge into one press on the edge stream.  All three sources share
// one event reader; whichever is queried first drains it.
use super::repeat::KeyRepeatFilter;
use super::{InputError, InputSources, KeyMapSource, KeySnapshot, TypingEvent, TypingSource};
use crate::keys::{KeyCode, KeySet, ModifierMap};
use crossterm::event::{self, Event, KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Longer than common auto-repeat initial delays (250-660 ms)
const FIRST_PRESS_HOLD: Duration = Duration::from_millis(700);
/// Comfortably above common auto-repeat intervals
const REPEAT_HOLD:      Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy)]
struct Held {
    at:        Instant,
    repeating: bool,
}

impl Held {
    fn until(&self) -> Instant {
        self.at + if self.repeating { REPEAT_HOLD } else { FIRST_PRESS_HOLD }
    }
}

struct TerminalKeys {
    held:            HashMap<KeyCode, Held>,
    modifiers:       ModifierMap,
    modifiers_until: Instant,
    typed:           VecDeque<TypingEvent>,
}

impl TerminalKeys {
    fn new(now: Instant) -> Self {
        Self {
            held:            HashMap::new(),
            modifiers:       ModifierMap::empty(),
            modifiers_until: now,
            typed:           VecDeque::new(),
        }
    }

    fn pump(&mut self) -> Result<(), InputError> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Release { continue; }
                self.record(k, Instant::now());
            }
        }
        Ok(())
    }

    fn record(&mut self, k: KeyEvent, now: Instant) {
        let (key, ch, modifiers) = translate(k);
        log::trace!("[terminal] {:?} -> key={:?} ch={:?} mods={:?}", k.code, key, ch, modifiers);
        let until = match key {
            Some(key) => {
                let repeating = self.held.get(&key).is_some_and(|h| now < h.until());
                let held = Held { at: now, repeating };
                self.held.insert(key, held);
                held.until()
            }
            None => now + REPEAT_HOLD,
        };
        self.modifiers       = modifiers;
        self.modifiers_until = until;
        if key.is_some() || ch.is_some() {
            self.typed.push_back(TypingEvent { modifiers, key, ch });
        }
    }

    fn snapshot(&self, now: Instant) -> KeySnapshot {
        let keys: KeySet = self.held.iter()
            .filter(|(_, h)| now < h.until())
            .map(|(k, _)| *k)
            .collect();
        KeySnapshot::new(self.held_modifiers(now), keys)
    }

    fn held_modifiers(&self, now: Instant) -> ModifierMap {
        if now < self.modifiers_until {
            self.modifiers
        } else {
            ModifierMap::empty()
        }
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Map a terminal key event onto a HID usage, typed character and modifiers
fn translate(k: KeyEvent) -> (Option<KeyCode>, Option<char>, ModifierMap) {
    let mut mods = ModifierMap::empty();
    if k.modifiers.contains(KeyModifiers::SHIFT)   { mods |= ModifierMap::LEFT_SHIFT; }
    if k.modifiers.contains(KeyModifiers::CONTROL) { mods |= ModifierMap::LEFT_CONTROL; }
    if k.modifiers.contains(KeyModifiers::ALT)     { mods |= ModifierMap::LEFT_OPTION; }
    if k.modifiers.contains(KeyModifiers::SUPER)   { mods |= ModifierMap::LEFT_COMMAND; }

    let key = match k.code {
        TermKey::Char(c) => {
            if c.is_ascii_uppercase() { mods |= ModifierMap::LEFT_SHIFT; }
            let key = KeyCode::letter(c)
                .or_else(|| KeyCode::digit(c))
                .or(match c { '-' => Some(KeyCode::MINUS), ' ' => Some(KeyCode::SPACE), _ => None });
            return (key, Some(c), mods);
        }
        TermKey::Enter     => KeyCode::ENTER,
        TermKey::Esc       => KeyCode::ESCAPE,
        TermKey::Backspace => KeyCode::BACKSPACE,
        TermKey::Tab       => KeyCode::TAB,
        TermKey::BackTab   => { mods |= ModifierMap::LEFT_SHIFT; KeyCode::TAB }
        TermKey::Up        => KeyCode::UP,
        TermKey::Down      => KeyCode::DOWN,
        TermKey::Left      => KeyCode::LEFT,
        TermKey::Right     => KeyCode::RIGHT,
        TermKey::Home      => KeyCode::HOME,
        TermKey::End       => KeyCode::END,
        TermKey::PageUp    => KeyCode::PAGE_UP,
        TermKey::PageDown  => KeyCode::PAGE_DOWN,
        TermKey::F(n)      => match KeyCode::function(n) {
            Some(f) => f,
            None    => return (None, None, mods),
        },
        _ => return (None, None, mods),
    };
    (Some(key), None, mods)
}

struct TerminalKeyMap(Rc<RefCell<TerminalKeys>>);

impl KeyMapSource for TerminalKeyMap {
    fn key_strokes(&mut self) -> Result<KeySnapshot, InputError> {
        let mut keys = self.0.borrow_mut();
        keys.pump()?;
        Ok(keys.snapshot(Instant::now()))
    }
}

struct TerminalTyping(Rc<RefCell<TerminalKeys>>);

impl TypingSource for TerminalTyping {
    fn next_keystroke(&mut self) -> TypingEvent {
        let mut keys = self.0.borrow_mut();
        if let Err(e) = keys.pump() {
            log::warn!("[terminal] event read failed: {e}");
        }
        let now = Instant::now();
        keys.typed.pop_front().unwrap_or(TypingEvent {
            modifiers: keys.held_modifiers(now),
            ..Default::default()
        })
    }
}

/// Enter raw mode and build the three sources over one event reader.
/// Raw mode is left when the last source is dropped.
pub fn sources() -> anyhow::Result<InputSources> {
    use anyhow::Context;
    crossterm::terminal::enable_raw_mode().context("Enabling terminal raw mode")?;
    log::info!("[terminal] raw mode on (hold {:?} first press, {:?} repeating)", FIRST_PRESS_HOLD, REPEAT_HOLD);

    let shared = Rc::new(RefCell::new(TerminalKeys::new(Instant::now())));
    Ok(InputSources {
        key_map:    Box::new(TerminalKeyMap(Rc::clone(&shared))),
        typing:     Box::new(TerminalTyping(Rc::clone(&shared))),
        non_repeat: Box::new(KeyRepeatFilter::new(Box::new(TerminalKeyMap(shared)))),
    })
}
