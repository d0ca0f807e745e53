// src/picker/context.rs  -  Per-session hotkey state
use super::action::PickerModifiers;
use super::kb_debug::KbDebug;
use crate::input::{InputSources, KeyMapSource, NonRepeatSource, TypingSource, VariableStore};
use std::time::Duration;

/// Default busy-wait between poll iterations
pub const MINIMAL_CPU_DELAY: Duration = Duration::from_micros(10);

/// Everything one boot picker session polls.  Built when the picker
/// starts and dropped when it ends; one session never shares it.
pub struct HotkeyContext {
    pub(super) key_map:    Box<dyn KeyMapSource>,
    pub(super) typing:     Box<dyn TypingSource>,
    pub(super) non_repeat: Box<dyn NonRepeatSource>,
    pub(super) variables:  Box<dyn VariableStore>,
    pub(super) kb_debug:   Option<Box<dyn KbDebug>>,
    /// Advisory modifiers last handed to the caller
    pub(super) last_modifiers: PickerModifiers,

    /// Honour CMD+V / CMD+K / CMD+S style boot-args hotkeys
    pub poll_apple_hot_keys: bool,
    /// Settle time before the boot-time combination is sampled
    pub takeoff_delay:       Duration,
    /// Sleep between poll-loop iterations
    pub poll_delay:          Duration,
}

impl HotkeyContext {
    pub fn new(sources: InputSources, variables: Box<dyn VariableStore>) -> Self {
        log::debug!("[hotkeys] init");
        Self {
            key_map:             sources.key_map,
            typing:              sources.typing,
            non_repeat:          sources.non_repeat,
            variables,
            kb_debug:            None,
            last_modifiers:      PickerModifiers::empty(),
            poll_apple_hot_keys: true,
            takeoff_delay:       Duration::ZERO,
            poll_delay:          MINIMAL_CPU_DELAY,
        }
    }

    pub fn set_kb_debug(&mut self, hook: Box<dyn KbDebug>) {
        self.kb_debug = Some(hook);
    }

    pub fn kb_debug(&self) -> Option<&dyn KbDebug> {
        self.kb_debug.as_deref()
    }
}
