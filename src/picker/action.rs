// src/picker/action.rs  -  Decoded picker actions
use bitflags::bitflags;
use std::fmt;

/// What the user asked the picker to do on this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PickerAction {
    #[default]
    NoAction,
    /// Direct entry selection: '1'..'9' → 0..=8, 'A'..'Z' → 9..=34
    Index(u8),
    /// Function key F1..=F24 → 1..=24
    Functional(u8),
    Continue,
    /// Reload the entry list (Escape / '0')
    Aborted,
    /// Show or toggle auxiliary entries (Space)
    More,
    Timeout,
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
    SwitchContext,
    VoiceOver,
    /// A boot-args hotkey fired; nothing to navigate but the UI may redraw
    Internal,
    /// Something changed (typed character or modifiers) with no discrete action
    Extra,
    TypingClearAll,
    TypingBackspace,
    TypingLeft,
    TypingRight,
}

impl PickerAction {
    pub fn is_none(self) -> bool { self == PickerAction::NoAction }

    /// Actions after which a picker session stops waiting
    pub fn ends_session(self) -> bool {
        matches!(self, PickerAction::Continue | PickerAction::Aborted | PickerAction::Timeout)
    }
}

impl fmt::Display for PickerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerAction::Index(i)      => write!(f, "Index({i})"),
            PickerAction::Functional(n) => write!(f, "F{n}"),
            other                       => write!(f, "{other:?}"),
        }
    }
}

bitflags! {
    /// Advisory modifier state, reported alongside (not instead of) the action
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PickerModifiers: u8 {
        /// Control (optionally with Shift) and nothing else
        const SET_DEFAULT            = 1 << 0;
        /// Shift, whatever else is held
        const REVERSE_SWITCH_CONTEXT = 1 << 1;
    }
}

/// One decoded poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickerKeyInfo {
    pub action:      PickerAction,
    pub modifiers:   PickerModifiers,
    /// Printable ASCII typed this cycle (typing mode only)
    pub typing_char: Option<char>,
}

impl fmt::Display for PickerKeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        if !self.modifiers.is_empty() {
            write!(f, " {:?}", self.modifiers)?;
        }
        if let Some(c) = self.typing_char {
            write!(f, " char={c:?}")?;
        }
        Ok(())
    }
}
