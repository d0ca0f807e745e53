// src/keys/codes.rs  -  HID keyboard usages (Apple encoding: 0x7000 | usage)
use std::fmt;

/// A keyboard key as reported by the key map aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyCode(pub u16);

const fn usage(id: u16) -> KeyCode { KeyCode(0x7000 | id) }

impl KeyCode {
    pub const A:          KeyCode = usage(0x04);
    pub const C:          KeyCode = usage(0x06);
    pub const K:          KeyCode = usage(0x0E);
    pub const P:          KeyCode = usage(0x13);
    pub const R:          KeyCode = usage(0x15);
    pub const S:          KeyCode = usage(0x16);
    pub const V:          KeyCode = usage(0x19);
    pub const X:          KeyCode = usage(0x1B);
    pub const Z:          KeyCode = usage(0x1D);
    pub const ONE:        KeyCode = usage(0x1E);
    pub const NINE:       KeyCode = usage(0x26);
    pub const ZERO:       KeyCode = usage(0x27);
    pub const ENTER:      KeyCode = usage(0x28);
    pub const ESCAPE:     KeyCode = usage(0x29);
    pub const BACKSPACE:  KeyCode = usage(0x2A);
    pub const TAB:        KeyCode = usage(0x2B);
    pub const SPACE:      KeyCode = usage(0x2C);
    pub const MINUS:      KeyCode = usage(0x2D);
    pub const F1:         KeyCode = usage(0x3A);
    pub const F5:         KeyCode = usage(0x3E);
    pub const F12:        KeyCode = usage(0x45);
    pub const HOME:       KeyCode = usage(0x4A);
    pub const PAGE_UP:    KeyCode = usage(0x4B);
    pub const END:        KeyCode = usage(0x4D);
    pub const PAGE_DOWN:  KeyCode = usage(0x4E);
    pub const RIGHT:      KeyCode = usage(0x4F);
    pub const LEFT:       KeyCode = usage(0x50);
    pub const DOWN:       KeyCode = usage(0x51);
    pub const UP:         KeyCode = usage(0x52);
    pub const PAD_MINUS:  KeyCode = usage(0x56);
    pub const PAD_ENTER:  KeyCode = usage(0x58);
    pub const F13:        KeyCode = usage(0x68);
    pub const F24:        KeyCode = usage(0x73);
    pub const RETURN:     KeyCode = usage(0x9E);

    /// Letter key by ASCII letter (case-insensitive)
    pub fn letter(c: char) -> Option<KeyCode> {
        let c = c.to_ascii_uppercase();
        c.is_ascii_uppercase()
            .then(|| KeyCode(Self::A.0 + (c as u16 - 'A' as u16)))
    }

    /// Digit key by ASCII digit; '0' sits after '9' in the usage table
    pub fn digit(c: char) -> Option<KeyCode> {
        match c {
            '0'       => Some(Self::ZERO),
            '1'..='9' => Some(KeyCode(Self::ONE.0 + (c as u16 - '1' as u16))),
            _         => None,
        }
    }

    /// Function key F1..=F24
    pub fn function(n: u8) -> Option<KeyCode> {
        match n {
            1..=12  => Some(KeyCode(Self::F1.0  + (n as u16 - 1))),
            13..=24 => Some(KeyCode(Self::F13.0 + (n as u16 - 13))),
            _       => None,
        }
    }

    /// Parse a key name as used in session scripts and config
    /// ("R", "7", "F5", "Escape", "PadMinus", ...).
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() { return Self::letter(c); }
            if c.is_ascii_digit()      { return Self::digit(c); }
            if c == '-'                { return Some(Self::MINUS); }
            if c == ' '                { return Some(Self::SPACE); }
        }

        let lower = name.to_ascii_lowercase();
        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            return Self::function(n);
        }

        let code = match lower.as_str() {
            "enter"                  => Self::ENTER,
            "return"                 => Self::RETURN,
            "padenter" | "pad_enter" => Self::PAD_ENTER,
            "escape" | "esc"         => Self::ESCAPE,
            "backspace"              => Self::BACKSPACE,
            "tab"                    => Self::TAB,
            "space"                  => Self::SPACE,
            "minus"                  => Self::MINUS,
            "padminus" | "pad_minus" => Self::PAD_MINUS,
            "home"                   => Self::HOME,
            "end"                    => Self::END,
            "pageup" | "pgup"        => Self::PAGE_UP,
            "pagedown" | "pgdn"      => Self::PAGE_DOWN,
            "up"                     => Self::UP,
            "down"                   => Self::DOWN,
            "left"                   => Self::LEFT,
            "right"                  => Self::RIGHT,
            _                        => return None,
        };
        Some(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}
