// src/picker/boot_args.rs  -  Append-only boot argument line
use std::fmt;

/// Capacity of the boot argument line handed to the OS loader
pub const BOOT_LINE_LENGTH: usize = 1024;

/// Fixed-capacity, space-separated boot argument line.  Tokens are only
/// ever appended, and hotkey handlers check for presence first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootArgs {
    line: heapless::String<BOOT_LINE_LENGTH>,
}

impl BootArgs {
    pub fn new() -> Self { Self::default() }

    /// Build from an initial line; anything past capacity is dropped with a warning
    pub fn from_line(line: &str) -> Self {
        let mut args = Self::new();
        for tok in line.split_ascii_whitespace() {
            if !args.append(tok) { break; }
        }
        args
    }

    /// Token-exact lookup: a word equal to `name` or of the form `name=value`
    pub fn has_argument(&self, name: &str) -> bool {
        self.line.split_ascii_whitespace().any(|word| {
            word == name
                || word.strip_prefix(name).is_some_and(|rest| rest.starts_with('='))
        })
    }

    /// Plain substring search over the whole line
    pub fn contains(&self, fragment: &str) -> bool {
        self.line.contains(fragment)
    }

    /// Append a token, space separated.  Returns false (line untouched)
    /// when it would not fit.
    pub fn append(&mut self, token: &str) -> bool {
        let sep = usize::from(!self.line.is_empty());
        if self.line.len() + sep + token.len() > BOOT_LINE_LENGTH {
            log::warn!("[boot-args] no room for {token:?} ({} bytes used)", self.line.len());
            return false;
        }
        if sep == 1 && self.line.push(' ').is_err() { return false; }
        self.line.push_str(token).is_ok()
    }

    /// Append `token` unless `has_argument(token)`; true if it was added
    pub fn ensure_argument(&mut self, token: &str) -> bool {
        if self.has_argument(token) { return false; }
        self.append(token)
    }

    /// Append `token` unless the line already contains it anywhere
    pub fn ensure_fragment(&mut self, token: &str) -> bool {
        if self.contains(token) { return false; }
        self.append(token)
    }

    pub fn as_str(&self) -> &str { self.line.as_str() }
}

impl fmt::Display for BootArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
