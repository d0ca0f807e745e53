// src/keys/modifiers.rs  -  Physical modifier bitmask + composite helpers
use bitflags::bitflags;

bitflags! {
    /// Modifier keys held, one bit per physical side
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierMap: u16 {
        const LEFT_CONTROL  = 1 << 0;
        const LEFT_SHIFT    = 1 << 1;
        const LEFT_OPTION   = 1 << 2;
        const LEFT_COMMAND  = 1 << 3;
        const RIGHT_CONTROL = 1 << 4;
        const RIGHT_SHIFT   = 1 << 5;
        const RIGHT_OPTION  = 1 << 6;
        const RIGHT_COMMAND = 1 << 7;

        const CONTROL = Self::LEFT_CONTROL.bits() | Self::RIGHT_CONTROL.bits();
        const SHIFT   = Self::LEFT_SHIFT.bits()   | Self::RIGHT_SHIFT.bits();
        const OPTION  = Self::LEFT_OPTION.bits()  | Self::RIGHT_OPTION.bits();
        const COMMAND = Self::LEFT_COMMAND.bits() | Self::RIGHT_COMMAND.bits();
    }
}

impl ModifierMap {
    pub fn has_command(self) -> bool { self.intersects(Self::COMMAND) }
    pub fn has_option(self)  -> bool { self.intersects(Self::OPTION) }
    pub fn has_control(self) -> bool { self.intersects(Self::CONTROL) }
    pub fn has_shift(self)   -> bool { self.intersects(Self::SHIFT) }

    /// True when every held modifier is within `allowed` (nothing held counts)
    pub fn only_within(self, allowed: ModifierMap) -> bool {
        self.difference(allowed).is_empty()
    }

    /// Parse a user-facing modifier name ("command", "left_shift", "ctrl", ...).
    /// Bare names map to the left-hand key.  The generated `from_name` only
    /// accepts the constant names.
    pub fn parse_name(name: &str) -> Option<ModifierMap> {
        let m = match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "control" | "ctrl" | "left_control" | "left_ctrl" => Self::LEFT_CONTROL,
            "right_control" | "right_ctrl"                    => Self::RIGHT_CONTROL,
            "shift" | "left_shift"                            => Self::LEFT_SHIFT,
            "right_shift"                                     => Self::RIGHT_SHIFT,
            "option" | "alt" | "left_option" | "left_alt"     => Self::LEFT_OPTION,
            "right_option" | "right_alt"                      => Self::RIGHT_OPTION,
            "command" | "cmd" | "left_command" | "left_cmd"   => Self::LEFT_COMMAND,
            "right_command" | "right_cmd"                     => Self::RIGHT_COMMAND,
            _                                                 => return None,
        };
        Some(m)
    }
}
