// src/picker/decode.rs  -  One poll cycle: three key streams → one picker action
//
// Order of evaluation:
//   1. advisory modifiers (always reported, even alongside an action)
//   2. boot-args combinations on the raw key map (may mark Internal)
//   3. typing character capture
//   4. DECODE_RULES, first match returns
//   5. Extra for a bare typed character, else Internal / NoAction
//
// Edge-triggered rules (reload, auxiliary, voice-over) come before the
// level-triggered ones so a held key cannot re-fire them every poll.
// Typing edits come before navigation on the same physical keys.
// Navigation only considers a sole keystroke; multi-key rollover is
// ignored there while combinations above still see every held key.
use super::action::{PickerAction, PickerKeyInfo, PickerModifiers};
use super::boot_args::BootArgs;
use super::context::HotkeyContext;
use crate::input::{KeySnapshot, TypingEvent, VariableStore};
use crate::keys::{KeyCode, ModifierMap};

/// Firmware variable holding the security policy bits
pub const CSR_ACTIVE_CONFIG: &str = "csr-active-config";
/// Policy bit allowing unrestricted NVRAM (required for slide=0)
pub const CSR_ALLOW_UNRESTRICTED_NVRAM: u32 = 1 << 6;

/// What the three streams reported on one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub raw:    KeySnapshot,
    pub typing: TypingEvent,
    pub edges:  KeySnapshot,
    pub filter_for_typing: bool,
}

impl Frame {
    /// Modifiers that qualify keystrokes: the typing stream's view
    fn modifiers(&self) -> ModifierMap { self.typing.modifiers }

    /// The keystroke when exactly one key was typed this cycle
    fn sole_key(&self) -> Option<KeyCode> { self.typing.keys().sole() }

    fn typed(&self, key: KeyCode) -> bool { self.typing.key == Some(key) }

    fn edge(&self, key: KeyCode) -> bool { self.edges.keys.contains(key) }

    fn navigating(&self) -> bool { !self.filter_for_typing }
}

/// Set-default needs Control, optionally Shift, nothing else.
/// Reverse-switch-context is Shift regardless of anything else.
pub fn advisory_modifiers(mods: ModifierMap) -> PickerModifiers {
    let mut out = PickerModifiers::empty();
    if mods.has_control() && mods.only_within(ModifierMap::CONTROL | ModifierMap::SHIFT) {
        out |= PickerModifiers::SET_DEFAULT;
    }
    if mods.has_shift() {
        out |= PickerModifiers::REVERSE_SWITCH_CONTEXT;
    }
    out
}

// ── Boot-args combinations ────────────────────────────────────────────────────
/// CMD+V, CMD+C+MINUS, CMD+K and CMD+S[+MINUS] on the raw key map.  Each is
/// checked once per call and only appends a token that is not present yet.
/// Returns true if any combination was held.
pub fn apply_boot_arg_combos(raw: &KeySnapshot, args: &mut BootArgs, vars: &dyn VariableStore) -> bool {
    if !raw.modifiers.has_command() {
        return false;
    }
    let keys      = &raw.keys;
    let has_minus = keys.contains(KeyCode::MINUS) || keys.contains(KeyCode::PAD_MINUS);
    let mut fired = false;

    if keys.contains(KeyCode::V) {
        if args.ensure_argument("-v") {
            log::info!("[hotkeys] CMD+V means -v");
        }
        fired = true;
    }

    if keys.contains(KeyCode::C) && has_minus {
        if args.ensure_argument("-no_compat_check") {
            log::info!("[hotkeys] CMD+C+MINUS means -no_compat_check");
        }
        fired = true;
    }

    if keys.contains(KeyCode::K) {
        if args.ensure_fragment("kcsuffix=release") {
            log::info!("[hotkeys] CMD+K means kcsuffix=release");
        }
        fired = true;
    }

    if keys.contains(KeyCode::S) {
        // CMD+S+MINUS degrades to plain CMD+S when the policy cannot be read
        // or does not allow unrestricted NVRAM.  Kept as is: the stock
        // loader behaves the same way.
        let zero_slide = has_minus && match vars.read_u32(CSR_ACTIVE_CONFIG) {
            Ok(csr) => csr & CSR_ALLOW_UNRESTRICTED_NVRAM != 0,
            Err(e) => {
                log::debug!("[hotkeys] {CSR_ACTIVE_CONFIG}: {e}");
                false
            }
        };
        if zero_slide {
            if args.ensure_fragment("slide=0") {
                log::info!("[hotkeys] CMD+S+MINUS means slide=0");
            }
        } else if args.ensure_argument("-s") {
            log::info!("[hotkeys] CMD+S means -s");
        }
        fired = true;
    }

    fired
}

// ── Ordered decode rules ─────────────────────────────────────────────────────
pub type RuleFn = fn(&Frame, &mut BootArgs) -> Option<PickerAction>;

pub struct Rule {
    pub name:  &'static str,
    pub apply: RuleFn,
}

/// Evaluated top to bottom; the first rule returning an action wins.
pub const DECODE_RULES: &[Rule] = &[
    Rule { name: "typing-clear-all", apply: typing_clear_all },
    Rule { name: "typing-backspace", apply: typing_backspace },
    Rule { name: "voice-over",       apply: voice_over },
    Rule { name: "reload",           apply: reload },
    Rule { name: "toggle-auxiliary", apply: toggle_auxiliary },
    Rule { name: "switch-context",   apply: switch_context },
    Rule { name: "typing-cursor",    apply: typing_cursor },
    Rule { name: "continue",         apply: continue_select },
    Rule { name: "navigate",         apply: navigate },
    Rule { name: "top-bottom",       apply: top_bottom },
    Rule { name: "functional",       apply: functional },
    Rule { name: "index",            apply: index },
];

fn typing_clear_all(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    (f.filter_for_typing && f.typed(KeyCode::ESCAPE)).then_some(PickerAction::TypingClearAll)
}

fn typing_backspace(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    (f.filter_for_typing && f.typed(KeyCode::BACKSPACE)).then_some(PickerAction::TypingBackspace)
}

fn voice_over(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    (f.modifiers().has_command() && f.edge(KeyCode::F5)).then_some(PickerAction::VoiceOver)
}

fn reload(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    (f.navigating() && (f.edge(KeyCode::ESCAPE) || f.edge(KeyCode::ZERO)))
        .then_some(PickerAction::Aborted)
}

fn toggle_auxiliary(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    (f.navigating() && f.edge(KeyCode::SPACE)).then_some(PickerAction::More)
}

fn switch_context(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    (f.sole_key() == Some(KeyCode::TAB)).then_some(PickerAction::SwitchContext)
}

fn typing_cursor(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    if !f.filter_for_typing { return None; }
    match f.sole_key()? {
        KeyCode::LEFT  => Some(PickerAction::TypingLeft),
        KeyCode::RIGHT => Some(PickerAction::TypingRight),
        _              => None,
    }
}

fn continue_select(f: &Frame, args: &mut BootArgs) -> Option<PickerAction> {
    if !f.navigating() { return None; }
    let mods = f.modifiers();
    if !mods.only_within(ModifierMap::SHIFT | ModifierMap::CONTROL) { return None; }
    if !matches!(f.sole_key()?, KeyCode::ENTER | KeyCode::RETURN | KeyCode::PAD_ENTER) {
        return None;
    }
    // Shift is read at the moment Enter goes down, so Shift+Tab stays usable
    if mods.has_shift() && args.ensure_argument("-x") {
        log::info!("[hotkeys] Shift+Enter means -x");
    }
    Some(PickerAction::Continue)
}

fn navigate(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    if !f.navigating() { return None; }
    match f.sole_key()? {
        KeyCode::UP    => Some(PickerAction::Up),
        KeyCode::DOWN  => Some(PickerAction::Down),
        KeyCode::LEFT  => Some(PickerAction::Left),
        KeyCode::RIGHT => Some(PickerAction::Right),
        _              => None,
    }
}

fn top_bottom(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    if !f.navigating() { return None; }
    match f.sole_key()? {
        KeyCode::PAGE_UP   | KeyCode::HOME => Some(PickerAction::Top),
        KeyCode::PAGE_DOWN | KeyCode::END  => Some(PickerAction::Bottom),
        _                                  => None,
    }
}

fn functional(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    if !f.navigating() || !f.modifiers().is_empty() { return None; }
    let key = f.sole_key()?;
    let n = if (KeyCode::F1..=KeyCode::F12).contains(&key) {
        key.0 - KeyCode::F1.0 + 1
    } else if (KeyCode::F13..=KeyCode::F24).contains(&key) {
        key.0 - KeyCode::F13.0 + 13
    } else {
        return None;
    };
    Some(PickerAction::Functional(n as u8))
}

fn index(f: &Frame, _: &mut BootArgs) -> Option<PickerAction> {
    if !f.navigating() || !f.modifiers().is_empty() { return None; }
    let key = f.sole_key()?;
    let n = if (KeyCode::ONE..=KeyCode::NINE).contains(&key) {
        key.0 - KeyCode::ONE.0
    } else if (KeyCode::A..=KeyCode::Z).contains(&key) {
        key.0 - KeyCode::A.0 + 9
    } else {
        return None;
    };
    Some(PickerAction::Index(n as u8))
}

// ── Frame decode ─────────────────────────────────────────────────────────────
/// Decode one frame.  Deterministic for a given frame and boot-args state;
/// the only outside read is the security policy for CMD+S+MINUS.
pub fn decode_frame(
    frame:       &Frame,
    args:        &mut BootArgs,
    vars:        &dyn VariableStore,
    poll_combos: bool,
) -> PickerKeyInfo {
    let mut info = PickerKeyInfo {
        modifiers: advisory_modifiers(frame.modifiers()),
        ..Default::default()
    };

    let internal = poll_combos
        && frame.navigating()
        && apply_boot_arg_combos(&frame.raw, args, vars);

    if frame.filter_for_typing {
        info.typing_char = frame.typing.ch.filter(|c| (' '..='~').contains(c));
    }

    if let Some((rule, action)) = DECODE_RULES.iter()
        .find_map(|r| (r.apply)(frame, args).map(|a| (r.name, a)))
    {
        log::trace!("[decode] rule {rule} -> {action}");
        info.action = action;
        return info;
    }

    info.action = if info.typing_char.is_some() {
        PickerAction::Extra
    } else if internal {
        PickerAction::Internal
    } else {
        PickerAction::NoAction
    };
    info
}

impl HotkeyContext {
    /// Query all three streams and decode one cycle.  Source failures are
    /// logged and reported as NoAction so the caller's loop keeps running.
    pub fn get_key_info(&mut self, args: &mut BootArgs, filter_for_typing: bool) -> PickerKeyInfo {
        let raw = match self.key_map.key_strokes() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[decode] key map query failed: {e}");
                return PickerKeyInfo::default();
            }
        };

        let typing = self.typing.next_keystroke();

        let edges = match self.non_repeat.edge_keys() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[decode] non-repeat query failed: {e}");
                return PickerKeyInfo::default();
            }
        };

        if !edges.keys.is_empty() {
            log::trace!("[decode] newly pressed: {:?}", edges.keys);
        }

        if let Some(dbg) = self.kb_debug.as_mut() {
            dbg.show(typing.keys().len(), raw.keys.len(), typing.modifiers);
        }

        let frame = Frame { raw, typing, edges, filter_for_typing };
        decode_frame(&frame, args, self.variables.as_ref(), self.poll_apple_hot_keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::script::{ScriptedKeyMap, ScriptedTyping};
    use crate::input::variables::MemoryVariables;
    use crate::input::{InputError, InputSources, NonRepeatSource};
    use crate::keys::KeySet;
    use std::collections::HashMap;

    const CMD:   ModifierMap = ModifierMap::LEFT_COMMAND;
    const SHIFT: ModifierMap = ModifierMap::LEFT_SHIFT;
    const CTRL:  ModifierMap = ModifierMap::RIGHT_CONTROL;

    fn keys(k: &[KeyCode]) -> KeySet { k.iter().copied().collect() }

    fn raw(mods: ModifierMap, k: &[KeyCode]) -> Frame {
        Frame { raw: KeySnapshot::new(mods, keys(k)), ..Default::default() }
    }

    fn typed(mods: ModifierMap, key: KeyCode) -> Frame {
        Frame {
            raw:    KeySnapshot::new(mods, KeySet::single(key)),
            typing: TypingEvent { modifiers: mods, key: Some(key), ch: None },
            edges:  KeySnapshot::new(mods, KeySet::new()),
            filter_for_typing: false,
        }
    }

    fn typing_mode(mut f: Frame) -> Frame {
        f.filter_for_typing = true;
        f
    }

    fn no_vars() -> MemoryVariables { MemoryVariables::default() }

    fn csr(value: u32) -> MemoryVariables {
        MemoryVariables::new(HashMap::from([(CSR_ACTIVE_CONFIG.to_string(), value)]))
    }

    fn decode(f: &Frame, args: &mut BootArgs) -> PickerKeyInfo {
        decode_frame(f, args, &no_vars(), true)
    }

    // ── advisory modifiers ───────────────────────────────────────────────────
    #[test]
    fn advisory_modifier_flags() {
        assert_eq!(advisory_modifiers(ModifierMap::empty()), PickerModifiers::empty());
        assert_eq!(advisory_modifiers(CTRL), PickerModifiers::SET_DEFAULT);
        assert_eq!(advisory_modifiers(CTRL | SHIFT), PickerModifiers::all());
        assert_eq!(advisory_modifiers(SHIFT), PickerModifiers::REVERSE_SWITCH_CONTEXT);
        assert_eq!(advisory_modifiers(CTRL | CMD), PickerModifiers::empty());
        assert_eq!(advisory_modifiers(SHIFT | CMD), PickerModifiers::REVERSE_SWITCH_CONTEXT);
    }

    #[test]
    fn advisory_flags_ride_along_with_actions() {
        let info = decode(&typed(SHIFT, KeyCode::TAB), &mut BootArgs::new());
        assert_eq!(info.action, PickerAction::SwitchContext);
        assert_eq!(info.modifiers, PickerModifiers::REVERSE_SWITCH_CONTEXT);
    }

    // ── boot-args combinations ───────────────────────────────────────────────
    #[test]
    fn cmd_v_appends_verbose_once() {
        let mut args = BootArgs::from_line("keepsyms=1");
        let f = raw(CMD, &[KeyCode::V]);
        for _ in 0..5 {
            assert_eq!(decode(&f, &mut args).action, PickerAction::Internal);
        }
        assert_eq!(args.as_str(), "keepsyms=1 -v");
    }

    #[test]
    fn cmd_c_needs_either_minus() {
        let mut args = BootArgs::new();
        assert_eq!(decode(&raw(CMD, &[KeyCode::C]), &mut args).action, PickerAction::NoAction);
        decode(&raw(CMD, &[KeyCode::C, KeyCode::PAD_MINUS]), &mut args);
        assert_eq!(args.as_str(), "-no_compat_check");
        decode(&raw(CMD, &[KeyCode::C, KeyCode::MINUS]), &mut args);
        assert_eq!(args.as_str(), "-no_compat_check");
    }

    #[test]
    fn cmd_k_uses_substring_match() {
        let mut args = BootArgs::from_line("xkcsuffix=releasey");
        decode(&raw(CMD, &[KeyCode::K]), &mut args);
        assert_eq!(args.as_str(), "xkcsuffix=releasey");
    }

    #[test]
    fn combinations_stack_in_one_cycle() {
        let mut args = BootArgs::new();
        let info = decode(&raw(CMD, &[KeyCode::V, KeyCode::K, KeyCode::S]), &mut args);
        assert_eq!(info.action, PickerAction::Internal);
        assert_eq!(args.as_str(), "-v kcsuffix=release -s");
    }

    #[test]
    fn cmd_s_plain_is_single_user() {
        let mut args = BootArgs::new();
        apply_boot_arg_combos(&KeySnapshot::new(CMD, keys(&[KeyCode::S])), &mut args, &csr(u32::MAX));
        assert_eq!(args.as_str(), "-s");
    }

    #[test]
    fn cmd_s_minus_zero_slide_when_policy_allows() {
        let mut args = BootArgs::new();
        let snap = KeySnapshot::new(CMD, keys(&[KeyCode::S, KeyCode::MINUS]));
        apply_boot_arg_combos(&snap, &mut args, &csr(CSR_ALLOW_UNRESTRICTED_NVRAM));
        assert_eq!(args.as_str(), "slide=0");
    }

    // Documented quirk: an unreadable or restrictive policy silently turns
    // CMD+S+MINUS into CMD+S rather than doing nothing.
    #[test]
    fn cmd_s_minus_falls_back_to_single_user() {
        let snap = KeySnapshot::new(CMD, keys(&[KeyCode::S, KeyCode::MINUS]));

        let mut args = BootArgs::new();
        apply_boot_arg_combos(&snap, &mut args, &no_vars());
        assert_eq!(args.as_str(), "-s");

        let mut args = BootArgs::new();
        apply_boot_arg_combos(&snap, &mut args, &csr(0x67 & !CSR_ALLOW_UNRESTRICTED_NVRAM));
        assert_eq!(args.as_str(), "-s");
    }

    #[test]
    fn combinations_need_command() {
        let mut args = BootArgs::new();
        assert!(!apply_boot_arg_combos(&KeySnapshot::new(CTRL, keys(&[KeyCode::V])), &mut args, &no_vars()));
        assert!(args.as_str().is_empty());
    }

    #[test]
    fn combinations_skipped_in_typing_mode_or_when_disabled() {
        let mut args = BootArgs::new();
        let f = raw(CMD, &[KeyCode::V]);
        assert_eq!(decode(&typing_mode(f.clone()), &mut args).action, PickerAction::NoAction);
        assert_eq!(decode_frame(&f, &mut args, &no_vars(), false).action, PickerAction::NoAction);
        assert!(args.as_str().is_empty());
    }

    #[test]
    fn later_rule_overrides_internal() {
        let mut args = BootArgs::new();
        let mut f = raw(CMD, &[KeyCode::V]);
        f.edges.keys.insert(KeyCode::SPACE);
        assert_eq!(decode(&f, &mut args).action, PickerAction::More);
        assert_eq!(args.as_str(), "-v");
    }

    // ── typing mode ──────────────────────────────────────────────────────────
    #[test]
    fn typing_escape_beats_non_repeat_escape() {
        let mut f = typing_mode(typed(ModifierMap::empty(), KeyCode::ESCAPE));
        f.edges.keys.insert(KeyCode::ESCAPE);
        assert_eq!(decode(&f, &mut BootArgs::new()).action, PickerAction::TypingClearAll);

        f.filter_for_typing = false;
        assert_eq!(decode(&f, &mut BootArgs::new()).action, PickerAction::Aborted);
    }

    #[test]
    fn typing_backspace_and_cursor() {
        let mut args = BootArgs::new();
        let f = typing_mode(typed(ModifierMap::empty(), KeyCode::BACKSPACE));
        assert_eq!(decode(&f, &mut args).action, PickerAction::TypingBackspace);
        let f = typing_mode(typed(ModifierMap::empty(), KeyCode::LEFT));
        assert_eq!(decode(&f, &mut args).action, PickerAction::TypingLeft);
        let f = typing_mode(typed(ModifierMap::empty(), KeyCode::RIGHT));
        assert_eq!(decode(&f, &mut args).action, PickerAction::TypingRight);
    }

    #[test]
    fn typed_character_is_extra() {
        let mut f = typing_mode(typed(ModifierMap::empty(), KeyCode::A));
        f.typing.ch = Some('a');
        let info = decode(&f, &mut BootArgs::new());
        assert_eq!(info.action, PickerAction::Extra);
        assert_eq!(info.typing_char, Some('a'));
    }

    #[test]
    fn non_printable_characters_are_dropped() {
        for c in ['\u{7f}', '\u{1b}', 'é'] {
            let mut f = typing_mode(Frame::default());
            f.typing.ch = Some(c);
            let info = decode(&f, &mut BootArgs::new());
            assert_eq!(info.typing_char, None);
            assert_eq!(info.action, PickerAction::NoAction);
        }
    }

    #[test]
    fn character_ignored_outside_typing_mode() {
        let mut f = Frame::default();
        f.typing.ch = Some('q');
        let info = decode(&f, &mut BootArgs::new());
        assert_eq!(info.typing_char, None);
        assert_eq!(info.action, PickerAction::NoAction);
    }

    // ── non-repeating keys ───────────────────────────────────────────────────
    #[test]
    fn voice_over_needs_command_and_edge_f5() {
        let mut f = typed(CMD, KeyCode::F5);
        assert_eq!(decode(&f, &mut BootArgs::new()).action, PickerAction::NoAction);
        f.edges.keys.insert(KeyCode::F5);
        assert_eq!(decode(&f, &mut BootArgs::new()).action, PickerAction::VoiceOver);
        // Typing mode does not suppress it
        assert_eq!(decode(&typing_mode(f), &mut BootArgs::new()).action, PickerAction::VoiceOver);
    }

    #[test]
    fn reload_and_auxiliary_are_edge_triggered() {
        let mut args = BootArgs::new();
        let mut f = Frame::default();
        f.raw.keys.insert(KeyCode::SPACE);
        assert_eq!(decode(&f, &mut args).action, PickerAction::NoAction);

        f.edges.keys.insert(KeyCode::SPACE);
        assert_eq!(decode(&f, &mut args).action, PickerAction::More);

        let mut z = Frame::default();
        z.edges.keys.insert(KeyCode::ZERO);
        assert_eq!(decode(&z, &mut args).action, PickerAction::Aborted);
        assert_eq!(decode(&typing_mode(z), &mut args).action, PickerAction::NoAction);
    }

    // ── single keystroke navigation ──────────────────────────────────────────
    #[test]
    fn shift_enter_continues_in_safe_mode() {
        let mut args = BootArgs::new();
        let f = typed(SHIFT, KeyCode::ENTER);
        assert_eq!(decode(&f, &mut args).action, PickerAction::Continue);
        assert_eq!(decode(&f, &mut args).action, PickerAction::Continue);
        assert_eq!(args.as_str(), "-x");
    }

    #[test]
    fn enter_variants_and_modifier_gate() {
        for key in [KeyCode::ENTER, KeyCode::RETURN, KeyCode::PAD_ENTER] {
            let mut args = BootArgs::new();
            assert_eq!(decode(&typed(CTRL, key), &mut args).action, PickerAction::Continue);
            assert!(args.as_str().is_empty());
            assert_eq!(decode(&typed(CMD, key), &mut args).action, PickerAction::NoAction);
        }
    }

    #[test]
    fn tab_switches_context_in_both_modes() {
        let f = typed(ModifierMap::empty(), KeyCode::TAB);
        assert_eq!(decode(&f, &mut BootArgs::new()).action, PickerAction::SwitchContext);
        assert_eq!(decode(&typing_mode(f), &mut BootArgs::new()).action, PickerAction::SwitchContext);
    }

    #[test]
    fn arrows_ignore_modifiers() {
        let mut args = BootArgs::new();
        let mods = CMD | ModifierMap::LEFT_OPTION;
        assert_eq!(decode(&typed(mods, KeyCode::UP), &mut args).action, PickerAction::Up);
        assert_eq!(decode(&typed(mods, KeyCode::DOWN), &mut args).action, PickerAction::Down);
        assert_eq!(decode(&typed(mods, KeyCode::LEFT), &mut args).action, PickerAction::Left);
        assert_eq!(decode(&typed(mods, KeyCode::RIGHT), &mut args).action, PickerAction::Right);
        assert_eq!(decode(&typed(mods, KeyCode::HOME), &mut args).action, PickerAction::Top);
        assert_eq!(decode(&typed(mods, KeyCode::PAGE_UP), &mut args).action, PickerAction::Top);
        assert_eq!(decode(&typed(mods, KeyCode::END), &mut args).action, PickerAction::Bottom);
        assert_eq!(decode(&typed(mods, KeyCode::PAGE_DOWN), &mut args).action, PickerAction::Bottom);
    }

    #[test]
    fn function_keys_map_to_functional_index() {
        let mut args = BootArgs::new();
        let none = ModifierMap::empty();
        assert_eq!(decode(&typed(none, KeyCode::function(3).unwrap()), &mut args).action, PickerAction::Functional(3));
        assert_eq!(decode(&typed(none, KeyCode::F12), &mut args).action, PickerAction::Functional(12));
        assert_eq!(decode(&typed(none, KeyCode::F13), &mut args).action, PickerAction::Functional(13));
        assert_eq!(decode(&typed(none, KeyCode::F24), &mut args).action, PickerAction::Functional(24));
        assert_eq!(decode(&typed(CTRL, KeyCode::F1), &mut args).action, PickerAction::NoAction);
    }

    #[test]
    fn digits_and_letters_select_entries() {
        let mut args = BootArgs::new();
        let none = ModifierMap::empty();
        assert_eq!(decode(&typed(none, KeyCode::ONE), &mut args).action, PickerAction::Index(0));
        assert_eq!(decode(&typed(none, KeyCode::NINE), &mut args).action, PickerAction::Index(8));
        assert_eq!(decode(&typed(none, KeyCode::A), &mut args).action, PickerAction::Index(9));
        assert_eq!(decode(&typed(none, KeyCode::Z), &mut args).action, PickerAction::Index(34));
        assert_eq!(decode(&typed(SHIFT, KeyCode::A), &mut args).action, PickerAction::NoAction);
        // '0' is reload, never an index
        assert_eq!(decode(&typed(none, KeyCode::ZERO), &mut args).action, PickerAction::NoAction);
    }

    #[test]
    fn navigation_rules_idle_in_typing_mode() {
        let mut args = BootArgs::new();
        for key in [KeyCode::UP, KeyCode::ENTER, KeyCode::F1, KeyCode::ONE, KeyCode::HOME] {
            let info = decode(&typing_mode(typed(ModifierMap::empty(), key)), &mut args);
            assert_eq!(info.action, PickerAction::NoAction, "{key}");
        }
    }

    // ── rule table / determinism ─────────────────────────────────────────────
    #[test]
    fn rule_precedence_is_fixed() {
        let names: Vec<_> = DECODE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, [
            "typing-clear-all", "typing-backspace", "voice-over", "reload",
            "toggle-auxiliary", "switch-context", "typing-cursor", "continue",
            "navigate", "top-bottom", "functional", "index",
        ]);
    }

    #[test]
    fn non_repeat_beats_navigation() {
        let mut f = typed(ModifierMap::empty(), KeyCode::UP);
        f.edges.keys.insert(KeyCode::ESCAPE);
        assert_eq!(decode(&f, &mut BootArgs::new()).action, PickerAction::Aborted);
    }

    #[test]
    fn same_frame_same_result() {
        let mut f = typed(SHIFT, KeyCode::ENTER);
        f.raw.modifiers |= CMD;
        f.raw.keys.insert(KeyCode::V);
        let mut args = BootArgs::new();
        let first  = decode(&f, &mut args);
        let second = decode(&f, &mut args);
        assert_eq!(first, second);
        assert_eq!(args.as_str(), "-v -x");
    }

    // ── live sources ─────────────────────────────────────────────────────────
    struct BrokenEdges;

    impl NonRepeatSource for BrokenEdges {
        fn edge_keys(&mut self) -> Result<KeySnapshot, InputError> { Err(InputError::Unavailable) }
    }

    #[test]
    fn non_repeat_failure_yields_nothing() {
        let shift_enter = TypingEvent { modifiers: SHIFT, key: Some(KeyCode::ENTER), ch: None };
        let mut ctx = HotkeyContext::new(
            InputSources {
                key_map:    Box::new(ScriptedKeyMap::new(vec![KeySnapshot::new(CMD, keys(&[KeyCode::V]))])),
                typing:     Box::new(ScriptedTyping::new(vec![shift_enter])),
                non_repeat: Box::new(BrokenEdges),
            },
            Box::new(no_vars()),
        );
        let mut args = BootArgs::from_line("keepsyms=1");
        let info = ctx.get_key_info(&mut args, false);
        assert_eq!(info, PickerKeyInfo::default());
        assert_eq!(args.as_str(), "keepsyms=1");
    }
}
