// src/picker/wait.rs  -  Poll until an action, a modifier change or the deadline
use super::action::{PickerAction, PickerKeyInfo};
use super::boot_args::BootArgs;
use super::context::HotkeyContext;
use std::time::{Duration, Instant};

/// Absolute deadline for a wait; `0` means wait forever
pub fn wait_deadline(timeout_ms: u64) -> Option<Instant> {
    if timeout_ms == 0 {
        return None;
    }
    Some(Instant::now() + Duration::from_millis(timeout_ms))
}

impl HotkeyContext {
    /// Block (in short sleeps) until the decoder yields something for the
    /// caller.  Returns:
    ///   * any non-empty action, internal ones included, so the UI can react;
    ///   * Extra when the advisory modifiers changed since the last return;
    ///   * Timeout once `timeout_ms` elapses (never, for 0).
    pub fn wait_for_action(
        &mut self,
        args:              &mut BootArgs,
        timeout_ms:        u64,
        filter_for_typing: bool,
    ) -> PickerKeyInfo {
        self.wait_until(args, wait_deadline(timeout_ms), filter_for_typing)
    }

    /// As `wait_for_action`, against an already computed deadline
    pub fn wait_until(
        &mut self,
        args:              &mut BootArgs,
        deadline:          Option<Instant>,
        filter_for_typing: bool,
    ) -> PickerKeyInfo {
        let old_modifiers = self.last_modifiers;

        let info = loop {
            let mut info = self.get_key_info(args, filter_for_typing);

            if !info.action.is_none() {
                break info;
            }

            if info.modifiers != old_modifiers {
                info.action = PickerAction::Extra;
                break info;
            }

            if deadline.is_some_and(|end| Instant::now() >= end) {
                info.action = PickerAction::Timeout;
                break info;
            }

            let start = Instant::now();
            std::thread::sleep(self.poll_delay);
            if let Some(dbg) = self.kb_debug.as_mut() {
                dbg.instrument_loop_delay(start, Instant::now());
            }
        };

        self.last_modifiers = info.modifiers;
        log::debug!("[wait] {info}");
        info
    }
}
