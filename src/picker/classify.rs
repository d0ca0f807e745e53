// src/picker/classify.rs  -  Boot-time key combination classifier
use super::context::HotkeyContext;
use crate::keys::{KeyCode, KeySet, ModifierMap};

/// Boot-time override of the picker's default behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerCommand {
    /// No combination held; the configured default applies
    #[default]
    NoOverride,
    ResetNvram,
    BootRecovery,
    BootDefaultOs,
    ShowPickerByOption,
    ShowPickerByEscape,
}

impl PickerCommand {
    /// Whether the picker menu should be shown at all
    pub fn shows_picker(self) -> bool {
        matches!(
            self,
            PickerCommand::NoOverride | PickerCommand::ShowPickerByOption | PickerCommand::ShowPickerByEscape
        )
    }
}

/// First match wins.  Combining extra keys is tolerated, so CMD+OPT+P+R
/// has to be tested before its CMD+R subset.
pub fn classify_boot_combination(modifiers: ModifierMap, keys: &KeySet) -> PickerCommand {
    let has_command = modifiers.has_command();
    let has_option  = modifiers.has_option();

    if has_option && has_command && keys.contains(KeyCode::P) && keys.contains(KeyCode::R) {
        log::info!("[hotkeys] CMD+OPT+P+R causes NVRAM reset");
        PickerCommand::ResetNvram
    } else if has_command && keys.contains(KeyCode::R) {
        log::info!("[hotkeys] CMD+R causes recovery to boot");
        PickerCommand::BootRecovery
    } else if keys.contains(KeyCode::X) {
        log::info!("[hotkeys] X causes default OS to boot");
        PickerCommand::BootDefaultOs
    } else if has_option {
        log::info!("[hotkeys] OPT causes picker to show");
        PickerCommand::ShowPickerByOption
    } else if keys.contains(KeyCode::ESCAPE) {
        log::info!("[hotkeys] ESC causes picker to show");
        PickerCommand::ShowPickerByEscape
    } else {
        PickerCommand::NoOverride
    }
}

impl HotkeyContext {
    /// Sample the keyboard once at picker entry (after the takeoff delay)
    /// and classify what is held.  A failed query never blocks boot.
    pub fn load_picker_hot_keys(&mut self) -> PickerCommand {
        if !self.takeoff_delay.is_zero() {
            std::thread::sleep(self.takeoff_delay);
        }

        match self.key_map.key_strokes() {
            Ok(snap) => classify_boot_combination(snap.modifiers, &snap.keys),
            Err(e) => {
                log::error!("[hotkeys] boot-time key query failed: {e}");
                PickerCommand::NoOverride
            }
        }
    }
}
