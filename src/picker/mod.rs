// src/picker/mod.rs  -  Boot picker hotkey arbitration
//
// classify : one-shot boot-time combination (CMD+R, OPT, X, ...)
// decode   : one poll cycle → PickerKeyInfo
// wait     : poll loop with deadline and modifier-change early exit
pub mod action;
pub mod boot_args;
pub mod classify;
pub mod context;
pub mod decode;
pub mod kb_debug;
pub mod wait;

pub use action::{PickerAction, PickerKeyInfo};
pub use boot_args::BootArgs;
pub use context::HotkeyContext;
pub use kb_debug::LoopDelayStats;
