// src/main.rs  -  picker-hotkeys  entry point
mod config;
mod input;
mod keys;
mod picker;

use anyhow::Result;
use clap::Parser;
use config::{AdapterType, AppConfig, Cli};
use input::variables::MemoryVariables;
use picker::{BootArgs, HotkeyContext, LoopDelayStats, PickerAction, PickerKeyInfo};
use std::time::Duration;

// ── Console output ────────────────────────────────────────────────────────────
/// Line printer that also works while the terminal is in raw mode
struct Console {
    raw: bool,
}

impl Console {
    fn say(&self, line: &str) {
        if self.raw { print!("{line}\r\n"); } else { println!("{line}"); }
    }
}

/// Text typed while the picker is in typing mode
#[derive(Default)]
struct TypedText {
    text:   String,
    cursor: usize,
}

impl TypedText {
    fn apply(&mut self, info: &PickerKeyInfo) {
        match info.action {
            PickerAction::TypingClearAll  => { self.text.clear(); self.cursor = 0; }
            PickerAction::TypingBackspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.text.remove(self.cursor);
                }
            }
            PickerAction::TypingLeft  => { self.cursor = self.cursor.saturating_sub(1); }
            PickerAction::TypingRight => { self.cursor = (self.cursor + 1).min(self.text.len()); }
            _ => {
                // Typed characters are printable ASCII, so byte index == char index
                if let Some(c) = info.typing_char {
                    self.text.insert(self.cursor, c);
                    self.cursor += 1;
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // ── --print-config  ───────────────────────────────────────────────────────
    if cli.print_config {
        print!("{}", config::DEFAULT_CONFIG_TOML);
        return Ok(());
    }

    // ── --write-config  ───────────────────────────────────────────────────────
    if cli.write_config {
        let path = AppConfig::write_default_config(&cli)?;
        println!("Config written to: {}", path.display());
        return Ok(());
    }

    // ── Load config ───────────────────────────────────────────────────────────
    let cfg = AppConfig::load(&cli)?;
    let out = Console { raw: cfg.adapter == AdapterType::Terminal };

    if cfg.adapter == AdapterType::Terminal {
        println!("Hold a boot combination now (CMD+R, OPT, X, ESC ...).");
        if cfg.typing {
            println!("Typing mode: type text, Esc clears, Tab leaves.");
        } else {
            println!("Arrows/1-9/A-Z select, Enter boots, Esc reloads, Space toggles.");
        }
    }

    // ── Hotkey context ────────────────────────────────────────────────────────
    let sources = input::create_sources(&cfg)?;
    let mut ctx = HotkeyContext::new(sources, Box::new(MemoryVariables::new(cfg.nvram.clone())));
    ctx.poll_apple_hot_keys = cfg.poll_apple_hot_keys;
    ctx.takeoff_delay       = Duration::from_millis(cfg.takeoff_delay_ms);
    ctx.poll_delay          = Duration::from_micros(cfg.poll_delay_us);
    if cfg.kb_debug {
        ctx.set_kb_debug(Box::new(LoopDelayStats::new()));
    }

    let mut boot_args = BootArgs::from_line(&cfg.boot_args);

    // ── Boot-time combination ─────────────────────────────────────────────────
    let command = ctx.load_picker_hot_keys();
    out.say(&format!("boot-time command: {command:?}"));

    // ── Picker session ────────────────────────────────────────────────────────
    if command.shows_picker() {
        let mut typed = TypedText::default();

        // The timeout restarts with every wait, so it bounds idle time
        loop {
            let info = ctx.wait_for_action(&mut boot_args, cfg.timeout_ms, cfg.typing);
            out.say(&format!("action: {info}"));

            if cfg.typing {
                typed.apply(&info);
                out.say(&format!("  text: {:?} (cursor {})", typed.text, typed.cursor));
                if info.action == PickerAction::SwitchContext {
                    break;
                }
            }
            if info.action.ends_session() {
                break;
            }
        }
    } else {
        log::info!("[main] picker skipped by {command:?}");
    }

    if let Some(dbg) = ctx.kb_debug() {
        out.say(&format!("kb-debug: {}", dbg.report()));
    }

    // Leaves terminal raw mode
    drop(ctx);

    println!("boot-args: {boot_args}");
    Ok(())
}
