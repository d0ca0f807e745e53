// src/config.rs  -  Runtime configuration (CLI + TOML)
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// The example config is embedded directly in the binary at compile time.
/// Users can write it out with:  picker-hotkeys --write-config
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config.toml.example");

// ── CLI ───────────────────────────────────────────────────────────────────────
#[derive(Parser, Debug)]
#[command(
    name  = "picker-hotkeys",
    about = "Boot picker hotkey arbitration  |  classify, decode, poll",
    version,
)]
pub struct Cli {
    /// Config file path (default: ~/.config/picker-hotkeys/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Key source: terminal | script
    #[arg(long)]
    pub adapter: Option<AdapterType>,

    /// Session script (TOML frames) for --adapter script
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Idle timeout per picker wait, in ms; 0 waits forever
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Delay before sampling the boot-time key combination, in ms
    #[arg(long)]
    pub takeoff_delay: Option<u64>,

    /// Sleep between poll iterations, in µs
    #[arg(long)]
    pub poll_delay_us: Option<u64>,

    /// Decode in typing mode (text entry instead of navigation)
    #[arg(long, action)]
    pub typing: bool,

    /// Ignore CMD+V / CMD+K / CMD+S style boot-args hotkeys
    #[arg(long, action)]
    pub no_hot_keys: bool,

    /// Initial boot argument line
    #[arg(long)]
    pub boot_args: Option<String>,

    /// Fail this fraction of raw key map queries (0.0..=1.0)
    #[arg(long)]
    pub fault_rate: Option<f64>,

    /// Attach loop-delay instrumentation and report it at exit
    #[arg(long, action)]
    pub kb_debug: bool,

    /// Write the built-in default config.toml to the config path and exit.
    /// Use --config <PATH> to write to a custom location.
    #[arg(long, action)]
    pub write_config: bool,

    /// Print the built-in default config.toml to stdout and exit
    #[arg(long, action)]
    pub print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    /// Keyboard in terminal raw mode
    Terminal,
    /// Replay a TOML session script
    Script,
}

// ── TOML file structure ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub picker: Option<PickerCfg>,
    pub boot:   Option<BootCfg>,
    pub input:  Option<InputCfg>,
    /// Firmware variables, e.g. `csr-active-config = 103`
    pub nvram:  Option<HashMap<String, u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerCfg {
    pub poll_apple_hot_keys: Option<bool>,
    pub takeoff_delay_ms:    Option<u64>,
    pub timeout_ms:          Option<u64>,
    pub poll_delay_us:       Option<u64>,
    pub typing:              Option<bool>,
    pub kb_debug:            Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootCfg {
    pub args: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputCfg {
    pub adapter:    Option<AdapterType>,
    pub script:     Option<PathBuf>,
    pub fault_rate: Option<f64>,
}

// ── Resolved / merged config ──────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub poll_apple_hot_keys: bool,
    pub takeoff_delay_ms:    u64,
    /// Restarts with every wait; 0 = no timeout
    pub timeout_ms:          u64,
    pub poll_delay_us:       u64,
    pub typing:              bool,
    pub kb_debug:            bool,
    pub boot_args:           String,
    pub adapter:             AdapterType,
    pub script:              Option<PathBuf>,
    pub fault_rate:          f64,
    pub nvram:               HashMap<String, u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_apple_hot_keys: true,
            takeoff_delay_ms:    0,
            timeout_ms:          0,
            poll_delay_us:       10,
            typing:              false,
            kb_debug:            false,
            boot_args:           String::new(),
            adapter:             AdapterType::Terminal,
            script:              None,
            fault_rate:          0.0,
            nvram:               HashMap::new(),
        }
    }
}

// ── Config loader ─────────────────────────────────────────────────────────────
impl AppConfig {
    /// Write the embedded default config to disk.
    /// Returns the path it was written to.
    pub fn write_default_config(cli: &Cli) -> Result<PathBuf> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating config directory {:?}", parent))?;
        }
        std::fs::write(&path, DEFAULT_CONFIG_TOML)
            .with_context(|| format!("Writing config to {:?}", path))?;
        Ok(path)
    }

    pub fn load(cli: &Cli) -> Result<Self> {
        let mut cfg = Self::default();

        // 1. Load TOML file
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Reading config {:?}", path))?;
            let fc: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("Parsing config {:?}", path))?;
            cfg.apply_file(&fc);
        } else {
            log::info!("[config] no config file at {}, using defaults", path.display());
        }

        // 2. Apply CLI overrides
        cfg.apply_cli(cli);

        if !(0.0..=1.0).contains(&cfg.fault_rate) {
            anyhow::bail!("fault_rate must be within 0.0..=1.0, got {}", cfg.fault_rate);
        }
        Ok(cfg)
    }

    fn apply_file(&mut self, fc: &FileConfig) {
        if let Some(p) = &fc.picker {
            if let Some(v) = p.poll_apple_hot_keys { self.poll_apple_hot_keys = v; }
            if let Some(v) = p.takeoff_delay_ms    { self.takeoff_delay_ms    = v; }
            if let Some(v) = p.timeout_ms          { self.timeout_ms          = v; }
            if let Some(v) = p.poll_delay_us       { self.poll_delay_us       = v; }
            if let Some(v) = p.typing              { self.typing              = v; }
            if let Some(v) = p.kb_debug            { self.kb_debug            = v; }
        }
        if let Some(b) = &fc.boot {
            if let Some(v) = &b.args { self.boot_args = v.clone(); }
        }
        if let Some(i) = &fc.input {
            if let Some(v) = i.adapter    { self.adapter    = v; }
            if let Some(v) = &i.script    { self.script     = Some(v.clone()); }
            if let Some(v) = i.fault_rate { self.fault_rate = v; }
        }
        if let Some(n) = &fc.nvram {
            self.nvram.extend(n.iter().map(|(k, v)| (k.clone(), *v)));
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.adapter        { self.adapter          = v; }
        if let Some(v) = &cli.script        {
            self.script = Some(v.clone());
            // A script on the command line implies replaying it
            if cli.adapter.is_none() { self.adapter = AdapterType::Script; }
        }
        if let Some(v) = cli.timeout        { self.timeout_ms       = v; }
        if let Some(v) = cli.takeoff_delay  { self.takeoff_delay_ms = v; }
        if let Some(v) = cli.poll_delay_us  { self.poll_delay_us    = v; }
        if let Some(v) = &cli.boot_args     { self.boot_args        = v.clone(); }
        if let Some(v) = cli.fault_rate     { self.fault_rate       = v; }
        if cli.typing                       { self.typing           = true; }
        if cli.kb_debug                     { self.kb_debug         = true; }
        if cli.no_hot_keys                  { self.poll_apple_hot_keys = false; }
    }
}

fn default_config_path() -> PathBuf {
    dirs_next().join("picker-hotkeys").join("config.toml")
}

fn dirs_next() -> PathBuf {
    if let Ok(v) = std::env::var("XDG_CONFIG_HOME") { return PathBuf::from(v); }
    if let Ok(v) = std::env::var("APPDATA")          { return PathBuf::from(v); }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_default();
    PathBuf::from(home).join(".config")
}
