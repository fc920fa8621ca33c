use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "screen-narrator",
    version,
    about = "Speaks UI focus, menu and screen changes through screen readers or OS speech"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: screen-narrator.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded host session through the engine
    Replay {
        /// Path to the replay script YAML
        #[arg(long)]
        script: String,

        /// Append one JSON line per announcement to this file
        #[arg(long)]
        trace: Option<String>,

        /// Override the script's frame duration (milliseconds)
        #[arg(long)]
        frame_ms: Option<u64>,

        /// Sleep one frame duration per frame so speech can be heard
        #[arg(long)]
        realtime: bool,
    },

    /// Speak a single line through the configured backends
    Say {
        text: String,

        /// Queue behind current speech instead of interrupting it
        #[arg(long)]
        no_interrupt: bool,
    },

    /// Probe every configured backend and print its availability
    Backends,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `screen-narrator.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            menu: MenuConfig::default(),
            backends: default_backends(),
        }
    }
}

/// Polling periods, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_focus_interval")]
    pub focus_interval_secs: f64,

    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: f64,

    #[serde(default = "default_probe_interval")]
    pub probe_interval_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            focus_interval_secs: 0.1,
            scan_interval_secs: 1.0,
            probe_interval_secs: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Replaces the built-in menu vocabulary when set
    #[serde(default)]
    pub vocabulary: Option<Vec<String>>,

    /// Added to whichever vocabulary is in effect
    #[serde(default)]
    pub extra_vocabulary: Vec<String>,
}

/// One speech backend entry. `kind` selects the factory in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    pub kind: String,

    /// Lower is tried first
    #[serde(default)]
    pub priority: u32,

    /// `command`: program to run (platform default when absent)
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub cancel_args: Option<Vec<String>>,

    /// `http`: bridge base URL
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl BackendConfig {
    pub fn new(name: &str, kind: &str, priority: u32) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            priority,
            program: None,
            args: vec![],
            cancel_args: None,
            endpoint: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

// Serde default helpers
fn default_focus_interval() -> f64 { 0.1 }
fn default_scan_interval() -> f64 { 1.0 }
fn default_probe_interval() -> f64 { 10.0 }
fn default_timeout_ms() -> u64 { 500 }

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::new("system-tts", "command", 10),
        BackendConfig::new("console", "console", 100),
    ]
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("screen-narrator.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, serde_yaml::Error> {
    serde_yaml::from_str(content)
}
