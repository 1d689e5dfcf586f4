//! Configuration for the draft assistant
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/draftdesk/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod clipboard;
mod drafts;
mod gateway;
mod observability;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use clipboard::{ClipboardConfig, FileClipboard};
pub use drafts::{DraftsConfig, FileDrafts, FileNotifications, NotificationsConfig};
pub use gateway::{FileGateway, GatewayConfig};
pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable names
pub mod env {
    pub const RECORD_ID: &str = "DRAFTDESK_RECORD_ID";
    pub const BASE_URL: &str = "DRAFTDESK_BASE_URL";
    pub const API_TOKEN: &str = "DRAFTDESK_API_TOKEN";
    pub const DEMO: &str = "DRAFTDESK_DEMO";
    pub const NO_TUI: &str = "DRAFTDESK_NO_TUI";
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Record the assistant is bound to (CLI flag overrides this)
    pub record_id: Option<String>,

    /// Demo mode: canned backends instead of HTTP
    pub demo_mode: bool,

    /// Whether to run the TUI (env-only runtime flag)
    pub enable_tui: bool,

    /// Backend endpoints and provider labels
    pub gateway: GatewayConfig,

    /// Email type catalog
    pub drafts: DraftsConfig,

    /// Toast timing
    pub notifications: NotificationsConfig,

    /// Clipboard strategy toggles
    pub clipboard: ClipboardConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record_id: None,
            demo_mode: false,
            enable_tui: true,
            gateway: GatewayConfig::default(),
            drafts: DraftsConfig::default(),
            notifications: NotificationsConfig::default(),
            clipboard: ClipboardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub record_id: Option<String>,
    pub demo_mode: Option<bool>,

    /// Optional [gateway] section
    pub gateway: Option<FileGateway>,

    /// Optional [drafts] section
    pub drafts: Option<FileDrafts>,

    /// Optional [notifications] section
    pub notifications: Option<FileNotifications>,

    /// Optional [clipboard] section
    pub clipboard: Option<FileClipboard>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a boolean-ish env value ("1", "true", "yes")
fn env_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

impl Config {
    /// Get the config file path: ~/.config/draftdesk/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("draftdesk").join("config.toml"))
    }

    /// Write the defaults template if no config file exists yet
    ///
    /// Returns the path when a file was written.
    pub fn write_default_template() -> anyhow::Result<Option<PathBuf>> {
        use anyhow::Context;

        let path = Self::config_path().context("Could not determine config path")?;
        if path.exists() {
            return Ok(None);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(&path, Self::default().to_toml())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Some(path))
    }

    /// Parse config file contents
    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load file config if it exists
    ///
    /// # Panics
    /// Exits the process if the config file exists but cannot be parsed. A
    /// broken config should fail fast, not silently fall back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse_file_config(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n  CONFIG ERROR - Failed to parse configuration file\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: check quoting, true/false values and section names.");
                    eprintln!("  To reset, delete the file and run `draftdesk config --init`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n  CONFIG ERROR - Cannot read configuration file\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file config with an environment lookup
    pub(crate) fn resolve<F>(file: FileConfig, env_var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Record: env > file
        let record_id = env_var(env::RECORD_ID)
            .or(file.record_id)
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        // Demo mode: env > file > default
        let demo_mode = env_var(env::DEMO)
            .map(|v| env_flag(&v))
            .or(file.demo_mode)
            .unwrap_or(false);

        // TUI toggle: env only (runtime flag)
        let enable_tui = env_var(env::NO_TUI).map(|v| !env_flag(&v)).unwrap_or(true);

        let gateway = GatewayConfig::from_file(
            file.gateway,
            env_var(env::BASE_URL),
            env_var(env::API_TOKEN),
        );
        let drafts = DraftsConfig::from_file(file.drafts);
        let notifications = NotificationsConfig::from_file(file.notifications);
        let clipboard = ClipboardConfig::from_file(file.clipboard);
        let logging = LoggingConfig::from_file(file.logging);

        Self {
            record_id,
            demo_mode,
            enable_tui,
            gateway,
            drafts,
            notifications,
            clipboard,
            logging,
        }
    }
}
