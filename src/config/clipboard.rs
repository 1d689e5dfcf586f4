//! Clipboard strategy toggles

use serde::Deserialize;

/// Which copy strategies the fallback chain may use
#[derive(Debug, Clone)]
pub struct ClipboardConfig {
    /// Keep one clipboard handle open for the whole session
    pub session_handle: bool,

    /// Emit OSC 52 escape sequences (works over SSH in most terminals).
    /// Off by default: the terminal cannot report whether it honoured it.
    pub osc52: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            session_handle: true,
            osc52: false,
        }
    }
}

/// Clipboard settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileClipboard {
    pub session_handle: Option<bool>,
    pub osc52: Option<bool>,
}

impl ClipboardConfig {
    pub fn from_file(file: Option<FileClipboard>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            session_handle: file.session_handle.unwrap_or(defaults.session_handle),
            osc52: file.osc52.unwrap_or(defaults.osc52),
        }
    }
}
