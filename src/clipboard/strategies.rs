//! Concrete copy strategies
//!
//! `arboard` provides the system clipboard on Windows, macOS and Linux
//! (X11/Wayland). OSC 52 covers terminals without a reachable display server,
//! e.g. over SSH.

use super::CopyStrategy;
use anyhow::{Context, Result};
use arboard::Clipboard;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::io::{IsTerminal, Write};

/// Strategy names as they appear in logs and copy outcomes
pub const SESSION: &str = "session";
pub const OSC52: &str = "osc52";
pub const DETACHED: &str = "detached";

// ─────────────────────────────────────────────────────────────────────────────
// Session clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// Clipboard handle opened once and held for the session
pub struct SessionClipboard {
    handle: Option<Clipboard>,
}

impl SessionClipboard {
    /// Try to open the session handle; unavailable if that fails
    pub fn open() -> Self {
        let handle = match Clipboard::new() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::debug!("No session clipboard: {}", e);
                None
            }
        };
        Self { handle }
    }
}

impl CopyStrategy for SessionClipboard {
    fn name(&self) -> &'static str {
        SESSION
    }

    fn is_available(&self) -> bool {
        self.handle.is_some()
    }

    fn copy(&mut self, text: &str) -> Result<()> {
        let handle = self
            .handle
            .as_mut()
            .context("Session clipboard not open")?;

        if let Err(e) = handle.set_text(text) {
            // A handle that failed once is not retried; the detached
            // strategy opens a fresh one instead
            self.handle = None;
            return Err(e).context("Failed to set clipboard text");
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OSC 52
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal clipboard via the OSC 52 escape sequence
pub struct Osc52Clipboard {
    out: Box<dyn Write>,
    terminal: bool,
}

impl Osc52Clipboard {
    /// Write to stdout; available only when stdout is a terminal
    pub fn stdout() -> Self {
        let terminal = std::io::stdout().is_terminal();
        Self::with_writer(Box::new(std::io::stdout()), terminal)
    }

    pub fn with_writer(out: Box<dyn Write>, terminal: bool) -> Self {
        Self { out, terminal }
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

impl CopyStrategy for Osc52Clipboard {
    fn name(&self) -> &'static str {
        OSC52
    }

    fn is_available(&self) -> bool {
        self.terminal
    }

    fn copy(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .context("Failed to write OSC 52 sequence")?;
        self.out.flush().context("Failed to flush terminal")?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detached clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// A short-lived clipboard owner
///
/// Dropping the surface releases it.
pub trait DetachedSurface {
    fn write(&mut self, text: &str) -> Result<()>;
}

/// Creates detached surfaces on demand
pub trait SurfaceFactory {
    type Surface: DetachedSurface;

    fn open(&self) -> Result<Self::Surface>;
}

/// Fallback of last resort: open a surface, write, release
pub struct DetachedClipboard<F: SurfaceFactory> {
    factory: F,
}

impl<F: SurfaceFactory> DetachedClipboard<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F: SurfaceFactory> CopyStrategy for DetachedClipboard<F> {
    fn name(&self) -> &'static str {
        DETACHED
    }

    fn is_available(&self) -> bool {
        true
    }

    fn copy(&mut self, text: &str) -> Result<()> {
        // The surface is a local: released on both the Ok and Err paths
        let mut surface = self.factory.open()?;
        surface.write(text)
    }
}

/// Opens a fresh `arboard` handle per copy
pub struct ArboardFactory;

pub struct ArboardSurface(Clipboard);

impl SurfaceFactory for ArboardFactory {
    type Surface = ArboardSurface;

    fn open(&self) -> Result<ArboardSurface> {
        Clipboard::new()
            .map(ArboardSurface)
            .context("Failed to access clipboard")
    }
}

impl DetachedSurface for ArboardSurface {
    fn write(&mut self, text: &str) -> Result<()> {
        self.0
            .set_text(text)
            .context("Failed to set clipboard text")
    }
}
