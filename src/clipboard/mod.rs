//! Clipboard copy with a fallback chain
//!
//! A copy walks an ordered list of strategies. Each strategy first says
//! whether it can run at all (`is_available`); the first one that copies
//! successfully wins. Failures are collected, never raised.
//!
//! Default chain:
//! 1. `SessionClipboard` - the clipboard handle held for the whole session
//! 2. `Osc52Clipboard` - terminal escape sequence (opt-in)
//! 3. `DetachedClipboard` - a fresh handle, released right after writing

mod strategies;

pub use strategies::{ArboardFactory, DetachedClipboard, Osc52Clipboard, SessionClipboard};
#[cfg(test)]
pub use strategies::{DetachedSurface, SurfaceFactory};

use crate::config::ClipboardConfig;
use crate::notify::Notifier;

/// One way of putting text on the clipboard
pub trait CopyStrategy {
    /// Short name for logs and outcomes
    fn name(&self) -> &'static str;

    /// Whether this strategy can be attempted right now
    fn is_available(&self) -> bool;

    fn copy(&mut self, text: &str) -> anyhow::Result<()>;
}

/// A strategy that was attempted and failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyFailure {
    /// Empty text; nothing was attempted
    NothingToCopy,
    /// No strategy passed its availability check
    Unavailable,
    /// Every available strategy failed
    AllFailed(Vec<StrategyFailure>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { strategy: &'static str },
    Failed { reason: CopyFailure },
}

impl CopyOutcome {
    /// Report the outcome to the user
    pub fn notify(&self, notifier: &Notifier) {
        match self {
            Self::Copied { .. } => notifier.success("Email draft copied to clipboard!"),
            Self::Failed {
                reason: CopyFailure::NothingToCopy,
            } => notifier.warning("Nothing to copy"),
            Self::Failed { .. } => notifier.error("Failed to copy to clipboard"),
        }
    }
}

/// Names of the strategies `ClipboardCopier::from_config` builds, in order
///
/// Reads configuration only; no clipboard handle is opened.
pub fn chain_names(config: &ClipboardConfig) -> Vec<&'static str> {
    let mut names = Vec::new();
    if config.session_handle {
        names.push(strategies::SESSION);
    }
    if config.osc52 {
        names.push(strategies::OSC52);
    }
    names.push(strategies::DETACHED);
    names
}

/// Ordered clipboard fallback chain
pub struct ClipboardCopier {
    strategies: Vec<Box<dyn CopyStrategy>>,
}

impl ClipboardCopier {
    pub fn new(strategies: Vec<Box<dyn CopyStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the chain enabled by configuration
    ///
    /// The detached strategy is always last and always present.
    pub fn from_config(config: &ClipboardConfig) -> Self {
        let mut strategies: Vec<Box<dyn CopyStrategy>> = Vec::new();

        if config.session_handle {
            strategies.push(Box::new(SessionClipboard::open()));
        }
        if config.osc52 {
            strategies.push(Box::new(Osc52Clipboard::stdout()));
        }
        strategies.push(Box::new(DetachedClipboard::new(ArboardFactory)));

        tracing::debug!("Clipboard chain: {}", chain_names(config).join(" -> "));

        Self::new(strategies)
    }

    /// Copy `text` using the first strategy that succeeds
    pub fn copy(&mut self, text: &str) -> CopyOutcome {
        if text.is_empty() {
            return CopyOutcome::Failed {
                reason: CopyFailure::NothingToCopy,
            };
        }

        let mut failures = Vec::new();

        for strategy in self.strategies.iter_mut() {
            if !strategy.is_available() {
                tracing::trace!("Clipboard strategy {} unavailable", strategy.name());
                continue;
            }

            match strategy.copy(text) {
                Ok(()) => {
                    tracing::debug!(
                        "Copied {} chars via {}",
                        text.chars().count(),
                        strategy.name()
                    );
                    return CopyOutcome::Copied {
                        strategy: strategy.name(),
                    };
                }
                Err(e) => {
                    tracing::warn!("Clipboard strategy {} failed: {:#}", strategy.name(), e);
                    failures.push(StrategyFailure {
                        strategy: strategy.name(),
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        let reason = if failures.is_empty() {
            CopyFailure::Unavailable
        } else {
            CopyFailure::AllFailed(failures)
        };
        tracing::error!("Clipboard copy failed: {:?}", reason);
        CopyOutcome::Failed { reason }
    }
}
