//! Draft catalog and notification timing

use crate::model::{EmailTypeCatalog, DEFAULT_EMAIL_TYPES};
use serde::Deserialize;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Drafts
// ─────────────────────────────────────────────────────────────────────────────

/// Email type catalog settings
#[derive(Debug, Clone)]
pub struct DraftsConfig {
    /// Selectable email types, in display order
    pub catalog: EmailTypeCatalog,

    /// Initially selected type (falls back to the first catalog entry)
    pub default_email_type: Option<String>,
}

impl Default for DraftsConfig {
    fn default() -> Self {
        Self {
            catalog: EmailTypeCatalog::default(),
            default_email_type: None,
        }
    }
}

/// Draft settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileDrafts {
    pub email_types: Option<Vec<String>>,
    pub default_email_type: Option<String>,
}

impl DraftsConfig {
    /// Create from file config with defaults
    ///
    /// An empty or blank `email_types` list is ignored: the catalog must never
    /// be empty.
    pub fn from_file(file: Option<FileDrafts>) -> Self {
        let file = file.unwrap_or_default();

        let catalog = match file.email_types {
            Some(labels) => EmailTypeCatalog::new(labels).unwrap_or_else(|| {
                eprintln!("Warning: drafts.email_types is empty, using built-in types");
                EmailTypeCatalog::default()
            }),
            None => EmailTypeCatalog::default(),
        };

        let default_email_type = file
            .default_email_type
            .filter(|label| catalog.get(label).is_some());

        Self {
            catalog,
            default_email_type,
        }
    }

    /// Labels as plain strings (for serialization)
    pub fn labels(&self) -> Vec<String> {
        self.catalog.iter().map(|t| t.to_string()).collect()
    }

    /// Whether the catalog is the built-in one
    pub fn is_default_catalog(&self) -> bool {
        self.labels() == DEFAULT_EMAIL_TYPES
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// Toast timing
#[derive(Debug, Clone)]
pub struct NotificationsConfig {
    /// Display time of success/info/warning toasts; errors get twice this
    pub base_duration_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            base_duration_ms: 3000,
        }
    }
}

/// Notification settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileNotifications {
    pub base_duration_ms: Option<u64>,
}

impl NotificationsConfig {
    pub fn from_file(file: Option<FileNotifications>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            base_duration_ms: file
                .base_duration_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(Self::default().base_duration_ms),
        }
    }

    pub fn base_duration(&self) -> Duration {
        Duration::from_millis(self.base_duration_ms)
    }
}
