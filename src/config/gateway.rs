//! Gateway configuration: backend endpoints and provider labels

use crate::model::ProviderId;
use serde::Deserialize;

/// Where the draft backends live and how providers are presented
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Scheme + host of the backend (no trailing slash needed)
    pub base_url: String,

    /// Bearer token forwarded on every call (env only, never written to file)
    pub api_token: Option<String>,

    /// Generation endpoint of the primary provider
    pub primary_path: String,

    /// Generation endpoint of the secondary provider
    pub secondary_path: String,

    /// Saved-draft listing endpoint
    pub saved_path: String,

    /// Request timeout; generation can be slow
    pub timeout_secs: u64,

    /// Display label of the primary provider
    pub primary_label: String,

    /// Display label of the secondary provider
    pub secondary_label: String,

    /// Provider selected when the assistant opens
    pub default_provider: ProviderId,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8787".to_string(),
            api_token: None,
            primary_path: "/services/apexrest/AIEmailService/generateDraft".to_string(),
            secondary_path: "/services/apexrest/AIEmailServiceTest/generateDraft".to_string(),
            saved_path: "/services/apexrest/AIEmailService/savedDrafts".to_string(),
            timeout_secs: 60,
            primary_label: "Primary".to_string(),
            secondary_label: "Gateway".to_string(),
            default_provider: ProviderId::Primary,
        }
    }
}

/// Gateway settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileGateway {
    pub base_url: Option<String>,
    pub primary_path: Option<String>,
    pub secondary_path: Option<String>,
    pub saved_path: Option<String>,
    pub timeout_secs: Option<u64>,
    pub primary_label: Option<String>,
    pub secondary_label: Option<String>,
    pub default_provider: Option<String>,
}

impl GatewayConfig {
    /// Create from file config with defaults; env values win
    pub fn from_file(
        file: Option<FileGateway>,
        env_base_url: Option<String>,
        env_api_token: Option<String>,
    ) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let default_provider = match file.default_provider.as_deref() {
            Some(raw) => ProviderId::parse(raw).unwrap_or_else(|| {
                eprintln!(
                    "Warning: unknown gateway.default_provider {:?}, using primary",
                    raw
                );
                ProviderId::Primary
            }),
            None => defaults.default_provider,
        };

        Self {
            base_url: env_base_url.or(file.base_url).unwrap_or(defaults.base_url),
            api_token: env_api_token.filter(|t| !t.trim().is_empty()),
            primary_path: file.primary_path.unwrap_or(defaults.primary_path),
            secondary_path: file.secondary_path.unwrap_or(defaults.secondary_path),
            saved_path: file.saved_path.unwrap_or(defaults.saved_path),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            primary_label: file.primary_label.unwrap_or(defaults.primary_label),
            secondary_label: file.secondary_label.unwrap_or(defaults.secondary_label),
            default_provider,
        }
    }

    /// URL for an endpoint, or `None` when its path is blank
    pub fn endpoint(&self, path: &str) -> Option<String> {
        (!path.trim().is_empty()).then(|| self.url(path))
    }

    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
