//! Draft provider gateway
//!
//! Uniform async interface over the backend services the assistant talks to:
//! two interchangeable generation providers and one saved-draft listing.
//!
//! # Architecture
//!
//! ```text
//! DraftGateway trait (what the workflow sees)
//! └── ProviderGateway
//!     ├── primary:   Box<dyn DraftProvider>  (HttpDraftProvider | DemoDraftProvider)
//!     ├── secondary: Box<dyn DraftProvider>
//!     └── saved:     Box<dyn SavedDraftSource> (HttpSavedDrafts | DemoSavedDrafts)
//! ```
//!
//! A backend that answers `success: false` is an `Ok(GenerationResult::Failure)`.
//! Only a call that could not complete (network, HTTP status, bad payload) is
//! an `Err(GatewayError)`; the workflow reports the two differently.

use crate::config::Config;
use crate::model::{EmailType, GenerationResult, ProviderId, SavedDraft};
use async_trait::async_trait;
use std::sync::Arc;

pub mod demo;
pub mod http;

pub use demo::{DemoDraftProvider, DemoSavedDrafts};
pub use http::{HttpDraftProvider, HttpSavedDrafts};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A gateway call that did not produce a backend answer
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Provider has no usable configuration (blank endpoint path)
    #[error("Draft provider not configured: {0}")]
    NotConfigured(String),

    /// Connection, timeout or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success HTTP status
    #[error("Server error ({status}): {}", server_detail(.message, .body))]
    Server {
        status: u16,
        /// Structured message extracted from the body, if any
        message: Option<String>,
        /// Raw response body
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The call task itself failed (panicked or was aborted)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Raw bodies are cut to this many chars when shown to the user
const BODY_DETAIL_CHARS: usize = 200;

fn server_detail(message: &Option<String>, body: &str) -> String {
    match message {
        Some(message) => message.clone(),
        None => body_excerpt(body),
    }
}

fn body_excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

impl GatewayError {
    /// Best available human-readable explanation
    ///
    /// Prefers the structured server message, falls back to the error text.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Traits
// ─────────────────────────────────────────────────────────────────────────────

/// The gateway contract consumed by the workflow
#[async_trait]
pub trait DraftGateway: Send + Sync {
    /// Generate a draft using the given provider
    async fn generate(
        &self,
        provider: ProviderId,
        record_id: &str,
        email_type: &EmailType,
    ) -> Result<GenerationResult, GatewayError>;

    /// List saved drafts for a record, in backend order
    async fn list_saved(&self, record_id: &str) -> Result<Vec<SavedDraft>, GatewayError>;
}

/// One generation backend
#[async_trait]
pub trait DraftProvider: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    async fn generate(
        &self,
        record_id: &str,
        email_type: &EmailType,
    ) -> Result<GenerationResult, GatewayError>;
}

/// The saved-draft listing backend
#[async_trait]
pub trait SavedDraftSource: Send + Sync {
    async fn list(&self, record_id: &str) -> Result<Vec<SavedDraft>, GatewayError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider gateway
// ─────────────────────────────────────────────────────────────────────────────

/// Routes generation calls by provider id
pub struct ProviderGateway {
    primary: Box<dyn DraftProvider>,
    secondary: Box<dyn DraftProvider>,
    saved: Box<dyn SavedDraftSource>,
}

impl ProviderGateway {
    pub fn new(
        primary: Box<dyn DraftProvider>,
        secondary: Box<dyn DraftProvider>,
        saved: Box<dyn SavedDraftSource>,
    ) -> Self {
        Self {
            primary,
            secondary,
            saved,
        }
    }

    fn provider(&self, id: ProviderId) -> &dyn DraftProvider {
        match id {
            ProviderId::Primary => self.primary.as_ref(),
            ProviderId::Secondary => self.secondary.as_ref(),
        }
    }
}

#[async_trait]
impl DraftGateway for ProviderGateway {
    async fn generate(
        &self,
        provider: ProviderId,
        record_id: &str,
        email_type: &EmailType,
    ) -> Result<GenerationResult, GatewayError> {
        let backend = self.provider(provider);
        tracing::debug!(
            "Generating {} draft for {} via {} ({})",
            email_type,
            record_id,
            provider,
            backend.name()
        );
        backend.generate(record_id, email_type).await
    }

    async fn list_saved(&self, record_id: &str) -> Result<Vec<SavedDraft>, GatewayError> {
        tracing::debug!("Listing saved drafts for {}", record_id);
        self.saved.list(record_id).await
    }
}

/// Build the gateway from configuration
///
/// Demo mode wires canned backends; otherwise both providers and the saved
/// listing share one HTTP client.
pub fn build(config: &Config) -> anyhow::Result<Arc<dyn DraftGateway>> {
    let gateway = &config.gateway;

    if config.demo_mode {
        tracing::info!("Using demo draft backends");
        return Ok(Arc::new(ProviderGateway::new(
            Box::new(DemoDraftProvider::new(gateway.primary_label.clone())),
            Box::new(DemoDraftProvider::new(gateway.secondary_label.clone())),
            Box::new(DemoSavedDrafts::new()),
        )));
    }

    let client = http::build_client(gateway)?;
    let primary = HttpDraftProvider::new(
        client.clone(),
        gateway.primary_label.clone(),
        gateway.endpoint(&gateway.primary_path),
    );
    let secondary = HttpDraftProvider::new(
        client.clone(),
        gateway.secondary_label.clone(),
        gateway.endpoint(&gateway.secondary_path),
    );
    let saved = HttpSavedDrafts::new(client, gateway.endpoint(&gateway.saved_path));

    tracing::info!(
        "Draft gateway ready: {} ({} / {})",
        gateway.base_url,
        gateway.primary_label,
        gateway.secondary_label
    );

    Ok(Arc::new(ProviderGateway::new(
        Box::new(primary),
        Box::new(secondary),
        Box::new(saved),
    )))
}
