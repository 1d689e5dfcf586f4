// HTTP draft backends
//
// Both generation providers speak the same JSON contract, just at different
// endpoints:
//
//   POST {endpoint}  {"recordId": "...", "emailType": "..."}
//   ->   {"success": true, "draftContent": "...", "errorMessage": null}
//
// The saved-draft listing is a GET with the record id as query parameter and
// returns a JSON array of saved drafts.
//
// Non-2xx statuses become GatewayError::Server. The structured message is
// pulled from `{"message": ...}` or `[{"message": ..., "errorCode": ...}]`
// bodies, which is what REST endpoints on the record platform return.

use super::{DraftProvider, GatewayError, SavedDraftSource};
use crate::config::GatewayConfig;
use crate::model::{EmailType, GenerationResult, SavedDraft};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Build the shared HTTP client (timeout + optional bearer token)
pub fn build_client(config: &GatewayConfig) -> anyhow::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.api_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("API token contains invalid header characters")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()
        .context("Failed to create HTTP client")
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateDraftRequest<'a> {
    record_id: &'a str,
    email_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateDraftResponse {
    success: bool,
    #[serde(default)]
    draft_content: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

impl From<GenerateDraftResponse> for GenerationResult {
    fn from(response: GenerateDraftResponse) -> Self {
        if response.success {
            GenerationResult::success(response.draft_content.unwrap_or_default())
        } else {
            GenerationResult::failure(
                response
                    .error_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract a structured message from an error response body
fn structured_message(body: &str) -> Option<String> {
    if let Ok(single) = serde_json::from_str::<ErrorBody>(body) {
        return Some(single.message);
    }
    serde_json::from_str::<Vec<ErrorBody>>(body)
        .ok()
        .and_then(|list| list.into_iter().next())
        .map(|e| e.message)
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_decode() {
        GatewayError::Decode(e.to_string())
    } else {
        GatewayError::Network(e.to_string())
    }
}

/// Turn a non-success response into a server error
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = structured_message(&body);
    tracing::warn!("Draft backend returned {}: {}", status, body);

    Err(GatewayError::Server {
        status: status.as_u16(),
        message,
        body,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation provider
// ─────────────────────────────────────────────────────────────────────────────

/// Generation backend reached over HTTP
///
/// Without an endpoint every call fails with `NotConfigured` and nothing is sent.
pub struct HttpDraftProvider {
    client: reqwest::Client,
    name: String,
    endpoint: Option<String>,
}

impl HttpDraftProvider {
    pub fn new(
        client: reqwest::Client,
        name: impl Into<String>,
        endpoint: impl Into<Option<String>>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl DraftProvider for HttpDraftProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        record_id: &str,
        email_type: &EmailType,
    ) -> Result<GenerationResult, GatewayError> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            GatewayError::NotConfigured(format!("{} has no endpoint path", self.name))
        })?;

        let request = GenerateDraftRequest {
            record_id,
            email_type: email_type.as_str(),
        };

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let body: GenerateDraftResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("Failed to parse draft response: {}", e)))?;

        tracing::debug!("{} answered success={}", self.name, body.success);
        Ok(body.into())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saved drafts
// ─────────────────────────────────────────────────────────────────────────────

/// Saved-draft listing reached over HTTP
pub struct HttpSavedDrafts {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpSavedDrafts {
    pub fn new(client: reqwest::Client, endpoint: impl Into<Option<String>>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SavedDraftSource for HttpSavedDrafts {
    async fn list(&self, record_id: &str) -> Result<Vec<SavedDraft>, GatewayError> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            GatewayError::NotConfigured("saved-draft listing has no endpoint path".into())
        })?;

        let response = self
            .client
            .get(endpoint)
            .query(&[("recordId", record_id)])
            .send()
            .await
            .map_err(transport_error)?;

        let drafts: Vec<SavedDraft> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("Failed to parse saved drafts: {}", e)))?;

        tracing::debug!("Backend listed {} saved drafts", drafts.len());
        Ok(drafts)
    }
}
