// Demo backends: canned drafts for running without a real service
//
// Generation takes a short, realistic pause so the TUI's generating state is
// visible. A record id containing "fail" produces a business failure, and one
// containing "offline" a transport error, so every workflow path can be tried
// by hand.
//
// Run with: DRAFTDESK_DEMO=1 cargo run -- --record 001DEMO

use super::{DraftProvider, GatewayError, SavedDraftSource};
use crate::model::{EmailType, GenerationResult, SavedDraft};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tokio::time::sleep;

/// Simulated backend latency
const DEMO_LATENCY: Duration = Duration::from_millis(1200);

/// Opening line for each known email type
fn opening_for(email_type: &str) -> &'static str {
    match email_type {
        "Renewal" => "Your subscription is coming up for renewal, and we wanted to reach out early.",
        "Upsell" => "Based on how your team uses the platform, a few add-ons could save you real time.",
        "Welcome" => "Welcome aboard! We're thrilled to have you with us.",
        "Follow-up" => "I wanted to follow up on our conversation from last week.",
        "Cold Outreach" => "I'm reaching out because teams like yours often run into the same challenge.",
        "Thank You" => "Thank you for your continued trust in our team.",
        "Proposal" => "Please find below a summary of the proposal we discussed.",
        "Onboarding" => "Here is everything you need to get started in your first week.",
        "Support" => "We've looked into the issue you reported and have an update for you.",
        "Sales" => "I'd love to show you how we can help you hit this quarter's targets.",
        _ => "I hope this message finds you well.",
    }
}

fn compose(label: &str, record_id: &str, email_type: &str) -> String {
    format!(
        "Dear Customer,\n\n{}\n\nI'd be happy to walk you through the details at a time that \
         suits you. Just reply to this email and we'll set something up.\n\n\
         Best regards,\nYour Account Team\n\n-- {} draft for record {} ({})",
        opening_for(email_type),
        email_type,
        record_id,
        label
    )
}

/// Canned generation backend
pub struct DemoDraftProvider {
    label: String,
    latency: Duration,
}

impl DemoDraftProvider {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            latency: DEMO_LATENCY,
        }
    }

    /// Override the simulated latency
    #[cfg(test)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl DraftProvider for DemoDraftProvider {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(
        &self,
        record_id: &str,
        email_type: &EmailType,
    ) -> Result<GenerationResult, GatewayError> {
        sleep(self.latency).await;

        let lowered = record_id.to_lowercase();
        if lowered.contains("offline") {
            return Err(GatewayError::Network(
                "demo backend unreachable".to_string(),
            ));
        }
        if lowered.contains("fail") {
            return Ok(GenerationResult::failure(format!(
                "No contact with an email address found on record {}",
                record_id
            )));
        }

        Ok(GenerationResult::success(compose(
            &self.label,
            record_id,
            email_type.as_str(),
        )))
    }
}

/// Canned saved-draft listing (unsorted on purpose, like a real backend)
pub struct DemoSavedDrafts {
    latency: Duration,
}

impl DemoSavedDrafts {
    pub fn new() -> Self {
        Self {
            latency: DEMO_LATENCY / 2,
        }
    }

    #[cfg(test)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for DemoSavedDrafts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SavedDraftSource for DemoSavedDrafts {
    async fn list(&self, record_id: &str) -> Result<Vec<SavedDraft>, GatewayError> {
        sleep(self.latency).await;

        let now = Utc::now();
        let entries = [
            ("Follow-up", 3, "Alex Morgan"),
            ("Renewal", 0, "Jamie Chen"),
            ("Welcome", 14, "Alex Morgan"),
        ];

        Ok(entries
            .iter()
            .enumerate()
            .map(|(i, (email_type, days_ago, used_by))| SavedDraft {
                id: format!("demo-{}", i + 1),
                email_type: email_type.to_string(),
                content: compose("Primary", record_id, email_type),
                generated_at: now - ChronoDuration::days(*days_ago),
                used_by: used_by.to_string(),
            })
            .collect())
    }
}
