//! Draft workflow - the assistant's state machine
//!
//! ```text
//! Idle ──request──▶ Generating ──success──▶ DraftReady ─┐
//!                        │                              ├─▶ Idle (interactive)
//!                        └──failure/error──▶ Failed ────┘
//! ```
//!
//! The workflow owns `WorkflowState` exclusively. Every mutation publishes an
//! immutable snapshot on a watch channel and user-facing outcomes go out as
//! `Notification`s.
//!
//! Gateway calls come in two shapes:
//! - `request_draft` / `load_saved_drafts`: begin, await, complete in one call
//!   (headless use, tests).
//! - `begin_*` returns a pending call that the TUI spawns; its `Completion`
//!   comes back through a channel and is applied with `complete`.
//!
//! Both paths share the same begin/complete code. The in-flight flags are
//! released exactly once whichever way the call ends, including when the
//! awaiting future is dropped or the spawned task panics.

mod state;

#[cfg(test)]
mod tests;

pub use state::WorkflowState;

use crate::gateway::{DraftGateway, GatewayError};
use crate::model::{
    sort_newest_first, EmailTypeCatalog, GenerationRequest, GenerationResult, ProviderId,
    SavedDraft,
};
use crate::notify::Notifier;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Caller errors: the action was refused and nothing changed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("A request is already in progress")]
    Busy,

    #[error("No record selected")]
    EmptyRecordId,

    #[error("Unknown email type: {0}")]
    UnknownEmailType(String),

    #[error("Draft is read-only")]
    ReadOnly,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pending calls and completions
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a spawned gateway call, fed back with [`DraftWorkflow::complete`]
#[derive(Debug)]
pub enum Completion {
    Generation(GenerationCompletion),
    SavedDrafts(SavedDraftsCompletion),
}

#[derive(Debug)]
pub struct GenerationCompletion {
    pub request: GenerationRequest,
    pub outcome: Result<GenerationResult, GatewayError>,
}

#[derive(Debug)]
pub struct SavedDraftsCompletion {
    pub id: u64,
    pub outcome: Result<Vec<SavedDraft>, GatewayError>,
}

/// An issued generation call that has not run yet
pub struct PendingGeneration {
    request: GenerationRequest,
    gateway: Arc<dyn DraftGateway>,
}

impl PendingGeneration {
    #[cfg(test)]
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Perform the gateway call
    pub async fn run(self) -> GenerationCompletion {
        let outcome = self
            .gateway
            .generate(
                self.request.provider,
                &self.request.record_id,
                &self.request.email_type,
            )
            .await;

        GenerationCompletion {
            request: self.request,
            outcome,
        }
    }

    /// Run on the tokio runtime and deliver the completion to `tx`
    ///
    /// A panicking call still delivers a completion (as an internal error).
    pub fn spawn(self, tx: mpsc::UnboundedSender<Completion>) {
        let request = self.request.clone();
        let call = tokio::spawn(self.run());

        tokio::spawn(async move {
            let completion = match call.await {
                Ok(completion) => completion,
                Err(e) => GenerationCompletion {
                    request,
                    outcome: Err(GatewayError::Internal(e.to_string())),
                },
            };
            if tx.send(Completion::Generation(completion)).is_err() {
                tracing::debug!("Generation finished after the view closed");
            }
        });
    }
}

/// An issued saved-draft listing that has not run yet
pub struct PendingSavedDrafts {
    id: u64,
    record_id: String,
    gateway: Arc<dyn DraftGateway>,
}

impl PendingSavedDrafts {
    pub async fn run(self) -> SavedDraftsCompletion {
        let outcome = self.gateway.list_saved(&self.record_id).await;
        SavedDraftsCompletion {
            id: self.id,
            outcome,
        }
    }

    /// Run on the tokio runtime and deliver the completion to `tx`
    pub fn spawn(self, tx: mpsc::UnboundedSender<Completion>) {
        let id = self.id;
        let call = tokio::spawn(self.run());

        tokio::spawn(async move {
            let completion = match call.await {
                Ok(completion) => completion,
                Err(e) => SavedDraftsCompletion {
                    id,
                    outcome: Err(GatewayError::Internal(e.to_string())),
                },
            };
            if tx.send(Completion::SavedDrafts(completion)).is_err() {
                tracing::debug!("Saved-draft listing finished after the view closed");
            }
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-flight bookkeeping
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct InFlightGeneration {
    id: u64,
    /// Show the previous draft again if this request does not replace it
    restore_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    Generation,
    SavedDrafts,
}

/// Releases an in-flight flag when dropped
///
/// `complete_*` releases first in the normal case, which makes the drop a
/// no-op; the guard only matters when the awaiting future is abandoned.
struct InFlight<'a> {
    workflow: &'a mut DraftWorkflow,
    kind: CallKind,
    id: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        match self.kind {
            CallKind::Generation => self.workflow.release_generation(self.id),
            CallKind::SavedDrafts => self.workflow.release_saved_drafts(self.id),
        }
    }
}

/// Display labels used in notification text
#[derive(Debug, Clone)]
pub struct ProviderLabels {
    pub primary: String,
    pub secondary: String,
}

impl ProviderLabels {
    pub fn get(&self, provider: ProviderId) -> &str {
        match provider {
            ProviderId::Primary => &self.primary,
            ProviderId::Secondary => &self.secondary,
        }
    }
}

impl Default for ProviderLabels {
    fn default() -> Self {
        Self {
            primary: "Primary".to_string(),
            secondary: "Gateway".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Workflow
// ─────────────────────────────────────────────────────────────────────────────

/// The draft-generation state machine for one record context
pub struct DraftWorkflow {
    gateway: Arc<dyn DraftGateway>,
    catalog: EmailTypeCatalog,
    labels: ProviderLabels,
    notifier: Notifier,
    state: WorkflowState,
    snapshots: watch::Sender<WorkflowState>,
    next_call_id: u64,
    generation: Option<InFlightGeneration>,
    listing: Option<u64>,
}

impl DraftWorkflow {
    /// Create a workflow selecting the first catalog entry and the primary provider
    pub fn new(gateway: Arc<dyn DraftGateway>, catalog: EmailTypeCatalog, notifier: Notifier) -> Self {
        let state = WorkflowState::new(catalog.first().clone(), ProviderId::Primary);
        let (snapshots, _) = watch::channel(state.clone());

        Self {
            gateway,
            catalog,
            labels: ProviderLabels::default(),
            notifier,
            state,
            snapshots,
            next_call_id: 0,
            generation: None,
            listing: None,
        }
    }

    pub fn with_labels(mut self, labels: ProviderLabels) -> Self {
        self.labels = labels;
        self
    }

    // ─── Read access ─────────────────────────────────────────────

    /// Current state (borrowed)
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> WorkflowState {
        self.state.clone()
    }

    /// Receive a new snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.snapshots.subscribe()
    }

    pub fn labels(&self) -> &ProviderLabels {
        &self.labels
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }

    fn next_id(&mut self) -> u64 {
        self.next_call_id += 1;
        self.next_call_id
    }

    // ─── Selection ───────────────────────────────────────────────

    pub fn set_provider(&mut self, provider: ProviderId) {
        if self.state.provider != provider {
            self.state.provider = provider;
            tracing::debug!("Provider set to {}", provider);
            self.publish();
        }
    }

    pub fn set_email_type(&mut self, label: &str) -> Result<(), WorkflowError> {
        let email_type = self
            .catalog
            .get(label)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownEmailType(label.to_string()))?;

        if self.state.email_type != email_type {
            self.state.email_type = email_type;
            self.publish();
        }
        Ok(())
    }

    /// Select the next email type in catalog order (wraps)
    pub fn next_email_type(&mut self) {
        self.state.email_type = self.catalog.next_after(&self.state.email_type).clone();
        self.publish();
    }

    /// Select the previous email type in catalog order (wraps)
    pub fn prev_email_type(&mut self) {
        self.state.email_type = self.catalog.prev_before(&self.state.email_type).clone();
        self.publish();
    }

    pub fn set_editable(&mut self, editable: bool) {
        if self.state.editable != editable {
            self.state.editable = editable;
            self.publish();
        }
    }

    // ─── Generation ──────────────────────────────────────────────

    /// Issue a generation request without awaiting it
    pub fn begin_generation(
        &mut self,
        record_id: &str,
        email_type: &str,
        provider: ProviderId,
    ) -> Result<PendingGeneration, WorkflowError> {
        if self.generation.is_some() {
            return Err(WorkflowError::Busy);
        }

        let record_id = record_id.trim();
        if record_id.is_empty() {
            return Err(WorkflowError::EmptyRecordId);
        }

        let email_type = self
            .catalog
            .get(email_type)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownEmailType(email_type.to_string()))?;

        let request = GenerationRequest {
            id: self.next_id(),
            record_id: record_id.to_string(),
            email_type,
            provider,
        };

        self.generation = Some(InFlightGeneration {
            id: request.id,
            restore_visible: self.state.draft_visible,
        });
        self.state.generating = true;
        self.state.draft_visible = false;
        self.publish();

        tracing::info!(
            "Generating {} draft for {} via {} (request #{})",
            request.email_type,
            request.record_id,
            request.provider,
            request.id
        );

        Ok(PendingGeneration {
            request,
            gateway: self.gateway.clone(),
        })
    }

    /// Generate a draft and wait for the outcome
    ///
    /// `Err` only for refused requests; backend failures are reported as
    /// notifications and leave the draft untouched.
    pub async fn request_draft(
        &mut self,
        record_id: &str,
        email_type: &str,
        provider: ProviderId,
    ) -> Result<(), WorkflowError> {
        let pending = self.begin_generation(record_id, email_type, provider)?;
        let guard = InFlight {
            id: pending.request.id,
            workflow: self,
            kind: CallKind::Generation,
        };

        let completion = pending.run().await;
        guard.workflow.complete_generation(completion);
        Ok(())
    }

    /// Apply the outcome of a generation request
    pub fn complete_generation(&mut self, completion: GenerationCompletion) {
        let GenerationCompletion { request, outcome } = completion;

        let Some(flight) = self.generation else {
            tracing::debug!("Ignoring completion of request #{}: nothing in flight", request.id);
            return;
        };
        if flight.id != request.id {
            tracing::warn!(
                "Ignoring stale completion of request #{} (in flight: #{})",
                request.id,
                flight.id
            );
            return;
        }

        match outcome {
            Ok(GenerationResult::Success { draft_content }) => {
                tracing::info!(
                    "Draft generated for {} ({} chars)",
                    request.record_id,
                    draft_content.chars().count()
                );
                self.state.current_draft = draft_content;
                self.state.draft_visible = !self.state.current_draft.is_empty();
                self.notifier.success(self.success_message(request.provider));
            }
            Ok(GenerationResult::Failure { error_message }) => {
                tracing::error!("Backend returned error: {}", error_message);
                self.restore_draft_visibility(flight.restore_visible);
                self.notifier.error(error_message);
            }
            Err(e) => {
                tracing::error!("Draft generation call failed: {}", e);
                self.restore_draft_visibility(flight.restore_visible);
                self.notifier
                    .error(format!("Failed to generate draft: {}", e.diagnostic()));
            }
        }

        self.release_generation(request.id);
    }

    fn success_message(&self, provider: ProviderId) -> String {
        match provider {
            ProviderId::Primary => "Email draft generated successfully!".to_string(),
            ProviderId::Secondary => format!(
                "Email draft generated successfully! ({})",
                self.labels.get(provider)
            ),
        }
    }

    fn restore_draft_visibility(&mut self, restore: bool) {
        self.state.draft_visible = restore && !self.state.current_draft.is_empty();
    }

    /// Clear the generating flag if `id` is the call in flight
    fn release_generation(&mut self, id: u64) {
        if self.generation.map(|g| g.id) != Some(id) {
            return;
        }
        self.generation = None;
        self.state.generating = false;
        self.publish();
        tracing::debug!("Request #{} released", id);
    }

    // ─── Saved drafts ────────────────────────────────────────────

    /// Issue a saved-draft listing without awaiting it
    pub fn begin_loading_saved(
        &mut self,
        record_id: &str,
    ) -> Result<PendingSavedDrafts, WorkflowError> {
        if self.listing.is_some() {
            return Err(WorkflowError::Busy);
        }

        let record_id = record_id.trim();
        if record_id.is_empty() {
            return Err(WorkflowError::EmptyRecordId);
        }

        let id = self.next_id();
        self.listing = Some(id);
        self.state.loading_saved_drafts = true;
        self.publish();

        tracing::info!("Loading saved drafts for {}", record_id);

        Ok(PendingSavedDrafts {
            id,
            record_id: record_id.to_string(),
            gateway: self.gateway.clone(),
        })
    }

    /// Load saved drafts and wait for the outcome
    pub async fn load_saved_drafts(&mut self, record_id: &str) -> Result<(), WorkflowError> {
        let pending = self.begin_loading_saved(record_id)?;
        let guard = InFlight {
            id: pending.id,
            workflow: self,
            kind: CallKind::SavedDrafts,
        };

        let completion = pending.run().await;
        guard.workflow.complete_saved_drafts(completion);
        Ok(())
    }

    /// Apply the outcome of a saved-draft listing
    pub fn complete_saved_drafts(&mut self, completion: SavedDraftsCompletion) {
        if self.listing != Some(completion.id) {
            tracing::warn!("Ignoring stale saved-draft listing #{}", completion.id);
            return;
        }

        match completion.outcome {
            Ok(mut drafts) => {
                sort_newest_first(&mut drafts);
                tracing::info!("Loaded {} saved drafts", drafts.len());
                self.state.saved_drafts = drafts;
                self.state.saved_drafts_visible = true;
            }
            Err(e) => {
                tracing::error!("Saved-draft listing failed: {}", e);
                self.state.saved_drafts_visible = false;
                self.notifier
                    .error(format!("Failed to load saved drafts: {}", e.diagnostic()));
            }
        }

        self.release_saved_drafts(completion.id);
    }

    fn release_saved_drafts(&mut self, id: u64) {
        if self.listing != Some(id) {
            return;
        }
        self.listing = None;
        self.state.loading_saved_drafts = false;
        self.publish();
    }

    /// Use a saved draft as the current draft
    ///
    /// Unknown ids (a stale list entry) are ignored: returns `false`, no
    /// notification, nothing changes.
    pub fn select_saved_draft(&mut self, id: &str) -> bool {
        let Some(content) = self
            .state
            .saved_drafts
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.content.clone())
        else {
            tracing::debug!("Saved draft {} not in current list", id);
            return false;
        };

        self.state.current_draft = content;
        if let Some(flight) = self.generation.as_mut() {
            // Shown once the in-flight request resolves without replacing it
            flight.restore_visible = true;
        } else {
            self.state.draft_visible = !self.state.current_draft.is_empty();
        }
        self.state.saved_drafts_visible = false;
        self.publish();

        self.notifier.success("Saved draft loaded");
        true
    }

    pub fn close_saved_drafts(&mut self) {
        if self.state.saved_drafts_visible {
            self.state.saved_drafts_visible = false;
            self.publish();
        }
    }

    // ─── Editing ─────────────────────────────────────────────────

    /// Discard the current draft
    pub fn clear_draft(&mut self) {
        self.state.current_draft.clear();
        self.state.draft_visible = false;
        if let Some(flight) = self.generation.as_mut() {
            flight.restore_visible = false;
        }
        self.publish();
        self.notifier.info("Draft cleared");
    }

    /// Replace the draft text with a user edit
    pub fn edit_draft(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        if !self.state.editable {
            return Err(WorkflowError::ReadOnly);
        }
        if self.generation.is_some() {
            return Err(WorkflowError::Busy);
        }

        self.state.current_draft = text.into();
        self.state.draft_visible = !self.state.current_draft.is_empty();
        self.publish();
        Ok(())
    }

    // ─── Completions ─────────────────────────────────────────────

    /// Apply a completion delivered by a spawned call
    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Generation(c) => self.complete_generation(c),
            Completion::SavedDrafts(c) => self.complete_saved_drafts(c),
        }
    }
}
