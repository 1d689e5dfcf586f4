//! Workflow tests against a scripted gateway

use super::*;
use crate::gateway::{DraftGateway, GatewayError};
use crate::model::{EmailType, SavedDraft, PREVIEW_CHARS};
use crate::notify::{Notification, Severity};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

// ─────────────────────────────────────────────────────────────────────────────
// Scripted gateway
// ─────────────────────────────────────────────────────────────────────────────

enum Reply<T> {
    Ready(Result<T, GatewayError>),
    Hang,
    Panic,
}

#[derive(Default)]
struct ScriptedGateway {
    generate: Mutex<VecDeque<Reply<GenerationResult>>>,
    saved: Mutex<VecDeque<Reply<Vec<SavedDraft>>>>,
    generate_calls: AtomicUsize,
    last_call: Mutex<Option<(ProviderId, String, String)>>,
}

impl ScriptedGateway {
    fn new() -> Self {
        Self::default()
    }

    fn then_generate(self, reply: Reply<GenerationResult>) -> Self {
        self.generate.lock().unwrap().push_back(reply);
        self
    }

    fn then_saved(self, reply: Reply<Vec<SavedDraft>>) -> Self {
        self.saved.lock().unwrap().push_back(reply);
        self
    }

    fn calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

async fn play<T>(reply: Option<Reply<T>>) -> Result<T, GatewayError> {
    match reply {
        Some(Reply::Ready(result)) => result,
        Some(Reply::Hang) => std::future::pending().await,
        Some(Reply::Panic) => panic!("scripted gateway panic"),
        None => Err(GatewayError::Internal("no scripted reply".into())),
    }
}

#[async_trait]
impl DraftGateway for ScriptedGateway {
    async fn generate(
        &self,
        provider: ProviderId,
        record_id: &str,
        email_type: &EmailType,
    ) -> Result<GenerationResult, GatewayError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() =
            Some((provider, record_id.to_string(), email_type.to_string()));
        let reply = self.generate.lock().unwrap().pop_front();
        play(reply).await
    }

    async fn list_saved(&self, _record_id: &str) -> Result<Vec<SavedDraft>, GatewayError> {
        let reply = self.saved.lock().unwrap().pop_front();
        play(reply).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

const BASE: Duration = Duration::from_millis(3000);

fn workflow(
    gateway: ScriptedGateway,
) -> (DraftWorkflow, Arc<ScriptedGateway>, UnboundedReceiver<Notification>) {
    let gateway = Arc::new(gateway);
    let (notifier, rx) = Notifier::channel(BASE);
    let workflow = DraftWorkflow::new(gateway.clone(), EmailTypeCatalog::default(), notifier);
    (workflow, gateway, rx)
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

fn ok(content: &str) -> Reply<GenerationResult> {
    Reply::Ready(Ok(GenerationResult::success(content)))
}

fn saved(id: &str, content: &str, day: u32) -> SavedDraft {
    SavedDraft {
        id: id.to_string(),
        email_type: "Renewal".to_string(),
        content: content.to_string(),
        generated_at: Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap(),
        used_by: "Alex Morgan".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_renewal_primary_success() {
    let (mut wf, gateway, mut rx) = workflow(ScriptedGateway::new().then_generate(ok("Dear Customer,...")));

    wf.request_draft("001x", "Renewal", ProviderId::Primary)
        .await
        .unwrap();

    let state = wf.state();
    assert_eq!(state.current_draft, "Dear Customer,...");
    assert!(state.draft_visible);
    assert!(!state.generating);
    assert_eq!(
        *gateway.last_call.lock().unwrap(),
        Some((ProviderId::Primary, "001x".to_string(), "Renewal".to_string()))
    );

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
    assert_eq!(notes[0].message, "Email draft generated successfully!");
    assert_eq!(notes[0].display_duration, BASE);
}

#[tokio::test]
async fn test_secondary_success_names_provider() {
    let (mut wf, gateway, mut rx) = workflow(ScriptedGateway::new().then_generate(ok("Hi there")));

    wf.request_draft("001x", "Welcome", ProviderId::Secondary)
        .await
        .unwrap();

    assert_eq!(wf.state().current_draft, "Hi there");
    assert!(wf.state().draft_visible);
    assert!(!wf.state().generating);
    assert_eq!(gateway.last_call.lock().unwrap().as_ref().unwrap().0, ProviderId::Secondary);

    let notes = drain(&mut rx);
    assert_eq!(notes[0].message, "Email draft generated successfully! (Gateway)");
}

#[tokio::test]
async fn test_upsell_secondary_business_failure() {
    let (mut wf, _gateway, mut rx) = workflow(
        ScriptedGateway::new().then_generate(Reply::Ready(Ok(GenerationResult::failure(
            "quota exceeded",
        )))),
    );

    wf.request_draft("001x", "Upsell", ProviderId::Secondary)
        .await
        .unwrap();

    let state = wf.state();
    assert_eq!(state.current_draft, "");
    assert!(!state.draft_visible);
    assert!(!state.generating);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
    assert_eq!(notes[0].message, "quota exceeded");
    assert_eq!(notes[0].display_duration, BASE * 2);
}

#[tokio::test]
async fn test_failure_keeps_previous_draft_visible() {
    let (mut wf, _gateway, mut rx) = workflow(
        ScriptedGateway::new()
            .then_generate(ok("first draft"))
            .then_generate(Reply::Ready(Ok(GenerationResult::failure("nope")))),
    );

    wf.request_draft("001x", "Renewal", ProviderId::Primary).await.unwrap();
    wf.request_draft("001x", "Renewal", ProviderId::Primary).await.unwrap();

    assert_eq!(wf.state().current_draft, "first draft");
    assert!(wf.state().draft_visible);
    assert!(!wf.state().generating);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1].message, "nope");
}

#[tokio::test]
async fn test_transport_error_reports_diagnostic() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_generate(Reply::Ready(
        Err(GatewayError::Server {
            status: 400,
            message: Some("Record not found".into()),
            body: "[{\"message\":\"Record not found\"}]".into(),
        }),
    )));

    wf.request_draft("001x", "Renewal", ProviderId::Primary).await.unwrap();

    assert!(!wf.state().generating);
    assert!(!wf.state().draft_visible);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
    assert_eq!(notes[0].message, "Failed to generate draft: Record not found");
}

#[tokio::test]
async fn test_network_error_uses_error_text() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_generate(Reply::Ready(
        Err(GatewayError::Network("connection refused".into())),
    )));

    wf.request_draft("001x", "Renewal", ProviderId::Primary).await.unwrap();

    let notes = drain(&mut rx);
    assert_eq!(
        notes[0].message,
        "Failed to generate draft: Network error: connection refused"
    );
    assert!(!wf.state().generating);
}

#[tokio::test]
async fn test_empty_success_hides_draft() {
    let (mut wf, _gateway, _rx) = workflow(ScriptedGateway::new().then_generate(ok("")));

    wf.request_draft("001x", "Renewal", ProviderId::Primary).await.unwrap();

    assert_eq!(wf.state().current_draft, "");
    assert!(!wf.state().draft_visible);
    assert!(!wf.state().generating);
}

#[tokio::test]
async fn test_rejected_requests_change_nothing() {
    let (mut wf, gateway, mut rx) = workflow(ScriptedGateway::new());
    let before = wf.snapshot();

    assert_eq!(
        wf.request_draft("   ", "Renewal", ProviderId::Primary).await,
        Err(WorkflowError::EmptyRecordId)
    );
    assert_eq!(
        wf.request_draft("001x", "Haiku", ProviderId::Primary).await,
        Err(WorkflowError::UnknownEmailType("Haiku".into()))
    );

    assert_eq!(wf.snapshot(), before);
    assert_eq!(gateway.calls(), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_record_id_is_trimmed() {
    let (mut wf, gateway, _rx) = workflow(ScriptedGateway::new().then_generate(ok("x")));

    wf.request_draft("  001x \n", "Renewal", ProviderId::Primary).await.unwrap();

    assert_eq!(gateway.last_call.lock().unwrap().as_ref().unwrap().1, "001x");
}

#[tokio::test]
async fn test_second_request_while_generating_is_busy() {
    let (mut wf, gateway, _rx) = workflow(ScriptedGateway::new().then_generate(Reply::Hang));

    let pending = wf.begin_generation("001x", "Renewal", ProviderId::Primary).unwrap();
    assert!(wf.state().generating);
    assert!(!wf.state().draft_visible);

    assert!(matches!(
        wf.begin_generation("001x", "Upsell", ProviderId::Secondary),
        Err(WorkflowError::Busy)
    ));

    drop(pending);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_dropped_request_releases_generating() {
    let (mut wf, _gateway, _rx) = workflow(ScriptedGateway::new().then_generate(Reply::Hang));

    {
        let mut call = Box::pin(wf.request_draft("001x", "Renewal", ProviderId::Primary));
        let timed_out = tokio::time::timeout(Duration::from_millis(20), &mut call).await;
        assert!(timed_out.is_err());
    }

    assert!(!wf.state().generating);
    assert!(wf.begin_generation("001x", "Renewal", ProviderId::Primary).is_ok());
}

#[tokio::test]
async fn test_spawned_generation_round_trip() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_generate(ok("spawned")));
    let (tx, mut completions) = mpsc::unbounded_channel();

    wf.begin_generation("001x", "Renewal", ProviderId::Primary)
        .unwrap()
        .spawn(tx);

    let completion = completions.recv().await.unwrap();
    wf.complete(completion);

    assert_eq!(wf.state().current_draft, "spawned");
    assert!(!wf.state().generating);
    assert_eq!(drain(&mut rx).len(), 1);
}

#[tokio::test]
async fn test_panicking_call_still_completes() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_generate(Reply::Panic));
    let (tx, mut completions) = mpsc::unbounded_channel();

    wf.begin_generation("001x", "Renewal", ProviderId::Primary)
        .unwrap()
        .spawn(tx);

    match completions.recv().await.unwrap() {
        Completion::Generation(c) => {
            assert!(matches!(c.outcome, Err(GatewayError::Internal(_))));
            wf.complete_generation(c);
        }
        other => panic!("Expected generation completion, got {:?}", other),
    }

    assert!(!wf.state().generating);
    let notes = drain(&mut rx);
    assert!(notes[0].message.starts_with("Failed to generate draft: Internal error"));
}

#[tokio::test]
async fn test_stale_completion_is_ignored() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new());

    let pending = wf.begin_generation("001x", "Renewal", ProviderId::Primary).unwrap();
    let mut stale = pending.request().clone();
    stale.id += 100;

    wf.complete_generation(GenerationCompletion {
        request: stale,
        outcome: Ok(GenerationResult::success("stale")),
    });

    assert_eq!(wf.state().current_draft, "");
    assert!(wf.state().generating);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_snapshots_are_published() {
    let (mut wf, _gateway, _rx) = workflow(ScriptedGateway::new().then_generate(Reply::Hang));
    let mut snapshots = wf.subscribe();

    let _pending = wf.begin_generation("001x", "Renewal", ProviderId::Primary).unwrap();

    assert!(snapshots.has_changed().unwrap());
    assert!(snapshots.borrow_and_update().generating);
}

// ─────────────────────────────────────────────────────────────────────────────
// Saved drafts
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_two_saved_drafts_with_previews() {
    let long = "a".repeat(150);
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_saved(Reply::Ready(Ok(
        vec![saved("d1", &long, 1), saved("d2", "Short one", 2)],
    ))));

    wf.load_saved_drafts("001x").await.unwrap();

    let state = wf.state();
    assert!(state.saved_drafts_visible);
    assert!(!state.loading_saved_drafts);
    assert_eq!(state.saved_drafts.len(), 2);

    let entries = state.saved_draft_entries();
    assert!(entries
        .iter()
        .all(|e| e.preview.chars().count() <= PREVIEW_CHARS + 3));
    let long_entry = entries.iter().find(|e| e.draft.id == "d1").unwrap();
    assert!(long_entry.preview.ends_with("..."));
    assert!(!long_entry.formatted_date.is_empty());

    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_saved_drafts_sorted_newest_first() {
    let (mut wf, _gateway, _rx) = workflow(ScriptedGateway::new().then_saved(Reply::Ready(Ok(
        vec![saved("old", "a", 1), saved("new", "b", 20), saved("mid", "c", 10)],
    ))));

    wf.load_saved_drafts("001x").await.unwrap();

    let ids: Vec<&str> = wf.state().saved_drafts.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn test_saved_drafts_failure_keeps_panel_closed() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_saved(Reply::Ready(
        Err(GatewayError::Network("timed out".into())),
    )));

    wf.load_saved_drafts("001x").await.unwrap();

    assert!(!wf.state().saved_drafts_visible);
    assert!(!wf.state().loading_saved_drafts);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(
        notes[0].message,
        "Failed to load saved drafts: Network error: timed out"
    );
}

#[tokio::test]
async fn test_saved_listing_is_busy_while_loading() {
    let (mut wf, _gateway, _rx) = workflow(ScriptedGateway::new().then_saved(Reply::Hang));

    let _pending = wf.begin_loading_saved("001x").unwrap();
    assert!(wf.state().loading_saved_drafts);
    assert!(matches!(wf.begin_loading_saved("001x"), Err(WorkflowError::Busy)));
}

#[tokio::test]
async fn test_select_saved_draft() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_saved(Reply::Ready(Ok(
        vec![saved("d1", "Saved content", 1)],
    ))));
    wf.load_saved_drafts("001x").await.unwrap();

    assert!(wf.select_saved_draft("d1"));

    let state = wf.state();
    assert_eq!(state.current_draft, "Saved content");
    assert!(state.draft_visible);
    assert!(!state.saved_drafts_visible);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
}

#[tokio::test]
async fn test_select_unknown_saved_draft_is_noop() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_saved(Reply::Ready(Ok(
        vec![saved("d1", "Saved content", 1)],
    ))));
    wf.load_saved_drafts("001x").await.unwrap();
    let before = wf.snapshot();

    assert!(!wf.select_saved_draft("missing"));

    assert_eq!(wf.snapshot(), before);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_selected_draft_shown_after_failed_generation() {
    let (mut wf, _gateway, _rx) = workflow(
        ScriptedGateway::new()
            .then_saved(Reply::Ready(Ok(vec![saved("d1", "Saved content", 1)])))
            .then_generate(Reply::Ready(Ok(GenerationResult::failure("nope")))),
    );
    wf.load_saved_drafts("001x").await.unwrap();

    let pending = wf.begin_generation("001x", "Renewal", ProviderId::Primary).unwrap();
    assert!(wf.select_saved_draft("d1"));
    assert!(!wf.state().draft_visible);

    let completion = pending.run().await;
    wf.complete_generation(completion);

    assert_eq!(wf.state().current_draft, "Saved content");
    assert!(wf.state().draft_visible);
}

// ─────────────────────────────────────────────────────────────────────────────
// Editing and selection
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_clear_draft_is_idempotent() {
    let (mut wf, _gateway, mut rx) = workflow(ScriptedGateway::new().then_generate(ok("text")));
    wf.request_draft("001x", "Renewal", ProviderId::Primary).await.unwrap();
    drain(&mut rx);

    wf.clear_draft();
    let once = wf.snapshot();
    wf.clear_draft();

    assert_eq!(wf.snapshot(), once);
    assert_eq!(once.current_draft, "");
    assert!(!once.draft_visible);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.severity == Severity::Info));
}

#[tokio::test]
async fn test_edit_requires_editable() {
    let (mut wf, _gateway, _rx) = workflow(ScriptedGateway::new());

    assert_eq!(wf.edit_draft("typed"), Err(WorkflowError::ReadOnly));

    wf.set_editable(true);
    wf.edit_draft("typed").unwrap();
    assert_eq!(wf.state().current_draft, "typed");
    assert!(wf.state().draft_visible);

    wf.edit_draft("").unwrap();
    assert!(!wf.state().draft_visible);
}

#[tokio::test]
async fn test_edit_refused_while_generating() {
    let (mut wf, _gateway, _rx) = workflow(ScriptedGateway::new());
    wf.set_editable(true);

    let _pending = wf.begin_generation("001x", "Renewal", ProviderId::Primary).unwrap();
    assert_eq!(wf.edit_draft("typed"), Err(WorkflowError::Busy));
}

#[test]
fn test_email_type_and_provider_selection() {
    let (notifier, _rx) = Notifier::channel(BASE);
    let mut wf = DraftWorkflow::new(
        Arc::new(ScriptedGateway::new()),
        EmailTypeCatalog::default(),
        notifier,
    );

    assert_eq!(wf.state().email_type.as_str(), "Renewal");
    wf.next_email_type();
    assert_eq!(wf.state().email_type.as_str(), "Upsell");
    wf.prev_email_type();
    wf.prev_email_type();
    assert_eq!(
        wf.state().email_type,
        *EmailTypeCatalog::default().iter().last().unwrap()
    );

    assert!(wf.set_email_type("Welcome").is_ok());
    assert_eq!(
        wf.set_email_type("Limerick"),
        Err(WorkflowError::UnknownEmailType("Limerick".into()))
    );
    assert_eq!(wf.state().email_type.as_str(), "Welcome");

    wf.set_provider(ProviderId::Secondary);
    assert_eq!(wf.state().provider, ProviderId::Secondary);
}
