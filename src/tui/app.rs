// TUI application state - the assistant controller
//
// App wires user input to the workflow and the clipboard chain. It never
// touches workflow state directly: rendering reads the latest published
// snapshot, and every change goes through a DraftWorkflow operation.
//
// Gateway calls are spawned; their completions come back through the
// `completions` channel and are applied in the event loop.

use super::components::{Toast, ToastStack};
use super::theme::{Theme, ThemeKind};
use crate::clipboard::ClipboardCopier;
use crate::config::Config;
use crate::gateway::DraftGateway;
use crate::logging::LogBuffer;
use crate::notify::{Notification, Notifier};
use crate::workflow::{Completion, DraftWorkflow, ProviderLabels, WorkflowError, WorkflowState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Spinner frames for in-flight requests
const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Keys go to the draft editor
    Editing,
}

/// A user intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate,
    ToggleProvider,
    NextEmailType,
    PrevEmailType,
    ShowSavedDrafts,
    CloseSavedDrafts,
    SelectPrev,
    SelectNext,
    UseSelected,
    Copy,
    Clear,
    ToggleEditable,
    StartEditing,
    ScrollUp,
    ScrollDown,
    CycleTheme,
    Quit,
}

/// Map a key press in normal mode to an action
///
/// Up/Down and Enter act on the saved-drafts list while it is open.
pub fn action_for(key: &KeyEvent, saved_open: bool) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('g') => Action::Generate,
        KeyCode::Enter if saved_open => Action::UseSelected,
        KeyCode::Enter => Action::Generate,
        KeyCode::Char('p') => Action::ToggleProvider,
        KeyCode::Tab | KeyCode::Right => Action::NextEmailType,
        KeyCode::BackTab | KeyCode::Left => Action::PrevEmailType,
        KeyCode::Char('s') => Action::ShowSavedDrafts,
        KeyCode::Esc if saved_open => Action::CloseSavedDrafts,
        KeyCode::Up | KeyCode::Char('k') if saved_open => Action::SelectPrev,
        KeyCode::Down | KeyCode::Char('j') if saved_open => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
        KeyCode::Char('y') | KeyCode::Char('c') => Action::Copy,
        KeyCode::Char('x') => Action::Clear,
        KeyCode::Char('r') => Action::ToggleEditable,
        KeyCode::Char('e') => Action::StartEditing,
        KeyCode::Char('t') => Action::CycleTheme,
        _ => return None,
    };
    Some(action)
}

/// Receiving ends the event loop listens on
pub struct AppInbox {
    pub notifications: mpsc::UnboundedReceiver<Notification>,
    pub completions: mpsc::UnboundedReceiver<Completion>,
}

/// Main application state for the TUI
pub struct App {
    workflow: DraftWorkflow,
    snapshots: watch::Receiver<WorkflowState>,
    copier: ClipboardCopier,
    notifier: Notifier,
    completions: mpsc::UnboundedSender<Completion>,

    /// Record the view is bound to
    pub record_id: Option<String>,

    pub mode: Mode,
    /// Text being edited (committed on Esc)
    pub edit_buffer: String,
    /// Highlighted row in the saved-drafts list
    pub saved_selected: usize,
    /// Vertical scroll of the draft panel
    pub draft_scroll: u16,

    pub toasts: ToastStack,
    pub log_buffer: LogBuffer,
    pub theme_kind: ThemeKind,
    pub theme: Theme,
    pub should_quit: bool,

    animation_frame: usize,
}

impl App {
    pub fn new(
        config: &Config,
        gateway: Arc<dyn DraftGateway>,
        copier: ClipboardCopier,
        log_buffer: LogBuffer,
    ) -> (Self, AppInbox) {
        let (notifier, notifications) = Notifier::channel(config.notifications.base_duration());
        let (completions_tx, completions) = mpsc::unbounded_channel();

        let mut workflow =
            DraftWorkflow::new(gateway, config.drafts.catalog.clone(), notifier.clone())
                .with_labels(ProviderLabels {
                    primary: config.gateway.primary_label.clone(),
                    secondary: config.gateway.secondary_label.clone(),
                });
        if let Some(default_type) = &config.drafts.default_email_type {
            if let Err(e) = workflow.set_email_type(default_type) {
                tracing::warn!("Ignoring default email type: {}", e);
            }
        }
        workflow.set_provider(config.gateway.default_provider);

        let snapshots = workflow.subscribe();

        let app = Self {
            workflow,
            snapshots,
            copier,
            notifier,
            completions: completions_tx,
            record_id: config.record_id.clone(),
            mode: Mode::Normal,
            edit_buffer: String::new(),
            saved_selected: 0,
            draft_scroll: 0,
            toasts: ToastStack::default(),
            log_buffer,
            theme_kind: ThemeKind::default(),
            theme: Theme::default(),
            should_quit: false,
            animation_frame: 0,
        };

        (
            app,
            AppInbox {
                notifications,
                completions,
            },
        )
    }

    // ─── Read access ─────────────────────────────────────────────

    /// Latest published workflow snapshot
    pub fn view(&self) -> WorkflowState {
        self.snapshots.borrow().clone()
    }

    pub fn labels(&self) -> &ProviderLabels {
        self.workflow.labels()
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    // ─── Event loop hooks ────────────────────────────────────────

    /// Periodic tick: advance spinner, expire toasts
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        self.toasts.prune();
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.toasts.push(Toast::from_notification(notification));
    }

    /// Apply a finished gateway call
    pub fn complete(&mut self, completion: Completion) {
        let new_draft = matches!(completion, Completion::Generation(_));
        self.workflow.complete(completion);
        if new_draft {
            self.draft_scroll = 0;
        }
        let saved_len = self.snapshots.borrow().saved_drafts.len();
        self.saved_selected = self.saved_selected.min(saved_len.saturating_sub(1));
    }

    // ─── Input ───────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.mode {
            Mode::Editing => self.handle_edit_key(key),
            Mode::Normal => {
                let saved_open = self.snapshots.borrow().saved_drafts_visible;
                if let Some(action) = action_for(&key, saved_open) {
                    self.apply(action);
                }
            }
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('s') => self.commit_edit(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.commit_edit(),
            KeyCode::Enter => self.edit_buffer.push('\n'),
            KeyCode::Tab => self.edit_buffer.push('\t'),
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) => self.edit_buffer.push(c),
            _ => {}
        }
    }

    fn commit_edit(&mut self) {
        let text = std::mem::take(&mut self.edit_buffer);
        self.mode = Mode::Normal;
        if let Err(e) = self.workflow.edit_draft(text) {
            self.refused(e);
        }
    }

    /// Report a refused action as a warning
    fn refused(&self, error: WorkflowError) {
        tracing::debug!("Action refused: {}", error);
        self.notifier.warning(error.to_string());
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Generate => self.generate(),
            Action::ToggleProvider => {
                let provider = self.snapshots.borrow().provider.toggled();
                self.workflow.set_provider(provider);
            }
            Action::NextEmailType => self.workflow.next_email_type(),
            Action::PrevEmailType => self.workflow.prev_email_type(),
            Action::ShowSavedDrafts => self.show_saved_drafts(),
            Action::CloseSavedDrafts => self.workflow.close_saved_drafts(),
            Action::SelectPrev => {
                self.saved_selected = self.saved_selected.saturating_sub(1);
            }
            Action::SelectNext => {
                let len = self.snapshots.borrow().saved_drafts.len();
                if self.saved_selected + 1 < len {
                    self.saved_selected += 1;
                }
            }
            Action::UseSelected => {
                let id = self
                    .snapshots
                    .borrow()
                    .saved_drafts
                    .get(self.saved_selected)
                    .map(|d| d.id.clone());
                if let Some(id) = id {
                    if self.workflow.select_saved_draft(&id) {
                        self.draft_scroll = 0;
                    }
                }
            }
            Action::Copy => self.copy_draft(),
            Action::Clear => {
                self.workflow.clear_draft();
                self.draft_scroll = 0;
            }
            Action::ToggleEditable => {
                let editable = !self.snapshots.borrow().editable;
                self.workflow.set_editable(editable);
                if editable {
                    self.notifier.info("Draft is editable (press e to edit)");
                } else {
                    self.notifier.info("Draft is read-only");
                }
            }
            Action::StartEditing => self.start_editing(),
            Action::ScrollUp => self.draft_scroll = self.draft_scroll.saturating_sub(1),
            Action::ScrollDown => self.draft_scroll = self.draft_scroll.saturating_add(1),
            Action::CycleTheme => {
                self.theme_kind = self.theme_kind.next();
                self.theme = self.theme_kind.theme();
                tracing::debug!("Theme: {}", self.theme.name);
            }
        }
    }

    fn generate(&mut self) {
        let (email_type, provider) = {
            let state = self.snapshots.borrow();
            (state.email_type.to_string(), state.provider)
        };
        let record = self.record_id.clone().unwrap_or_default();

        match self.workflow.begin_generation(&record, &email_type, provider) {
            Ok(pending) => pending.spawn(self.completions.clone()),
            Err(e) => self.refused(e),
        }
    }

    fn show_saved_drafts(&mut self) {
        let record = self.record_id.clone().unwrap_or_default();
        match self.workflow.begin_loading_saved(&record) {
            Ok(pending) => {
                self.saved_selected = 0;
                pending.spawn(self.completions.clone());
            }
            Err(e) => self.refused(e),
        }
    }

    fn copy_draft(&mut self) {
        let text = self.snapshots.borrow().current_draft.clone();
        let outcome = self.copier.copy(&text);
        outcome.notify(&self.notifier);
    }

    fn start_editing(&mut self) {
        let state = self.view();
        if !state.editable {
            self.refused(WorkflowError::ReadOnly);
            return;
        }
        if state.generating {
            self.refused(WorkflowError::Busy);
            return;
        }
        self.edit_buffer = state.current_draft;
        self.mode = Mode::Editing;
    }
}
