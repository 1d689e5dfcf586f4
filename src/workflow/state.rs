//! Workflow state and the values derived from it
//!
//! `WorkflowState` is what the presentation layer sees: every published
//! snapshot is a clone of it. Counts, previews and dates are computed on read
//! and never stored, so they cannot drift from the text they describe.

use crate::model::{EmailType, ProviderId, SavedDraft};

/// Session-scoped state of one assistant view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    /// Draft text shown in the editor
    pub current_draft: String,
    /// Whether the draft editor is shown
    pub draft_visible: bool,
    /// A generation request is in flight
    pub generating: bool,
    /// The editor accepts edits (inverse of read-only)
    pub editable: bool,
    /// Provider used for the next request
    pub provider: ProviderId,
    /// Email type used for the next request
    pub email_type: EmailType,
    /// Whether the saved-drafts panel is open
    pub saved_drafts_visible: bool,
    /// Saved drafts, newest first
    pub saved_drafts: Vec<SavedDraft>,
    /// A saved-draft listing is in flight
    pub loading_saved_drafts: bool,
}

impl WorkflowState {
    pub fn new(email_type: EmailType, provider: ProviderId) -> Self {
        Self {
            current_draft: String::new(),
            draft_visible: false,
            generating: false,
            editable: false,
            provider,
            email_type,
            saved_drafts_visible: false,
            saved_drafts: Vec::new(),
            loading_saved_drafts: false,
        }
    }

    /// The draft contains something other than whitespace
    pub fn has_draft(&self) -> bool {
        !self.current_draft.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        if self.has_draft() {
            self.current_draft.split_whitespace().count()
        } else {
            0
        }
    }

    /// Character count (not bytes)
    pub fn char_count(&self) -> usize {
        self.current_draft.chars().count()
    }

    /// Saved drafts with their derived preview and date
    pub fn saved_draft_entries(&self) -> Vec<SavedDraftEntry<'_>> {
        self.saved_drafts
            .iter()
            .map(|draft| SavedDraftEntry {
                draft,
                preview: draft.preview(),
                formatted_date: draft.formatted_date(),
            })
            .collect()
    }
}

/// A saved draft plus its view-only fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDraftEntry<'a> {
    pub draft: &'a SavedDraft,
    pub preview: String,
    pub formatted_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmailTypeCatalog;

    fn state_with(draft: &str) -> WorkflowState {
        let mut state = WorkflowState::new(
            EmailTypeCatalog::default().first().clone(),
            ProviderId::Primary,
        );
        state.current_draft = draft.to_string();
        state
    }

    #[test]
    fn test_counts_for_empty_and_blank() {
        let empty = state_with("");
        assert!(!empty.has_draft());
        assert_eq!(empty.word_count(), 0);
        assert_eq!(empty.char_count(), 0);

        let blank = state_with("  \n\t ");
        assert!(!blank.has_draft());
        assert_eq!(blank.word_count(), 0);
        assert_eq!(blank.char_count(), 5);
    }

    #[test]
    fn test_counts_follow_text() {
        let state = state_with("Dear Customer,\n\nThanks  for   renewing.");
        assert!(state.has_draft());
        assert_eq!(state.word_count(), 5);
        assert_eq!(state.char_count(), 39);
    }

    #[test]
    fn test_char_count_is_unicode_aware() {
        assert_eq!(state_with("héllo").char_count(), 5);
    }
}
