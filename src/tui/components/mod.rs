// Components module - UI building blocks
//
// - Header: record, email type, provider, request indicator
// - Draft panel: the draft editor with counts
// - Saved drafts panel: previously generated drafts for the record
// - Status bar: key hints and the latest log line
// - Toast: transient notifications
//
// Each component is a focused, single-responsibility module.

pub mod draft_panel;
pub mod header;
pub mod saved_drafts_panel;
pub mod status_bar;
pub mod toast;

pub use toast::{Toast, ToastStack};
