// Draft domain model
//
// Types shared by the gateway, the workflow and the TUI:
// - EmailType / EmailTypeCatalog: the closed set of selectable draft kinds
// - ProviderId: which generation backend handles a request
// - GenerationRequest / GenerationResult: one generation round-trip
// - SavedDraft: a previously generated draft as returned by the backend
//
// Preview and date formatting for saved drafts are pure functions here so the
// views can recompute them on every read.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Number of characters kept in a saved-draft preview before the ellipsis
pub const PREVIEW_CHARS: usize = 100;

/// Email types offered when no catalog is configured
pub const DEFAULT_EMAIL_TYPES: &[&str] = &[
    "Renewal",
    "Upsell",
    "Welcome",
    "Follow-up",
    "Cold Outreach",
    "Thank You",
    "Proposal",
    "Onboarding",
    "Support",
    "Sales",
];

// ─────────────────────────────────────────────────────────────────────────────
// Email types
// ─────────────────────────────────────────────────────────────────────────────

/// A selectable email type label
///
/// Only obtainable through [`EmailTypeCatalog::get`], so holding one means the
/// label is part of the configured catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailType(String);

impl EmailType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed, non-empty, ordered set of email types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTypeCatalog {
    types: Vec<EmailType>,
}

impl EmailTypeCatalog {
    /// Build a catalog from labels. Blank labels and duplicates are dropped;
    /// an empty result is rejected.
    pub fn new<I, S>(labels: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut types: Vec<EmailType> = Vec::new();
        for label in labels {
            let label = label.into().trim().to_string();
            if label.is_empty() || types.iter().any(|t| t.0 == label) {
                continue;
            }
            types.push(EmailType(label));
        }

        if types.is_empty() {
            None
        } else {
            Some(Self { types })
        }
    }

    /// Look up a label (exact match)
    pub fn get(&self, label: &str) -> Option<&EmailType> {
        self.types.iter().find(|t| t.0 == label)
    }

    /// First entry, used as the initial selection
    pub fn first(&self) -> &EmailType {
        &self.types[0]
    }

    /// Entry after `current`, wrapping around
    pub fn next_after(&self, current: &EmailType) -> &EmailType {
        let idx = self.position(current).map(|i| i + 1).unwrap_or(0);
        &self.types[idx % self.types.len()]
    }

    /// Entry before `current`, wrapping around
    pub fn prev_before(&self, current: &EmailType) -> &EmailType {
        let len = self.types.len();
        let idx = self.position(current).unwrap_or(0);
        &self.types[(idx + len - 1) % len]
    }

    pub fn position(&self, current: &EmailType) -> Option<usize> {
        self.types.iter().position(|t| t == current)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmailType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}

impl Default for EmailTypeCatalog {
    fn default() -> Self {
        Self {
            types: DEFAULT_EMAIL_TYPES
                .iter()
                .map(|s| EmailType(s.to_string()))
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────────────────────────────────────

/// Which generation backend handles a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    Primary,
    Secondary,
}

impl ProviderId {
    /// The other provider
    pub fn toggled(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }

    /// Parse config/CLI values ("primary", "secondary", "gateway", "test")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "secondary" | "gateway" | "test" => Some(Self::Secondary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation round-trip
// ─────────────────────────────────────────────────────────────────────────────

/// One issued generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Sequence number, unique within one workflow
    pub id: u64,
    pub record_id: String,
    pub email_type: EmailType,
    pub provider: ProviderId,
}

/// Business-level outcome reported by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { draft_content: String },
    Failure { error_message: String },
}

impl GenerationResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success {
            draft_content: content.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error_message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saved drafts
// ─────────────────────────────────────────────────────────────────────────────

/// A previously generated draft, as listed by the backend
///
/// The email type is kept as the raw backend label: saved drafts may predate
/// the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDraft {
    pub id: String,
    pub email_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub used_by: String,
}

/// Optional backend text: missing and `null` both read as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl SavedDraft {
    /// First [`PREVIEW_CHARS`] characters, with "..." appended when cut
    pub fn preview(&self) -> String {
        preview(&self.content)
    }

    /// Generation time in local time, e.g. "Mar 4, 2025 14:05"
    pub fn formatted_date(&self) -> String {
        format_generated_at(&self.generated_at)
    }
}

/// Truncate text to a preview. Counts characters, not bytes.
pub fn preview(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub fn format_generated_at(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %Y %H:%M").to_string()
}

/// Order saved drafts newest first. Stable: equal timestamps keep backend order.
pub fn sort_newest_first(drafts: &mut [SavedDraft]) {
    drafts.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn saved(id: &str, content: &str, secs: i64) -> SavedDraft {
        SavedDraft {
            id: id.to_string(),
            email_type: "Renewal".to_string(),
            content: content.to_string(),
            generated_at: Utc.timestamp_opt(secs, 0).unwrap(),
            used_by: "ops".to_string(),
        }
    }

    #[test]
    fn test_catalog_rejects_empty() {
        assert!(EmailTypeCatalog::new(Vec::<String>::new()).is_none());
        assert!(EmailTypeCatalog::new(vec!["  ", ""]).is_none());
    }

    #[test]
    fn test_catalog_dedupes_and_trims() {
        let catalog = EmailTypeCatalog::new(vec!["Renewal", " Upsell ", "Renewal"]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Upsell").unwrap().as_str(), "Upsell");
        assert!(catalog.get("Welcome").is_none());
    }

    #[test]
    fn test_catalog_cycles() {
        let catalog = EmailTypeCatalog::new(vec!["A", "B", "C"]).unwrap();
        let a = catalog.first().clone();
        let c = catalog.get("C").unwrap().clone();
        assert_eq!(catalog.next_after(&c), &a);
        assert_eq!(catalog.prev_before(&a), &c);
        assert_eq!(catalog.next_after(&a).as_str(), "B");
    }

    #[test]
    fn test_default_catalog_starts_with_renewal() {
        let catalog = EmailTypeCatalog::default();
        assert_eq!(catalog.first().as_str(), "Renewal");
        assert_eq!(catalog.len(), DEFAULT_EMAIL_TYPES.len());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(ProviderId::parse("Primary"), Some(ProviderId::Primary));
        assert_eq!(ProviderId::parse("gateway"), Some(ProviderId::Secondary));
        assert_eq!(ProviderId::parse("other"), None);
        assert_eq!(ProviderId::Primary.toggled(), ProviderId::Secondary);
    }

    #[test]
    fn test_saved_draft_tolerates_null_and_missing_text() {
        let json = r#"[
            {"id":"a1","emailType":"Renewal","content":"Hi","generatedAt":"2025-03-04T14:05:00Z","usedBy":null},
            {"id":"a2","emailType":"Upsell","content":null,"generatedAt":"2025-03-05T09:00:00Z"}
        ]"#;

        let drafts: Vec<SavedDraft> = serde_json::from_str(json).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].content, "Hi");
        assert_eq!(drafts[0].used_by, "");
        assert_eq!(drafts[1].content, "");
        assert_eq!(drafts[1].used_by, "");
        assert_eq!(drafts[1].preview(), "");
    }

    #[test]
    fn test_preview_short_content_untouched() {
        assert_eq!(preview("Hi there"), "Hi there");
        let exact = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let mut drafts = vec![
            saved("old", "a", 100),
            saved("new", "b", 300),
            saved("tie-1", "c", 200),
            saved("tie-2", "d", 200),
        ];
        sort_newest_first(&mut drafts);
        let ids: Vec<_> = drafts.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "tie-1", "tie-2", "old"]);
    }

    #[test]
    fn test_saved_draft_wire_format() {
        let json = r#"{
            "id": "a0X1",
            "emailType": "Upsell",
            "content": "Hello",
            "generatedAt": "2025-03-04T14:05:00Z",
            "usedBy": "Jane Doe"
        }"#;
        let draft: SavedDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.email_type, "Upsell");
        assert_eq!(draft.used_by, "Jane Doe");
        assert!(draft.formatted_date().contains("2025"));
    }
}
