//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// Quote a string as a TOML basic string, escaping as TOML requires
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

impl Config {
    /// Serialize the email type catalog as a TOML array
    fn email_types_to_toml(&self) -> String {
        let quoted: Vec<String> = self
            .drafts
            .labels()
            .iter()
            .map(|label| toml_string(label))
            .collect();
        format!("[{}]", quoted.join(", "))
    }

    /// Serialize config to TOML string (single source of truth for format)
    ///
    /// The API token is never written: it comes from DRAFTDESK_API_TOKEN only.
    pub fn to_toml(&self) -> String {
        let record_line = match &self.record_id {
            Some(id) => format!("record_id = {}", toml_string(id)),
            None => "# record_id = \"001xx000003DGb2AAG\"".to_string(),
        };

        let default_type_line = match &self.drafts.default_email_type {
            Some(label) => format!("default_email_type = {}", toml_string(label)),
            None => "# default_email_type = \"Renewal\"".to_string(),
        };

        format!(
            r#"# draftdesk configuration

# Record the assistant opens on (overridden by --record / DRAFTDESK_RECORD_ID)
{record_line}

# Use canned demo backends instead of HTTP (also DRAFTDESK_DEMO=1)
demo_mode = {demo}

# ─────────────────────────────────────────────────────────────────────────────
# GATEWAY
# ─────────────────────────────────────────────────────────────────────────────
# Bearer token: set DRAFTDESK_API_TOKEN (never stored here)

[gateway]
base_url = {base_url}
primary_path = {primary_path}
secondary_path = {secondary_path}
saved_path = {saved_path}
timeout_secs = {timeout}
primary_label = {primary_label}
secondary_label = {secondary_label}
default_provider = "{default_provider}"

[drafts]
email_types = {email_types}
{default_type_line}

[notifications]
# Errors are shown twice as long
base_duration_ms = {base_ms}

[clipboard]
session_handle = {session_handle}
osc52 = {osc52}

[logging]
level = {level}
file_enabled = {file_enabled}
file_dir = {file_dir}
file_rotation = "{rotation}"
file_prefix = {prefix}
"#,
            record_line = record_line,
            demo = self.demo_mode,
            base_url = toml_string(&self.gateway.base_url),
            primary_path = toml_string(&self.gateway.primary_path),
            secondary_path = toml_string(&self.gateway.secondary_path),
            saved_path = toml_string(&self.gateway.saved_path),
            timeout = self.gateway.timeout_secs,
            primary_label = toml_string(&self.gateway.primary_label),
            secondary_label = toml_string(&self.gateway.secondary_label),
            default_provider = self.gateway.default_provider.as_str(),
            email_types = self.email_types_to_toml(),
            default_type_line = default_type_line,
            base_ms = self.notifications.base_duration_ms,
            session_handle = self.clipboard.session_handle,
            osc52 = self.clipboard.osc52,
            level = toml_string(&self.logging.level),
            file_enabled = self.logging.file_enabled,
            file_dir = toml_string(&self.logging.file_dir.display().to_string()),
            rotation = self.logging.file_rotation.as_str(),
            prefix = toml_string(&self.logging.file_prefix),
        )
    }
}
