// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the TUI starts, bound to --record (or the configured
// record). Subcommands:
// - generate: one draft, printed to stdout
// - saved: list saved drafts for a record
// - config --show | --path | --init

use crate::config::{Config, VERSION};
use crate::gateway;
use crate::model::ProviderId;
use crate::notify::{Notification, Notifier, Severity};
use crate::workflow::{DraftWorkflow, ProviderLabels};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc::UnboundedReceiver;

/// draftdesk - AI email drafts for business records
#[derive(Parser, Debug)]
#[command(name = "draftdesk")]
#[command(version = VERSION)]
#[command(about = "AI email draft assistant", long_about = None)]
pub struct Cli {
    /// Record to draft emails for
    #[arg(long, global = true)]
    pub record: Option<String>,

    /// Use canned demo backends instead of HTTP
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one draft and print it
    Generate {
        /// Email type (defaults to the first configured type)
        #[arg(long = "type", value_name = "TYPE")]
        email_type: Option<String>,

        /// Provider: primary or secondary
        #[arg(long, value_parser = parse_provider)]
        provider: Option<ProviderId>,
    },

    /// List saved drafts, newest first
    Saved,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Write a config file with defaults (if none exists)
        #[arg(long)]
        init: bool,
    },
}

fn parse_provider(s: &str) -> std::result::Result<ProviderId, String> {
    ProviderId::parse(s).ok_or_else(|| format!("unknown provider '{}' (primary|secondary)", s))
}

impl Cli {
    /// Apply flag overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(record) = self.record.as_deref().map(str::trim) {
            if !record.is_empty() {
                config.record_id = Some(record.to_string());
            }
        }
        if self.demo {
            config.demo_mode = true;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config subcommand
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_config(config: &Config, show: bool, path: bool, init: bool) -> Result<()> {
    if path {
        let path = Config::config_path().context("Could not determine config path")?;
        println!("{}", path.display());
    } else if show {
        print!("{}", config.to_toml());
        println!();
        match Config::config_path() {
            Some(path) if path.exists() => println!("# Source: {}", path.display()),
            _ => println!("# Source: defaults (no config file)"),
        }
    } else if init {
        match Config::write_default_template()? {
            Some(path) => println!("Created config file: {}", path.display()),
            None => println!("Config file already exists; left unchanged."),
        }
    } else {
        println!("Usage: draftdesk config [--show|--path|--init]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --path    Show config file path");
        println!("  --init    Write a config file with defaults");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless commands
// ─────────────────────────────────────────────────────────────────────────────

fn headless_workflow(config: &Config) -> Result<(DraftWorkflow, UnboundedReceiver<Notification>)> {
    let gateway = gateway::build(config)?;
    let (notifier, rx) = Notifier::channel(config.notifications.base_duration());
    let workflow = DraftWorkflow::new(gateway, config.drafts.catalog.clone(), notifier)
        .with_labels(ProviderLabels {
            primary: config.gateway.primary_label.clone(),
            secondary: config.gateway.secondary_label.clone(),
        });
    Ok((workflow, rx))
}

fn required_record(config: &Config) -> Result<&str> {
    config
        .record_id
        .as_deref()
        .context("No record given (use --record or set DRAFTDESK_RECORD_ID)")
}

/// Print notifications to stderr; returns the first error message, if any
fn report(rx: &mut UnboundedReceiver<Notification>) -> Option<String> {
    let mut first_error = None;
    while let Ok(notification) = rx.try_recv() {
        eprintln!(
            "{} {}: {}",
            notification.severity.icon(),
            notification.title,
            notification.message
        );
        if notification.severity == Severity::Error && first_error.is_none() {
            first_error = Some(notification.message);
        }
    }
    first_error
}

/// `draftdesk generate`
pub async fn run_generate(
    config: &Config,
    email_type: Option<String>,
    provider: Option<ProviderId>,
) -> Result<()> {
    let record = required_record(config)?;
    let (mut workflow, mut rx) = headless_workflow(config)?;

    let email_type = email_type
        .or_else(|| config.drafts.default_email_type.clone())
        .unwrap_or_else(|| config.drafts.catalog.first().to_string());
    let provider = provider.unwrap_or(config.gateway.default_provider);

    workflow.request_draft(record, &email_type, provider).await?;

    if let Some(error) = report(&mut rx) {
        bail!(error);
    }
    println!("{}", workflow.state().current_draft);
    Ok(())
}

/// `draftdesk saved`
pub async fn run_saved(config: &Config) -> Result<()> {
    let record = required_record(config)?;
    let (mut workflow, mut rx) = headless_workflow(config)?;

    workflow.load_saved_drafts(record).await?;

    if let Some(error) = report(&mut rx) {
        bail!(error);
    }

    let state = workflow.snapshot();
    if state.saved_drafts.is_empty() {
        println!("No saved drafts for {}", record);
        return Ok(());
    }

    for entry in state.saved_draft_entries() {
        println!(
            "{}  {:<14} {:<20} {}",
            entry.formatted_date, entry.draft.email_type, entry.draft.used_by, entry.draft.id
        );
        println!("    {}", entry.preview.replace('\n', " "));
    }
    Ok(())
}
