// Startup module - banner and component status
//
// Printed before the TUI takes over the screen, and mirrored into the log
// buffer so the status line starts with something useful.

use crate::clipboard;
use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// One line of the component list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: String,
}

/// Status of every component, derived from config
pub fn component_status(config: &Config) -> Vec<ComponentStatus> {
    let gateway = if config.demo_mode {
        "Demo backends".to_string()
    } else {
        config.gateway.base_url.clone()
    };

    vec![
        ComponentStatus {
            name: "gateway",
            enabled: true,
            description: gateway,
        },
        ComponentStatus {
            name: "providers",
            enabled: true,
            description: format!(
                "{} / {}",
                config.gateway.primary_label, config.gateway.secondary_label
            ),
        },
        ComponentStatus {
            name: "catalog",
            enabled: true,
            description: if config.drafts.is_default_catalog() {
                format!("{} email types (built-in)", config.drafts.catalog.len())
            } else {
                format!("{} email types", config.drafts.catalog.len())
            },
        },
        ComponentStatus {
            name: "clipboard",
            enabled: true,
            description: clipboard::chain_names(&config.clipboard).join(" -> "),
        },
        ComponentStatus {
            name: "file-log",
            enabled: config.logging.file_enabled,
            description: config.logging.file_dir.display().to_string(),
        },
    ]
}

/// Print the startup banner
pub fn print_startup(config: &Config) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}draftdesk{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}AI email draft assistant{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    for component in component_status(config) {
        let (icon, style) = if component.enabled {
            (format!("{GREEN}✓{RESET}"), "")
        } else {
            (format!("{DIM}○{RESET}"), DIM)
        };
        println!(
            "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
            component.name, component.description
        );
    }
    println!();

    match &config.record_id {
        Some(record) => println!("  {MAGENTA}▸{RESET} Record {BOLD}{}{RESET}", record),
        None => println!("  {YELLOW}▸{RESET} {YELLOW}No record selected{RESET}"),
    }
    if config.demo_mode {
        println!("  {YELLOW}▸{RESET} {YELLOW}Demo mode active{RESET} {DIM}(canned drafts){RESET}");
    }
    println!();
}

/// Mirror the startup status into the log
pub fn log_startup(config: &Config) {
    tracing::info!("draftdesk v{}", VERSION);
    for component in component_status(config) {
        let icon = if component.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, component.name, component.description);
    }
    if config.demo_mode {
        tracing::info!("Demo mode active (canned drafts)");
    }
}
