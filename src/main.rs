// draftdesk - AI email draft assistant
//
// Requests AI-generated email drafts for a business record, lets the user
// review and edit them, switch between two generation backends, browse
// previously generated drafts, and copy the result to the clipboard.
//
// Architecture:
// - Gateway (reqwest): two generation providers plus the saved-draft listing
// - Workflow: state machine owning all draft state, publishing snapshots
// - Clipboard: ordered fallback chain of copy strategies
// - TUI (ratatui): the assistant view; spawns gateway calls, applies results
// - Channels: watch for state snapshots, mpsc for completions and notifications

mod cli;
mod clipboard;
mod config;
mod gateway;
mod logging;
mod model;
mod notify;
mod startup;
mod tui;
mod workflow;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logging::LogOutput;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    cli.apply(&mut config);

    // Config commands run before logging is set up
    if let Some(Commands::Config { show, path, init }) = &cli.command {
        return cli::handle_config(&config, *show, *path, *init);
    }

    let interactive = cli.command.is_none() && config.enable_tui;
    let output = if interactive {
        LogOutput::Tui
    } else {
        LogOutput::Stderr
    };
    let logging = logging::init(&config.logging, output);

    match cli.command {
        Some(Commands::Generate {
            email_type,
            provider,
        }) => cli::run_generate(&config, email_type, provider).await,
        Some(Commands::Saved) => cli::run_saved(&config).await,
        Some(Commands::Config { .. }) => Ok(()),
        None if !interactive => {
            anyhow::bail!(
                "TUI disabled ({}); use `draftdesk generate` or `draftdesk saved`",
                config::env::NO_TUI
            )
        }
        None => {
            let gateway = gateway::build(&config)?;

            startup::print_startup(&config);
            startup::log_startup(&config);

            tracing::info!("Starting TUI");
            if let Err(e) = tui::run_tui(&config, gateway, logging.buffer.clone()).await {
                tracing::error!("TUI error: {:?}", e);
                return Err(e);
            }

            tracing::info!("Shutting down");
            Ok(())
        }
    }
}
