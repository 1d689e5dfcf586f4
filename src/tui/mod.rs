// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - The event loop (keyboard input, timer ticks, gateway completions,
//   notifications)
// - Rendering the assistant view

pub mod app;
pub mod components;
pub mod theme;
pub mod ui;

use crate::clipboard::ClipboardCopier;
use crate::config::Config;
use crate::gateway::DraftGateway;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, AppInbox};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Run the TUI until the user quits
pub async fn run_tui(
    config: &Config,
    gateway: Arc<dyn DraftGateway>,
    log_buffer: LogBuffer,
) -> Result<()> {
    // Clipboard handles are opened before raw mode so failures log cleanly
    let copier = ClipboardCopier::from_config(&config.clipboard);
    let (mut app, mut inbox) = App::new(config, gateway, copier, log_buffer);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut inbox).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on whichever comes first:
/// 1. Keyboard input
/// 2. Timer tick (spinner, toast expiry)
/// 3. A finished gateway call
/// 4. A notification for the toast stack
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    inbox: &mut AppInbox,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        app.handle_key(key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(completion) = inbox.completions.recv() => {
                app.complete(completion);
            }

            Some(notification) = inbox.notifications.recv() => {
                app.push_notification(notification);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
