// Status bar component
//
// Key hints for the current mode, plus the newest log line.

use crate::logging::LogLevel;
use crate::tui::app::{App, Mode};
use crate::workflow::WorkflowState;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn hints(app: &App, state: &WorkflowState) -> &'static str {
    match app.mode {
        Mode::Editing => " Esc/Ctrl+S save │ Ctrl+C quit",
        Mode::Normal if state.saved_drafts_visible => {
            " ↑↓ select │ Enter use │ Esc close │ y copy │ q quit"
        }
        Mode::Normal => {
            " g generate │ ←→ type │ p provider │ s saved │ y copy │ x clear │ r read-only │ e edit │ t theme │ q quit"
        }
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App, state: &WorkflowState) {
    let theme = &app.theme;

    let mut lines = vec![Line::from(Span::styled(
        hints(app, state),
        Style::default().fg(theme.status_bar),
    ))];

    if let Some(entry) = app.log_buffer.latest() {
        let color = match entry.level {
            LogLevel::Error => theme.error,
            LogLevel::Warn => theme.warning,
            _ => theme.muted,
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", entry.timestamp.format("%H:%M:%S")),
                Style::default().fg(theme.muted),
            ),
            Span::styled(
                format!("{:<5} ", entry.level.as_str()),
                Style::default().fg(color),
            ),
            Span::styled(entry.message, Style::default().fg(theme.muted)),
        ]));
    }

    let status = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border)),
    );

    f.render_widget(status, area);
}
