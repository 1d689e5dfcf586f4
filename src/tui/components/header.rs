// Header component
//
// Record, email type selector, provider selector and request indicator.

use crate::model::ProviderId;
use crate::tui::app::App;
use crate::workflow::WorkflowState;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, state: &WorkflowState) {
    let theme = &app.theme;
    let dim = Style::default().fg(theme.muted);
    let value = Style::default()
        .fg(theme.foreground)
        .add_modifier(Modifier::BOLD);

    let provider_color = match state.provider {
        ProviderId::Primary => theme.primary,
        ProviderId::Secondary => theme.secondary,
    };

    let record = match &app.record_id {
        Some(record) => Span::styled(record.clone(), value),
        None => Span::styled("none", Style::default().fg(theme.warning)),
    };

    let mut spans = vec![
        Span::styled("Record ", dim),
        record,
        Span::styled(" │ Type ", dim),
        Span::styled(format!("‹ {} ›", state.email_type), value),
        Span::styled(" │ Provider ", dim),
        Span::styled(
            app.labels().get(state.provider).to_string(),
            Style::default()
                .fg(provider_color)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if state.generating {
        spans.push(Span::styled(
            format!("  {} generating", app.spinner_char()),
            Style::default().fg(theme.highlight),
        ));
    } else if state.loading_saved_drafts {
        spans.push(Span::styled(
            format!("  {} loading saved drafts", app.spinner_char()),
            Style::default().fg(theme.highlight),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.title))
            .title(Span::styled(
                " ✉ draftdesk ",
                Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(header, area);
}
