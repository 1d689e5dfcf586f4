// Saved drafts panel component
//
// Newest first. Each row: date, email type, who used it, then the preview.

use crate::tui::app::App;
use crate::workflow::WorkflowState;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, state: &WorkflowState) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight))
        .title(format!(
            " Saved drafts ({}) · Enter use · Esc close ",
            state.saved_drafts.len()
        ));

    if state.saved_drafts.is_empty() {
        let message = if state.loading_saved_drafts {
            format!("{} Loading saved drafts...", app.spinner_char())
        } else {
            "No saved drafts for this record.".to_string()
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(theme.muted))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let inner_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = state
        .saved_draft_entries()
        .into_iter()
        .map(|entry| {
            let header = Line::from(vec![
                Span::styled(
                    entry.formatted_date,
                    Style::default().fg(theme.muted),
                ),
                Span::raw("  "),
                Span::styled(
                    entry.draft.email_type.clone(),
                    Style::default()
                        .fg(theme.title)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", entry.draft.used_by),
                    Style::default().fg(theme.muted),
                ),
            ]);

            // One line of preview, cut to the panel width
            let preview: String = entry
                .preview
                .replace(['\n', '\r'], " ")
                .chars()
                .take(inner_width)
                .collect();

            ListItem::new(vec![
                header,
                Line::from(Span::styled(
                    preview,
                    Style::default().fg(theme.foreground),
                )),
                Line::raw(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selection_bg))
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(Some(app.saved_selected.min(state.saved_drafts.len() - 1)));

    f.render_stateful_widget(list, area, &mut list_state);
}
