// Draft panel component
//
// Shows the current draft (or the edit buffer while editing) with word and
// character counts in the title.

use crate::tui::app::{App, Mode};
use crate::workflow::WorkflowState;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn title(app: &App, state: &WorkflowState) -> String {
    let access = match (app.mode, state.editable) {
        (Mode::Editing, _) => "editing · Esc to save",
        (Mode::Normal, true) => "editable",
        (Mode::Normal, false) => "read-only",
    };

    if state.draft_visible || app.mode == Mode::Editing {
        format!(
            " Draft · {} words · {} chars · {} ",
            state.word_count(),
            state.char_count(),
            access
        )
    } else {
        format!(" Draft · {} ", access)
    }
}

fn body<'a>(app: &'a App, state: &'a WorkflowState) -> Text<'a> {
    let theme = &app.theme;

    if app.mode == Mode::Editing {
        let mut text = Text::raw(app.edit_buffer.as_str());
        let cursor = Span::styled("▏", Style::default().fg(theme.highlight));
        match text.lines.last_mut() {
            Some(line) => line.spans.push(cursor),
            None => text.lines.push(Line::from(cursor)),
        }
        return text;
    }

    if state.generating {
        return Text::from(Line::from(Span::styled(
            format!(
                "{} Generating {} draft...",
                app.spinner_char(),
                state.email_type
            ),
            Style::default().fg(theme.highlight),
        )));
    }

    if state.draft_visible {
        return Text::raw(state.current_draft.as_str());
    }

    let hint = if app.record_id.is_some() {
        "No draft yet. Press g to generate, s for saved drafts."
    } else {
        "No record selected. Start with --record <ID>."
    };
    Text::from(Line::from(Span::styled(
        hint,
        Style::default()
            .fg(theme.muted)
            .add_modifier(Modifier::ITALIC),
    )))
}

pub fn render(f: &mut Frame, area: Rect, app: &App, state: &WorkflowState) {
    let theme = &app.theme;
    let border = if app.mode == Mode::Editing {
        theme.highlight
    } else {
        theme.border
    };

    let panel = Paragraph::new(body(app, state))
        .style(Style::default().fg(theme.foreground))
        .wrap(Wrap { trim: false })
        .scroll((app.draft_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(border))
                .title(title(app, state)),
        );

    f.render_widget(panel, area);
}
