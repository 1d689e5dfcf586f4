// UI rendering - screen layout
//
// ┌ header ─────────────────────────────────────┐
// │ draft panel            │ saved drafts panel │  (right pane only while open)
// ├ status bar ─────────────────────────────────┤
//                                   toasts overlay

use super::app::App;
use super::components::{draft_panel, header, saved_drafts_panel, status_bar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

/// Terminals narrower than this stack the saved-drafts pane below the draft
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

pub fn draw(f: &mut Frame, app: &App) {
    let state = app.view();
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    header::render(f, chunks[0], app, &state);

    let show_saved = state.saved_drafts_visible || state.loading_saved_drafts;
    if show_saved {
        let (draft_area, saved_area) = split_body(chunks[1]);
        draft_panel::render(f, draft_area, app, &state);
        saved_drafts_panel::render(f, saved_area, app, &state);
    } else {
        draft_panel::render(f, chunks[1], app, &state);
    }

    status_bar::render(f, chunks[2], app, &state);

    app.toasts.render(f, area, &app.theme);
}

fn split_body(area: Rect) -> (Rect, Rect) {
    let direction = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };

    let parts = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    (parts[0], parts[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardCopier;
    use crate::config::Config;
    use crate::gateway::{DemoDraftProvider, DemoSavedDrafts, ProviderGateway};
    use crate::logging::LogBuffer;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[tokio::test]
    async fn test_draws_header_and_placeholder() {
        let gateway = Arc::new(ProviderGateway::new(
            Box::new(DemoDraftProvider::new("Primary").with_latency(Duration::ZERO)),
            Box::new(DemoDraftProvider::new("Gateway").with_latency(Duration::ZERO)),
            Box::new(DemoSavedDrafts::new().with_latency(Duration::ZERO)),
        ));
        let config = Config {
            record_id: Some("001DEMO".into()),
            ..Config::default()
        };
        let (app, _inbox) = App::new(&config, gateway, ClipboardCopier::new(Vec::new()), LogBuffer::new());

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("001DEMO"));
        assert!(text.contains("Renewal"));
        assert!(text.contains("No draft yet"));
    }
}
