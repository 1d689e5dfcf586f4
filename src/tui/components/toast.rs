//! Toast notifications
//!
//! Each workflow `Notification` becomes a toast that dismisses itself after
//! the notification's display duration. Toasts stack upward from the
//! bottom-right corner, newest at the bottom.

use crate::notify::{Notification, Severity};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Most toasts shown at once; older ones are dropped first
const MAX_VISIBLE: usize = 4;
const MAX_WIDTH: u16 = 56;

/// A toast notification that auto-dismisses
#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn from_notification(notification: Notification) -> Self {
        Self {
            title: notification.title,
            message: notification.message,
            severity: notification.severity,
            created_at: Instant::now(),
            duration: notification.display_duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    fn width(&self, area: Rect) -> u16 {
        let text = self.message.width().max(self.title.width().saturating_add(4));
        // Clamp before narrowing; messages can carry arbitrarily long server text
        let width = text.saturating_add(4).min(MAX_WIDTH as usize) as u16;
        width.min(area.width.saturating_sub(4))
    }

    fn height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2).max(1) as usize;
        let lines = self.message.width().div_ceil(inner).max(1);
        u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
    }

    fn render(&self, f: &mut Frame, toast_area: Rect, theme: &Theme) {
        let color = theme.severity(self.severity);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.background))
            .title(Line::from(vec![Span::styled(
                format!(" {} {} ", self.severity.icon(), self.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]));

        let text = Paragraph::new(self.message.as_str())
            .style(Style::default().fg(theme.foreground))
            .wrap(Wrap { trim: true })
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

/// Active toasts, oldest first
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
}

impl ToastStack {
    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
        if self.toasts.len() > MAX_VISIBLE {
            self.toasts.remove(0);
        }
    }

    /// Drop expired toasts
    pub fn prune(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Render in the bottom-right corner, stacking upward
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let mut bottom = area.bottom().saturating_sub(2);

        for toast in self.toasts.iter().rev() {
            let width = toast.width(area);
            let height = toast.height(width);
            if width == 0 || bottom < area.y.saturating_add(height) {
                break;
            }

            let x = area.right().saturating_sub(width + 2);
            let y = bottom - height;
            toast.render(f, Rect::new(x, y, width, height), theme);
            bottom = y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(message: &str, duration: Duration) -> Toast {
        Toast::from_notification(Notification {
            title: "Info".into(),
            message: message.into(),
            severity: Severity::Info,
            display_duration: duration,
        })
    }

    #[test]
    fn test_zero_duration_expires() {
        assert!(toast("x", Duration::ZERO).is_expired());
        assert!(!toast("x", Duration::from_secs(60)).is_expired());
    }

    #[test]
    fn test_stack_drops_oldest_and_prunes() {
        let mut stack = ToastStack::default();
        for i in 0..(MAX_VISIBLE + 2) {
            stack.push(toast(&i.to_string(), Duration::from_secs(60)));
        }
        assert_eq!(stack.len(), MAX_VISIBLE);
        assert_eq!(stack.iter().next().unwrap().message, "2");

        stack.push(toast("gone", Duration::ZERO));
        stack.prune();
        assert_eq!(stack.len(), MAX_VISIBLE - 1);
        assert!(stack.iter().all(|t| t.message != "gone"));
    }

    #[test]
    fn test_oversized_message_is_clamped() {
        let huge = toast(&"x".repeat(65_534), Duration::from_secs(60));
        let area = Rect::new(0, 0, 120, 40);

        let width = huge.width(area);
        assert_eq!(width, MAX_WIDTH);
        assert_eq!(huge.height(width), 65_534_u16.div_ceil(width - 2) + 2);
        assert_eq!(huge.height(0), u16::MAX);
    }

    #[test]
    fn test_renders_oversized_message_without_panicking() {
        use crate::tui::theme::ThemeKind;
        use ratatui::{backend::TestBackend, Terminal};

        let mut stack = ToastStack::default();
        stack.push(toast("short", Duration::from_secs(60)));
        stack.push(toast(&"y".repeat(70_000), Duration::from_secs(60)));

        let theme = ThemeKind::Dark.theme();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| stack.render(f, f.area(), &theme))
            .unwrap();
    }
}
