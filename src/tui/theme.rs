// Theme system for the TUI
//
// A few built-in palettes, switchable at runtime with `t`.

use crate::notify::Severity;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    Nord,
}

impl ThemeKind {
    pub fn all() -> &'static [ThemeKind] {
        &[ThemeKind::Dark, ThemeKind::Light, ThemeKind::Nord]
    }

    /// Next theme in the cycle
    pub fn next(self) -> Self {
        let themes = Self::all();
        let current = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(current + 1) % themes.len()]
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
            ThemeKind::Nord => Theme::nord(),
        }
    }
}

/// Resolved colors for every UI element
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    // ─── Base ────────────────────────────────────────────────
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_type: BorderType,

    // ─── Chrome ──────────────────────────────────────────────
    pub title: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub status_bar: Color,

    // ─── Providers ───────────────────────────────────────────
    pub primary: Color,
    pub secondary: Color,

    // ─── Severities ──────────────────────────────────────────
    pub success: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Dark",
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_type: BorderType::Rounded,
            title: Color::Cyan,
            highlight: Color::Yellow,
            selection_bg: Color::Rgb(40, 44, 52),
            status_bar: Color::Gray,
            primary: Color::Cyan,
            secondary: Color::Magenta,
            success: Color::Green,
            info: Color::Blue,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light",
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(56, 58, 66),
            muted: Color::Rgb(160, 161, 167),
            border: Color::Rgb(160, 161, 167),
            border_type: BorderType::Plain,
            title: Color::Rgb(64, 120, 242),
            highlight: Color::Rgb(193, 132, 1),
            selection_bg: Color::Rgb(229, 229, 230),
            status_bar: Color::Rgb(105, 108, 119),
            primary: Color::Rgb(64, 120, 242),
            secondary: Color::Rgb(166, 38, 164),
            success: Color::Rgb(80, 161, 79),
            info: Color::Rgb(1, 132, 188),
            warning: Color::Rgb(193, 132, 1),
            error: Color::Rgb(228, 86, 73),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "Nord",
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(216, 222, 233),
            muted: Color::Rgb(76, 86, 106),
            border: Color::Rgb(76, 86, 106),
            border_type: BorderType::Rounded,
            title: Color::Rgb(136, 192, 208),
            highlight: Color::Rgb(235, 203, 139),
            selection_bg: Color::Rgb(59, 66, 82),
            status_bar: Color::Rgb(129, 161, 193),
            primary: Color::Rgb(136, 192, 208),
            secondary: Color::Rgb(180, 142, 173),
            success: Color::Rgb(163, 190, 140),
            info: Color::Rgb(129, 161, 193),
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_cycle_wraps() {
        let mut kind = ThemeKind::default();
        for _ in 0..ThemeKind::all().len() {
            kind = kind.next();
        }
        assert_eq!(kind, ThemeKind::default());
    }
}
