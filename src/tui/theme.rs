use ratatui::style::{Color, Modifier, Style};

use crate::config::StewardConfig;
use crate::ui::theme::{resolve_color_enabled, OutputMode};

/// Styling for every TUI widget, resolved once at startup and passed by
/// reference into the render path.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) accent: Style,
    pub(crate) border: Style,
    pub(crate) text: Style,
    pub(crate) muted: Style,
    pub(crate) highlight: Style,
    pub(crate) ok: Style,
    pub(crate) warn: Style,
    pub(crate) err: Style,
}

impl Theme {
    pub(crate) fn colored() -> Self {
        Self {
            accent: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            text: Style::default().fg(Color::Gray),
            muted: Style::default().fg(Color::DarkGray),
            highlight: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            ok: Style::default().fg(Color::Green),
            warn: Style::default().fg(Color::Yellow),
            err: Style::default().fg(Color::Red),
        }
    }

    /// Monochrome fallback; the cursor row stays visible through reverse
    /// video instead of colour.
    pub(crate) fn plain() -> Self {
        Self {
            accent: Style::default().add_modifier(Modifier::BOLD),
            border: Style::default(),
            text: Style::default(),
            muted: Style::default().add_modifier(Modifier::DIM),
            highlight: Style::default().add_modifier(Modifier::REVERSED),
            ok: Style::default().add_modifier(Modifier::BOLD),
            warn: Style::default().add_modifier(Modifier::BOLD),
            err: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    pub(crate) fn resolve(config: &StewardConfig) -> Self {
        let mode = OutputMode::resolve(config.color.as_deref());
        if resolve_color_enabled(mode, true) {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}
