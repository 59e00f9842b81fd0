use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::render::{centered_rect, panel_block};
use crate::tui::screen::{Ctx, KeyHint, Outcome, UiState, View};

use super::main_menu::MainMenu;
use super::Screen;

pub(crate) struct Splash;

impl Splash {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl View for Splash {
    fn title(&self) -> String {
        "welcome".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[("any key", "continue"), ("q", "quit")]
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut Ctx) -> Outcome {
        Outcome::Replace(Screen::MainMenu(MainMenu::new()))
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let panel = centered_rect(50, 40, area);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("S T E W A R D", theme.accent)).centered(),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                theme.muted,
            ))
            .centered(),
            Line::from(""),
            Line::from(Span::styled(
                "server administration console",
                theme.text,
            ))
            .centered(),
            Line::from(""),
            Line::from(Span::styled("press any key to begin", theme.muted)).centered(),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel_block(None, theme)), panel);
    }
}
