use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{menu_list, panel_block};
use crate::tui::screen::{Ctx, KeyHint, Outcome, UiState, View};

pub(crate) struct Toolkit {
    category: usize,
    cursor: MenuCursor,
}

impl Toolkit {
    pub(crate) fn new(ctx: &Ctx) -> Self {
        let len = ctx
            .catalog
            .category_at(0)
            .map(|(_, commands)| commands.len())
            .unwrap_or(0);
        Self {
            category: 0,
            cursor: MenuCursor::new(len),
        }
    }

    fn next_category(&mut self, ctx: &Ctx) {
        self.category = menu::cycle(self.category, ctx.catalog.category_count());
        let len = ctx
            .catalog
            .category_at(self.category)
            .map(|(_, commands)| commands.len())
            .unwrap_or(0);
        self.cursor = MenuCursor::new(len);
    }

    fn copy_selected(&self, ctx: &mut Ctx) {
        let Some(command) = ctx
            .catalog
            .category_at(self.category)
            .and_then(|(_, commands)| self.cursor.selected(commands))
            .map(|command| command.command.clone())
        else {
            return;
        };
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(command)) {
            Ok(()) => ctx.toast("copied to clipboard"),
            Err(error) => ctx.toast(format!("clipboard unavailable: {error}")),
        }
    }
}

impl View for Toolkit {
    fn title(&self) -> String {
        "toolkit".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("tab", "next category"),
            ("enter", "run"),
            ("c", "copy"),
            ("esc", "back"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Tab => {
                self.next_category(ctx);
                Outcome::Stay
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let request = ctx
                    .catalog
                    .category_at(self.category)
                    .and_then(|(_, commands)| self.cursor.selected(commands))
                    .map(|command| command.request());
                match request {
                    Some(request) => Outcome::Launch(request),
                    None => Outcome::Stay,
                }
            }
            KeyCode::Char('c') => {
                self.copy_selected(ctx);
                Outcome::Stay
            }
            _ => Outcome::Stay,
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let catalog = &ui.ctx.catalog;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(area);

        let mut tabs = Vec::new();
        for (index, name) in catalog.category_names().into_iter().enumerate() {
            if index > 0 {
                tabs.push(Span::styled("  ", theme.muted));
            }
            let style = if index == self.category {
                theme.highlight
            } else {
                theme.muted
            };
            tabs.push(Span::styled(name.to_owned(), style));
        }
        frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

        let Some((category, commands)) = catalog.category_at(self.category) else {
            menu_list(frame, chunks[1], None, &[], &self.cursor, theme);
            return;
        };
        let width = commands
            .iter()
            .map(|command| command.name.chars().count())
            .max()
            .unwrap_or(0);
        let rows = commands
            .iter()
            .map(|command| {
                Line::from(vec![
                    Span::styled(format!("{:width$}  ", command.name), theme.text),
                    Span::styled(command.description.clone(), theme.muted),
                ])
            })
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], Some(category), &rows, &self.cursor, theme);

        let preview = self
            .cursor
            .selected(commands)
            .map(|command| command.command.clone())
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("$ ", theme.accent),
                Span::styled(preview, theme.muted),
            ])),
            chunks[2],
        );
    }
}
