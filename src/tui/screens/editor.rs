use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::menu_list;
use crate::tui::screen::{Ctx, Outcome, UiState, View};

/// Editor choice before suspending the console. The configured editor
/// leads; nano and vi stay as fallbacks for hosts without it.
pub(crate) struct EditorPick {
    path: PathBuf,
    choices: Vec<String>,
    cursor: MenuCursor,
}

impl EditorPick {
    pub(crate) fn new(path: PathBuf, ctx: &Ctx) -> Self {
        let mut choices = vec![ctx.config.editor().to_owned()];
        for fallback in ["nano", "vi"] {
            if !choices.iter().any(|choice| choice == fallback) {
                choices.push(fallback.to_owned());
            }
        }
        Self {
            path,
            cursor: MenuCursor::new(choices.len()),
            choices,
        }
    }
}

impl View for EditorPick {
    fn title(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!("edit {name}")
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                match self.cursor.selected(&self.choices).cloned() {
                    Some(editor) => Outcome::OpenEditor {
                        editor,
                        path: self.path.clone(),
                    },
                    None => Outcome::Stay,
                }
            }
            _ => Outcome::Stay,
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let rows = self
            .choices
            .iter()
            .map(|choice| Line::from(Span::styled(choice.clone(), theme.text)))
            .collect::<Vec<_>>();
        let title = format!("open {} with", self.path.display());
        menu_list(frame, area, Some(&title), &rows, &self.cursor, theme);
    }
}
