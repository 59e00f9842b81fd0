use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::services::redis::{self, RedisConfig};
use crate::services::{systemctl_request, unit_state, UnitState};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{key_value_lines, menu_list, panel_block};
use crate::tui::screen::{Ctx, Outcome, UiState, View};

use super::db::{DataService, PasswordForm, PortForm};
use super::editor::EditorPick;
use super::Screen;

const REDIS_ITEMS: [&str; 5] = [
    "Change port",
    "Set password",
    "Restart redis",
    "Edit configuration",
    "Back",
];

pub(crate) struct RedisMenu {
    cursor: MenuCursor,
    state: UnitState,
    config: Option<RedisConfig>,
}

impl RedisMenu {
    pub(crate) fn new(ctx: &Ctx) -> Self {
        let mut screen = Self {
            cursor: MenuCursor::new(REDIS_ITEMS.len()),
            state: UnitState::Unknown,
            config: None,
        };
        screen.probe(ctx);
        screen
    }

    fn probe(&mut self, ctx: &Ctx) {
        self.state = unit_state(redis::UNIT);
        self.config = redis::load_config(&ctx.paths).ok();
    }

    fn confirm(&self, ctx: &Ctx) -> Outcome {
        match self.cursor.index() {
            0 => Outcome::Push(Screen::PortForm(PortForm::new(DataService::Redis))),
            1 => Outcome::Push(Screen::PasswordForm(PasswordForm::new(DataService::Redis))),
            2 => Outcome::Launch(systemctl_request("restart", redis::UNIT)),
            3 => Outcome::Push(Screen::EditorPick(EditorPick::new(
                ctx.paths.redis_conf.clone(),
                ctx,
            ))),
            _ => Outcome::Pop,
        }
    }
}

impl View for RedisMenu {
    fn title(&self) -> String {
        "redis".to_owned()
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.confirm(ctx),
            _ => Outcome::Stay,
        }
    }

    fn on_resume(&mut self, ctx: &mut Ctx) {
        self.probe(ctx);
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(1)])
            .split(area);

        let mut pairs = vec![("unit".to_owned(), self.state.describe().to_owned())];
        match &self.config {
            Some(config) => {
                let port = config
                    .port
                    .map(|port| port.to_string())
                    .unwrap_or_else(|| "default".to_owned());
                pairs.push(("port".to_owned(), port));
                if let Some(bind) = &config.bind {
                    pairs.push(("bind".to_owned(), bind.clone()));
                }
                let password = if config.password_set { "set" } else { "not set" };
                pairs.push(("password".to_owned(), password.to_owned()));
            }
            None => pairs.push(("config".to_owned(), "unknown".to_owned())),
        }
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme)).block(panel_block(Some("status"), theme)),
            chunks[0],
        );

        let rows = REDIS_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}
