use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::paths::SystemPaths;
use crate::services::{mysql, postgres, redis, systemctl_request, unit_state};
use crate::services::{ServiceError, SqlConfig, UnitState};
use crate::tui::form::{parse_port, require, Form, TextField};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{form_lines, key_value_lines, menu_list, panel_block};
use crate::tui::screen::{Banner, Ctx, KeyHint, Outcome, UiState, View, FORM_HINTS};

use super::editor::EditorPick;
use super::Screen;

/// The two SQL servers share the same menu shape; only the probing and
/// rewrite calls differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SqlEngine {
    Mysql,
    Postgres,
}

impl SqlEngine {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SqlEngine::Mysql => "MySQL",
            SqlEngine::Postgres => "PostgreSQL",
        }
    }

    pub(crate) fn unit(self) -> &'static str {
        match self {
            SqlEngine::Mysql => mysql::UNIT,
            SqlEngine::Postgres => postgres::UNIT,
        }
    }

    fn service(self) -> DataService {
        match self {
            SqlEngine::Mysql => DataService::Mysql,
            SqlEngine::Postgres => DataService::Postgres,
        }
    }

    fn load(self, paths: &SystemPaths) -> Result<SqlConfig, ServiceError> {
        match self {
            SqlEngine::Mysql => mysql::load_config(paths),
            SqlEngine::Postgres => postgres::load_config(paths),
        }
    }

    fn config_path(self, paths: &SystemPaths) -> Result<PathBuf, ServiceError> {
        match self {
            SqlEngine::Mysql => Ok(paths.mysql_conf.clone()),
            SqlEngine::Postgres => postgres::find_conf(paths),
        }
    }

    fn list_databases(self) -> Result<Vec<String>, ServiceError> {
        match self {
            SqlEngine::Mysql => mysql::list_databases(),
            SqlEngine::Postgres => postgres::list_databases(),
        }
    }
}

/// Everything the port and password forms need to know about their
/// target. Redis joins the SQL engines here so all three share one pair
/// of form screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataService {
    Mysql,
    Postgres,
    Redis,
}

impl DataService {
    pub(crate) fn label(self) -> &'static str {
        match self {
            DataService::Mysql => "MySQL",
            DataService::Postgres => "PostgreSQL",
            DataService::Redis => "Redis",
        }
    }

    pub(crate) fn unit(self) -> &'static str {
        match self {
            DataService::Mysql => mysql::UNIT,
            DataService::Postgres => postgres::UNIT,
            DataService::Redis => redis::UNIT,
        }
    }

    fn change_port(self, paths: &SystemPaths, port: u16) -> Result<(), ServiceError> {
        match self {
            DataService::Mysql => mysql::change_port(paths, port),
            DataService::Postgres => postgres::change_port(paths, port),
            DataService::Redis => redis::change_port(paths, port),
        }
    }

    fn change_password(self, paths: &SystemPaths, password: &str) -> Result<(), ServiceError> {
        match self {
            DataService::Mysql => mysql::change_password(mysql::DEFAULT_ADMIN, password),
            DataService::Postgres => postgres::change_password(postgres::DEFAULT_ADMIN, password),
            DataService::Redis => redis::change_password(paths, password),
        }
    }

    fn password_note(self) -> String {
        match self {
            DataService::Mysql | DataService::Postgres => "applied immediately".to_owned(),
            DataService::Redis => format!("restart {} to apply", redis::UNIT),
        }
    }
}

const DB_ITEMS: [&str; 6] = [
    "Change port",
    "Change admin password",
    "List databases",
    "Restart service",
    "Edit configuration",
    "Back",
];

pub(crate) struct DbMenu {
    engine: SqlEngine,
    cursor: MenuCursor,
    state: UnitState,
    config: Option<SqlConfig>,
}

impl DbMenu {
    pub(crate) fn new(engine: SqlEngine, ctx: &Ctx) -> Self {
        let mut screen = Self {
            engine,
            cursor: MenuCursor::new(DB_ITEMS.len()),
            state: UnitState::Unknown,
            config: None,
        };
        screen.probe(ctx);
        screen
    }

    fn probe(&mut self, ctx: &Ctx) {
        self.state = unit_state(self.engine.unit());
        self.config = self.engine.load(&ctx.paths).ok();
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => Outcome::Push(Screen::PortForm(PortForm::new(self.engine.service()))),
            1 => Outcome::Push(Screen::PasswordForm(PasswordForm::new(self.engine.service()))),
            2 => match DbList::new(self.engine) {
                Ok(screen) => Outcome::Push(Screen::DbList(screen)),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            3 => Outcome::Launch(systemctl_request("restart", self.engine.unit())),
            4 => match self.engine.config_path(&ctx.paths) {
                Ok(path) => Outcome::Push(Screen::EditorPick(EditorPick::new(path, ctx))),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            _ => Outcome::Pop,
        }
    }
}

impl View for DbMenu {
    fn title(&self) -> String {
        self.engine.label().to_lowercase()
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
                if let Some(bind) = &config.bind_address {
                    pairs.push(("bind".to_owned(), bind.clone()));
                }
            }
            None => pairs.push(("config".to_owned(), "unknown".to_owned())),
        }
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme)).block(panel_block(Some("status"), theme)),
            chunks[0],
        );

        let rows = DB_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}

pub(crate) struct DbList {
    engine: SqlEngine,
    cursor: MenuCursor,
    databases: Vec<String>,
}

impl DbList {
    pub(crate) fn new(engine: SqlEngine) -> Result<Self, ServiceError> {
        let databases = engine.list_databases()?;
        Ok(Self {
            engine,
            cursor: MenuCursor::new(databases.len()),
            databases,
        })
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match self.engine.list_databases() {
            Ok(databases) => {
                self.databases = databases;
                self.cursor.set_len(self.databases.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for DbList {
    fn title(&self) -> String {
        format!("{} databases", self.engine.label().to_lowercase())
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[("↑/↓", "move"), ("r", "refresh"), ("esc", "back")]
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        if key.code == KeyCode::Char('r') {
            self.reload(ctx);
        }
        Outcome::Stay
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let rows = self
            .databases
            .iter()
            .map(|name| Line::from(Span::styled(name.clone(), ui.theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, area, Some("databases"), &rows, &self.cursor, ui.theme);
    }
}

pub(crate) struct PasswordForm {
    target: DataService,
    form: Form,
}

impl PasswordForm {
    pub(crate) fn new(target: DataService) -> Self {
        Self {
            target,
            form: Form::new(vec![TextField::secret("New password")]),
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> Outcome {
        let password = match require(self.form.value(0), "password") {
            Ok(password) => password,
            Err(message) => {
                self.form.set_error(0, message);
                return Outcome::Stay;
            }
        };
        let result = self.target.change_password(&ctx.paths, &password);
        self.form.fields[0].value.clear();
        match result {
            Ok(()) => {
                ctx.notify(
                    Banner::success("Password updated", self.target.password_note())
                        .pop_on_dismiss(),
                );
                Outcome::Stay
            }
            Err(error) => {
                ctx.notify(Banner::service_error(&error));
                Outcome::Stay
            }
        }
    }
}

impl View for PasswordForm {
    fn title(&self) -> String {
        format!("{} password", self.target.label().to_lowercase())
    }

    fn hints(&self) -> &'static [KeyHint] {
        FORM_HINTS
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if self.form.handle_key(&key) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter => self.submit(ctx),
            _ => Outcome::Stay,
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let mut lines = form_lines(&self.form, theme);
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("sets the {} admin password", self.target.label()),
            theme.muted,
        )));
        let title = format!("{} password", self.target.label());
        frame.render_widget(
            Paragraph::new(lines).block(panel_block(Some(&title), theme)),
            area,
        );
    }
}

pub(crate) struct PortForm {
    target: DataService,
    form: Form,
}

impl PortForm {
    pub(crate) fn new(target: DataService) -> Self {
        Self {
            target,
            form: Form::new(vec![TextField::new("Port")]),
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> Outcome {
        let port = match parse_port(self.form.value(0)) {
            Ok(port) => port,
            Err(message) => {
                self.form.set_error(0, message);
                return Outcome::Stay;
            }
        };
        match self.target.change_port(&ctx.paths, port) {
            Ok(()) => {
                ctx.notify(
                    Banner::success(
                        "Port updated",
                        format!("restart {} to apply", self.target.unit()),
                    )
                    .pop_on_dismiss(),
                );
                Outcome::Stay
            }
            Err(error) => {
                ctx.notify(Banner::service_error(&error));
                Outcome::Stay
            }
        }
    }
}

impl View for PortForm {
    fn title(&self) -> String {
        format!("{} port", self.target.label().to_lowercase())
    }

    fn hints(&self) -> &'static [KeyHint] {
        FORM_HINTS
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if self.form.handle_key(&key) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter => self.submit(ctx),
            _ => Outcome::Stay,
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let mut lines = form_lines(&self.form, theme);
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("rewrites the {} listen port", self.target.label()),
            theme.muted,
        )));
        let title = format!("{} port", self.target.label());
        frame.render_widget(
            Paragraph::new(lines).block(panel_block(Some(&title), theme)),
            area,
        );
    }
}
