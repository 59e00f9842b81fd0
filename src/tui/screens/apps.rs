use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::exec::ExecRequest;
use crate::services::apps::{self, AppSpec, AppUnit};
use crate::services::unitfile::UnitFileConfig;
use crate::services::{systemctl_request, unit_state, ServiceError, UnitState};
use crate::tui::form::{require, Form, TextField};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{form_lines, key_value_lines, menu_list, panel_block};
use crate::tui::screen::{Banner, Ctx, KeyHint, Outcome, UiState, View, FORM_HINTS};

use super::editor::EditorPick;
use super::Screen;

struct AppRow {
    app: AppUnit,
    state: UnitState,
}

pub(crate) struct AppsMenu {
    cursor: MenuCursor,
    rows: Vec<AppRow>,
}

fn probe_apps(ctx: &Ctx) -> Result<Vec<AppRow>, ServiceError> {
    let apps = apps::list_apps(&ctx.paths)?;
    Ok(apps
        .into_iter()
        .map(|app| {
            let state = unit_state(&app.unit);
            AppRow { app, state }
        })
        .collect())
}

impl AppsMenu {
    pub(crate) fn new(ctx: &Ctx) -> Result<Self, ServiceError> {
        let rows = probe_apps(ctx)?;
        Ok(Self {
            cursor: MenuCursor::new(rows.len()),
            rows,
        })
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match probe_apps(ctx) {
            Ok(rows) => {
                self.rows = rows;
                self.cursor.set_len(self.rows.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for AppsMenu {
    fn title(&self) -> String {
        "applications".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("enter", "open"),
            ("a", "add app"),
            ("r", "refresh"),
            ("esc", "back"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(row) = self.cursor.selected(&self.rows) else {
                    return Outcome::Stay;
                };
                match apps::load_app(&row.app) {
                    Ok(config) => Outcome::Push(Screen::AppDetail(AppDetail::new(
                        row.app.clone(),
                        config,
                        row.state,
                    ))),
                    Err(error) => {
                        ctx.notify(Banner::service_error(&error));
                        Outcome::Stay
                    }
                }
            }
            KeyCode::Char('a') => Outcome::Push(Screen::AppForm(AppForm::new())),
            KeyCode::Char('r') => {
                self.reload(ctx);
                Outcome::Stay
            }
            _ => Outcome::Stay,
        }
    }

    fn on_resume(&mut self, ctx: &mut Ctx) {
        self.reload(ctx);
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let width = self
            .rows
            .iter()
            .map(|row| row.app.name.chars().count())
            .max()
            .unwrap_or(0);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let state_style = match row.state {
                    UnitState::Active => theme.ok,
                    UnitState::Failed => theme.err,
                    UnitState::Inactive => theme.warn,
                    UnitState::Unknown => theme.muted,
                };
                Line::from(vec![
                    Span::styled(format!("{:width$}  ", row.app.name), theme.text),
                    Span::styled(format!("{:24}", row.app.unit), theme.muted),
                    Span::styled(row.state.describe(), state_style),
                ])
            })
            .collect::<Vec<_>>();
        menu_list(frame, area, Some("managed units"), &rows, &self.cursor, theme);
    }
}

const APP_ACTIONS: [&str; 6] = [
    "Restart",
    "Stop",
    "Start",
    "Tail logs",
    "Edit unit file",
    "Back",
];

pub(crate) struct AppDetail {
    app: AppUnit,
    config: UnitFileConfig,
    state: UnitState,
    cursor: MenuCursor,
}

impl AppDetail {
    pub(crate) fn new(app: AppUnit, config: UnitFileConfig, state: UnitState) -> Self {
        Self {
            app,
            config,
            state,
            cursor: MenuCursor::new(APP_ACTIONS.len()),
        }
    }

    fn confirm(&self, ctx: &Ctx) -> Outcome {
        match self.cursor.index() {
            0 => Outcome::Launch(systemctl_request("restart", &self.app.unit)),
            1 => Outcome::Launch(systemctl_request("stop", &self.app.unit)),
            2 => Outcome::Launch(systemctl_request("start", &self.app.unit)),
            3 => Outcome::Launch(ExecRequest {
                command: format!("journalctl -u {} -n 100 --no-pager", self.app.unit),
                description: format!("tail {} logs", self.app.unit),
                cwd: None,
            }),
            4 => Outcome::Push(Screen::EditorPick(EditorPick::new(
                self.app.file.clone(),
                ctx,
            ))),
            _ => Outcome::Pop,
        }
    }
}

impl View for AppDetail {
    fn title(&self) -> String {
        self.app.name.clone()
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
        self.state = unit_state(&self.app.unit);
        match apps::load_app(&self.app) {
            Ok(config) => self.config = config,
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(1)])
            .split(area);

        let missing = || "?".to_owned();
        let mut pairs = vec![
            ("state".to_owned(), self.state.describe().to_owned()),
            ("unit file".to_owned(), self.app.file.display().to_string()),
            ("user".to_owned(), self.config.user.clone().unwrap_or_else(missing)),
            (
                "exec".to_owned(),
                self.config.exec_start.clone().unwrap_or_else(missing),
            ),
        ];
        if let Some(dir) = &self.config.working_directory {
            pairs.push(("workdir".to_owned(), dir.display().to_string()));
        }
        if let Some(listen) = &self.config.listen {
            pairs.push(("listen".to_owned(), listen.describe()));
        }
        if let Some(docroot) = &self.config.docroot {
            pairs.push(("docroot".to_owned(), docroot.display().to_string()));
        }
        let title = self.app.unit.clone();
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme))
                .block(panel_block(Some(&title), theme)),
            chunks[0],
        );

        let rows = APP_ACTIONS
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}

pub(crate) struct AppForm {
    form: Form,
}

impl AppForm {
    pub(crate) fn new() -> Self {
        Self {
            form: Form::new(vec![
                TextField::new("Name"),
                TextField::new("Command"),
                TextField::with_value("Run as user", "root"),
                TextField::new("Working directory"),
            ]),
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> Outcome {
        self.form.clear_errors();
        let mut failed = false;

        let name = self.form.value(0).to_owned();
        if !apps::valid_app_name(&name) {
            self.form
                .set_error(0, "use lowercase letters, digits or '-'");
            failed = true;
        }
        let command = match require(self.form.value(1), "command") {
            Ok(command) => command,
            Err(message) => {
                self.form.set_error(1, message);
                failed = true;
                String::new()
            }
        };
        let user = match require(self.form.value(2), "user") {
            Ok(user) => user,
            Err(message) => {
                self.form.set_error(2, message);
                failed = true;
                String::new()
            }
        };
        if failed {
            return Outcome::Stay;
        }

        let workdir = self.form.value(3);
        let spec = AppSpec {
            name,
            command,
            user,
            working_directory: (!workdir.is_empty()).then(|| PathBuf::from(workdir)),
        };
        match apps::create_app(&ctx.paths, &spec) {
            Ok(request) => Outcome::Launch(request),
            Err(error) => {
                ctx.notify(Banner::service_error(&error));
                Outcome::Stay
            }
        }
    }
}

impl View for AppForm {
    fn title(&self) -> String {
        "new application".to_owned()
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
            "working directory is optional; the unit is enabled and started on create",
            theme.muted,
        )));
        frame.render_widget(
            Paragraph::new(lines).block(panel_block(Some("new application"), theme)),
            area,
        );
    }
}
