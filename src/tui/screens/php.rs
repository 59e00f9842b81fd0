use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::services::php_fpm::{self, PhpVersion, PoolConfig, PoolSettings};
use crate::services::{systemctl_request, unit_state, ServiceError, UnitState};
use crate::tui::form::{require, Form, TextField};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{form_lines, key_value_lines, menu_list, panel_block};
use crate::tui::screen::{Banner, Ctx, KeyHint, Outcome, UiState, View, FORM_HINTS};

use super::editor::EditorPick;
use super::Screen;

pub(crate) struct PhpMenu {
    cursor: MenuCursor,
    versions: Vec<PhpVersion>,
}

impl PhpMenu {
    pub(crate) fn new(versions: Vec<PhpVersion>) -> Self {
        Self {
            cursor: MenuCursor::new(versions.len()),
            versions,
        }
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match php_fpm::list_versions(&ctx.paths) {
            Ok(versions) => {
                self.versions = versions;
                self.cursor.set_len(self.versions.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for PhpMenu {
    fn title(&self) -> String {
        "php-fpm".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("enter", "select"),
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
                match self.cursor.selected(&self.versions).cloned() {
                    Some(version) => {
                        Outcome::Push(Screen::PhpVersionMenu(PhpVersionMenu::new(version)))
                    }
                    None => Outcome::Stay,
                }
            }
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
        let rows = self
            .versions
            .iter()
            .map(|version| {
                let state = unit_state(&version.unit);
                let state_style = match state {
                    UnitState::Active => theme.ok,
                    UnitState::Failed => theme.err,
                    UnitState::Inactive => theme.warn,
                    UnitState::Unknown => theme.muted,
                };
                Line::from(vec![
                    Span::styled(format!("PHP {:8}", version.version), theme.text),
                    Span::styled(format!("{:16}", version.unit), theme.muted),
                    Span::styled(state.describe(), state_style),
                ])
            })
            .collect::<Vec<_>>();
        menu_list(
            frame,
            area,
            Some("installed versions"),
            &rows,
            &self.cursor,
            theme,
        );
    }
}

const VERSION_ITEMS: [&str; 5] = [
    "Manage pools",
    "Restart FPM",
    "Reload FPM",
    "Edit php.ini",
    "Back",
];

pub(crate) struct PhpVersionMenu {
    version: PhpVersion,
    state: UnitState,
    cursor: MenuCursor,
}

impl PhpVersionMenu {
    pub(crate) fn new(version: PhpVersion) -> Self {
        let state = unit_state(&version.unit);
        Self {
            version,
            state,
            cursor: MenuCursor::new(VERSION_ITEMS.len()),
        }
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => match PhpPools::new(self.version.clone()) {
                Ok(screen) => Outcome::Push(Screen::PhpPools(screen)),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            1 => Outcome::Launch(systemctl_request("restart", &self.version.unit)),
            2 => Outcome::Launch(systemctl_request("reload", &self.version.unit)),
            3 => {
                let ini = ctx
                    .paths
                    .php_base
                    .join(&self.version.version)
                    .join("fpm/php.ini");
                Outcome::Push(Screen::EditorPick(EditorPick::new(ini, ctx)))
            }
            _ => Outcome::Pop,
        }
    }
}

impl View for PhpVersionMenu {
    fn title(&self) -> String {
        format!("php {}", self.version.version)
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

    fn on_resume(&mut self, _ctx: &mut Ctx) {
        self.state = unit_state(&self.version.unit);
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let pairs = vec![
            ("unit".to_owned(), self.version.unit.clone()),
            ("state".to_owned(), self.state.describe().to_owned()),
        ];
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme)).block(panel_block(Some("status"), theme)),
            chunks[0],
        );

        let rows = VERSION_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}

pub(crate) struct PhpPools {
    version: PhpVersion,
    cursor: MenuCursor,
    pools: Vec<PoolConfig>,
}

impl PhpPools {
    pub(crate) fn new(version: PhpVersion) -> Result<Self, ServiceError> {
        let pools = php_fpm::list_pools(&version)?;
        Ok(Self {
            cursor: MenuCursor::new(pools.len()),
            version,
            pools,
        })
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match php_fpm::list_pools(&self.version) {
            Ok(pools) => {
                self.pools = pools;
                self.cursor.set_len(self.pools.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for PhpPools {
    fn title(&self) -> String {
        format!("php {} pools", self.version.version)
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("enter", "open"),
            ("a", "add pool"),
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
                if self.pools.is_empty() {
                    ctx.notify(Banner::info("No pools", "no pools available to edit"));
                    return Outcome::Stay;
                }
                match self.cursor.selected(&self.pools).cloned() {
                    Some(pool) => Outcome::Push(Screen::PoolDetail(PoolDetail::new(
                        self.version.clone(),
                        pool,
                    ))),
                    None => Outcome::Stay,
                }
            }
            KeyCode::Char('a') => Outcome::Push(Screen::PoolForm(PoolForm::create(
                self.version.clone(),
            ))),
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
            .pools
            .iter()
            .map(|pool| pool.name.chars().count())
            .max()
            .unwrap_or(0);
        let rows = self
            .pools
            .iter()
            .map(|pool| {
                let listen = pool.listen.as_deref().unwrap_or("?");
                Line::from(vec![
                    Span::styled(format!("{:width$}  ", pool.name), theme.text),
                    Span::styled(listen.to_owned(), theme.muted),
                ])
            })
            .collect::<Vec<_>>();
        menu_list(frame, area, Some("pool.d"), &rows, &self.cursor, theme);
    }
}

const POOL_ACTIONS: [&str; 3] = ["Edit pool", "Delete pool", "Back"];

pub(crate) struct PoolDetail {
    version: PhpVersion,
    pool: PoolConfig,
    cursor: MenuCursor,
}

impl PoolDetail {
    pub(crate) fn new(version: PhpVersion, pool: PoolConfig) -> Self {
        Self {
            version,
            pool,
            cursor: MenuCursor::new(POOL_ACTIONS.len()),
        }
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => Outcome::Push(Screen::PoolForm(PoolForm::update(
                self.version.clone(),
                self.pool.clone(),
            ))),
            1 => {
                match php_fpm::delete_pool(&self.version, &self.pool) {
                    Ok(()) => ctx.notify(
                        Banner::success(
                            "Pool removed",
                            format!("{} deleted, {} reloaded", self.pool.name, self.version.unit),
                        )
                        .pop_on_dismiss(),
                    ),
                    Err(error) => ctx.notify(reload_aware(&error)),
                }
                Outcome::Stay
            }
            _ => Outcome::Pop,
        }
    }
}

impl View for PoolDetail {
    fn title(&self) -> String {
        format!("pool {}", self.pool.name)
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
        match php_fpm::load_pool(&self.version, &self.pool.name) {
            Ok(pool) => self.pool = pool,
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(1)])
            .split(area);

        let missing = || "?".to_owned();
        let pairs = vec![
            ("file".to_owned(), self.pool.file.display().to_string()),
            ("user".to_owned(), self.pool.user.clone().unwrap_or_else(missing)),
            ("group".to_owned(), self.pool.group.clone().unwrap_or_else(missing)),
            ("listen".to_owned(), self.pool.listen.clone().unwrap_or_else(missing)),
            ("pm".to_owned(), self.pool.pm.clone().unwrap_or_else(missing)),
            (
                "max children".to_owned(),
                self.pool
                    .max_children
                    .map(|count| count.to_string())
                    .unwrap_or_else(missing),
            ),
        ];
        let title = format!("pool [{}]", self.pool.name);
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme))
                .block(panel_block(Some(&title), theme)),
            chunks[0],
        );

        let rows = POOL_ACTIONS
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}

enum PoolMode {
    Create,
    Update(PoolConfig),
}

pub(crate) struct PoolForm {
    version: PhpVersion,
    mode: PoolMode,
    form: Form,
}

impl PoolForm {
    pub(crate) fn create(version: PhpVersion) -> Self {
        let form = Form::new(vec![
            TextField::new("Pool name"),
            TextField::with_value("Run as user", "www-data"),
            TextField::new("Listen"),
            TextField::with_value("Max children", "5"),
        ]);
        Self {
            version,
            mode: PoolMode::Create,
            form,
        }
    }

    pub(crate) fn update(version: PhpVersion, pool: PoolConfig) -> Self {
        let form = Form::new(vec![
            TextField::with_value("Run as user", pool.user.clone().unwrap_or_default()),
            TextField::with_value("Listen", pool.listen.clone().unwrap_or_default()),
            TextField::with_value(
                "Max children",
                pool.max_children.map(|count| count.to_string()).unwrap_or_default(),
            ),
        ]);
        Self {
            version,
            mode: PoolMode::Update(pool),
            form,
        }
    }

    fn field_offset(&self) -> usize {
        match self.mode {
            PoolMode::Create => 1,
            PoolMode::Update(_) => 0,
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) -> Outcome {
        self.form.clear_errors();
        let offset = self.field_offset();
        let mut failed = false;

        let name = match &self.mode {
            PoolMode::Create => {
                let name = self.form.value(0).to_owned();
                if !php_fpm::valid_pool_name(&name) {
                    self.form.set_error(0, "use letters, digits, '-' or '_'");
                    failed = true;
                }
                name
            }
            PoolMode::Update(pool) => pool.name.clone(),
        };
        let user = match require(self.form.value(offset), "user") {
            Ok(user) => user,
            Err(message) => {
                self.form.set_error(offset, message);
                failed = true;
                String::new()
            }
        };
        let listen = match require(self.form.value(offset + 1), "listen") {
            Ok(listen) => listen,
            Err(message) => {
                self.form.set_error(offset + 1, message);
                failed = true;
                String::new()
            }
        };
        let max_children = match self.form.value(offset + 2).parse::<u32>() {
            Ok(count) if count >= 1 => count,
            _ => {
                self.form
                    .set_error(offset + 2, "enter a worker count of at least 1");
                failed = true;
                0
            }
        };
        if failed {
            return Outcome::Stay;
        }

        let settings = PoolSettings {
            name,
            user,
            listen,
            max_children,
        };
        let result = match &self.mode {
            PoolMode::Create => php_fpm::create_pool(&self.version, &settings),
            PoolMode::Update(pool) => php_fpm::update_pool(&self.version, pool, &settings),
        };
        match result {
            Ok(()) => {
                let verb = match self.mode {
                    PoolMode::Create => "created",
                    PoolMode::Update(_) => "updated",
                };
                ctx.notify(
                    Banner::success(
                        format!("Pool {verb}"),
                        format!("{} reloaded", self.version.unit),
                    )
                    .pop_on_dismiss(),
                );
            }
            Err(error) => ctx.notify(reload_aware(&error)),
        }
        Outcome::Stay
    }
}

impl View for PoolForm {
    fn title(&self) -> String {
        match &self.mode {
            PoolMode::Create => format!("new pool (php {})", self.version.version),
            PoolMode::Update(pool) => format!("edit pool {}", pool.name),
        }
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
            "listen takes a socket path or host:port",
            theme.muted,
        )));
        let title = match &self.mode {
            PoolMode::Create => "new pool".to_owned(),
            PoolMode::Update(pool) => format!("edit [{}]", pool.name),
        };
        frame.render_widget(
            Paragraph::new(lines).block(panel_block(Some(&title), theme)),
            area,
        );
    }
}

/// A write that landed but failed to reload reports the failed step and
/// still leaves the form, so the refreshed pool list shows the new state.
fn reload_aware(error: &ServiceError) -> Banner {
    let banner = Banner::service_error(error);
    if matches!(error, ServiceError::PoolReloadFailed { .. }) {
        banner.pop_on_dismiss()
    } else {
        banner
    }
}
