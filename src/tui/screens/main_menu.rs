use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use crate::services::packages::{self, PackageSpec, PACKAGES};
use crate::services::php_fpm;
use crate::services::{unit_state, UnitState};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::menu_list;
use crate::tui::screen::{Banner, Ctx, KeyHint, Outcome, UiState, View};

use super::apps::AppsMenu;
use super::db::{DbMenu, SqlEngine};
use super::firewall::FirewallMenu;
use super::nginx::NginxMenu;
use super::php::PhpMenu;
use super::redis::RedisMenu;
use super::toolkit::Toolkit;
use super::users::UsersMenu;
use super::Screen;

const MAIN_ITEMS: [&str; 8] = [
    "Install services",
    "Configure services",
    "Applications",
    "Users & groups",
    "Firewall",
    "Toolkit",
    "Scheduled backups",
    "Quit",
];

pub(crate) struct MainMenu {
    cursor: MenuCursor,
}

impl MainMenu {
    pub(crate) fn new() -> Self {
        Self {
            cursor: MenuCursor::new(MAIN_ITEMS.len()),
        }
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => Outcome::Push(Screen::InstallMenu(InstallMenu::new())),
            1 => Outcome::Push(Screen::ConfigMenu(ConfigMenu::new())),
            2 => match AppsMenu::new(ctx) {
                Ok(screen) => Outcome::Push(Screen::AppsMenu(screen)),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            3 => Outcome::Push(Screen::UsersMenu(UsersMenu::new())),
            4 => match FirewallMenu::new() {
                Ok(screen) => Outcome::Push(Screen::FirewallMenu(screen)),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            5 => Outcome::Push(Screen::Toolkit(Toolkit::new(ctx))),
            6 => {
                ctx.notify(Banner::info("Scheduled backups", "not implemented yet"));
                Outcome::Stay
            }
            _ => Outcome::Quit,
        }
    }
}

impl View for MainMenu {
    fn title(&self) -> String {
        "main menu".to_owned()
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

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let rows = MAIN_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, ui.theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, area, None, &rows, &self.cursor, ui.theme);
    }
}

const CONFIG_ITEMS: [&str; 6] = ["Nginx", "MySQL", "PostgreSQL", "Redis", "PHP-FPM", "Back"];

pub(crate) struct ConfigMenu {
    cursor: MenuCursor,
}

impl ConfigMenu {
    pub(crate) fn new() -> Self {
        Self {
            cursor: MenuCursor::new(CONFIG_ITEMS.len()),
        }
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => Outcome::Push(Screen::NginxMenu(NginxMenu::new(ctx))),
            1 => Outcome::Push(Screen::DbMenu(DbMenu::new(SqlEngine::Mysql, ctx))),
            2 => Outcome::Push(Screen::DbMenu(DbMenu::new(SqlEngine::Postgres, ctx))),
            3 => Outcome::Push(Screen::RedisMenu(RedisMenu::new(ctx))),
            4 => match php_fpm::list_versions(&ctx.paths) {
                Ok(versions) if versions.is_empty() => {
                    ctx.notify(Banner::info(
                        "PHP-FPM is not installed",
                        "Install it from the install menu",
                    ));
                    Outcome::Stay
                }
                Ok(versions) => Outcome::Push(Screen::PhpMenu(PhpMenu::new(versions))),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            _ => Outcome::Pop,
        }
    }
}

impl View for ConfigMenu {
    fn title(&self) -> String {
        "configure services".to_owned()
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

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let rows = CONFIG_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, ui.theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, area, None, &rows, &self.cursor, ui.theme);
    }
}

struct InstallRow {
    spec: &'static PackageSpec,
    installed: bool,
    state: Option<UnitState>,
}

fn probe_packages() -> Vec<InstallRow> {
    PACKAGES
        .iter()
        .map(|spec| {
            let installed = packages::is_installed(spec);
            let state = if installed {
                spec.unit.map(unit_state)
            } else {
                None
            };
            InstallRow {
                spec,
                installed,
                state,
            }
        })
        .collect()
}

pub(crate) struct InstallMenu {
    cursor: MenuCursor,
    rows: Vec<InstallRow>,
}

impl InstallMenu {
    pub(crate) fn new() -> Self {
        let rows = probe_packages();
        Self {
            cursor: MenuCursor::new(rows.len()),
            rows,
        }
    }

    fn reload(&mut self) {
        self.rows = probe_packages();
        self.cursor.set_len(self.rows.len());
    }
}

impl View for InstallMenu {
    fn title(&self) -> String {
        "install services".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("enter", "install"),
            ("r", "refresh"),
            ("esc", "back"),
            ("q", "quit"),
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
                if row.installed {
                    ctx.toast(format!("{} is already installed", row.spec.label));
                    Outcome::Stay
                } else {
                    Outcome::Launch(packages::install_request(row.spec))
                }
            }
            KeyCode::Char('r') => {
                self.reload();
                ctx.toast("refreshed");
                Outcome::Stay
            }
            _ => Outcome::Stay,
        }
    }

    fn on_resume(&mut self, _ctx: &mut Ctx) {
        self.reload();
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let width = self
            .rows
            .iter()
            .map(|row| row.spec.label.chars().count())
            .max()
            .unwrap_or(0);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut spans = vec![Span::styled(
                    format!("{:width$}  ", row.spec.label),
                    theme.text,
                )];
                if row.installed {
                    spans.push(Span::styled("[installed]", theme.ok));
                    if let Some(state) = row.state {
                        let style = match state {
                            UnitState::Active => theme.ok,
                            UnitState::Inactive => theme.warn,
                            UnitState::Failed => theme.err,
                            UnitState::Unknown => theme.muted,
                        };
                        spans.push(Span::styled(format!("  {}", state.describe()), style));
                    }
                } else {
                    spans.push(Span::styled("[missing]", theme.muted));
                }
                Line::from(spans)
            })
            .collect::<Vec<_>>();
        menu_list(frame, area, Some("packages"), &rows, &self.cursor, theme);
    }
}
