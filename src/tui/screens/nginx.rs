use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::services::nginx::{self, SiteEntry};
use crate::services::{systemctl_request, unit_state, ServiceError, UnitState};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{key_value_lines, menu_list, panel_block};
use crate::tui::screen::{Banner, Ctx, KeyHint, Outcome, UiState, View};

use super::editor::EditorPick;
use super::Screen;

const NGINX_ITEMS: [&str; 7] = [
    "Manage sites",
    "Test configuration",
    "Reload nginx",
    "Restart nginx",
    "Edit nginx.conf",
    "SSL certificates",
    "Back",
];

pub(crate) struct NginxMenu {
    cursor: MenuCursor,
    state: UnitState,
    enabled_sites: Option<(usize, usize)>,
}

impl NginxMenu {
    pub(crate) fn new(ctx: &Ctx) -> Self {
        let mut screen = Self {
            cursor: MenuCursor::new(NGINX_ITEMS.len()),
            state: UnitState::Unknown,
            enabled_sites: None,
        };
        screen.probe(ctx);
        screen
    }

    fn probe(&mut self, ctx: &Ctx) {
        self.state = unit_state(nginx::UNIT);
        self.enabled_sites = nginx::list_sites(&ctx.paths).ok().map(|sites| {
            let enabled = sites.iter().filter(|site| site.enabled).count();
            (enabled, sites.len())
        });
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => match NginxSites::new(ctx) {
                Ok(screen) => Outcome::Push(Screen::NginxSites(screen)),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            1 => Outcome::Launch(nginx::config_test_request()),
            2 => Outcome::Launch(systemctl_request("reload", nginx::UNIT)),
            3 => Outcome::Launch(systemctl_request("restart", nginx::UNIT)),
            4 => Outcome::Push(Screen::EditorPick(EditorPick::new(
                ctx.paths.nginx_conf.clone(),
                ctx,
            ))),
            5 => {
                ctx.notify(Banner::info(
                    "SSL certificates",
                    "not implemented yet",
                ));
                Outcome::Stay
            }
            _ => Outcome::Pop,
        }
    }
}

impl View for NginxMenu {
    fn title(&self) -> String {
        "nginx".to_owned()
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
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let sites = match self.enabled_sites {
            Some((enabled, total)) => format!("{enabled} of {total} enabled"),
            None => "unknown".to_owned(),
        };
        let pairs = vec![
            ("unit".to_owned(), self.state.describe().to_owned()),
            ("sites".to_owned(), sites),
        ];
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme)).block(panel_block(Some("status"), theme)),
            chunks[0],
        );

        let rows = NGINX_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}

pub(crate) struct NginxSites {
    cursor: MenuCursor,
    sites: Vec<SiteEntry>,
}

impl NginxSites {
    pub(crate) fn new(ctx: &Ctx) -> Result<Self, ServiceError> {
        let sites = nginx::list_sites(&ctx.paths)?;
        Ok(Self {
            cursor: MenuCursor::new(sites.len()),
            sites,
        })
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match nginx::list_sites(&ctx.paths) {
            Ok(sites) => {
                self.sites = sites;
                self.cursor.set_len(self.sites.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }

    fn toggle(&mut self, ctx: &mut Ctx) -> Outcome {
        let Some(site) = self.cursor.selected(&self.sites).cloned() else {
            return Outcome::Stay;
        };
        let result = if site.enabled {
            nginx::disable_site(&ctx.paths, &site.name)
        } else {
            nginx::enable_site(&ctx.paths, &site.name)
        };
        match result {
            Ok(()) => {
                let verb = if site.enabled { "disabled" } else { "enabled" };
                ctx.toast(format!("{} {verb}, press t to test", site.name));
                self.reload(ctx);
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
        Outcome::Stay
    }
}

impl View for NginxSites {
    fn title(&self) -> String {
        "nginx sites".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("e", "enable/disable"),
            ("t", "test config"),
            ("r", "refresh"),
            ("esc", "back"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('e') => self.toggle(ctx),
            KeyCode::Char('t') => Outcome::Launch(nginx::config_test_request()),
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
            .sites
            .iter()
            .map(|site| site.name.chars().count())
            .max()
            .unwrap_or(0);
        let rows = self
            .sites
            .iter()
            .map(|site| {
                let status = if site.enabled {
                    Span::styled("[enabled]", theme.ok)
                } else {
                    Span::styled("[disabled]", theme.muted)
                };
                Line::from(vec![
                    Span::styled(format!("{:width$}  ", site.name), theme.text),
                    status,
                ])
            })
            .collect::<Vec<_>>();
        menu_list(
            frame,
            area,
            Some("sites-available"),
            &rows,
            &self.cursor,
            theme,
        );
    }
}
