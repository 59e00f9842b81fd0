use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::services::users::{self, GroupEntry, UserAccount};
use crate::services::ServiceError;
use crate::tui::form::{require, Form, TextField};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{extra_row_line, form_lines, key_value_lines, menu_list, panel_block};
use crate::tui::screen::{Banner, Ctx, KeyHint, Outcome, UiState, View, FORM_HINTS};

use super::Screen;

const USERS_ITEMS: [&str; 4] = ["List users", "Add user", "List groups", "Back"];

pub(crate) struct UsersMenu {
    cursor: MenuCursor,
}

impl UsersMenu {
    pub(crate) fn new() -> Self {
        Self {
            cursor: MenuCursor::new(USERS_ITEMS.len()),
        }
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => match UserList::new(ctx) {
                Ok(screen) => Outcome::Push(Screen::UserList(screen)),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            1 => Outcome::Push(Screen::UserAddForm(UserAddForm::new())),
            2 => match GroupList::new(ctx) {
                Ok(screen) => Outcome::Push(Screen::GroupList(screen)),
                Err(error) => {
                    ctx.notify(Banner::service_error(&error));
                    Outcome::Stay
                }
            },
            _ => Outcome::Pop,
        }
    }
}

impl View for UsersMenu {
    fn title(&self) -> String {
        "users & groups".to_owned()
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
        let rows = USERS_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, ui.theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, area, None, &rows, &self.cursor, ui.theme);
    }
}

struct UserRow {
    user: UserAccount,
    sudo: bool,
}

pub(crate) struct UserList {
    cursor: MenuCursor,
    rows: Vec<UserRow>,
    groups: Vec<GroupEntry>,
}

fn probe_users(ctx: &Ctx) -> Result<(Vec<UserRow>, Vec<GroupEntry>), ServiceError> {
    let users = users::list_users(&ctx.paths)?;
    let groups = users::list_groups(&ctx.paths)?;
    let rows = users
        .into_iter()
        .map(|user| {
            let sudo = users::has_sudo(&ctx.paths, &groups, &user);
            UserRow { user, sudo }
        })
        .collect();
    Ok((rows, groups))
}

impl UserList {
    pub(crate) fn new(ctx: &Ctx) -> Result<Self, ServiceError> {
        let (rows, groups) = probe_users(ctx)?;
        Ok(Self {
            cursor: MenuCursor::new(rows.len()),
            rows,
            groups,
        })
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match probe_users(ctx) {
            Ok((rows, groups)) => {
                self.rows = rows;
                self.groups = groups;
                self.cursor.set_len(self.rows.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for UserList {
    fn title(&self) -> String {
        "users".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("enter", "open"),
            ("a", "add user"),
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
                Outcome::Push(Screen::UserDetail(UserDetail::new(
                    row.user.clone(),
                    &self.groups,
                    row.sudo,
                )))
            }
            KeyCode::Char('a') => Outcome::Push(Screen::UserAddForm(UserAddForm::new())),
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
            .map(|row| row.user.name.chars().count())
            .max()
            .unwrap_or(0);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut spans = vec![
                    Span::styled(format!("{:width$}  ", row.user.name), theme.text),
                    Span::styled(format!("uid {:6}", row.user.uid), theme.muted),
                    Span::styled(row.user.shell.clone(), theme.muted),
                ];
                if row.sudo {
                    spans.push(Span::styled("  [sudo]", theme.warn));
                }
                Line::from(spans)
            })
            .collect::<Vec<_>>();
        menu_list(frame, area, Some("login accounts"), &rows, &self.cursor, theme);
    }
}

const USER_ACTIONS_GRANT: [&str; 2] = ["Grant sudo", "Back"];
const USER_ACTIONS_REVOKE: [&str; 2] = ["Revoke sudo", "Back"];

pub(crate) struct UserDetail {
    user: UserAccount,
    groups: Vec<String>,
    sudo: bool,
    cursor: MenuCursor,
}

impl UserDetail {
    pub(crate) fn new(user: UserAccount, groups: &[GroupEntry], sudo: bool) -> Self {
        let names = users::user_groups(groups, &user);
        Self {
            user,
            groups: names,
            sudo,
            cursor: MenuCursor::new(USER_ACTIONS_GRANT.len()),
        }
    }

    fn refresh(&mut self, ctx: &mut Ctx) {
        match users::list_groups(&ctx.paths) {
            Ok(groups) => {
                self.groups = users::user_groups(&groups, &self.user);
                self.sudo = users::has_sudo(&ctx.paths, &groups, &self.user);
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }

    fn toggle_sudo(&mut self, ctx: &mut Ctx) {
        let result = if self.sudo {
            users::revoke_sudo(&ctx.paths, &self.user.name)
        } else {
            users::grant_sudo(&ctx.paths, &self.user.name)
        };
        match result {
            Ok(()) => {
                let verb = if self.sudo { "revoked from" } else { "granted to" };
                ctx.toast(format!("sudo {verb} {}", self.user.name));
                self.refresh(ctx);
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for UserDetail {
    fn title(&self) -> String {
        self.user.name.clone()
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => match self.cursor.index() {
                0 => {
                    self.toggle_sudo(ctx);
                    Outcome::Stay
                }
                _ => Outcome::Pop,
            },
            _ => Outcome::Stay,
        }
    }

    fn on_resume(&mut self, ctx: &mut Ctx) {
        self.refresh(ctx);
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(1)])
            .split(area);

        let pairs = vec![
            ("uid".to_owned(), self.user.uid.to_string()),
            ("gid".to_owned(), self.user.gid.to_string()),
            ("home".to_owned(), self.user.home.display().to_string()),
            ("shell".to_owned(), self.user.shell.clone()),
            ("groups".to_owned(), self.groups.join(", ")),
            (
                "sudo".to_owned(),
                if self.sudo { "yes" } else { "no" }.to_owned(),
            ),
        ];
        let title = self.user.name.clone();
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme))
                .block(panel_block(Some(&title), theme)),
            chunks[0],
        );

        let actions = if self.sudo {
            &USER_ACTIONS_REVOKE
        } else {
            &USER_ACTIONS_GRANT
        };
        let rows = actions
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}

pub(crate) struct UserAddForm {
    form: Form,
    sudo: bool,
}

impl UserAddForm {
    pub(crate) fn new() -> Self {
        Self {
            form: Form::with_extra_rows(
                vec![TextField::new("Username"), TextField::secret("Password")],
                1,
            ),
            sudo: false,
        }
    }

    fn submit(&mut self) -> Outcome {
        self.form.clear_errors();
        let mut failed = false;

        let name = self.form.value(0).to_owned();
        if !users::valid_username(&name) {
            self.form
                .set_error(0, "start with a lowercase letter, then letters, digits, '-' or '_'");
            failed = true;
        }
        let password = match require(self.form.value(1), "password") {
            Ok(password) => password,
            Err(message) => {
                self.form.set_error(1, message);
                failed = true;
                String::new()
            }
        };
        if failed {
            return Outcome::Stay;
        }

        let request = users::add_user_request(&name, &password, self.sudo);
        self.form.fields[1].value.clear();
        Outcome::Launch(request)
    }
}

impl View for UserAddForm {
    fn title(&self) -> String {
        "add user".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        FORM_HINTS
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Ctx) -> Outcome {
        // The sudo toggle row sits past the text fields; space flips it
        // there instead of inserting a character.
        if self.form.focus == self.form.fields.len() && key.code == KeyCode::Char(' ') {
            self.sudo = !self.sudo;
            return Outcome::Stay;
        }
        if self.form.handle_key(&key) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter => self.submit(),
            _ => Outcome::Stay,
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let mut lines = form_lines(&self.form, theme);
        let mark = if self.sudo { "[x]" } else { "[ ]" };
        lines.push(extra_row_line(
            format!("{mark} grant sudo"),
            self.form.focus == self.form.fields.len(),
            theme,
        ));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "creates the account with a home directory and bash shell",
            theme.muted,
        )));
        frame.render_widget(
            Paragraph::new(lines).block(panel_block(Some("add user"), theme)),
            area,
        );
    }
}

pub(crate) struct GroupList {
    cursor: MenuCursor,
    groups: Vec<GroupEntry>,
}

impl GroupList {
    pub(crate) fn new(ctx: &Ctx) -> Result<Self, ServiceError> {
        let groups = users::list_groups(&ctx.paths)?;
        Ok(Self {
            cursor: MenuCursor::new(groups.len()),
            groups,
        })
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match users::list_groups(&ctx.paths) {
            Ok(groups) => {
                self.groups = groups;
                self.cursor.set_len(self.groups.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for GroupList {
    fn title(&self) -> String {
        "groups".to_owned()
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

    fn on_resume(&mut self, ctx: &mut Ctx) {
        self.reload(ctx);
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let width = self
            .groups
            .iter()
            .map(|group| group.name.chars().count())
            .max()
            .unwrap_or(0);
        let rows = self
            .groups
            .iter()
            .map(|group| {
                Line::from(vec![
                    Span::styled(format!("{:width$}  ", group.name), theme.text),
                    Span::styled(format!("gid {:6}", group.gid), theme.muted),
                    Span::styled(group.members.join(", "), theme.muted),
                ])
            })
            .collect::<Vec<_>>();
        menu_list(frame, area, Some("groups"), &rows, &self.cursor, theme);
    }
}
