use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::services::firewall::{self, FirewallRule, FirewallStatus};
use crate::services::ServiceError;
use crate::tui::form::{Form, TextField};
use crate::tui::menu::{self, MenuCursor};
use crate::tui::render::{form_lines, key_value_lines, menu_list, panel_block};
use crate::tui::screen::{Banner, Ctx, KeyHint, Outcome, UiState, View, FORM_HINTS};

use super::Screen;

const FIREWALL_ITEMS: [&str; 6] = [
    "View rules",
    "Allow a port",
    "Deny a port",
    "Enable firewall",
    "Disable firewall",
    "Back",
];

pub(crate) struct FirewallMenu {
    cursor: MenuCursor,
    status: FirewallStatus,
}

impl FirewallMenu {
    pub(crate) fn new() -> Result<Self, ServiceError> {
        let status = firewall::status()?;
        Ok(Self {
            cursor: MenuCursor::new(FIREWALL_ITEMS.len()),
            status,
        })
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match firewall::status() {
            Ok(status) => self.status = status,
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }

    fn confirm(&self, ctx: &mut Ctx) -> Outcome {
        match self.cursor.index() {
            0 => Outcome::Push(Screen::FirewallRules(FirewallRules::new(
                self.status.rules.clone(),
            ))),
            1 => Outcome::Push(Screen::FirewallPortForm(FirewallPortForm::new(
                RuleAction::Allow,
            ))),
            2 => Outcome::Push(Screen::FirewallPortForm(FirewallPortForm::new(
                RuleAction::Deny,
            ))),
            3 => {
                if self.status.active {
                    ctx.toast("firewall is already active");
                    Outcome::Stay
                } else {
                    Outcome::Launch(firewall::enable_request())
                }
            }
            4 => {
                if self.status.active {
                    Outcome::Launch(firewall::disable_request())
                } else {
                    ctx.toast("firewall is already inactive");
                    Outcome::Stay
                }
            }
            _ => Outcome::Pop,
        }
    }
}

impl View for FirewallMenu {
    fn title(&self) -> String {
        "firewall".to_owned()
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.confirm(ctx),
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
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let state = if self.status.active { "active" } else { "inactive" };
        let pairs = vec![
            ("ufw".to_owned(), state.to_owned()),
            ("rules".to_owned(), self.status.rules.len().to_string()),
        ];
        frame.render_widget(
            Paragraph::new(key_value_lines(&pairs, theme)).block(panel_block(Some("status"), theme)),
            chunks[0],
        );

        let rows = FIREWALL_ITEMS
            .iter()
            .map(|item| Line::from(Span::styled(*item, theme.text)))
            .collect::<Vec<_>>();
        menu_list(frame, chunks[1], None, &rows, &self.cursor, theme);
    }
}

pub(crate) struct FirewallRules {
    cursor: MenuCursor,
    rules: Vec<FirewallRule>,
}

impl FirewallRules {
    pub(crate) fn new(rules: Vec<FirewallRule>) -> Self {
        Self {
            cursor: MenuCursor::new(rules.len()),
            rules,
        }
    }

    fn reload(&mut self, ctx: &mut Ctx) {
        match firewall::status() {
            Ok(status) => {
                self.rules = status.rules;
                self.cursor.set_len(self.rules.len());
            }
            Err(error) => ctx.notify(Banner::service_error(&error)),
        }
    }
}

impl View for FirewallRules {
    fn title(&self) -> String {
        "firewall rules".to_owned()
    }

    fn hints(&self) -> &'static [KeyHint] {
        &[
            ("↑/↓", "move"),
            ("a", "allow a port"),
            ("r", "refresh"),
            ("esc", "back"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome {
        if menu::moved(&mut self.cursor, key.code) {
            return Outcome::Stay;
        }
        match key.code {
            KeyCode::Char('a') => Outcome::Push(Screen::FirewallPortForm(FirewallPortForm::new(
                RuleAction::Allow,
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
        let rows = self
            .rules
            .iter()
            .map(|rule| {
                let action_style = if rule.action.contains("ALLOW") {
                    theme.ok
                } else {
                    theme.err
                };
                Line::from(vec![
                    Span::styled(format!("{:24}", rule.to), theme.text),
                    Span::styled(format!("{:12}", rule.action), action_style),
                    Span::styled(rule.from.clone(), theme.muted),
                ])
            })
            .collect::<Vec<_>>();
        menu_list(frame, area, Some("ufw rules"), &rows, &self.cursor, theme);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleAction {
    Allow,
    Deny,
}

impl RuleAction {
    fn label(self) -> &'static str {
        match self {
            RuleAction::Allow => "allow",
            RuleAction::Deny => "deny",
        }
    }
}

pub(crate) struct FirewallPortForm {
    action: RuleAction,
    form: Form,
}

impl FirewallPortForm {
    pub(crate) fn new(action: RuleAction) -> Self {
        Self {
            action,
            form: Form::new(vec![TextField::new("Port")]),
        }
    }

    fn submit(&mut self) -> Outcome {
        let spec = self.form.value(0).to_owned();
        if !firewall::valid_port_spec(&spec) {
            self.form
                .set_error(0, "use a port like 8080 or 8080/tcp");
            return Outcome::Stay;
        }
        let request = match self.action {
            RuleAction::Allow => firewall::allow_request(&spec),
            RuleAction::Deny => firewall::deny_request(&spec),
        };
        Outcome::Launch(request)
    }
}

impl View for FirewallPortForm {
    fn title(&self) -> String {
        format!("{} a port", self.action.label())
    }

    fn hints(&self) -> &'static [KeyHint] {
        FORM_HINTS
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Ctx) -> Outcome {
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
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "a bare port covers tcp and udp; suffix /tcp or /udp to narrow it",
            theme.muted,
        )));
        let title = format!("{} a port", self.action.label());
        frame.render_widget(
            Paragraph::new(lines).block(panel_block(Some(&title), theme)),
            area,
        );
    }
}
