use std::path::PathBuf;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::config::StewardConfig;
use crate::exec::{ExecEvent, ExecRequest};
use crate::paths::SystemPaths;
use crate::services::ServiceError;
use crate::toolkit::ToolkitCatalog;
use crate::ui::NoticeLevel;

use super::screens::Screen;
use super::theme::Theme;

/// What a key handler asks the dispatcher to do next. The dispatcher owns
/// the navigation stack; screens only ever describe the transition.
pub(crate) enum Outcome {
    Stay,
    Push(Screen),
    Replace(Screen),
    Pop,
    PopToRoot,
    Quit,
    Launch(ExecRequest),
    OpenEditor { editor: String, path: PathBuf },
}

/// Modal message. The next keypress dismisses it and is otherwise swallowed;
/// `pop_on_dismiss` additionally backs out of the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Banner {
    pub(crate) level: NoticeLevel,
    pub(crate) title: String,
    pub(crate) body: Vec<String>,
    pub(crate) pop_on_dismiss: bool,
}

impl Banner {
    pub(crate) fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::build(NoticeLevel::Info, title, body)
    }

    pub(crate) fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::build(NoticeLevel::Success, title, body)
    }

    pub(crate) fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::build(NoticeLevel::Error, title, body)
    }

    pub(crate) fn service_error(error: &ServiceError) -> Self {
        let level = match error {
            ServiceError::NotInstalled { .. } | ServiceError::ConfigRead { .. } => {
                NoticeLevel::Info
            }
            _ => NoticeLevel::Error,
        };
        Self::build(level, "Operation failed", error.to_string())
    }

    pub(crate) fn pop_on_dismiss(mut self) -> Self {
        self.pop_on_dismiss = true;
        self
    }

    fn build(level: NoticeLevel, title: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            level,
            title: title.into(),
            body: body.lines().map(str::to_owned).collect(),
            pop_on_dismiss: false,
        }
    }
}

/// Transient one-liner that decays on its own instead of eating a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Toast {
    pub(crate) text: String,
    pub(crate) ticks_left: u32,
}

pub(crate) const TOAST_TICKS: u32 = 50;

impl Toast {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ticks_left: TOAST_TICKS,
        }
    }
}

/// Shared environment handed to every key handler. Messages queued here are
/// picked up by the dispatcher after the handler returns.
pub(crate) struct Ctx {
    pub(crate) paths: SystemPaths,
    pub(crate) config: StewardConfig,
    pub(crate) catalog: ToolkitCatalog,
    pub(crate) pending_banner: Option<Banner>,
    pub(crate) pending_toast: Option<Toast>,
}

impl Ctx {
    pub(crate) fn new(paths: SystemPaths, config: StewardConfig, catalog: ToolkitCatalog) -> Self {
        Self {
            paths,
            config,
            catalog,
            pending_banner: None,
            pending_toast: None,
        }
    }

    pub(crate) fn notify(&mut self, banner: Banner) {
        self.pending_banner = Some(banner);
    }

    pub(crate) fn toast(&mut self, text: impl Into<String>) {
        self.pending_toast = Some(Toast::new(text));
    }
}

/// Per-frame values the render path needs besides the screen's own state.
pub(crate) struct UiState<'a> {
    pub(crate) theme: &'a Theme,
    pub(crate) tick: usize,
    pub(crate) ctx: &'a Ctx,
}

pub(crate) type KeyHint = (&'static str, &'static str);

pub(crate) const DEFAULT_HINTS: &[KeyHint] = &[
    ("↑/↓", "move"),
    ("enter", "select"),
    ("esc", "back"),
    ("q", "quit"),
];

pub(crate) const FORM_HINTS: &[KeyHint] = &[
    ("tab", "next field"),
    ("enter", "submit"),
    ("esc", "cancel"),
];

/// Behavior shared by every screen; the `Screen` enum dispatches into it.
pub(crate) trait View {
    fn title(&self) -> String;

    fn hints(&self) -> &'static [KeyHint] {
        DEFAULT_HINTS
    }

    /// Text-entry screens take the raw keys; `q` types instead of quitting.
    fn captures_text(&self) -> bool {
        false
    }

    /// Blocks esc/backspace, used while a command is in flight.
    fn blocks_back(&self) -> bool {
        false
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Outcome;

    fn on_exec_event(&mut self, _event: &ExecEvent, _ctx: &mut Ctx) {}

    /// Called when the screen becomes the stack top again after a pop.
    fn on_resume(&mut self, _ctx: &mut Ctx) {}

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>);
}
