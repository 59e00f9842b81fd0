use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::config::StewardConfig;
use crate::exec::{ExecError, ExecRunner};
use crate::paths::SystemPaths;
use crate::toolkit::ToolkitCatalog;

use super::render::{banner_overlay, footer, header};
use super::screen::{Banner, Ctx, Outcome, Toast, UiState};
use super::screens::exec::ExecScreen;
use super::screens::splash::Splash;
use super::screens::Screen;
use super::theme::Theme;

/// Exec events drained per tick; keeps a chatty child from starving input.
const MAX_EVENTS_PER_TICK: usize = 200;

/// Owns the screen stack, the shared context and the one command runner.
/// Key dispatch applies the global rules first, then hands the key to the
/// top screen and folds its outcome back into the stack.
pub(crate) struct App {
    ctx: Ctx,
    stack: Vec<Screen>,
    banner: Option<Banner>,
    toast: Option<Toast>,
    runner: ExecRunner,
    theme: Theme,
    tick: usize,
    should_quit: bool,
    pending_editor: Option<(String, PathBuf)>,
}

impl App {
    pub(crate) fn new(
        paths: SystemPaths,
        config: StewardConfig,
        catalog: ToolkitCatalog,
        theme: Theme,
    ) -> Self {
        Self {
            ctx: Ctx::new(paths, config, catalog),
            stack: vec![Screen::Splash(Splash::new())],
            banner: None,
            toast: None,
            runner: ExecRunner::new(),
            theme,
            tick: 0,
            should_quit: false,
            pending_editor: None,
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Shown once on startup when the config file failed to parse.
    pub(crate) fn startup_warning(&mut self, detail: String) {
        self.banner = Some(Banner::info("Configuration not loaded", detail));
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // A banner swallows the key that dismisses it.
        if let Some(banner) = self.banner.take() {
            if banner.pop_on_dismiss {
                self.pop();
            }
            self.absorb_messages();
            return;
        }

        let Some(top) = self.stack.last_mut() else {
            return;
        };
        let view = top.view();
        let blocks_back = view.blocks_back();
        let captures_text = view.captures_text();

        match key.code {
            KeyCode::Esc if !blocks_back => {
                self.pop();
            }
            KeyCode::Backspace if !blocks_back && !captures_text => {
                self.pop();
            }
            KeyCode::Char('q') if !captures_text => {
                self.should_quit = true;
            }
            _ => {
                let outcome = view.handle_key(key, &mut self.ctx);
                self.apply(outcome);
            }
        }
        self.absorb_messages();
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Stay => {}
            Outcome::Push(screen) => self.stack.push(screen),
            Outcome::Replace(screen) => {
                self.stack.pop();
                self.stack.push(screen);
            }
            Outcome::Pop => self.pop(),
            Outcome::PopToRoot => {
                self.stack.truncate(1);
                self.resume_top();
            }
            Outcome::Quit => self.should_quit = true,
            Outcome::Launch(request) => match self.runner.launch(&request) {
                Ok(()) => {
                    self.stack.push(Screen::Exec(ExecScreen::new(request)));
                }
                Err(ExecError::Busy { running }) => {
                    self.banner = Some(Banner::error(
                        "A command is already running",
                        format!("still running: {running}"),
                    ));
                }
                Err(error) => {
                    self.banner = Some(Banner::error("Could not start command", error.to_string()));
                }
            },
            Outcome::OpenEditor { editor, path } => {
                self.pending_editor = Some((editor, path));
                self.pop();
            }
        }
    }

    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
            self.resume_top();
        }
    }

    fn resume_top(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            top.view().on_resume(&mut self.ctx);
        }
        self.absorb_messages();
    }

    fn absorb_messages(&mut self) {
        if let Some(banner) = self.ctx.pending_banner.take() {
            self.banner = Some(banner);
        }
        if let Some(toast) = self.ctx.pending_toast.take() {
            self.toast = Some(toast);
        }
    }

    /// Pumps runner events into the top screen. Bounded per tick so render
    /// cadence holds even under heavy output.
    pub(crate) fn drain_events(&mut self) {
        for _ in 0..MAX_EVENTS_PER_TICK {
            let Some(event) = self.runner.next_event_timeout(Duration::from_millis(1)) else {
                break;
            };
            if let Some(top) = self.stack.last_mut() {
                top.view().on_exec_event(&event, &mut self.ctx);
            }
        }
        self.absorb_messages();
    }

    pub(crate) fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(toast) = &mut self.toast {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
            if toast.ticks_left == 0 {
                self.toast = None;
            }
        }
    }

    pub(crate) fn render(&mut self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let Some(top) = self.stack.last_mut() else {
            return;
        };
        let title = top.view_ref().title();
        let root_note = (self.ctx.paths.root != Path::new("/"))
            .then(|| self.ctx.paths.root.display().to_string());
        header(frame, chunks[0], &title, root_note.as_deref(), &self.theme);

        let ui = UiState {
            theme: &self.theme,
            tick: self.tick,
            ctx: &self.ctx,
        };
        top.view().render(frame, chunks[1], &ui);

        let hints = top.view_ref().hints();
        footer(frame, chunks[2], hints, self.toast.as_ref(), &self.theme);

        if let Some(banner) = &self.banner {
            banner_overlay(frame, banner, &self.theme);
        }
    }

    /// Editor launches happen outside the alternate screen; the event loop
    /// takes the request, suspends the terminal and reports back here.
    pub(crate) fn take_pending_editor(&mut self) -> Option<(String, PathBuf)> {
        self.pending_editor.take()
    }

    pub(crate) fn on_editor_closed(&mut self, editor: &str, path: &Path, result: std::io::Result<std::process::ExitStatus>) {
        match result {
            Ok(status) if status.success() => {
                self.toast = Some(Toast::new(format!("edited {}", path.display())));
            }
            Ok(status) => {
                self.banner = Some(Banner::error(
                    "Editor exited with an error",
                    format!("{editor} {} reported {status}", path.display()),
                ));
            }
            Err(error) => {
                self.banner = Some(Banner::error(
                    "Could not start editor",
                    format!("{editor}: {error}"),
                ));
            }
        }
    }

    pub(crate) fn shutdown(&mut self) {
        self.runner.terminate_inflight(Duration::from_secs(3));
    }
}

#[cfg(test)]
#[path = "../tests/tui_tests.rs"]
mod tests;
