use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;
use vt100::Parser as VtParser;

use crate::exec::{ExecEvent, ExecOutcome, ExecRequest};
use crate::tui::render::{panel_block, spinner_frame};
use crate::tui::screen::{Ctx, KeyHint, Outcome, UiState, View};
use crate::tui::terminal_text::{
    ansi_line, format_elapsed, ingest_fragment, vt100_enabled, vt_rows, OutputLine, VT_COLS,
    VT_ROWS, VT_SCROLLBACK,
};

const RUNNING_HINTS: &[KeyHint] = &[("↑/↓", "scroll"), ("home/end", "jump"), ("ctrl+c", "quit")];
const DONE_HINTS: &[KeyHint] = &[
    ("↑/↓", "scroll"),
    ("esc", "back"),
    ("m", "main menu"),
    ("q", "quit"),
];

/// Transcript view for the one in-flight command. Kills esc until the
/// child exits so the runner can never be abandoned mid-run.
pub(crate) struct ExecScreen {
    request: ExecRequest,
    running: bool,
    outcome: Option<ExecOutcome>,
    started: Instant,
    finished: Option<Duration>,
    vt: Option<VtParser>,
    fallback: VecDeque<OutputLine>,
    pending_stdout: String,
    pending_stderr: String,
    scroll: usize,
    follow: bool,
    last_max: usize,
    last_page: usize,
}

impl ExecScreen {
    pub(crate) fn new(request: ExecRequest) -> Self {
        let vt = vt100_enabled().then(|| VtParser::new(VT_ROWS, VT_COLS, VT_SCROLLBACK));
        Self {
            request,
            running: true,
            outcome: None,
            started: Instant::now(),
            finished: None,
            vt,
            fallback: VecDeque::new(),
            pending_stdout: String::new(),
            pending_stderr: String::new(),
            scroll: 0,
            follow: true,
            last_max: 0,
            last_page: 10,
        }
    }

    fn ingest_chunk(&mut self, stderr: bool, bytes: &[u8]) {
        if let Some(parser) = &mut self.vt {
            parser.process(bytes);
            return;
        }
        let pending = if stderr {
            &mut self.pending_stderr
        } else {
            &mut self.pending_stdout
        };
        pending.push_str(&String::from_utf8_lossy(bytes));
        while let Some(cut) = pending.find('\n') {
            let line = pending[..cut].to_owned();
            pending.drain(..=cut);
            ingest_fragment(&mut self.fallback, stderr, &line);
        }
    }

    fn flush_pending(&mut self) {
        if !self.pending_stdout.is_empty() {
            let line = std::mem::take(&mut self.pending_stdout);
            ingest_fragment(&mut self.fallback, false, &line);
        }
        if !self.pending_stderr.is_empty() {
            let line = std::mem::take(&mut self.pending_stderr);
            ingest_fragment(&mut self.fallback, true, &line);
        }
    }

    fn status_line(&self, ui: &UiState<'_>) -> Line<'static> {
        let theme = ui.theme;
        let elapsed = format_elapsed(self.finished.unwrap_or_else(|| self.started.elapsed()));
        match &self.outcome {
            None => Line::from(vec![
                Span::styled(spinner_frame(ui.tick).to_owned(), theme.accent),
                Span::styled(" running", theme.warn),
                Span::styled(format!("  {elapsed}"), theme.muted),
            ]),
            Some(outcome) if outcome.success => Line::from(vec![
                Span::styled("✓ completed", theme.ok),
                Span::styled(format!("  {elapsed}"), theme.muted),
                Span::styled("  press esc to go back", theme.muted),
            ]),
            Some(outcome) => Line::from(vec![
                Span::styled(format!("✗ failed ({})", outcome.detail), theme.err),
                Span::styled(format!("  {elapsed}"), theme.muted),
                Span::styled("  press esc to go back", theme.muted),
            ]),
        }
    }
}

impl View for ExecScreen {
    fn title(&self) -> String {
        self.request.description.clone()
    }

    fn hints(&self) -> &'static [KeyHint] {
        if self.running {
            RUNNING_HINTS
        } else {
            DONE_HINTS
        }
    }

    fn blocks_back(&self) -> bool {
        self.running
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut Ctx) -> Outcome {
        match key.code {
            KeyCode::Char('m') if !self.running => {
                return Outcome::PopToRoot;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                if self.scroll >= self.last_max {
                    self.follow = true;
                }
            }
            KeyCode::PageUp => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(self.last_page);
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(self.last_page);
                if self.scroll >= self.last_max {
                    self.follow = true;
                }
            }
            KeyCode::Home => {
                self.follow = false;
                self.scroll = 0;
            }
            KeyCode::End => {
                self.follow = true;
            }
            _ => {}
        }
        Outcome::Stay
    }

    fn on_exec_event(&mut self, event: &ExecEvent, _ctx: &mut Ctx) {
        match event {
            ExecEvent::Chunk { stderr, bytes } => {
                self.ingest_chunk(*stderr, bytes);
            }
            ExecEvent::Exit { outcome } => {
                self.flush_pending();
                self.finished = Some(self.started.elapsed());
                self.outcome = Some(outcome.clone());
                self.running = false;
            }
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ui: &UiState<'_>) {
        let theme = ui.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let info = vec![
            Line::from(vec![
                Span::styled("$ ", theme.accent),
                Span::styled(self.request.command.clone(), theme.text),
            ]),
            self.status_line(ui),
        ];
        frame.render_widget(Paragraph::new(info), chunks[0]);

        let panel = chunks[1];
        let inner_rows = panel.height.saturating_sub(2) as usize;
        let inner_cols = panel.width.saturating_sub(2) as usize;
        self.last_page = inner_rows.max(1);

        let (lines, effective, max) = match &mut self.vt {
            Some(parser) => {
                let (rows, effective, max) =
                    vt_rows(parser, inner_rows, inner_cols, self.scroll, self.follow);
                let lines = rows
                    .iter()
                    .map(|row| ansi_line(row, theme.text))
                    .collect::<Vec<_>>();
                (lines, effective, max)
            }
            None => {
                let total = self.fallback.len();
                let max = total.saturating_sub(inner_rows.max(1));
                let effective = if self.follow {
                    max
                } else {
                    self.scroll.min(max)
                };
                let lines = self
                    .fallback
                    .iter()
                    .skip(effective)
                    .take(inner_rows.max(1))
                    .map(|line| {
                        let base = if line.stderr { theme.err } else { theme.text };
                        ansi_line(&line.text, base)
                    })
                    .collect::<Vec<_>>();
                (lines, effective, max)
            }
        };
        self.scroll = effective;
        self.last_max = max;

        frame.render_widget(
            Paragraph::new(lines).block(panel_block(Some("output"), theme)),
            panel,
        );
        if max > 0 {
            let mut state = ScrollbarState::new(max).position(effective);
            frame.render_stateful_widget(
                Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight),
                panel,
                &mut state,
            );
        }
    }
}
