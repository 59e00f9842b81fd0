use std::io::{self, IsTerminal};
use std::process::Command;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::StewardConfig;
use crate::paths::SystemPaths;
use crate::toolkit::ToolkitCatalog;

pub(crate) mod app;
pub(crate) mod form;
pub(crate) mod menu;
pub(crate) mod render;
pub(crate) mod screen;
pub(crate) mod screens;
pub(crate) mod terminal_text;
pub(crate) mod theme;

use app::App;

#[derive(Debug)]
pub enum TuiError {
    Io(io::Error),
    NoTty,
}

impl std::fmt::Display for TuiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuiError::Io(err) => write!(f, "{err}"),
            TuiError::NoTty => write!(f, "the console needs an interactive terminal"),
        }
    }
}

impl std::error::Error for TuiError {}

impl From<io::Error> for TuiError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs the interactive console until the user quits. `config_warning`
/// carries a config parse failure to surface once the screen is up.
pub fn run_tui(
    paths: SystemPaths,
    config: StewardConfig,
    catalog: ToolkitCatalog,
    config_warning: Option<String>,
) -> Result<(), TuiError> {
    if !io::stdout().is_terminal() {
        return Err(TuiError::NoTty);
    }

    let theme = theme::Theme::resolve(&config);
    let mut app = App::new(paths, config, catalog, theme);
    if let Some(detail) = config_warning {
        app.startup_warning(detail);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app);

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, EnableLineWrap)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), TuiError> {
    loop {
        app.drain_events();
        app.tick();
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }

        if let Some((editor, path)) = app.take_pending_editor() {
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
            let result = Command::new(&editor).arg(&path).status();
            enable_raw_mode()?;
            execute!(terminal.backend_mut(), EnterAlternateScreen)?;
            terminal.clear()?;
            app.on_editor_closed(&editor, &path, result);
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
