use anstyle::{AnsiColor, Color, Style};

pub const COLOR_ENV: &str = "STEWARD_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Auto,
    Always,
    Never,
}

impl OutputMode {
    pub fn from_env() -> Self {
        parse_mode(std::env::var(COLOR_ENV).ok().as_deref()).unwrap_or(OutputMode::Auto)
    }

    /// Environment beats the config file; unknown values fall back to auto.
    pub fn resolve(config_value: Option<&str>) -> Self {
        if let Some(mode) = parse_mode(std::env::var(COLOR_ENV).ok().as_deref()) {
            return mode;
        }
        parse_mode(config_value).unwrap_or(OutputMode::Auto)
    }
}

fn parse_mode(value: Option<&str>) -> Option<OutputMode> {
    match value {
        Some("always") => Some(OutputMode::Always),
        Some("never") => Some(OutputMode::Never),
        Some("auto") => Some(OutputMode::Auto),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Style,
    pub muted: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub label: Style,
    pub value: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan)))
                .bold(),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
            success: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Green)))
                .bold(),
            warning: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow)))
                .bold(),
            error: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Red)))
                .bold(),
            label: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue)))
                .bold(),
            value: Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))),
        }
    }
}

pub fn resolve_color_enabled(mode: OutputMode, is_tty: bool) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match mode {
        OutputMode::Always => true,
        OutputMode::Never => false,
        OutputMode::Auto => is_tty,
    }
}

pub fn is_ci_environment() -> bool {
    std::env::var_os("CI").is_some()
}
