pub mod check;
pub mod config;
pub mod exec;
pub mod paths;
pub mod services;
pub mod toolkit;
pub mod tui;
pub mod ui;

use std::path::PathBuf;

use check::CheckError;
use config::{load_config, ConfigError, StewardConfig};
use paths::{resolve_root, PathsError, SystemPaths};
use toolkit::ToolkitCatalog;
use tui::TuiError;
use ui::{NoticeLevel, OutputMode, PlainRenderer, Renderer, UiError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tui(TuiArgs),
    Check(CheckArgs),
    Toolkit(ToolkitArgs),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TuiArgs {
    pub root_override: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckArgs {
    pub root_override: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolkitArgs {
    pub root_override: Option<PathBuf>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliParseError {
    MissingRootValue,
    MissingCategoryValue,
    UnknownCommand(String),
    UnknownArgument(String),
}

impl std::fmt::Display for CliParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliParseError::MissingRootValue => write!(f, "--root requires a value"),
            CliParseError::MissingCategoryValue => write!(f, "--category requires a value"),
            CliParseError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            CliParseError::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliParseError {}

pub fn parse_command<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(cmd) = args.next() else {
        return Ok(Command::Tui(TuiArgs::default()));
    };

    match cmd.as_str() {
        "--help" | "-h" => Ok(Command::Help),
        "check" => parse_check(args),
        "toolkit" => parse_toolkit(args),
        "--root" => {
            let Some(path) = args.next() else {
                return Err(CliParseError::MissingRootValue);
            };
            parse_tui(args, Some(PathBuf::from(path)))
        }
        other => Err(CliParseError::UnknownCommand(other.to_owned())),
    }
}

fn parse_tui<I>(args: I, mut root_override: Option<PathBuf>) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingRootValue);
                };
                root_override = Some(PathBuf::from(path));
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliParseError::UnknownArgument(other.to_owned())),
        }
    }
    Ok(Command::Tui(TuiArgs { root_override }))
}

fn parse_check<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut root_override: Option<PathBuf> = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingRootValue);
                };
                root_override = Some(PathBuf::from(path));
            }
            "--json" => {
                json = true;
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliParseError::UnknownArgument(other.to_owned())),
        }
    }

    Ok(Command::Check(CheckArgs {
        root_override,
        json,
    }))
}

fn parse_toolkit<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut root_override: Option<PathBuf> = None;
    let mut category: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingRootValue);
                };
                root_override = Some(PathBuf::from(path));
            }
            "--category" => {
                let Some(name) = args.next() else {
                    return Err(CliParseError::MissingCategoryValue);
                };
                category = Some(name);
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliParseError::UnknownArgument(other.to_owned())),
        }
    }

    Ok(Command::Toolkit(ToolkitArgs {
        root_override,
        category,
    }))
}

pub fn print_usage() {
    eprintln!(
        "steward\n\nUSAGE:\n  steward [--root <PATH>]\n  steward check [--root <PATH>] [--json]\n  steward toolkit [--category <NAME>] [--root <PATH>]\n\nCOMMANDS:\n  (default)         Open the interactive server console\n  check             Probe managed services and print a status report\n  toolkit           Print the toolkit command catalog\n\nOPTIONS:\n  --root <PATH>     Administer the filesystem rooted at PATH instead of /\n  --json            Emit the check report as JSON\n  --category <NAME> Limit the toolkit listing to one category\n\nGENERAL:\n  -h, --help        Print help\n"
    );
}

#[derive(Debug)]
pub enum RunError {
    Paths(PathsError),
    Config(ConfigError),
    Check(CheckError),
    Tui(TuiError),
    Ui(UiError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Paths(err) => write!(f, "{err}"),
            RunError::Config(err) => write!(f, "{err}"),
            RunError::Check(err) => write!(f, "{err}"),
            RunError::Tui(err) => write!(f, "{err}"),
            RunError::Ui(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<PathsError> for RunError {
    fn from(value: PathsError) -> Self {
        Self::Paths(value)
    }
}

impl From<ConfigError> for RunError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<CheckError> for RunError {
    fn from(value: CheckError) -> Self {
        Self::Check(value)
    }
}

impl From<TuiError> for RunError {
    fn from(value: TuiError) -> Self {
        Self::Tui(value)
    }
}

impl From<UiError> for RunError {
    fn from(value: UiError) -> Self {
        Self::Ui(value)
    }
}

/// Config and catalog with soft failure: a broken config file degrades to
/// defaults and the reason is reported, it never blocks the command.
fn load_environment(paths: &mut SystemPaths) -> (StewardConfig, ToolkitCatalog, Option<String>) {
    let mut warnings = Vec::new();
    let config = match load_config(&paths.config_file) {
        Ok(config) => config,
        Err(error) => {
            warnings.push(error.to_string());
            StewardConfig::default()
        }
    };
    config.paths.apply(paths);
    let catalog = match ToolkitCatalog::with_user_commands(&config.commands) {
        Ok(catalog) => catalog,
        Err(error) => {
            warnings.push(error.to_string());
            ToolkitCatalog::builtin()
        }
    };
    let warning = (!warnings.is_empty()).then(|| warnings.join("; "));
    (config, catalog, warning)
}

pub fn run(command: Command) -> Result<i32, RunError> {
    match command {
        Command::Help => {
            print_usage();
            Ok(0)
        }
        Command::Tui(args) => {
            let (mut paths, _source) = resolve_root(args.root_override.as_deref())?;
            let (config, catalog, warning) = load_environment(&mut paths);
            tui::run_tui(paths, config, catalog, warning)?;
            Ok(0)
        }
        Command::Check(args) => {
            let (mut paths, source) = resolve_root(args.root_override.as_deref())?;
            let (config, _catalog, warning) = load_environment(&mut paths);
            let mode = OutputMode::resolve(config.color.as_deref());
            let mut renderer = PlainRenderer::stdout(mode);
            if let Some(warning) = &warning {
                renderer.notice(NoticeLevel::Warning, warning)?;
            }
            let code = check::run_check(&paths, source, args.json, &mut renderer)?;
            Ok(code)
        }
        Command::Toolkit(args) => {
            let (mut paths, _source) = resolve_root(args.root_override.as_deref())?;
            let (config, catalog, warning) = load_environment(&mut paths);
            let mode = OutputMode::resolve(config.color.as_deref());
            let mut renderer = PlainRenderer::stdout(mode);
            if let Some(warning) = &warning {
                renderer.notice(NoticeLevel::Warning, warning)?;
            }
            let matched = toolkit::render_listing(&catalog, args.category.as_deref(), &mut renderer)?;
            Ok(if matched { 0 } else { 1 })
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
