use super::{
    load_environment, parse_command, CheckArgs, CliParseError, Command, ToolkitArgs, TuiArgs,
};
use crate::paths::SystemPaths;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn parse(args: &[&str]) -> Result<Command, CliParseError> {
    parse_command(args.iter().map(|arg| (*arg).to_owned()))
}

#[test]
fn no_arguments_opens_the_console() {
    assert_eq!(parse(&[]), Ok(Command::Tui(TuiArgs::default())));
}

#[test]
fn the_console_accepts_a_root_override() {
    assert_eq!(
        parse(&["--root", "/srv/fixture"]),
        Ok(Command::Tui(TuiArgs {
            root_override: Some(PathBuf::from("/srv/fixture")),
        }))
    );
}

#[test]
fn root_without_a_value_is_an_error() {
    assert_eq!(parse(&["--root"]), Err(CliParseError::MissingRootValue));
    assert_eq!(
        parse(&["check", "--root"]),
        Err(CliParseError::MissingRootValue)
    );
}

#[test]
fn check_parses_its_flags() {
    assert_eq!(parse(&["check"]), Ok(Command::Check(CheckArgs::default())));
    assert_eq!(
        parse(&["check", "--json", "--root", "/srv/fixture"]),
        Ok(Command::Check(CheckArgs {
            root_override: Some(PathBuf::from("/srv/fixture")),
            json: true,
        }))
    );
}

#[test]
fn toolkit_parses_a_category() {
    assert_eq!(
        parse(&["toolkit", "--category", "disk"]),
        Ok(Command::Toolkit(ToolkitArgs {
            root_override: None,
            category: Some("disk".to_owned()),
        }))
    );
    assert_eq!(
        parse(&["toolkit", "--category"]),
        Err(CliParseError::MissingCategoryValue)
    );
}

#[test]
fn help_wins_anywhere() {
    assert_eq!(parse(&["--help"]), Ok(Command::Help));
    assert_eq!(parse(&["-h"]), Ok(Command::Help));
    assert_eq!(parse(&["check", "--help"]), Ok(Command::Help));
    assert_eq!(parse(&["toolkit", "-h"]), Ok(Command::Help));
}

#[test]
fn unknown_input_is_reported_with_the_offending_token() {
    assert_eq!(
        parse(&["doctor"]),
        Err(CliParseError::UnknownCommand("doctor".to_owned()))
    );
    assert_eq!(
        parse(&["check", "--verbose"]),
        Err(CliParseError::UnknownArgument("--verbose".to_owned()))
    );
}

#[test]
fn a_broken_config_degrades_to_defaults_with_a_warning() {
    let mut paths = fixture_paths("broken");
    fs::create_dir_all(paths.config_file.parent().expect("parent")).expect("mkdir");
    fs::write(&paths.config_file, "editor = [").expect("seed config");

    let (config, catalog, warning) = load_environment(&mut paths);
    assert_eq!(config.editor(), "nano");
    assert!(catalog.category_count() >= 5);
    let warning = warning.expect("warning");
    assert!(warning.contains("unable to parse"));
}

#[test]
fn path_overrides_from_the_config_reroute_the_executors() {
    let mut paths = fixture_paths("overrides");
    fs::create_dir_all(paths.config_file.parent().expect("parent")).expect("mkdir");
    fs::write(
        &paths.config_file,
        "[paths]\nredis_conf = \"/opt/redis/redis.conf\"\n",
    )
    .expect("seed config");

    let (_config, _catalog, warning) = load_environment(&mut paths);
    assert!(warning.is_none());
    assert_eq!(paths.redis_conf, PathBuf::from("/opt/redis/redis.conf"));
}

fn fixture_paths(name: &str) -> SystemPaths {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    SystemPaths::rooted(std::env::temp_dir().join(format!("steward-lib-{name}-{ts}")))
}
