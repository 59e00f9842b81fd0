use super::{load_config, ConfigError, PathOverrides, StewardConfig, DEFAULT_EDITOR};
use crate::paths::SystemPaths;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn missing_file_yields_the_defaults() {
    let config = load_config(Path::new("/steward-no-such-config.toml")).expect("load");
    assert_eq!(config, StewardConfig::default());
    assert_eq!(config.editor(), DEFAULT_EDITOR);
}

#[test]
fn full_config_parses() {
    let config = parse(
        r#"
editor = "vim"
color = "never"

[paths]
redis_conf = "/opt/redis/redis.conf"

[[commands]]
id = "deploy"
name = "Deploy the site"
command = "/usr/local/bin/deploy.sh"
category = "releases"

[[commands]]
id = "flush-cache"
name = "Flush cache"
description = "Clears the shared redis cache"
command = "redis-cli FLUSHALL"
"#,
    )
    .expect("load");

    assert_eq!(config.editor(), "vim");
    assert_eq!(config.color.as_deref(), Some("never"));
    assert_eq!(
        config.paths.redis_conf,
        Some(PathBuf::from("/opt/redis/redis.conf"))
    );
    assert_eq!(config.commands.len(), 2);
    assert_eq!(config.commands[0].category, "releases");
    assert_eq!(config.commands[1].category, "custom");
    assert_eq!(config.commands[1].description, "Clears the shared redis cache");
}

#[test]
fn unknown_keys_are_rejected() {
    let error = parse("editr = \"vim\"\n").expect_err("should fail");
    assert!(matches!(error, ConfigError::Parse { .. }));
}

#[test]
fn duplicate_command_ids_are_rejected() {
    let error = parse(
        r#"
[[commands]]
id = "deploy"
name = "Deploy"
command = "a"

[[commands]]
id = "deploy"
name = "Deploy again"
command = "b"
"#,
    )
    .expect_err("should fail");
    assert_eq!(error.to_string(), "duplicate command id 'deploy' in configuration");
}

#[test]
fn blank_command_lines_are_rejected() {
    let error = parse(
        r#"
[[commands]]
id = "noop"
name = "Nothing"
command = "  "
"#,
    )
    .expect_err("should fail");
    assert!(matches!(error, ConfigError::EmptyCommand { .. }));
}

#[test]
fn path_overrides_replace_only_the_named_slots() {
    let mut paths = SystemPaths::rooted("/fixture");
    let overrides = PathOverrides {
        redis_conf: Some(PathBuf::from("/opt/redis/redis.conf")),
        ..PathOverrides::default()
    };
    overrides.apply(&mut paths);
    assert_eq!(paths.redis_conf, PathBuf::from("/opt/redis/redis.conf"));
    assert_eq!(paths.nginx_conf, PathBuf::from("/fixture/etc/nginx/nginx.conf"));
}

fn parse(raw: &str) -> Result<StewardConfig, ConfigError> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("steward-config-{ts}"));
    fs::create_dir_all(&dir).expect("mkdir");
    let file = dir.join("steward.toml");
    fs::write(&file, raw).expect("write config");
    load_config(&file)
}
