use super::{change_password, change_port, load_config, parse_config};
use crate::paths::SystemPaths;
use crate::services::ServiceError;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const REDIS_CONF: &str = "\
# Redis configuration
bind 127.0.0.1 ::1
port 6379
# requirepass foobared
daemonize yes
";

#[test]
fn parses_port_and_bind() {
    let config = parse_config(REDIS_CONF, PathBuf::from("redis.conf"));
    assert_eq!(config.port, Some(6379));
    assert_eq!(config.bind.as_deref(), Some("127.0.0.1 ::1"));
    assert!(!config.password_set);
}

#[test]
fn commented_requirepass_does_not_count_as_set() {
    let config = parse_config(REDIS_CONF, PathBuf::from("redis.conf"));
    assert!(!config.password_set);
    let config = parse_config("requirepass hunter2\n", PathBuf::from("redis.conf"));
    assert!(config.password_set);
}

#[test]
fn change_port_round_trips_through_the_config_file() {
    let paths = fixture_paths("port");
    seed_conf(&paths, REDIS_CONF);

    change_port(&paths, 6380).expect("change port");

    let config = load_config(&paths).expect("reload");
    assert_eq!(config.port, Some(6380));
}

#[test]
fn change_password_sets_requirepass() {
    let paths = fixture_paths("pass");
    seed_conf(&paths, REDIS_CONF);

    change_password(&paths, "hunter2").expect("change password");

    let config = load_config(&paths).expect("reload");
    assert!(config.password_set);
    let text = fs::read_to_string(&paths.redis_conf).expect("read");
    assert!(text.contains("requirepass hunter2"));
}

#[test]
fn change_password_rejects_whitespace() {
    let paths = fixture_paths("reject");
    let error = change_password(&paths, "two words").expect_err("should fail");
    assert!(matches!(error, ServiceError::InvalidValue { .. }));
    let error = change_password(&paths, "").expect_err("should fail");
    assert!(matches!(error, ServiceError::InvalidValue { .. }));
}

fn seed_conf(paths: &SystemPaths, conf: &str) {
    fs::create_dir_all(paths.redis_conf.parent().expect("parent")).expect("mkdir");
    fs::write(&paths.redis_conf, conf).expect("seed conf");
}

fn fixture_paths(name: &str) -> SystemPaths {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    SystemPaths::rooted(std::env::temp_dir().join(format!("steward-redis-{name}-{ts}")))
}
