use std::path::PathBuf;

use crate::paths::SystemPaths;

use super::conf::{self, DirectiveStyle};
use super::ServiceError;

pub const UNIT: &str = "redis-server";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub password_set: bool,
    pub path: PathBuf,
}

pub fn load_config(paths: &SystemPaths) -> Result<RedisConfig, ServiceError> {
    let text = conf::read_config_text(&paths.redis_conf)?;
    Ok(parse_config(&text, paths.redis_conf.clone()))
}

fn parse_config(text: &str, path: PathBuf) -> RedisConfig {
    let mut config = RedisConfig {
        port: None,
        bind: None,
        password_set: false,
        path,
    };
    for line in text.lines() {
        let Some((key, value)) = conf::parse_directive_line(line) else {
            continue;
        };
        match key {
            "port" => config.port = value.parse().ok(),
            "bind" => config.bind = Some(value.to_owned()),
            "requirepass" => config.password_set = !value.is_empty(),
            _ => {}
        }
    }
    config
}

/// Written through to redis.conf; applies on the next restart.
pub fn change_port(paths: &SystemPaths, port: u16) -> Result<(), ServiceError> {
    let text = conf::read_config_text(&paths.redis_conf)?;
    let updated = conf::rewrite_directive(&text, "port", &port.to_string(), DirectiveStyle::Space);
    conf::write_config_text(&paths.redis_conf, &updated)
}

/// Sets `requirepass`; applies on the next restart. Whitespace would split
/// the directive, so it is rejected here as well as at the form.
pub fn change_password(paths: &SystemPaths, password: &str) -> Result<(), ServiceError> {
    if password.is_empty() || password.chars().any(char::is_whitespace) {
        return Err(ServiceError::InvalidValue {
            field: "password".to_owned(),
            detail: "must be non-empty without whitespace".to_owned(),
        });
    }
    let text = conf::read_config_text(&paths.redis_conf)?;
    let updated = conf::rewrite_directive(&text, "requirepass", password, DirectiveStyle::Space);
    conf::write_config_text(&paths.redis_conf, &updated)
}

#[cfg(test)]
#[path = "../tests/redis_tests.rs"]
mod tests;
