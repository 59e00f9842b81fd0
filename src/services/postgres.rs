use std::fs;
use std::path::PathBuf;

use crate::paths::SystemPaths;

use super::conf::{self, DirectiveStyle};
use super::{run_checked, shell_quote, ServiceError, SqlConfig};

pub const UNIT: &str = "postgresql";
pub const DEFAULT_ADMIN: &str = "postgres";

/// Debian keeps one config tree per cluster version under /etc/postgresql.
/// The newest version that actually has a postgresql.conf wins.
pub fn find_conf(paths: &SystemPaths) -> Result<PathBuf, ServiceError> {
    let entries = fs::read_dir(&paths.postgres_base).map_err(|_| ServiceError::NotInstalled {
        service: "postgresql".to_owned(),
    })?;
    let mut versions = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let conf = paths.postgres_base.join(&name).join("main/postgresql.conf");
        if conf.is_file() {
            versions.push((version_key(&name), conf));
        }
    }
    versions.sort_by(|a, b| a.0.cmp(&b.0));
    versions
        .pop()
        .map(|(_, conf)| conf)
        .ok_or_else(|| ServiceError::NotInstalled {
            service: "postgresql".to_owned(),
        })
}

fn version_key(name: &str) -> (u32, u32) {
    let mut parts = name.split('.');
    let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (major, minor)
}

pub fn load_config(paths: &SystemPaths) -> Result<SqlConfig, ServiceError> {
    let conf_path = find_conf(paths)?;
    let text = conf::read_config_text(&conf_path)?;
    Ok(parse_config(&text, conf_path))
}

fn parse_config(text: &str, path: PathBuf) -> SqlConfig {
    let mut config = SqlConfig {
        port: None,
        bind_address: None,
        path,
    };
    for line in text.lines() {
        let Some((key, value)) = conf::parse_kv_line(line) else {
            continue;
        };
        match key {
            "port" => config.port = conf::unquote(value).parse().ok(),
            "listen_addresses" => config.bind_address = Some(conf::unquote(value).to_owned()),
            _ => {}
        }
    }
    config
}

pub fn change_port(paths: &SystemPaths, port: u16) -> Result<(), ServiceError> {
    let conf_path = find_conf(paths)?;
    let text = conf::read_config_text(&conf_path)?;
    let updated = conf::rewrite_directive(&text, "port", &port.to_string(), DirectiveStyle::Equals);
    conf::write_config_text(&conf_path, &updated)
}

/// Runs ALTER USER through psql as the postgres system user; takes effect
/// immediately.
pub fn change_password(user: &str, password: &str) -> Result<(), ServiceError> {
    let statement = format!(
        "ALTER USER \"{user}\" WITH PASSWORD '{}';",
        sql_escape(password)
    );
    let psql = format!("psql -c {}", shell_quote(&statement));
    let command = format!("su -s /bin/sh postgres -c {}", shell_quote(&psql));
    run_checked(&command).map(|_| ())
}

pub fn list_databases() -> Result<Vec<String>, ServiceError> {
    let psql = format!(
        "psql -At -c {}",
        shell_quote("SELECT datname FROM pg_database WHERE datistemplate = false ORDER BY datname")
    );
    let command = format!("su -s /bin/sh postgres -c {}", shell_quote(&psql));
    let stdout = run_checked(&command)?;
    Ok(stdout
        .lines()
        .map(|line| line.trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect())
}

fn sql_escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
#[path = "../tests/postgres_tests.rs"]
mod tests;
