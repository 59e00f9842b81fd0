use std::path::PathBuf;

use crate::paths::SystemPaths;

use super::conf::{self, DirectiveStyle};
use super::{run_checked, shell_quote, ServiceError, SqlConfig};

pub const UNIT: &str = "mysql";
pub const DEFAULT_ADMIN: &str = "root";

pub fn load_config(paths: &SystemPaths) -> Result<SqlConfig, ServiceError> {
    let text = conf::read_config_text(&paths.mysql_conf)?;
    Ok(parse_config(&text, paths.mysql_conf.clone()))
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
            "port" => config.port = value.parse().ok(),
            "bind-address" => config.bind_address = Some(value.to_owned()),
            _ => {}
        }
    }
    config
}

/// Writes the new port through to mysqld.cnf. The daemon picks it up on the
/// next restart, which is left to the caller.
pub fn change_port(paths: &SystemPaths, port: u16) -> Result<(), ServiceError> {
    let text = conf::read_config_text(&paths.mysql_conf)?;
    let updated = conf::rewrite_directive(&text, "port", &port.to_string(), DirectiveStyle::Equals);
    conf::write_config_text(&paths.mysql_conf, &updated)
}

/// Runs ALTER USER through the mysql client; takes effect immediately.
pub fn change_password(user: &str, password: &str) -> Result<(), ServiceError> {
    let statement = format!(
        "ALTER USER '{user}'@'localhost' IDENTIFIED BY '{}';",
        sql_escape(password)
    );
    let command = format!("mysql -u root -e {}", shell_quote(&statement));
    run_checked(&command).map(|_| ())
}

pub fn list_databases() -> Result<Vec<String>, ServiceError> {
    let stdout = run_checked("mysql -N -e 'SHOW DATABASES'")?;
    Ok(stdout
        .lines()
        .map(|line| line.trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect())
}

fn sql_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "''")
}

#[cfg(test)]
#[path = "../tests/mysql_tests.rs"]
mod tests;
