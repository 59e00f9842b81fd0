use std::path::{Path, PathBuf};

use super::conf::read_config_text;
use super::ServiceError;

/// Panel-relevant slice of a systemd unit file. Parsing is tolerant: unknown
/// keys and flags are skipped, absent keys stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitFileConfig {
    pub user: Option<String>,
    pub group: Option<String>,
    pub working_directory: Option<PathBuf>,
    pub exec_start: Option<String>,
    pub listen: Option<ListenTarget>,
    pub docroot: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenTarget {
    Port { bind: Option<String>, port: String },
    Socket { path: PathBuf },
}

impl ListenTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ListenTarget::Port { .. } => "port",
            ListenTarget::Socket { .. } => "socket",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ListenTarget::Port { bind: Some(bind), port } => format!("{bind}:{port} (port)"),
            ListenTarget::Port { bind: None, port } => format!("{port} (port)"),
            ListenTarget::Socket { path } => format!("{} (socket)", path.display()),
        }
    }
}

pub fn load_unit_file(path: &Path) -> Result<UnitFileConfig, ServiceError> {
    let text = read_config_text(path)?;
    Ok(parse_unit_text(&text))
}

pub fn parse_unit_text(text: &str) -> UnitFileConfig {
    let mut config = UnitFileConfig::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') || line.starts_with('[')
        {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "User" => config.user = Some(value.to_owned()),
            "Group" => config.group = Some(value.to_owned()),
            "WorkingDirectory" => config.working_directory = Some(PathBuf::from(value)),
            "ExecStart" => {
                config.exec_start = Some(value.to_owned());
                scan_exec_flags(value, &mut config);
            }
            _ => {}
        }
    }
    config
}

fn scan_exec_flags(exec_start: &str, config: &mut UnitFileConfig) {
    let tokens = exec_start.split_whitespace().collect::<Vec<_>>();
    let mut index = 0;
    while index < tokens.len() {
        let value = tokens.get(index + 1).copied();
        match tokens[index] {
            "--listen" => {
                if let Some(value) = value {
                    config.listen = Some(parse_listen(value));
                    index += 1;
                }
            }
            "--root" => {
                if let Some(value) = value {
                    config.docroot = Some(PathBuf::from(value));
                    index += 1;
                }
            }
            "--config" => {
                if let Some(value) = value {
                    config.config_path = Some(PathBuf::from(value));
                    index += 1;
                }
            }
            _ => {}
        }
        index += 1;
    }
}

/// A listen value with a colon is an address:port pair split at the last
/// colon; anything else is a unix socket path.
fn parse_listen(value: &str) -> ListenTarget {
    match value.rsplit_once(':') {
        Some((bind, port)) => ListenTarget::Port {
            bind: (!bind.is_empty()).then(|| bind.to_owned()),
            port: port.to_owned(),
        },
        None => ListenTarget::Socket {
            path: PathBuf::from(value),
        },
    }
}

#[cfg(test)]
#[path = "../tests/unitfile_tests.rs"]
mod tests;
