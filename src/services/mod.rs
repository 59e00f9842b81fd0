pub mod apps;
pub mod conf;
pub mod firewall;
pub mod mysql;
pub mod nginx;
pub mod packages;
pub mod php_fpm;
pub mod postgres;
pub mod redis;
pub mod unitfile;
pub mod users;

use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use crate::exec::ExecRequest;

#[derive(Debug)]
pub enum ServiceError {
    NotInstalled {
        service: String,
    },
    ConfigRead {
        path: PathBuf,
        error: std::io::Error,
    },
    ConfigWrite {
        path: PathBuf,
        error: std::io::Error,
    },
    CommandLaunch {
        command: String,
        error: std::io::Error,
    },
    CommandFailed {
        command: String,
        code: Option<i32>,
        detail: String,
    },
    PoolReloadFailed {
        pool: String,
        unit: String,
        detail: String,
    },
    InvalidValue {
        field: String,
        detail: String,
    },
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotInstalled { service } => {
                write!(f, "{service} is not installed")
            }
            ServiceError::ConfigRead { path, error } => {
                write!(f, "configuration unknown, unable to read {}: {error}", path.display())
            }
            ServiceError::ConfigWrite { path, error } => {
                write!(f, "unable to write {}: {error}", path.display())
            }
            ServiceError::CommandLaunch { command, error } => {
                write!(f, "failed to launch `{command}`: {error}")
            }
            ServiceError::CommandFailed {
                command,
                code,
                detail,
            } => match code {
                Some(code) => write!(f, "`{command}` failed (exit={code}): {detail}"),
                None => write!(f, "`{command}` failed: {detail}"),
            },
            ServiceError::PoolReloadFailed { pool, unit, detail } => {
                write!(f, "pool `{pool}`: {detail} ({unit})")
            }
            ServiceError::InvalidValue { field, detail } => {
                write!(f, "invalid {field}: {detail}")
            }
        }
    }
}

impl std::error::Error for ServiceError {}

/// Panel-relevant slice of a SQL daemon's config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlConfig {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub(crate) fn run_capture(command: &str) -> Result<CommandOutput, ServiceError> {
    let output = ProcessCommand::new("sh")
        .arg("-lc")
        .arg(command)
        .output()
        .map_err(|error| ServiceError::CommandLaunch {
            command: command.to_owned(),
            error,
        })?;
    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

pub(crate) fn run_checked(command: &str) -> Result<String, ServiceError> {
    let output = run_capture(command)?;
    if !output.success {
        let detail = if output.stderr.trim().is_empty() {
            output.stdout.trim().to_owned()
        } else {
            output.stderr.trim().to_owned()
        };
        return Err(ServiceError::CommandFailed {
            command: command.to_owned(),
            code: output.code,
            detail,
        });
    }
    Ok(output.stdout)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Active,
    Inactive,
    Failed,
    Unknown,
}

impl UnitState {
    pub fn describe(&self) -> &'static str {
        match self {
            UnitState::Active => "active",
            UnitState::Inactive => "inactive",
            UnitState::Failed => "failed",
            UnitState::Unknown => "unknown",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, UnitState::Active)
    }
}

/// `systemctl is-active` exits non-zero for anything but an active unit, so
/// the state comes from stdout rather than the exit code.
pub fn unit_state(unit: &str) -> UnitState {
    let Ok(output) = run_capture(&format!("systemctl is-active {}", shell_quote(unit))) else {
        return UnitState::Unknown;
    };
    match output.stdout.trim() {
        "active" => UnitState::Active,
        "inactive" => UnitState::Inactive,
        "failed" => UnitState::Failed,
        _ => UnitState::Unknown,
    }
}

pub fn systemctl_request(verb: &str, unit: &str) -> ExecRequest {
    ExecRequest {
        command: format!("systemctl {verb} {}", shell_quote(unit)),
        description: format!("systemctl {verb} {unit}"),
        cwd: None,
    }
}

pub(crate) fn systemctl_run(verb: &str, unit: &str) -> Result<(), ServiceError> {
    run_checked(&format!("systemctl {verb} {}", shell_quote(unit))).map(|_| ())
}

pub fn command_on_path(command: &str) -> bool {
    let Some(path_value) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path_value).any(|entry| entry.join(command).is_file())
}

pub(crate) fn shell_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_owned();
    }
    let safe = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || "-_./:@%+=,".contains(ch));
    if safe {
        return value.to_owned();
    }
    format!("'{}'", value.replace('\'', "'\"'\"'"))
}

#[cfg(test)]
#[path = "../tests/services_tests.rs"]
mod tests;
