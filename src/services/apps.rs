use std::fs;
use std::path::PathBuf;

use crate::exec::ExecRequest;
use crate::paths::SystemPaths;

use super::conf;
use super::unitfile::{self, UnitFileConfig};
use super::{shell_quote, ServiceError};

pub const UNIT_PREFIX: &str = "steward-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUnit {
    pub name: String,
    pub unit: String,
    pub file: PathBuf,
}

/// Panel-managed applications are the `steward-*.service` units in the
/// system unit directory.
pub fn list_apps(paths: &SystemPaths) -> Result<Vec<AppUnit>, ServiceError> {
    let entries = fs::read_dir(&paths.unit_dir).map_err(|error| ServiceError::ConfigRead {
        path: paths.unit_dir.clone(),
        error,
    })?;
    let mut apps = Vec::new();
    for entry in entries.flatten() {
        let unit = entry.file_name().to_string_lossy().into_owned();
        let Some(stem) = unit.strip_suffix(".service") else {
            continue;
        };
        let Some(name) = stem.strip_prefix(UNIT_PREFIX) else {
            continue;
        };
        apps.push(AppUnit {
            name: name.to_owned(),
            unit,
            file: entry.path(),
        });
    }
    apps.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(apps)
}

pub fn load_app(app: &AppUnit) -> Result<UnitFileConfig, ServiceError> {
    unitfile::load_unit_file(&app.file)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    pub name: String,
    pub command: String,
    pub user: String,
    pub working_directory: Option<PathBuf>,
}

pub fn render_unit(spec: &AppSpec) -> String {
    let mut unit = String::new();
    unit.push_str("[Unit]\n");
    unit.push_str(&format!("Description=steward managed app {}\n", spec.name));
    unit.push_str("After=network.target\n\n");
    unit.push_str("[Service]\n");
    unit.push_str(&format!("User={}\n", spec.user));
    if let Some(dir) = &spec.working_directory {
        unit.push_str(&format!("WorkingDirectory={}\n", dir.display()));
    }
    unit.push_str(&format!("ExecStart={}\n", spec.command));
    unit.push_str("Restart=always\n");
    unit.push_str("RestartSec=2\n\n");
    unit.push_str("[Install]\n");
    unit.push_str("WantedBy=multi-user.target\n");
    unit
}

/// Writes the unit file and returns the activation command for the runner.
pub fn create_app(paths: &SystemPaths, spec: &AppSpec) -> Result<ExecRequest, ServiceError> {
    if !valid_app_name(&spec.name) {
        return Err(ServiceError::InvalidValue {
            field: "app name".to_owned(),
            detail: "use lowercase letters, digits and dashes".to_owned(),
        });
    }
    let unit = format!("{UNIT_PREFIX}{}.service", spec.name);
    let file = paths.unit_dir.join(&unit);
    if file.exists() {
        return Err(ServiceError::InvalidValue {
            field: "app name".to_owned(),
            detail: format!("unit {unit} already exists"),
        });
    }
    conf::write_config_text(&file, &render_unit(spec))?;
    Ok(ExecRequest {
        command: format!(
            "systemctl daemon-reload && systemctl enable --now {}",
            shell_quote(&unit)
        ),
        description: format!("enable {unit}"),
        cwd: None,
    })
}

pub fn valid_app_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
        && !name.starts_with('-')
}

#[cfg(test)]
#[path = "../tests/apps_tests.rs"]
mod tests;
