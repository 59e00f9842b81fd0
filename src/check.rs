use serde_json::json;

use crate::paths::{RootSource, SystemPaths};
use crate::services::{self, apps, firewall, mysql, nginx, packages, php_fpm, postgres, redis};
use crate::ui::{KeyValue, NoticeLevel, Renderer, SummaryCounts, TableSpec, UiError};

#[derive(Debug)]
pub enum CheckError {
    Ui(UiError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::Ui(error) => write!(f, "{error}"),
            CheckError::Json(error) => write!(f, "failed to encode check report: {error}"),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<UiError> for CheckError {
    fn from(value: UiError) -> Self {
        Self::Ui(value)
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub id: &'static str,
    pub label: &'static str,
    pub installed: bool,
    pub state: Option<services::UnitState>,
    pub config: Vec<String>,
    pub config_error: Option<String>,
}

impl ServiceReport {
    fn health(&self) -> Health {
        if !self.installed {
            return Health::Warn;
        }
        if matches!(self.state, Some(services::UnitState::Failed)) {
            return Health::Err;
        }
        if self.config_error.is_some() {
            return Health::Warn;
        }
        Health::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Health {
    Ok,
    Warn,
    Err,
}

pub fn probe_all(paths: &SystemPaths) -> Vec<ServiceReport> {
    packages::PACKAGES
        .iter()
        .map(|spec| probe_service(paths, spec))
        .collect()
}

fn probe_service(paths: &SystemPaths, spec: &packages::PackageSpec) -> ServiceReport {
    let installed = packages::is_installed(spec);
    let state = if installed {
        spec.unit.map(services::unit_state)
    } else {
        None
    };
    let (config, config_error) = if installed {
        probe_config(paths, spec.id)
    } else {
        (Vec::new(), None)
    };
    ServiceReport {
        id: spec.id,
        label: spec.label,
        installed,
        state,
        config,
        config_error,
    }
}

fn probe_config(paths: &SystemPaths, id: &str) -> (Vec<String>, Option<String>) {
    match id {
        "nginx" => match nginx::list_sites(paths) {
            Ok(sites) => {
                let enabled = sites.iter().filter(|site| site.enabled).count();
                (
                    vec![format!("sites: {enabled} enabled of {}", sites.len())],
                    None,
                )
            }
            Err(error) => (Vec::new(), Some(error.to_string())),
        },
        "mysql" => match mysql::load_config(paths) {
            Ok(config) => (sql_config_lines(&config), None),
            Err(error) => (Vec::new(), Some(error.to_string())),
        },
        "postgres" => match postgres::load_config(paths) {
            Ok(config) => (sql_config_lines(&config), None),
            Err(error) => (Vec::new(), Some(error.to_string())),
        },
        "redis" => match redis::load_config(paths) {
            Ok(config) => {
                let mut lines = Vec::new();
                if let Some(port) = config.port {
                    lines.push(format!("port: {port}"));
                }
                lines.push(format!(
                    "requirepass: {}",
                    if config.password_set { "set" } else { "unset" }
                ));
                (lines, None)
            }
            Err(error) => (Vec::new(), Some(error.to_string())),
        },
        "php-fpm" => match php_fpm::list_versions(paths) {
            Ok(versions) if versions.is_empty() => {
                (Vec::new(), Some("no PHP-FPM versions found".to_owned()))
            }
            Ok(versions) => {
                let rendered = versions
                    .iter()
                    .map(|version| version.version.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                (vec![format!("versions: {rendered}")], None)
            }
            Err(error) => (Vec::new(), Some(error.to_string())),
        },
        "supervisor" => match apps::list_apps(paths) {
            Ok(list) => (vec![format!("managed apps: {}", list.len())], None),
            Err(error) => (Vec::new(), Some(error.to_string())),
        },
        "ufw" => match firewall::status() {
            Ok(status) => (
                vec![format!(
                    "{}, {} rules",
                    if status.active { "active" } else { "inactive" },
                    status.rules.len()
                )],
                None,
            ),
            Err(error) => (Vec::new(), Some(error.to_string())),
        },
        _ => (Vec::new(), None),
    }
}

fn sql_config_lines(config: &services::SqlConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(port) = config.port {
        lines.push(format!("port: {port}"));
    }
    if let Some(bind) = &config.bind_address {
        lines.push(format!("bind: {bind}"));
    }
    lines
}

fn summarize(reports: &[ServiceReport]) -> SummaryCounts {
    let mut counts = SummaryCounts {
        ok: 0,
        warn: 0,
        err: 0,
    };
    for report in reports {
        match report.health() {
            Health::Ok => counts.ok += 1,
            Health::Warn => counts.warn += 1,
            Health::Err => counts.err += 1,
        }
    }
    counts
}

/// Exit status for the CLI: non-zero only when a probe found a failed unit.
pub fn run_check(
    paths: &SystemPaths,
    source: RootSource,
    json: bool,
    renderer: &mut dyn Renderer,
) -> Result<i32, CheckError> {
    if json {
        let reports = probe_all(paths);
        let counts = summarize(&reports);
        render_json(paths, source, &reports, counts, renderer)?;
        return Ok(if counts.err == 0 { 0 } else { 1 });
    }

    renderer.section("Steward Check")?;
    renderer.key_values(&[
        KeyValue::new("root", paths.root.display().to_string()),
        KeyValue::new("source", source.describe()),
    ])?;

    let spinner = renderer.spinner("Probing managed services")?;
    let reports = probe_all(paths);
    spinner.finish_success(&format!("Probed {} services", reports.len()));

    let rows = reports
        .iter()
        .map(|report| {
            vec![
                report.label.to_owned(),
                if report.installed { "yes" } else { "no" }.to_owned(),
                report
                    .state
                    .map(|state| state.describe().to_owned())
                    .unwrap_or_else(|| "-".to_owned()),
                if report.config.is_empty() {
                    "-".to_owned()
                } else {
                    report.config.join("; ")
                },
            ]
        })
        .collect::<Vec<_>>();
    renderer.table(&TableSpec::new(
        vec![
            "service".to_owned(),
            "installed".to_owned(),
            "unit".to_owned(),
            "config".to_owned(),
        ],
        rows,
    ))?;

    for report in &reports {
        if let Some(error) = &report.config_error {
            renderer.notice(NoticeLevel::Warning, &format!("{}: {error}", report.label))?;
        }
    }

    let counts = summarize(&reports);
    renderer.summary(counts)?;
    Ok(if counts.err == 0 { 0 } else { 1 })
}

fn render_json(
    paths: &SystemPaths,
    source: RootSource,
    reports: &[ServiceReport],
    counts: SummaryCounts,
    renderer: &mut dyn Renderer,
) -> Result<(), CheckError> {
    let services = reports
        .iter()
        .map(|report| {
            json!({
                "id": report.id,
                "label": report.label,
                "installed": report.installed,
                "state": report.state.map(|state| state.describe()),
                "config": report.config,
                "error": report.config_error,
            })
        })
        .collect::<Vec<_>>();
    let payload = json!({
        "schema": "steward.check.v1",
        "root": paths.root.display().to_string(),
        "root_source": source.describe(),
        "ok": counts.err == 0,
        "summary": { "ok": counts.ok, "warn": counts.warn, "err": counts.err },
        "services": services,
    });
    let rendered = serde_json::to_string_pretty(&payload)?;
    renderer.text(&rendered)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/check_tests.rs"]
mod tests;
