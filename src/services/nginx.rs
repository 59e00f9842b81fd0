use std::fs;
use std::io::ErrorKind;

use crate::exec::ExecRequest;
use crate::paths::SystemPaths;

use super::ServiceError;

pub const UNIT: &str = "nginx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    pub name: String,
    pub enabled: bool,
}

/// A site is enabled when a link (or file) of the same name exists under
/// sites-enabled.
pub fn list_sites(paths: &SystemPaths) -> Result<Vec<SiteEntry>, ServiceError> {
    let entries = fs::read_dir(&paths.nginx_sites_available).map_err(|error| {
        ServiceError::ConfigRead {
            path: paths.nginx_sites_available.clone(),
            error,
        }
    })?;
    let mut sites = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let enabled = paths.nginx_sites_enabled.join(&name).exists();
        sites.push(SiteEntry { name, enabled });
    }
    sites.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sites)
}

pub fn enable_site(paths: &SystemPaths, name: &str) -> Result<(), ServiceError> {
    let source = paths.nginx_sites_available.join(name);
    if !source.exists() {
        return Err(ServiceError::ConfigRead {
            path: source,
            error: std::io::Error::new(ErrorKind::NotFound, "site file missing"),
        });
    }
    let link = paths.nginx_sites_enabled.join(name);
    if link.exists() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&source, &link).map_err(|error| ServiceError::ConfigWrite {
            path: link.clone(),
            error,
        })?;
    }
    #[cfg(not(unix))]
    {
        fs::copy(&source, &link).map_err(|error| ServiceError::ConfigWrite {
            path: link.clone(),
            error,
        })?;
    }
    Ok(())
}

pub fn disable_site(paths: &SystemPaths, name: &str) -> Result<(), ServiceError> {
    let link = paths.nginx_sites_enabled.join(name);
    if !link.exists() {
        return Ok(());
    }
    fs::remove_file(&link).map_err(|error| ServiceError::ConfigWrite { path: link, error })
}

pub fn config_test_request() -> ExecRequest {
    ExecRequest {
        command: "nginx -t".to_owned(),
        description: "nginx configuration test".to_owned(),
        cwd: None,
    }
}

#[cfg(test)]
#[path = "../tests/nginx_tests.rs"]
mod tests;
