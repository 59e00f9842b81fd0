use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::paths::SystemPaths;

use super::conf::{self, DirectiveStyle};
use super::{systemctl_run, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpVersion {
    pub version: String,
    pub pool_dir: PathBuf,
    pub unit: String,
}

/// One installed version per directory under /etc/php that carries an FPM
/// pool tree. An absent /etc/php means zero versions, not an error.
pub fn list_versions(paths: &SystemPaths) -> Result<Vec<PhpVersion>, ServiceError> {
    let entries = match fs::read_dir(&paths.php_base) {
        Ok(entries) => entries,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => {
            return Err(ServiceError::ConfigRead {
                path: paths.php_base.clone(),
                error,
            })
        }
    };
    let mut versions = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
            continue;
        }
        let pool_dir = paths.php_base.join(&name).join("fpm/pool.d");
        if !pool_dir.is_dir() {
            continue;
        }
        versions.push(PhpVersion {
            unit: format!("php{name}-fpm"),
            pool_dir,
            version: name,
        });
    }
    versions.sort_by(|a, b| version_key(&a.version).cmp(&version_key(&b.version)));
    Ok(versions)
}

fn version_key(version: &str) -> (u32, u32) {
    let mut parts = version.split('.');
    let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (major, minor)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub name: String,
    pub file: PathBuf,
    pub user: Option<String>,
    pub group: Option<String>,
    pub listen: Option<String>,
    pub pm: Option<String>,
    pub max_children: Option<u32>,
}

pub fn list_pools(version: &PhpVersion) -> Result<Vec<PoolConfig>, ServiceError> {
    let entries = fs::read_dir(&version.pool_dir).map_err(|error| ServiceError::ConfigRead {
        path: version.pool_dir.clone(),
        error,
    })?;
    let mut pools = Vec::new();
    for entry in entries.flatten() {
        let file = entry.path();
        if file.extension().and_then(|ext| ext.to_str()) != Some("conf") {
            continue;
        }
        let text = conf::read_config_text(&file)?;
        pools.push(parse_pool(&text, file));
    }
    pools.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(pools)
}

pub fn load_pool(version: &PhpVersion, name: &str) -> Result<PoolConfig, ServiceError> {
    let file = version.pool_dir.join(format!("{name}.conf"));
    let text = conf::read_config_text(&file)?;
    Ok(parse_pool(&text, file))
}

fn parse_pool(text: &str, file: PathBuf) -> PoolConfig {
    let fallback_name = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut pool = PoolConfig {
        name: fallback_name,
        file,
        user: None,
        group: None,
        listen: None,
        pm: None,
        max_children: None,
    };
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(section) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            pool.name = section.trim().to_owned();
            continue;
        }
        let Some((key, value)) = conf::parse_kv_line(line) else {
            continue;
        };
        match key {
            "user" => pool.user = Some(value.to_owned()),
            "group" => pool.group = Some(value.to_owned()),
            "listen" => pool.listen = Some(value.to_owned()),
            "pm" => pool.pm = Some(value.to_owned()),
            "pm.max_children" => pool.max_children = value.parse().ok(),
            _ => {}
        }
    }
    pool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub name: String,
    pub user: String,
    pub listen: String,
    pub max_children: u32,
}

pub fn render_pool(settings: &PoolSettings) -> String {
    format!(
        "[{name}]\n\
         user = {user}\n\
         group = {user}\n\
         listen = {listen}\n\
         listen.owner = www-data\n\
         listen.group = www-data\n\
         pm = dynamic\n\
         pm.max_children = {children}\n\
         pm.start_servers = 2\n\
         pm.min_spare_servers = 1\n\
         pm.max_spare_servers = 3\n",
        name = settings.name,
        user = settings.user,
        listen = settings.listen,
        children = settings.max_children,
    )
}

pub fn valid_pool_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

pub fn create_pool(version: &PhpVersion, settings: &PoolSettings) -> Result<(), ServiceError> {
    if !valid_pool_name(&settings.name) {
        return Err(ServiceError::InvalidValue {
            field: "pool name".to_owned(),
            detail: "use letters, digits, '-' or '_'".to_owned(),
        });
    }
    let file = version.pool_dir.join(format!("{}.conf", settings.name));
    if file.exists() {
        return Err(ServiceError::InvalidValue {
            field: "pool name".to_owned(),
            detail: format!("pool '{}' already exists", settings.name),
        });
    }
    conf::write_config_text(&file, &render_pool(settings))?;
    reload_after_write(version, &settings.name, "pool created")
}

pub fn update_pool(version: &PhpVersion, pool: &PoolConfig, settings: &PoolSettings) -> Result<(), ServiceError> {
    let text = conf::read_config_text(&pool.file)?;
    let mut updated = conf::rewrite_directive(&text, "user", &settings.user, DirectiveStyle::Equals);
    updated = conf::rewrite_directive(&updated, "group", &settings.user, DirectiveStyle::Equals);
    updated = conf::rewrite_directive(&updated, "listen", &settings.listen, DirectiveStyle::Equals);
    updated = conf::rewrite_directive(
        &updated,
        "pm.max_children",
        &settings.max_children.to_string(),
        DirectiveStyle::Equals,
    );
    conf::write_config_text(&pool.file, &updated)?;
    reload_after_write(version, &pool.name, "pool updated")
}

pub fn delete_pool(version: &PhpVersion, pool: &PoolConfig) -> Result<(), ServiceError> {
    fs::remove_file(&pool.file).map_err(|error| ServiceError::ConfigWrite {
        path: pool.file.clone(),
        error,
    })?;
    reload_after_write(version, &pool.name, "pool removed")
}

/// A reload failure after a successful write reports exactly that step;
/// the file is left in place.
fn reload_after_write(version: &PhpVersion, pool: &str, applied: &str) -> Result<(), ServiceError> {
    systemctl_run("reload", &version.unit).map_err(|error| ServiceError::PoolReloadFailed {
        pool: pool.to_owned(),
        unit: version.unit.clone(),
        detail: format!("{applied}, reload failed: {error}"),
    })
}

#[cfg(test)]
#[path = "../tests/php_fpm_tests.rs"]
mod tests;
