use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "STEWARD_ROOT";

/// Every filesystem location the service executors touch, derived from one
/// root prefix so the whole tree can be re-rooted onto a fixture directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPaths {
    pub root: PathBuf,
    pub nginx_conf: PathBuf,
    pub nginx_sites_available: PathBuf,
    pub nginx_sites_enabled: PathBuf,
    pub mysql_conf: PathBuf,
    pub postgres_base: PathBuf,
    pub redis_conf: PathBuf,
    pub php_base: PathBuf,
    pub unit_dir: PathBuf,
    pub passwd_file: PathBuf,
    pub group_file: PathBuf,
    pub sudoers_dir: PathBuf,
    pub config_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    CliFlag,
    Environment,
    Default,
}

impl RootSource {
    pub fn describe(&self) -> &'static str {
        match self {
            RootSource::CliFlag => "--root flag",
            RootSource::Environment => "STEWARD_ROOT",
            RootSource::Default => "default",
        }
    }
}

#[derive(Debug)]
pub enum PathsError {
    RootNotFound { path: PathBuf },
}

impl fmt::Display for PathsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathsError::RootNotFound { path } => {
                write!(f, "root prefix {} does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for PathsError {}

impl SystemPaths {
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let etc = |tail: &str| root.join("etc").join(tail);
        Self {
            nginx_conf: etc("nginx/nginx.conf"),
            nginx_sites_available: etc("nginx/sites-available"),
            nginx_sites_enabled: etc("nginx/sites-enabled"),
            mysql_conf: etc("mysql/mysql.conf.d/mysqld.cnf"),
            postgres_base: etc("postgresql"),
            redis_conf: etc("redis/redis.conf"),
            php_base: etc("php"),
            unit_dir: etc("systemd/system"),
            passwd_file: etc("passwd"),
            group_file: etc("group"),
            sudoers_dir: etc("sudoers.d"),
            config_file: etc("steward/steward.toml"),
            root,
        }
    }

    pub fn system() -> Self {
        Self::rooted("/")
    }
}

pub fn resolve_root(cli_root: Option<&Path>) -> Result<(SystemPaths, RootSource), PathsError> {
    if let Some(path) = cli_root {
        if !path.is_dir() {
            return Err(PathsError::RootNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok((SystemPaths::rooted(path), RootSource::CliFlag));
    }
    if let Some(value) = env::var_os(ROOT_ENV) {
        let path = PathBuf::from(value);
        if !path.is_dir() {
            return Err(PathsError::RootNotFound { path });
        }
        return Ok((SystemPaths::rooted(path), RootSource::Environment));
    }
    Ok((SystemPaths::system(), RootSource::Default))
}

#[cfg(test)]
#[path = "tests/paths_tests.rs"]
mod tests;
