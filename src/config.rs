use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::paths::SystemPaths;

pub const DEFAULT_EDITOR: &str = "nano";

/// Optional operator configuration at `<root>/etc/steward/steward.toml`.
/// A missing file yields the defaults; a malformed file is a typed error the
/// caller reports once before falling back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StewardConfig {
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub paths: PathOverrides,
    #[serde(default)]
    pub commands: Vec<UserCommand>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathOverrides {
    #[serde(default)]
    pub nginx_conf: Option<PathBuf>,
    #[serde(default)]
    pub nginx_sites_available: Option<PathBuf>,
    #[serde(default)]
    pub nginx_sites_enabled: Option<PathBuf>,
    #[serde(default)]
    pub mysql_conf: Option<PathBuf>,
    #[serde(default)]
    pub postgres_base: Option<PathBuf>,
    #[serde(default)]
    pub redis_conf: Option<PathBuf>,
    #[serde(default)]
    pub php_base: Option<PathBuf>,
    #[serde(default)]
    pub unit_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserCommand {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub command: String,
    #[serde(default = "default_command_category")]
    pub category: String,
}

fn default_command_category() -> String {
    "custom".to_owned()
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        error: std::io::Error,
    },
    Parse {
        path: PathBuf,
        error: toml::de::Error,
    },
    DuplicateCommandId {
        id: String,
    },
    EmptyCommand {
        id: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, error } => {
                write!(f, "unable to read {}: {error}", path.display())
            }
            ConfigError::Parse { path, error } => {
                write!(f, "unable to parse {}: {error}", path.display())
            }
            ConfigError::DuplicateCommandId { id } => {
                write!(f, "duplicate command id '{id}' in configuration")
            }
            ConfigError::EmptyCommand { id } => {
                write!(f, "command '{id}' has an empty command line")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl StewardConfig {
    pub fn editor(&self) -> &str {
        self.editor.as_deref().unwrap_or(DEFAULT_EDITOR)
    }
}

impl PathOverrides {
    pub fn apply(&self, paths: &mut SystemPaths) {
        let overrides = [
            (&self.nginx_conf, &mut paths.nginx_conf),
            (&self.nginx_sites_available, &mut paths.nginx_sites_available),
            (&self.nginx_sites_enabled, &mut paths.nginx_sites_enabled),
            (&self.mysql_conf, &mut paths.mysql_conf),
            (&self.postgres_base, &mut paths.postgres_base),
            (&self.redis_conf, &mut paths.redis_conf),
            (&self.php_base, &mut paths.php_base),
            (&self.unit_dir, &mut paths.unit_dir),
        ];
        for (value, slot) in overrides {
            if let Some(path) = value {
                *slot = path.clone();
            }
        }
    }
}

pub fn load_config(path: &Path) -> Result<StewardConfig, ConfigError> {
    if !path.exists() {
        return Ok(StewardConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|error| ConfigError::Read {
        path: path.to_path_buf(),
        error,
    })?;
    let config = toml::from_str::<StewardConfig>(&raw).map_err(|error| ConfigError::Parse {
        path: path.to_path_buf(),
        error,
    })?;
    validate_commands(&config.commands)?;
    Ok(config)
}

fn validate_commands(commands: &[UserCommand]) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for command in commands {
        if command.command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand {
                id: command.id.clone(),
            });
        }
        if !seen.insert(command.id.as_str()) {
            return Err(ConfigError::DuplicateCommandId {
                id: command.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
