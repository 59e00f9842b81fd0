use indexmap::IndexMap;

use crate::config::{ConfigError, UserCommand};
use crate::exec::ExecRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitCommand {
    pub id: String,
    pub name: String,
    pub description: String,
    pub command: String,
}

impl ToolkitCommand {
    pub fn request(&self) -> ExecRequest {
        ExecRequest {
            command: self.command.clone(),
            description: self.name.clone(),
            cwd: None,
        }
    }
}

/// Canned admin commands grouped by category. Category order is declaration
/// order; the toolkit screen cycles through it with tab.
#[derive(Debug, Clone, Default)]
pub struct ToolkitCatalog {
    categories: IndexMap<String, Vec<ToolkitCommand>>,
}

struct BuiltinCommand {
    category: &'static str,
    id: &'static str,
    name: &'static str,
    description: &'static str,
    command: &'static str,
}

const BUILTINS: &[BuiltinCommand] = &[
    BuiltinCommand {
        category: "logs",
        id: "journal-tail",
        name: "System journal",
        description: "Last 200 lines of the system journal",
        command: "journalctl -n 200 --no-pager",
    },
    BuiltinCommand {
        category: "logs",
        id: "nginx-error-log",
        name: "Nginx error log",
        description: "Last 200 lines of the nginx error log",
        command: "tail -n 200 /var/log/nginx/error.log",
    },
    BuiltinCommand {
        category: "logs",
        id: "nginx-access-log",
        name: "Nginx access log",
        description: "Last 200 lines of the nginx access log",
        command: "tail -n 200 /var/log/nginx/access.log",
    },
    BuiltinCommand {
        category: "logs",
        id: "auth-log",
        name: "Auth log",
        description: "Recent authentication attempts",
        command: "tail -n 200 /var/log/auth.log",
    },
    BuiltinCommand {
        category: "permissions",
        id: "fix-web-permissions",
        name: "Fix web permissions",
        description: "755 directories, 644 files under /var/www",
        command: "find /var/www -type d -exec chmod 755 {} + && find /var/www -type f -exec chmod 644 {} +",
    },
    BuiltinCommand {
        category: "permissions",
        id: "own-web-root",
        name: "Reset web ownership",
        description: "chown /var/www to www-data",
        command: "chown -R www-data:www-data /var/www",
    },
    BuiltinCommand {
        category: "security",
        id: "lynis-audit",
        name: "Lynis audit",
        description: "Quick system security audit",
        command: "lynis audit system --quick",
    },
    BuiltinCommand {
        category: "security",
        id: "rkhunter-check",
        name: "Rootkit check",
        description: "rkhunter scan, warnings only",
        command: "rkhunter --check --sk --rwo",
    },
    BuiltinCommand {
        category: "security",
        id: "failed-logins",
        name: "Failed logins",
        description: "Recent failed login attempts",
        command: "lastb -n 20",
    },
    BuiltinCommand {
        category: "security",
        id: "listening-ports",
        name: "Listening ports",
        description: "TCP listeners with owning processes",
        command: "ss -tlnp",
    },
    BuiltinCommand {
        category: "services",
        id: "failed-units",
        name: "Failed units",
        description: "systemd units in a failed state",
        command: "systemctl --failed --no-pager",
    },
    BuiltinCommand {
        category: "services",
        id: "list-timers",
        name: "Timers",
        description: "Scheduled systemd timers",
        command: "systemctl list-timers --no-pager",
    },
    BuiltinCommand {
        category: "services",
        id: "daemon-reload",
        name: "Reload unit files",
        description: "systemctl daemon-reload",
        command: "systemctl daemon-reload",
    },
    BuiltinCommand {
        category: "disk",
        id: "disk-usage",
        name: "Disk usage",
        description: "Filesystem usage overview",
        command: "df -h",
    },
    BuiltinCommand {
        category: "disk",
        id: "inode-usage",
        name: "Inode usage",
        description: "Filesystem inode overview",
        command: "df -i",
    },
    BuiltinCommand {
        category: "disk",
        id: "biggest-dirs",
        name: "Biggest directories",
        description: "Largest directories under /var",
        command: "du -xh --max-depth=2 /var 2>/dev/null | sort -rh | head -n 20",
    },
];

impl ToolkitCatalog {
    pub fn builtin() -> Self {
        let mut categories: IndexMap<String, Vec<ToolkitCommand>> = IndexMap::new();
        for builtin in BUILTINS {
            categories
                .entry(builtin.category.to_owned())
                .or_default()
                .push(ToolkitCommand {
                    id: builtin.id.to_owned(),
                    name: builtin.name.to_owned(),
                    description: builtin.description.to_owned(),
                    command: builtin.command.to_owned(),
                });
        }
        Self { categories }
    }

    /// Builtins plus the operator's `[[commands]]` entries, which land after
    /// the built-in categories. An id clashing with any existing command is
    /// rejected.
    pub fn with_user_commands(user_commands: &[UserCommand]) -> Result<Self, ConfigError> {
        let mut catalog = Self::builtin();
        for user in user_commands {
            if catalog.find(&user.id).is_some() {
                return Err(ConfigError::DuplicateCommandId {
                    id: user.id.clone(),
                });
            }
            catalog
                .categories
                .entry(user.category.clone())
                .or_default()
                .push(ToolkitCommand {
                    id: user.id.clone(),
                    name: user.name.clone(),
                    description: user.description.clone(),
                    command: user.command.clone(),
                });
        }
        Ok(catalog)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn category_at(&self, index: usize) -> Option<(&str, &[ToolkitCommand])> {
        self.categories
            .get_index(index)
            .map(|(name, commands)| (name.as_str(), commands.as_slice()))
    }

    pub fn find(&self, id: &str) -> Option<&ToolkitCommand> {
        self.categories
            .values()
            .flat_map(|commands| commands.iter())
            .find(|command| command.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ToolkitCommand)> {
        self.categories
            .iter()
            .flat_map(|(name, commands)| commands.iter().map(move |cmd| (name.as_str(), cmd)))
    }
}

/// Prints the catalog, optionally narrowed to one category. Returns false
/// when the requested category does not exist.
pub fn render_listing(
    catalog: &ToolkitCatalog,
    category: Option<&str>,
    renderer: &mut dyn crate::ui::Renderer,
) -> crate::ui::UiResult<bool> {
    use crate::ui::{NoticeLevel, TableSpec};

    let mut matched = false;
    for index in 0..catalog.category_count() {
        let Some((name, commands)) = catalog.category_at(index) else {
            continue;
        };
        if category.is_some_and(|wanted| wanted != name) {
            continue;
        }
        matched = true;
        renderer.section(name)?;
        let rows = commands
            .iter()
            .map(|command| {
                vec![
                    command.id.clone(),
                    command.name.clone(),
                    command.command.clone(),
                ]
            })
            .collect::<Vec<_>>();
        renderer.table(&TableSpec::new(
            vec!["id".to_owned(), "name".to_owned(), "command".to_owned()],
            rows,
        ))?;
    }
    if !matched {
        let wanted = category.unwrap_or_default();
        renderer.notice(NoticeLevel::Warning, &format!("no such category: {wanted}"))?;
        renderer.bullet_list(
            "categories",
            &catalog
                .category_names()
                .iter()
                .map(|name| (*name).to_owned())
                .collect::<Vec<_>>(),
        )?;
    }
    Ok(matched)
}

#[cfg(test)]
#[path = "tests/toolkit_tests.rs"]
mod tests;
