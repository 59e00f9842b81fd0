use std::fs;
use std::path::PathBuf;

use crate::exec::ExecRequest;
use crate::paths::SystemPaths;

use super::conf::read_config_text;
use super::{shell_quote, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
    pub shell: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub gid: u32,
    pub members: Vec<String>,
}

/// Login accounts only: root plus the regular uid range.
pub fn list_users(paths: &SystemPaths) -> Result<Vec<UserAccount>, ServiceError> {
    let text = read_config_text(&paths.passwd_file)?;
    let mut users = parse_passwd(&text);
    users.retain(|user| user.uid == 0 || (1000..65000).contains(&user.uid));
    Ok(users)
}

pub fn parse_passwd(text: &str) -> Vec<UserAccount> {
    let mut users = Vec::new();
    for line in text.lines() {
        let fields = line.split(':').collect::<Vec<_>>();
        if fields.len() < 7 {
            continue;
        }
        let (Ok(uid), Ok(gid)) = (fields[2].parse(), fields[3].parse()) else {
            continue;
        };
        users.push(UserAccount {
            name: fields[0].to_owned(),
            uid,
            gid,
            home: PathBuf::from(fields[5]),
            shell: fields[6].to_owned(),
        });
    }
    users.sort_by_key(|user| user.uid);
    users
}

pub fn list_groups(paths: &SystemPaths) -> Result<Vec<GroupEntry>, ServiceError> {
    let text = read_config_text(&paths.group_file)?;
    Ok(parse_groups(&text))
}

pub fn parse_groups(text: &str) -> Vec<GroupEntry> {
    let mut groups = Vec::new();
    for line in text.lines() {
        let fields = line.split(':').collect::<Vec<_>>();
        if fields.len() < 3 {
            continue;
        }
        let Ok(gid) = fields[2].parse() else {
            continue;
        };
        let members = fields
            .get(3)
            .map(|list| {
                list.split(',')
                    .filter(|member| !member.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        groups.push(GroupEntry {
            name: fields[0].to_owned(),
            gid,
            members,
        });
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    groups
}

/// Groups the user belongs to, primary group first.
pub fn user_groups(groups: &[GroupEntry], user: &UserAccount) -> Vec<String> {
    let mut names = Vec::new();
    for group in groups {
        if group.gid == user.gid {
            names.insert(0, group.name.clone());
        } else if group.members.iter().any(|member| member == &user.name) {
            names.push(group.name.clone());
        }
    }
    names
}

pub fn has_sudo(paths: &SystemPaths, groups: &[GroupEntry], user: &UserAccount) -> bool {
    if paths.sudoers_dir.join(&user.name).is_file() {
        return true;
    }
    groups.iter().any(|group| {
        (group.name == "sudo" || group.name == "wheel")
            && group.members.iter().any(|member| member == &user.name)
    })
}

pub fn grant_sudo(paths: &SystemPaths, name: &str) -> Result<(), ServiceError> {
    let path = paths.sudoers_dir.join(name);
    let entry = format!("{name} ALL=(ALL:ALL) ALL\n");
    fs::write(&path, entry).map_err(|error| ServiceError::ConfigWrite {
        path: path.clone(),
        error,
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o440);
        fs::set_permissions(&path, perms).map_err(|error| ServiceError::ConfigWrite {
            path,
            error,
        })?;
    }
    Ok(())
}

pub fn revoke_sudo(paths: &SystemPaths, name: &str) -> Result<(), ServiceError> {
    let path = paths.sudoers_dir.join(name);
    if !path.exists() {
        return Ok(());
    }
    fs::remove_file(&path).map_err(|error| ServiceError::ConfigWrite { path, error })
}

pub fn add_user_request(name: &str, password: &str, sudo: bool) -> ExecRequest {
    let credentials = format!("{name}:{password}");
    let mut command = format!(
        "useradd -m -s /bin/bash {name} && printf '%s\\n' {} | chpasswd",
        shell_quote(&credentials),
        name = shell_quote(name),
    );
    if sudo {
        command.push_str(&format!(" && usermod -aG sudo {}", shell_quote(name)));
    }
    ExecRequest {
        command,
        description: format!("add user {name}"),
        cwd: None,
    }
}

pub fn valid_username(name: &str) -> bool {
    if name.is_empty() || name.len() > 32 {
        return false;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-')
}

#[cfg(test)]
#[path = "../tests/users_tests.rs"]
mod tests;
