use std::fs;
use std::path::Path;

use super::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveStyle {
    /// `key = value` with optional inline `#` comment (mysql, postgres, pools).
    Equals,
    /// `keyword argument` (redis).
    Space,
}

pub(crate) fn parse_kv_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') || line.starts_with('[') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let value = value.split('#').next().unwrap_or("").trim();
    Some((key.trim(), value))
}

pub(crate) fn parse_directive_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut parts = line.splitn(2, char::is_whitespace);
    let key = parts.next()?;
    let value = parts.next().unwrap_or("").trim();
    Some((key, value))
}

pub(crate) fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(value)
}

/// Replaces the live assignment of `key` with `key = value` (first match in
/// place, later duplicates dropped so the file keeps one authoritative line),
/// appending at the end when no live assignment exists. Comments and unrelated
/// lines pass through untouched.
pub(crate) fn rewrite_directive(
    text: &str,
    key: &str,
    value: &str,
    style: DirectiveStyle,
) -> String {
    let rendered = match style {
        DirectiveStyle::Equals => format!("{key} = {value}"),
        DirectiveStyle::Space => format!("{key} {value}"),
    };
    let mut lines = Vec::new();
    let mut replaced = false;
    for line in text.lines() {
        let matched = match style {
            DirectiveStyle::Equals => parse_kv_line(line).is_some_and(|(found, _)| found == key),
            DirectiveStyle::Space => {
                parse_directive_line(line).is_some_and(|(found, _)| found == key)
            }
        };
        if matched {
            if !replaced {
                lines.push(rendered.clone());
                replaced = true;
            }
            continue;
        }
        lines.push(line.to_owned());
    }
    if !replaced {
        lines.push(rendered);
    }
    let mut result = lines.join("\n");
    result.push('\n');
    result
}

pub(crate) fn read_config_text(path: &Path) -> Result<String, ServiceError> {
    fs::read_to_string(path).map_err(|error| ServiceError::ConfigRead {
        path: path.to_path_buf(),
        error,
    })
}

/// Writes through a temp file in the same directory, then renames over the
/// target.
pub(crate) fn write_config_text(path: &Path, text: &str) -> Result<(), ServiceError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".steward-tmp");
    let tmp = std::path::PathBuf::from(tmp);
    fs::write(&tmp, text).map_err(|error| ServiceError::ConfigWrite {
        path: tmp.clone(),
        error,
    })?;
    fs::rename(&tmp, path).map_err(|error| ServiceError::ConfigWrite {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
#[path = "../tests/conf_tests.rs"]
mod tests;
