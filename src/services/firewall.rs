use crate::exec::ExecRequest;

use super::{command_on_path, run_checked, shell_quote, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallRule {
    pub to: String,
    pub action: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallStatus {
    pub active: bool,
    pub rules: Vec<FirewallRule>,
}

pub fn status() -> Result<FirewallStatus, ServiceError> {
    if !command_on_path("ufw") {
        return Err(ServiceError::NotInstalled {
            service: "ufw".to_owned(),
        });
    }
    let stdout = run_checked("ufw status")?;
    Ok(parse_status(&stdout))
}

const ACTIONS: [&str; 4] = ["ALLOW", "DENY", "LIMIT", "REJECT"];

/// Column widths in `ufw status` vary and the To/From cells may contain
/// spaces, so rule lines are split around the action token instead.
pub fn parse_status(text: &str) -> FirewallStatus {
    let mut active = false;
    let mut rules = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(state) = trimmed.strip_prefix("Status:") {
            active = state.trim() == "active";
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("To") || trimmed.starts_with('-') {
            continue;
        }
        let tokens = trimmed.split_whitespace().collect::<Vec<_>>();
        let Some(action_at) = tokens.iter().position(|token| ACTIONS.contains(token)) else {
            continue;
        };
        if action_at == 0 {
            continue;
        }
        let mut action_end = action_at + 1;
        if matches!(tokens.get(action_end), Some(&"IN") | Some(&"OUT") | Some(&"FWD")) {
            action_end += 1;
        }
        rules.push(FirewallRule {
            to: tokens[..action_at].join(" "),
            action: tokens[action_at..action_end].join(" "),
            from: tokens[action_end..].join(" "),
        });
    }
    FirewallStatus { active, rules }
}

pub fn allow_request(spec: &str) -> ExecRequest {
    rule_request("allow", spec)
}

pub fn deny_request(spec: &str) -> ExecRequest {
    rule_request("deny", spec)
}

fn rule_request(verb: &str, spec: &str) -> ExecRequest {
    ExecRequest {
        command: format!("ufw {verb} {}", shell_quote(spec)),
        description: format!("ufw {verb} {spec}"),
        cwd: None,
    }
}

pub fn enable_request() -> ExecRequest {
    ExecRequest {
        command: "ufw --force enable".to_owned(),
        description: "enable firewall".to_owned(),
        cwd: None,
    }
}

pub fn disable_request() -> ExecRequest {
    ExecRequest {
        command: "ufw disable".to_owned(),
        description: "disable firewall".to_owned(),
        cwd: None,
    }
}

/// `22`, `8080/tcp`, `443/udp`.
pub fn valid_port_spec(spec: &str) -> bool {
    let (port, proto) = match spec.split_once('/') {
        Some((port, proto)) => (port, Some(proto)),
        None => (spec, None),
    };
    if port.parse::<u16>().map(|p| p > 0).unwrap_or(false) {
        matches!(proto, None | Some("tcp") | Some("udp"))
    } else {
        false
    }
}

#[cfg(test)]
#[path = "../tests/firewall_tests.rs"]
mod tests;
