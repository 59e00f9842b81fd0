use crate::exec::ExecRequest;

use super::{command_on_path, run_capture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub apt: &'static [&'static str],
    pub probe: &'static str,
    pub unit: Option<&'static str>,
}

pub const PACKAGES: &[PackageSpec] = &[
    PackageSpec {
        id: "nginx",
        label: "Nginx",
        apt: &["nginx"],
        probe: "nginx",
        unit: Some("nginx"),
    },
    PackageSpec {
        id: "mysql",
        label: "MySQL",
        apt: &["mysql-server"],
        probe: "mysql",
        unit: Some("mysql"),
    },
    PackageSpec {
        id: "postgres",
        label: "PostgreSQL",
        apt: &["postgresql"],
        probe: "psql",
        unit: Some("postgresql"),
    },
    PackageSpec {
        id: "redis",
        label: "Redis",
        apt: &["redis-server"],
        probe: "redis-server",
        unit: Some("redis-server"),
    },
    PackageSpec {
        id: "php-fpm",
        label: "PHP-FPM",
        apt: &["php-fpm"],
        probe: "php",
        unit: None,
    },
    PackageSpec {
        id: "supervisor",
        label: "Supervisor",
        apt: &["supervisor"],
        probe: "supervisorctl",
        unit: Some("supervisor"),
    },
    PackageSpec {
        id: "ufw",
        label: "UFW firewall",
        apt: &["ufw"],
        probe: "ufw",
        unit: None,
    },
];

pub fn find(id: &str) -> Option<&'static PackageSpec> {
    PACKAGES.iter().find(|spec| spec.id == id)
}

/// PATH probe first, dpkg second: sbin binaries are not always on the
/// panel's PATH.
pub fn is_installed(spec: &PackageSpec) -> bool {
    if command_on_path(spec.probe) {
        return true;
    }
    spec.apt.iter().any(|package| dpkg_installed(package))
}

fn dpkg_installed(package: &str) -> bool {
    run_capture(&format!("dpkg -s {package} 2>/dev/null"))
        .map(|output| output.success)
        .unwrap_or(false)
}

pub fn install_request(spec: &PackageSpec) -> ExecRequest {
    ExecRequest {
        command: format!(
            "DEBIAN_FRONTEND=noninteractive apt-get update && DEBIAN_FRONTEND=noninteractive apt-get install -y {}",
            spec.apt.join(" ")
        ),
        description: format!("install {}", spec.label),
        cwd: None,
    }
}

#[cfg(test)]
#[path = "../tests/packages_tests.rs"]
mod tests;
