use super::{config_test_request, disable_site, enable_site, list_sites};
use crate::paths::SystemPaths;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn list_reports_enabled_state_from_sites_enabled() {
    let paths = fixture_paths("list");
    seed_site(&paths, "blog", false);
    seed_site(&paths, "shop", true);

    let sites = list_sites(&paths).expect("list");
    let names: Vec<(&str, bool)> = sites
        .iter()
        .map(|site| (site.name.as_str(), site.enabled))
        .collect();
    assert_eq!(names, vec![("blog", false), ("shop", true)]);
}

#[test]
fn hidden_files_are_skipped() {
    let paths = fixture_paths("hidden");
    seed_site(&paths, "blog", false);
    fs::write(paths.nginx_sites_available.join(".blog.swp"), "junk").expect("write swap");

    let sites = list_sites(&paths).expect("list");
    assert_eq!(sites.len(), 1);
}

#[test]
fn enable_then_disable_round_trips() {
    let paths = fixture_paths("toggle");
    seed_site(&paths, "blog", false);

    enable_site(&paths, "blog").expect("enable");
    assert!(paths.nginx_sites_enabled.join("blog").exists());
    // Enabling an already enabled site is a no-op.
    enable_site(&paths, "blog").expect("enable again");

    disable_site(&paths, "blog").expect("disable");
    assert!(!paths.nginx_sites_enabled.join("blog").exists());
    disable_site(&paths, "blog").expect("disable again");
}

#[test]
fn enabling_a_missing_site_fails() {
    let paths = fixture_paths("missing");
    fs::create_dir_all(&paths.nginx_sites_available).expect("mkdir");
    fs::create_dir_all(&paths.nginx_sites_enabled).expect("mkdir");

    let error = enable_site(&paths, "ghost").expect_err("should fail");
    assert!(error.to_string().contains("ghost"));
}

#[test]
fn list_without_nginx_is_configuration_unknown() {
    let paths = fixture_paths("absent");
    let error = list_sites(&paths).expect_err("should fail");
    assert!(error.to_string().contains("configuration unknown"));
}

#[test]
fn config_test_runs_nginx_t() {
    let request = config_test_request();
    assert_eq!(request.command, "nginx -t");
    assert!(request.cwd.is_none());
}

fn seed_site(paths: &SystemPaths, name: &str, enabled: bool) {
    fs::create_dir_all(&paths.nginx_sites_available).expect("mkdir available");
    fs::create_dir_all(&paths.nginx_sites_enabled).expect("mkdir enabled");
    let body = format!("server {{ server_name {name}; }}\n");
    fs::write(paths.nginx_sites_available.join(name), &body).expect("seed site");
    if enabled {
        fs::write(paths.nginx_sites_enabled.join(name), &body).expect("seed link");
    }
}

fn fixture_paths(name: &str) -> SystemPaths {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    SystemPaths::rooted(std::env::temp_dir().join(format!("steward-nginx-{name}-{ts}")))
}
