use super::{
    create_pool, delete_pool, list_pools, list_versions, load_pool, parse_pool, render_pool,
    update_pool, valid_pool_name, PhpVersion, PoolSettings,
};
use crate::paths::SystemPaths;
use crate::services::ServiceError;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const WWW_POOL: &str = "\
; Default pool.
[www]
user = www-data
group = www-data
listen = /run/php/php8.3-fpm.sock
pm = dynamic
pm.max_children = 5
";

#[test]
fn absent_php_base_means_zero_versions() {
    let paths = fixture_paths("absent");
    let versions = list_versions(&paths).expect("list");
    assert!(versions.is_empty());
}

#[test]
fn versions_are_sorted_numerically_and_need_a_pool_tree() {
    let paths = fixture_paths("versions");
    seed_version(&paths, "8.3");
    seed_version(&paths, "8.10");
    seed_version(&paths, "7.4");
    // A stray directory without fpm/pool.d is not a version.
    fs::create_dir_all(paths.php_base.join("8.1")).expect("mkdir");
    fs::create_dir_all(paths.php_base.join("mods-available")).expect("mkdir");

    let versions = list_versions(&paths).expect("list");
    let names: Vec<&str> = versions.iter().map(|v| v.version.as_str()).collect();
    assert_eq!(names, vec!["7.4", "8.3", "8.10"]);
    assert_eq!(versions[1].unit, "php8.3-fpm");
}

#[test]
fn parse_pool_reads_section_name_and_settings() {
    let pool = parse_pool(WWW_POOL, PathBuf::from("www.conf"));
    assert_eq!(pool.name, "www");
    assert_eq!(pool.user.as_deref(), Some("www-data"));
    assert_eq!(pool.listen.as_deref(), Some("/run/php/php8.3-fpm.sock"));
    assert_eq!(pool.pm.as_deref(), Some("dynamic"));
    assert_eq!(pool.max_children, Some(5));
}

#[test]
fn parse_pool_falls_back_to_the_file_stem() {
    let pool = parse_pool("user = deploy\n", PathBuf::from("/tmp/api.conf"));
    assert_eq!(pool.name, "api");
}

#[test]
fn list_pools_skips_non_conf_files() {
    let paths = fixture_paths("pools");
    let version = seed_version(&paths, "8.3");
    fs::write(version.pool_dir.join("www.conf"), WWW_POOL).expect("seed pool");
    fs::write(version.pool_dir.join("www.conf.bak"), WWW_POOL).expect("seed backup");

    let pools = list_pools(&version).expect("list");
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].name, "www");
}

#[test]
fn pool_names_are_validated() {
    assert!(valid_pool_name("www"));
    assert!(valid_pool_name("api_v2"));
    assert!(valid_pool_name("site-8"));
    assert!(!valid_pool_name(""));
    assert!(!valid_pool_name("two words"));
    assert!(!valid_pool_name(&"x".repeat(65)));
}

#[test]
fn render_pool_emits_a_complete_dynamic_pool() {
    let text = render_pool(&PoolSettings {
        name: "api".to_owned(),
        user: "deploy".to_owned(),
        listen: "127.0.0.1:9001".to_owned(),
        max_children: 8,
    });
    assert!(text.starts_with("[api]\n"));
    assert!(text.contains("user = deploy\n"));
    assert!(text.contains("group = deploy\n"));
    assert!(text.contains("listen = 127.0.0.1:9001\n"));
    assert!(text.contains("pm = dynamic\n"));
    assert!(text.contains("pm.max_children = 8\n"));
}

#[test]
fn create_pool_writes_the_file_even_when_the_reload_fails() {
    let paths = fixture_paths("create");
    let version = seed_version(&paths, "8.3");
    let settings = PoolSettings {
        name: "api".to_owned(),
        user: "deploy".to_owned(),
        listen: "127.0.0.1:9001".to_owned(),
        max_children: 8,
    };

    // No php8.3-fpm unit exists on the test host, so the reload step fails,
    // but the written file stays in place.
    let error = create_pool(&version, &settings).expect_err("reload should fail");
    assert!(matches!(error, ServiceError::PoolReloadFailed { .. }));
    assert!(error.to_string().contains("pool created"));

    let pool = load_pool(&version, "api").expect("load");
    assert_eq!(pool.user.as_deref(), Some("deploy"));
}

#[test]
fn create_pool_rejects_bad_and_duplicate_names() {
    let paths = fixture_paths("dup");
    let version = seed_version(&paths, "8.3");
    fs::write(version.pool_dir.join("www.conf"), WWW_POOL).expect("seed pool");

    let mut settings = PoolSettings {
        name: "two words".to_owned(),
        user: "deploy".to_owned(),
        listen: "127.0.0.1:9001".to_owned(),
        max_children: 8,
    };
    let error = create_pool(&version, &settings).expect_err("bad name");
    assert!(matches!(error, ServiceError::InvalidValue { .. }));

    settings.name = "www".to_owned();
    let error = create_pool(&version, &settings).expect_err("duplicate");
    assert!(error.to_string().contains("already exists"));
}

#[test]
fn update_pool_rewrites_settings_in_place() {
    let paths = fixture_paths("update");
    let version = seed_version(&paths, "8.3");
    fs::write(version.pool_dir.join("www.conf"), WWW_POOL).expect("seed pool");
    let pool = load_pool(&version, "www").expect("load");

    let settings = PoolSettings {
        name: "www".to_owned(),
        user: "deploy".to_owned(),
        listen: "127.0.0.1:9001".to_owned(),
        max_children: 12,
    };
    let error = update_pool(&version, &pool, &settings).expect_err("reload should fail");
    assert!(matches!(error, ServiceError::PoolReloadFailed { .. }));

    let pool = load_pool(&version, "www").expect("reload");
    assert_eq!(pool.user.as_deref(), Some("deploy"));
    assert_eq!(pool.group.as_deref(), Some("deploy"));
    assert_eq!(pool.listen.as_deref(), Some("127.0.0.1:9001"));
    assert_eq!(pool.max_children, Some(12));
}

#[test]
fn delete_pool_removes_the_file() {
    let paths = fixture_paths("delete");
    let version = seed_version(&paths, "8.3");
    fs::write(version.pool_dir.join("www.conf"), WWW_POOL).expect("seed pool");
    let pool = load_pool(&version, "www").expect("load");

    let error = delete_pool(&version, &pool).expect_err("reload should fail");
    assert!(matches!(error, ServiceError::PoolReloadFailed { .. }));
    assert!(!pool.file.exists());
}

fn seed_version(paths: &SystemPaths, version: &str) -> PhpVersion {
    let pool_dir = paths.php_base.join(version).join("fpm/pool.d");
    fs::create_dir_all(&pool_dir).expect("mkdir pool.d");
    PhpVersion {
        unit: format!("php{version}-fpm"),
        pool_dir,
        version: version.to_owned(),
    }
}

fn fixture_paths(name: &str) -> SystemPaths {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    SystemPaths::rooted(std::env::temp_dir().join(format!("steward-php-{name}-{ts}")))
}
