use super::{resolve_root, PathsError, RootSource, SystemPaths};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn rooted_derives_every_location_from_the_prefix() {
    let paths = SystemPaths::rooted("/fixture");
    assert_eq!(paths.root, PathBuf::from("/fixture"));
    assert_eq!(paths.nginx_conf, PathBuf::from("/fixture/etc/nginx/nginx.conf"));
    assert_eq!(
        paths.mysql_conf,
        PathBuf::from("/fixture/etc/mysql/mysql.conf.d/mysqld.cnf")
    );
    assert_eq!(paths.postgres_base, PathBuf::from("/fixture/etc/postgresql"));
    assert_eq!(paths.unit_dir, PathBuf::from("/fixture/etc/systemd/system"));
    assert_eq!(
        paths.config_file,
        PathBuf::from("/fixture/etc/steward/steward.toml")
    );
}

#[test]
fn system_paths_live_under_slash_etc() {
    let paths = SystemPaths::system();
    assert_eq!(paths.redis_conf, PathBuf::from("/etc/redis/redis.conf"));
    assert_eq!(paths.sudoers_dir, PathBuf::from("/etc/sudoers.d"));
}

#[test]
fn cli_flag_wins_and_is_reported_as_the_source() {
    let root = fixture_root("cli");
    let (paths, source) = resolve_root(Some(&root)).expect("resolve");
    assert_eq!(paths.root, root);
    assert_eq!(source, RootSource::CliFlag);
    assert_eq!(source.describe(), "--root flag");
}

#[test]
fn a_missing_cli_root_is_an_error() {
    let error = resolve_root(Some(Path::new("/steward-no-such-root"))).expect_err("should fail");
    let PathsError::RootNotFound { path } = error;
    assert_eq!(path, PathBuf::from("/steward-no-such-root"));
}

fn fixture_root(name: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let root = std::env::temp_dir().join(format!("steward-paths-{name}-{ts}"));
    fs::create_dir_all(&root).expect("mkdir root");
    root
}
