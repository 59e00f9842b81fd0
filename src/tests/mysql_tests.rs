use super::{change_port, load_config, parse_config, sql_escape};
use crate::paths::SystemPaths;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const MYSQLD_CNF: &str = "\
[mysqld]
user            = mysql
# port          = 3305
port            = 3306
bind-address    = 127.0.0.1
datadir         = /var/lib/mysql
";

#[test]
fn parses_port_and_bind_address() {
    let config = parse_config(MYSQLD_CNF, PathBuf::from("/etc/mysql/mysql.conf.d/mysqld.cnf"));
    assert_eq!(config.port, Some(3306));
    assert_eq!(config.bind_address.as_deref(), Some("127.0.0.1"));
}

#[test]
fn missing_keys_stay_unset() {
    let config = parse_config("[mysqld]\nuser = mysql\n", PathBuf::from("x.cnf"));
    assert_eq!(config.port, None);
    assert_eq!(config.bind_address, None);
}

#[test]
fn change_port_round_trips_through_the_config_file() {
    let paths = fixture_paths("roundtrip");
    fs::create_dir_all(paths.mysql_conf.parent().expect("parent")).expect("mkdir");
    fs::write(&paths.mysql_conf, MYSQLD_CNF).expect("seed cnf");

    change_port(&paths, 3307).expect("change port");

    let config = load_config(&paths).expect("reload");
    assert_eq!(config.port, Some(3307));
    assert_eq!(config.bind_address.as_deref(), Some("127.0.0.1"));

    let text = fs::read_to_string(&paths.mysql_conf).expect("read");
    assert!(text.contains("# port          = 3305"), "comments survive");
}

#[test]
fn load_config_without_file_is_configuration_unknown() {
    let paths = fixture_paths("absent");
    let error = load_config(&paths).expect_err("should fail");
    assert!(error.to_string().contains("configuration unknown"));
}

#[test]
fn sql_escape_doubles_quotes_and_backslashes() {
    assert_eq!(sql_escape("pla'in"), "pla''in");
    assert_eq!(sql_escape("back\\slash"), "back\\\\slash");
}

fn fixture_paths(name: &str) -> SystemPaths {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    SystemPaths::rooted(std::env::temp_dir().join(format!("steward-mysql-{name}-{ts}")))
}
