use super::{load_unit_file, parse_unit_text, ListenTarget};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const APP_UNIT: &str = "\
[Unit]
Description=steward managed app shop
After=network.target

[Service]
User=www-data
Group=www-data
WorkingDirectory=/var/www/app
ExecStart=/usr/local/bin/app --listen :8080 --root /var/www/app/public
Restart=always

[Install]
WantedBy=multi-user.target
";

#[test]
fn captures_user_group_and_working_directory() {
    let config = parse_unit_text(APP_UNIT);
    assert_eq!(config.user.as_deref(), Some("www-data"));
    assert_eq!(config.group.as_deref(), Some("www-data"));
    assert_eq!(
        config.working_directory,
        Some(PathBuf::from("/var/www/app"))
    );
}

#[test]
fn exec_start_listen_with_colon_is_a_port() {
    let config = parse_unit_text(APP_UNIT);
    assert_eq!(
        config.listen,
        Some(ListenTarget::Port {
            bind: None,
            port: "8080".to_owned(),
        })
    );
    assert_eq!(config.listen.as_ref().map(|l| l.kind()), Some("port"));
    assert_eq!(config.docroot, Some(PathBuf::from("/var/www/app/public")));
}

#[test]
fn exec_start_listen_without_colon_is_a_socket() {
    let config = parse_unit_text("ExecStart=/usr/local/bin/app --listen /run/app.sock\n");
    assert_eq!(
        config.listen,
        Some(ListenTarget::Socket {
            path: PathBuf::from("/run/app.sock"),
        })
    );
    assert_eq!(config.listen.as_ref().map(|l| l.kind()), Some("socket"));
}

#[test]
fn listen_with_bind_address_splits_at_the_last_colon() {
    let config = parse_unit_text("ExecStart=/bin/app --listen 127.0.0.1:9000\n");
    assert_eq!(
        config.listen,
        Some(ListenTarget::Port {
            bind: Some("127.0.0.1".to_owned()),
            port: "9000".to_owned(),
        })
    );
}

#[test]
fn config_flag_is_paired_with_its_value() {
    let config = parse_unit_text("ExecStart=/bin/app --config /etc/app/app.toml --listen :80\n");
    assert_eq!(config.config_path, Some(PathBuf::from("/etc/app/app.toml")));
}

#[test]
fn trailing_flag_without_value_is_ignored() {
    let config = parse_unit_text("ExecStart=/bin/app --listen\n");
    assert_eq!(config.listen, None);
}

#[test]
fn unknown_keys_sections_and_comments_are_skipped() {
    let config = parse_unit_text("# comment\n; also a comment\n[Service]\nRestart=always\n");
    assert_eq!(config, super::UnitFileConfig::default());
}

#[test]
fn missing_file_yields_configuration_unknown() {
    let missing = temp_dir("missing").join("steward-shop.service");
    let error = load_unit_file(&missing).expect_err("should fail");
    assert!(error.to_string().contains("configuration unknown"));
}

#[test]
fn load_parses_a_unit_file_on_disk() {
    let dir = temp_dir("load");
    fs::create_dir_all(&dir).expect("mkdir");
    let file = dir.join("steward-shop.service");
    fs::write(&file, APP_UNIT).expect("write unit");
    let config = load_unit_file(&file).expect("load");
    assert_eq!(config.user.as_deref(), Some("www-data"));
    assert_eq!(
        config.exec_start.as_deref(),
        Some("/usr/local/bin/app --listen :8080 --root /var/www/app/public")
    );
}

fn temp_dir(name: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    std::env::temp_dir().join(format!("steward-unitfile-{name}-{ts}"))
}
