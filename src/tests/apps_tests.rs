use super::{create_app, list_apps, load_app, render_unit, valid_app_name, AppSpec};
use crate::paths::SystemPaths;
use crate::services::ServiceError;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn only_prefixed_service_units_are_listed() {
    let paths = fixture_paths("list");
    fs::create_dir_all(&paths.unit_dir).expect("mkdir");
    fs::write(paths.unit_dir.join("steward-worker.service"), "x").expect("seed");
    fs::write(paths.unit_dir.join("steward-api.service"), "x").expect("seed");
    fs::write(paths.unit_dir.join("nginx.service"), "x").expect("seed");
    fs::write(paths.unit_dir.join("steward-api.timer"), "x").expect("seed");

    let apps = list_apps(&paths).expect("list");
    let names: Vec<&str> = apps.iter().map(|app| app.name.as_str()).collect();
    assert_eq!(names, vec!["api", "worker"]);
    assert_eq!(apps[0].unit, "steward-api.service");
}

#[test]
fn app_names_are_validated() {
    assert!(valid_app_name("worker"));
    assert!(valid_app_name("queue-2"));
    assert!(!valid_app_name(""));
    assert!(!valid_app_name("-worker"));
    assert!(!valid_app_name("Worker"));
    assert!(!valid_app_name("has space"));
}

#[test]
fn rendered_unit_carries_the_service_settings() {
    let text = render_unit(&AppSpec {
        name: "worker".to_owned(),
        command: "/usr/bin/node server.js".to_owned(),
        user: "deploy".to_owned(),
        working_directory: Some(PathBuf::from("/srv/worker")),
    });
    assert!(text.contains("Description=steward managed app worker\n"));
    assert!(text.contains("User=deploy\n"));
    assert!(text.contains("WorkingDirectory=/srv/worker\n"));
    assert!(text.contains("ExecStart=/usr/bin/node server.js\n"));
    assert!(text.contains("Restart=always\n"));
    assert!(text.contains("WantedBy=multi-user.target\n"));
}

#[test]
fn working_directory_is_optional() {
    let text = render_unit(&AppSpec {
        name: "worker".to_owned(),
        command: "/usr/bin/worker".to_owned(),
        user: "deploy".to_owned(),
        working_directory: None,
    });
    assert!(!text.contains("WorkingDirectory"));
}

#[test]
fn create_app_writes_the_unit_and_returns_activation() {
    let paths = fixture_paths("create");
    fs::create_dir_all(&paths.unit_dir).expect("mkdir");
    let spec = AppSpec {
        name: "worker".to_owned(),
        command: "/usr/bin/worker".to_owned(),
        user: "deploy".to_owned(),
        working_directory: None,
    };

    let request = create_app(&paths, &spec).expect("create");
    assert_eq!(
        request.command,
        "systemctl daemon-reload && systemctl enable --now steward-worker.service"
    );

    let apps = list_apps(&paths).expect("list");
    assert_eq!(apps.len(), 1);
    let config = load_app(&apps[0]).expect("load");
    assert_eq!(config.user.as_deref(), Some("deploy"));
    assert_eq!(config.exec_start.as_deref(), Some("/usr/bin/worker"));
}

#[test]
fn create_app_rejects_bad_and_duplicate_names() {
    let paths = fixture_paths("dup");
    fs::create_dir_all(&paths.unit_dir).expect("mkdir");
    let mut spec = AppSpec {
        name: "Worker".to_owned(),
        command: "/usr/bin/worker".to_owned(),
        user: "deploy".to_owned(),
        working_directory: None,
    };
    let error = create_app(&paths, &spec).expect_err("bad name");
    assert!(matches!(error, ServiceError::InvalidValue { .. }));

    spec.name = "worker".to_owned();
    create_app(&paths, &spec).expect("create");
    let error = create_app(&paths, &spec).expect_err("duplicate");
    assert!(error.to_string().contains("already exists"));
}

fn fixture_paths(name: &str) -> SystemPaths {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    SystemPaths::rooted(std::env::temp_dir().join(format!("steward-apps-{name}-{ts}")))
}
