use super::{command_on_path, run_capture, run_checked, shell_quote, ServiceError, UnitState};

#[test]
fn shell_quote_passes_safe_values_through() {
    assert_eq!(shell_quote("nginx"), "nginx");
    assert_eq!(shell_quote("php8.3-fpm"), "php8.3-fpm");
    assert_eq!(shell_quote("/etc/nginx/nginx.conf"), "/etc/nginx/nginx.conf");
}

#[test]
fn shell_quote_wraps_unsafe_values_in_single_quotes() {
    assert_eq!(shell_quote("a b"), "'a b'");
    assert_eq!(shell_quote("$(reboot)"), "'$(reboot)'");
    assert_eq!(shell_quote(""), "''");
}

#[test]
fn shell_quote_escapes_embedded_single_quotes() {
    assert_eq!(shell_quote("it's"), "'it'\"'\"'s'");
}

#[test]
fn run_capture_collects_both_streams() {
    let output = run_capture("printf out; printf err 1>&2").expect("run");
    assert!(output.success);
    assert_eq!(output.stdout, "out");
    assert_eq!(output.stderr, "err");
}

#[test]
fn run_checked_returns_stdout_on_success() {
    let stdout = run_checked("printf hello").expect("run");
    assert_eq!(stdout, "hello");
}

#[test]
fn run_checked_reports_exit_code_and_stderr() {
    let error = run_checked("printf broken 1>&2; exit 3").expect_err("should fail");
    match error {
        ServiceError::CommandFailed { code, detail, .. } => {
            assert_eq!(code, Some(3));
            assert_eq!(detail, "broken");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn run_checked_falls_back_to_stdout_detail() {
    let error = run_checked("printf visible; exit 1").expect_err("should fail");
    match error {
        ServiceError::CommandFailed { detail, .. } => assert_eq!(detail, "visible"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn command_on_path_finds_the_shell() {
    assert!(command_on_path("sh"));
    assert!(!command_on_path("steward-definitely-not-a-binary"));
}

#[test]
fn unit_state_describes_every_variant() {
    assert_eq!(UnitState::Active.describe(), "active");
    assert_eq!(UnitState::Inactive.describe(), "inactive");
    assert_eq!(UnitState::Failed.describe(), "failed");
    assert_eq!(UnitState::Unknown.describe(), "unknown");
    assert!(UnitState::Active.is_active());
    assert!(!UnitState::Failed.is_active());
}

#[test]
fn not_installed_error_names_the_service() {
    let error = ServiceError::NotInstalled {
        service: "ufw".to_owned(),
    };
    assert_eq!(error.to_string(), "ufw is not installed");
}
