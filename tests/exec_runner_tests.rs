use steward::exec::{ExecError, ExecEvent, ExecOutcome, ExecRequest, ExecRunner};
use std::time::Duration;

fn request(command: &str, description: &str) -> ExecRequest {
    ExecRequest {
        command: command.to_owned(),
        description: description.to_owned(),
        cwd: None,
    }
}

fn drain_until_exit(runner: &ExecRunner) -> (String, String, Option<ExecOutcome>) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut outcome = None;
    for _ in 0..50 {
        let Some(event) = runner.next_event_timeout(Duration::from_millis(200)) else {
            continue;
        };
        match event {
            ExecEvent::Chunk { stderr: true, bytes } => stderr.extend(bytes),
            ExecEvent::Chunk { stderr: false, bytes } => stdout.extend(bytes),
            ExecEvent::Exit { outcome: exit } => {
                outcome = Some(exit);
                break;
            }
        }
    }
    (
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
        outcome,
    )
}

#[test]
fn runner_streams_both_channels_and_reports_success() {
    let mut runner = ExecRunner::new();
    runner
        .launch(&request("printf out; printf err 1>&2", "echo both"))
        .expect("launch");

    let (stdout, stderr, outcome) = drain_until_exit(&runner);
    assert!(stdout.contains("out"));
    assert!(stderr.contains("err"));
    let outcome = outcome.expect("exit event");
    assert!(outcome.success);
    assert_eq!(outcome.detail, "exit=0");
}

#[test]
fn a_missing_binary_surfaces_as_a_failed_exit() {
    let mut runner = ExecRunner::new();
    runner
        .launch(&request(
            "steward-definitely-not-a-binary",
            "run nothing",
        ))
        .expect("launch");

    let (_stdout, stderr, outcome) = drain_until_exit(&runner);
    let outcome = outcome.expect("exit event");
    assert!(!outcome.success);
    assert_eq!(outcome.detail, "exit=127");
    assert!(!stderr.is_empty(), "the shell reports the lookup failure");
}

#[test]
fn the_runner_is_strictly_serial() {
    let mut runner = ExecRunner::new();
    runner
        .launch(&request("sleep 5", "long sleep"))
        .expect("launch");
    assert!(runner.is_running());
    assert_eq!(runner.running_description().as_deref(), Some("long sleep"));

    let error = runner
        .launch(&request("printf nope", "second command"))
        .expect_err("should be busy");
    match error {
        ExecError::Busy { running } => assert_eq!(running, "long sleep"),
        other => panic!("unexpected error: {other}"),
    }

    runner.terminate_inflight(Duration::from_secs(3));
    assert!(!runner.is_running());
}

#[test]
fn the_runner_frees_up_after_an_exit() {
    let mut runner = ExecRunner::new();
    runner.launch(&request("true", "first")).expect("launch");
    let (_, _, outcome) = drain_until_exit(&runner);
    assert!(outcome.expect("exit event").success);

    runner
        .launch(&request("printf second", "second"))
        .expect("relaunch after exit");
    let (stdout, _, outcome) = drain_until_exit(&runner);
    assert_eq!(stdout, "second");
    assert!(outcome.expect("exit event").success);
}

#[test]
fn commands_run_in_the_requested_directory() {
    let dir = std::env::temp_dir();
    let mut runner = ExecRunner::new();
    runner
        .launch(&ExecRequest {
            command: "pwd".to_owned(),
            description: "print cwd".to_owned(),
            cwd: Some(dir.clone()),
        })
        .expect("launch");

    let (stdout, _, outcome) = drain_until_exit(&runner);
    assert!(outcome.expect("exit event").success);
    let printed = stdout.trim();
    let canonical = dir.canonicalize().expect("canonicalize");
    assert!(
        printed == dir.to_string_lossy() || printed == canonical.to_string_lossy(),
        "unexpected cwd: {printed}"
    );
}
