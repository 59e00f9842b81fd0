use std::io::{ErrorKind, Read};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
#[cfg(unix)]
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::{setpgid, Pid};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub command: String,
    pub description: String,
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecEvent {
    Chunk { stderr: bool, bytes: Vec<u8> },
    Exit { outcome: ExecOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    pub success: bool,
    pub detail: String,
}

#[derive(Debug)]
pub enum ExecError {
    Busy {
        running: String,
    },
    Spawn {
        command: String,
        error: std::io::Error,
    },
    MissingStdio {
        command: String,
    },
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecError::Busy { running } => {
                write!(f, "another command is still running: {running}")
            }
            ExecError::Spawn { command, error } => {
                write!(f, "failed to spawn `{command}`: {error}")
            }
            ExecError::MissingStdio { command } => {
                write!(f, "command `{command}` missing stdout/stderr pipe")
            }
        }
    }
}

impl std::error::Error for ExecError {}

struct Inflight {
    description: String,
    child: Arc<Mutex<Child>>,
}

/// Runs one shell command at a time, streaming its combined output back to
/// the UI loop as events. Commands run in their own process group so a quit
/// can take down the whole pipeline, not just the shell.
pub struct ExecRunner {
    events_tx: Sender<ExecEvent>,
    events_rx: Receiver<ExecEvent>,
    current: Option<Inflight>,
}

impl ExecRunner {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel::<ExecEvent>();
        Self {
            events_tx,
            events_rx,
            current: None,
        }
    }

    pub fn launch(&mut self, request: &ExecRequest) -> Result<(), ExecError> {
        if let Some(running) = self.running_description() {
            return Err(ExecError::Busy { running });
        }

        let mut process = shell_command(request);
        let mut child = process.spawn().map_err(|error| ExecError::Spawn {
            command: request.command.clone(),
            error,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::MissingStdio {
                command: request.command.clone(),
            })?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecError::MissingStdio {
                command: request.command.clone(),
            })?;

        let child = Arc::new(Mutex::new(child));
        self.current = Some(Inflight {
            description: request.description.clone(),
            child: child.clone(),
        });

        let stdout_reader = {
            let tx = self.events_tx.clone();
            thread::spawn(move || stream_chunks(stdout, false, tx))
        };
        let stderr_reader = {
            let tx = self.events_tx.clone();
            thread::spawn(move || stream_chunks(stderr, true, tx))
        };

        {
            let tx = self.events_tx.clone();
            thread::spawn(move || {
                let _ = stdout_reader.join();
                let _ = stderr_reader.join();
                loop {
                    let status = child.lock().expect("child lock").try_wait();
                    match status {
                        Ok(Some(status)) => {
                            let _ = tx.send(ExecEvent::Exit {
                                outcome: ExecOutcome {
                                    success: status.success(),
                                    detail: format_exit_diagnostic(status),
                                },
                            });
                            break;
                        }
                        Ok(None) => thread::sleep(Duration::from_millis(40)),
                        Err(err) => {
                            let _ = tx.send(ExecEvent::Exit {
                                outcome: ExecOutcome {
                                    success: false,
                                    detail: format!("wait-error={err}"),
                                },
                            });
                            break;
                        }
                    }
                }
            });
        }

        Ok(())
    }

    pub fn next_event_timeout(&self, timeout: Duration) -> Option<ExecEvent> {
        self.events_rx.recv_timeout(timeout).ok()
    }

    pub fn is_running(&mut self) -> bool {
        self.running_description().is_some()
    }

    pub fn running_description(&mut self) -> Option<String> {
        let exited = match &self.current {
            None => return None,
            Some(inflight) => inflight
                .child
                .lock()
                .expect("child lock")
                .try_wait()
                .ok()
                .flatten()
                .is_some(),
        };
        if exited {
            self.current = None;
            return None;
        }
        self.current
            .as_ref()
            .map(|inflight| inflight.description.clone())
    }

    pub fn terminate_inflight(&mut self, timeout: Duration) {
        let Some(inflight) = self.current.take() else {
            return;
        };

        {
            let mut child = inflight.child.lock().expect("child lock");
            #[cfg(unix)]
            {
                let _ = signal_process_group(&mut child, Signal::SIGTERM);
            }
            #[cfg(not(unix))]
            {
                let _ = child.kill();
            }
        }

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let exited = inflight
                .child
                .lock()
                .expect("child lock")
                .try_wait()
                .ok()
                .flatten()
                .is_some();
            if exited {
                return;
            }
            thread::sleep(Duration::from_millis(40));
        }

        let mut child = inflight.child.lock().expect("child lock");
        let still_running = child.try_wait().ok().flatten().is_none();
        if still_running {
            #[cfg(unix)]
            {
                let _ = signal_process_group(&mut child, Signal::SIGKILL);
            }
            #[cfg(not(unix))]
            {
                let _ = child.kill();
            }
        }
    }
}

impl Default for ExecRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn stream_chunks(mut stream: impl Read, stderr: bool, tx: Sender<ExecEvent>) {
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => {
                let sent = tx.send(ExecEvent::Chunk {
                    stderr,
                    bytes: buf[..read].to_vec(),
                });
                if sent.is_err() {
                    break;
                }
            }
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
}

fn format_exit_diagnostic(status: std::process::ExitStatus) -> String {
    #[cfg(unix)]
    {
        if let Some(code) = status.code() {
            return format!("exit={code}");
        }
        if let Some(signal) = status.signal() {
            return format!("signal={signal}");
        }
        "exit=unknown".to_owned()
    }
    #[cfg(not(unix))]
    {
        format!("exit={}", status.code().unwrap_or(-1))
    }
}

fn shell_command(request: &ExecRequest) -> ProcessCommand {
    let mut process = ProcessCommand::new("sh");
    process
        .arg("-lc")
        .arg(&request.command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = &request.cwd {
        process.current_dir(cwd);
    }
    #[cfg(unix)]
    unsafe {
        process.pre_exec(|| {
            setpgid(Pid::from_raw(0), Pid::from_raw(0))
                .map_err(|error| std::io::Error::new(ErrorKind::Other, error.to_string()))
        });
    }
    process
}

#[cfg(unix)]
fn signal_process_group(child: &mut Child, signal: Signal) -> Result<(), nix::Error> {
    let pid = child.id() as i32;
    if pid > 0 {
        kill(Pid::from_raw(-pid), signal)
    } else {
        Ok(())
    }
}
