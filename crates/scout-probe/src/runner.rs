//! Running a compiler and capturing its output
//!
//! The [`CommandRunner`] trait is the only way the probe talks to external
//! processes. [`SystemRunner`] is the real implementation; tests use a
//! scripted one.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::InvocationError;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Output of a finished command: stdout followed by stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub output: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability to run a command in a working directory with a timeout.
pub trait CommandRunner: Send + Sync {
    fn run_and_capture(
        &self,
        command: &CommandSpec,
        working_dir: &Path,
        timeout: Duration,
    ) -> Result<CapturedOutput, InvocationError>;
}

/// Runs commands as real child processes.
///
/// Both pipes are drained on helper threads so a chatty compiler cannot
/// block on a full pipe while the deadline is being polled. The deadline
/// covers both the child's exit and the pipes closing. On timeout the
/// child's process group is killed and the child reaped before returning.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    poll_interval: Duration,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run_and_capture(
        &self,
        command: &CommandSpec,
        working_dir: &Path,
        timeout: Duration,
    ) -> Result<CapturedOutput, InvocationError> {
        let program = command.program.clone();
        let mut builder = Command::new(&command.program);
        builder
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // own process group, so helpers the compiler spawns die with it
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut builder, 0);

        let mut child = builder.spawn().map_err(|source| InvocationError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        // a deadline past the end of time means waiting without one
        let deadline = Instant::now().checked_add(timeout);
        let timed_out = |child: &mut Child| {
            terminate(child);
            tracing::debug!(command = %command, ?timeout, "version query timed out");
            InvocationError::TimedOut {
                program: program.clone(),
                timeout,
            }
        };

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if deadline.is_some_and(|d| Instant::now() >= d) => {
                    return Err(timed_out(&mut child));
                }
                Ok(None) => thread::sleep(self.poll_interval),
                Err(source) => {
                    terminate(&mut child);
                    return Err(InvocationError::Io {
                        program: program.clone(),
                        source,
                    });
                }
            }
        };

        // pipes stay open while anything the compiler left behind holds them
        let Some(out) = collect(stdout, deadline) else {
            return Err(timed_out(&mut child));
        };
        let Some(err) = collect(stderr, deadline) else {
            return Err(timed_out(&mut child));
        };

        let mut output = String::from_utf8_lossy(&out).into_owned();
        output.push_str(&String::from_utf8_lossy(&err));

        Ok(CapturedOutput {
            output,
            exit_code: status.code(),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut reader| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            // a read error just truncates the captured output
            let _ = reader.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Wait for a drained pipe; `None` when the deadline passes first.
fn collect(pipe: Option<Receiver<Vec<u8>>>, deadline: Option<Instant>) -> Option<Vec<u8>> {
    let Some(rx) = pipe else {
        return Some(Vec::new());
    };
    let received = match deadline {
        Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

/// Kill the child and its process group, then reap the child.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    kill_group(child.id());
    if let Err(e) = child.kill() {
        tracing::trace!(error = %e, "kill failed, child already exited");
    }
    let _ = child.wait();
}

#[cfg(unix)]
fn kill_group(pid: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::trace!(error = %e, "process group already gone");
    }
}
