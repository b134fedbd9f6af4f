//! [`ScriptedRunner`]: a command runner that never spawns processes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use scout_probe::{CapturedOutput, CommandRunner, CommandSpec, InvocationError};

#[derive(Debug, Clone)]
enum Reply {
    Output(String, i32),
    Hang,
}

/// Answers version queries from a table keyed by program path.
///
/// Unknown programs fail as if they could not be spawned. Every call is
/// counted, including failed ones.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: Mutex<HashMap<PathBuf, Reply>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every call, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reply to `program` with `output` and exit code 0.
    pub fn reply(self, program: impl Into<PathBuf>, output: &str) -> Self {
        self.reply_with_code(program, output, 0)
    }

    pub fn reply_with_code(self, program: impl Into<PathBuf>, output: &str, code: i32) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(program.into(), Reply::Output(output.to_string(), code));
        self
    }

    /// Make `program` time out.
    pub fn hang(self, program: impl Into<PathBuf>) -> Self {
        self.replies.lock().unwrap().insert(program.into(), Reply::Hang);
        self
    }

    /// Number of commands run so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_and_capture(
        &self,
        command: &CommandSpec,
        working_dir: &Path,
        timeout: Duration,
    ) -> Result<CapturedOutput, InvocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(working_dir.is_dir(), "working dir must exist during the call");
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let reply = self.replies.lock().unwrap().get(&command.program).cloned();
        match reply {
            Some(Reply::Output(output, code)) => Ok(CapturedOutput {
                output,
                exit_code: Some(code),
            }),
            Some(Reply::Hang) => Err(InvocationError::TimedOut {
                program: command.program.clone(),
                timeout,
            }),
            None => Err(InvocationError::Spawn {
                program: command.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            }),
        }
    }
}
