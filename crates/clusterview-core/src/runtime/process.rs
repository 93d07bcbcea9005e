// crates/clusterview-core/src/runtime/process.rs
// ============================================================================
// Module: Process Command Runner
// Description: Command runner backed by operating system processes.
// Purpose: Execute cluster manager tools with bounded time and output.
// Dependencies: std::process, crate::interfaces
// ============================================================================

//! ## Overview
//! [`ProcessCommandRunner`] spawns the program directly with its argument
//! vector (no shell), captures standard output, and optionally appends
//! standard error. Output is drained on reader threads so a chatty child
//! cannot block on a full pipe. A zero timeout waits without bound; any other
//! value sets one deadline for the whole call. The child is killed if it is
//! still running at the deadline, and collection of its output stops there
//! too, since a background descendant may keep the pipes open after the
//! child exits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Read;
use std::process::Child;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;

use crate::interfaces::CommandError;
use crate::interfaces::CommandLine;
use crate::interfaces::CommandOutput;
use crate::interfaces::CommandRunner;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Interval between exit checks while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Read buffer size for output pipes.
const READ_CHUNK_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Handling of the child's standard error stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StderrMode {
    /// Discard standard error.
    #[default]
    Discard,
    /// Append standard error after standard output.
    Merge,
}

/// Configuration for [`ProcessCommandRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRunnerConfig {
    /// Timeout in milliseconds; zero waits without bound.
    pub timeout_ms: u64,
    /// Maximum captured bytes per stream.
    pub max_output_bytes: usize,
    /// Standard error handling.
    pub stderr: StderrMode,
}

impl Default for ProcessRunnerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_output_bytes: 4 * 1024 * 1024,
            stderr: StderrMode::Discard,
        }
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner {
    /// Runner limits.
    config: ProcessRunnerConfig,
}

impl ProcessCommandRunner {
    /// Creates a runner with the given configuration.
    #[must_use]
    pub const fn new(config: ProcessRunnerConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the runner configuration.
    #[must_use]
    pub const fn config(&self) -> &ProcessRunnerConfig {
        &self.config
    }

    /// Returns the call deadline, or `None` when the timeout is disabled.
    fn deadline(&self) -> Option<Instant> {
        (self.config.timeout_ms != 0)
            .then(|| Instant::now() + Duration::from_millis(self.config.timeout_ms))
    }

    /// Builds the timeout error for a program.
    fn timeout_error(&self, program: &str) -> CommandError {
        CommandError::Timeout {
            program: program.to_string(),
            timeout_ms: self.config.timeout_ms,
        }
    }

    /// Waits for the child, killing it once the deadline passes.
    fn wait(
        &self,
        child: &mut Child,
        program: &str,
        deadline: Option<Instant>,
    ) -> Result<ExitStatus, CommandError> {
        let Some(deadline) = deadline else {
            return child.wait().map_err(|err| io_error(program, &err));
        };
        loop {
            if let Some(status) = child.try_wait().map_err(|err| io_error(program, &err))? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timeout_error(program));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Collects a reader's bytes, giving up once the deadline passes.
    ///
    /// A reader only finishes when every holder of the pipe has closed it,
    /// which includes descendants the child left running in the background.
    fn collect_output(
        &self,
        reader: Option<Receiver<io::Result<Captured>>>,
        program: &str,
        deadline: Option<Instant>,
    ) -> Result<Vec<u8>, CommandError> {
        let Some(reader) = reader else {
            return Ok(Vec::new());
        };
        let outcome = match deadline {
            None => reader.recv().map_err(|_| reader_lost(program))?,
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match reader.recv_timeout(remaining) {
                    Ok(outcome) => outcome,
                    Err(RecvTimeoutError::Timeout) => return Err(self.timeout_error(program)),
                    Err(RecvTimeoutError::Disconnected) => return Err(reader_lost(program)),
                }
            }
        };
        let (bytes, overflow) = outcome.map_err(|err| io_error(program, &err))?;
        if overflow {
            return Err(CommandError::OutputTooLarge {
                program: program.to_string(),
                limit: self.config.max_output_bytes,
            });
        }
        Ok(bytes)
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, CommandError> {
        let program = command.program_label();
        let stderr = match self.config.stderr {
            StderrMode::Discard => Stdio::null(),
            StderrMode::Merge => Stdio::piped(),
        };
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .spawn()
            .map_err(|err| CommandError::Spawn {
                program: program.clone(),
                reason: err.to_string(),
            })?;
        let limit = self.config.max_output_bytes;
        let stdout_reader = child.stdout.take().map(|pipe| spawn_reader(pipe, limit));
        let stderr_reader = child.stderr.take().map(|pipe| spawn_reader(pipe, limit));

        let deadline = self.deadline();
        let status = self.wait(&mut child, &program, deadline)?;

        let mut captured = self.collect_output(stdout_reader, &program, deadline)?;
        captured.extend(self.collect_output(stderr_reader, &program, deadline)?);
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&captured).into_owned(),
            exit_code: status.code(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Captured stream bytes plus an overflow flag.
type Captured = (Vec<u8>, bool);

/// Drains a pipe on a background thread, keeping at most `limit` bytes.
///
/// The outcome is delivered over a channel so the caller can bound how long
/// it waits for end of stream.
fn spawn_reader<R: Read + Send + 'static>(
    mut pipe: R,
    limit: usize,
) -> Receiver<io::Result<Captured>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(drain(&mut pipe, limit));
    });
    receiver
}

/// Reads a pipe to end of stream, keeping at most `limit` bytes.
fn drain<R: Read>(pipe: &mut R, limit: usize) -> io::Result<Captured> {
    let mut kept = Vec::new();
    let mut overflow = false;
    let mut chunk = vec![0_u8; READ_CHUNK_BYTES];
    loop {
        let read = match pipe.read(&mut chunk) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if read == 0 {
            return Ok((kept, overflow));
        }
        let room = limit.saturating_sub(kept.len());
        if read > room {
            overflow = true;
        }
        kept.extend_from_slice(&chunk[..read.min(room)]);
    }
}

/// Error for a reader thread that ended without reporting.
fn reader_lost(program: &str) -> CommandError {
    CommandError::Io {
        program: program.to_string(),
        reason: "output reader terminated abnormally".to_string(),
    }
}

/// Maps an I/O error into a [`CommandError`].
fn io_error(program: &str, err: &io::Error) -> CommandError {
    CommandError::Io {
        program: program.to_string(),
        reason: err.to_string(),
    }
}
