// crates/clusterview-core/src/interfaces/mod.rs
// ============================================================================
// Module: Clusterview Interfaces
// Description: Backend-agnostic interfaces for external command execution.
// Purpose: Define the contract surface used to reach the cluster manager tools.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The core never spawns processes directly. Every interaction with the
//! cluster manager goes through a [`CommandRunner`], which receives a
//! discrete argument vector and returns captured standard output plus the
//! exit status. Implementations must not interpret the output.
//! Security posture: arguments may carry request-derived values and are never
//! joined into a shell string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Command Line
// ============================================================================

/// External command expressed as a program path plus argument vector.
///
/// # Invariants
/// - Arguments are passed to the program verbatim; no shell is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl CommandLine {
    /// Creates a command line for the given program with no arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the program file name used as a short label in audit events.
    #[must_use]
    pub fn program_label(&self) -> String {
        match self.program.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.program.display().to_string(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Command Output
// ============================================================================

/// Captured result of a completed external command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Creates an output value from text and an exit code.
    #[must_use]
    pub fn new(stdout: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: Some(exit_code),
        }
    }

    /// Returns true when the process exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

// ============================================================================
// SECTION: Command Runner
// ============================================================================

/// Errors raised when an external command cannot produce output.
///
/// A nonzero exit status is not an error; it is reported through
/// [`CommandOutput::exit_code`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The process could not be launched.
    #[error("failed to launch {program}: {reason}")]
    Spawn {
        /// Program label.
        program: String,
        /// Underlying failure description.
        reason: String,
    },
    /// The process exceeded the configured timeout and was killed.
    #[error("{program} timed out after {timeout_ms} ms")]
    Timeout {
        /// Program label.
        program: String,
        /// Timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },
    /// The process produced more output than allowed.
    #[error("{program} output exceeds {limit} bytes")]
    OutputTooLarge {
        /// Program label.
        program: String,
        /// Configured output limit in bytes.
        limit: usize,
    },
    /// I/O failure while waiting on or reading from the process.
    #[error("{program} i/o error: {reason}")]
    Io {
        /// Program label.
        program: String,
        /// Underlying failure description.
        reason: String,
    },
}

/// Synchronous executor for external cluster manager commands.
pub trait CommandRunner: Send + Sync {
    /// Executes the command and captures its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the process cannot be launched, exceeds
    /// its limits, or cannot be read.
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, CommandError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, CommandError> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, CommandError> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, CommandError> {
        (**self).run(command)
    }
}
