use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RunnerError;
use crate::signal::signal_name;

// ============================================================================
// ExecutionResult - outcome of one finished process
// ============================================================================

/// A finished process.
///
/// `exit_code` is `0` on success and non-zero on failure; a negative value
/// means the process was terminated by the signal `-exit_code`. The captured
/// streams are `None` when the call ran in streaming mode or the stream was
/// not piped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Binary followed by its arguments
    pub command: Vec<String>,
    pub exit_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl ExecutionResult {
    #[must_use]
    pub fn new(
        command: Vec<String>,
        exit_code: i32,
        stdout: Option<String>,
        stderr: Option<String>,
    ) -> Self {
        Self {
            command,
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The command vector joined with spaces, for display.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Turn a non-zero exit into an [`ExecutionError`].
    ///
    /// Callers that only want the output can ignore this; a failing exit code
    /// is otherwise plain data.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when `exit_code != 0`.
    pub fn raise_for_status(&self) -> Result<(), ExecutionError> {
        if self.success() {
            Ok(())
        } else {
            Err(ExecutionError::from(self.clone()))
        }
    }

    /// Parse captured stdout as JSON into `T`.
    ///
    /// # Errors
    ///
    /// [`RunnerError::MissingOutput`] when stdout was not captured,
    /// [`RunnerError::Decode`] when it is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RunnerError> {
        let stdout = self
            .stdout
            .as_deref()
            .ok_or(RunnerError::MissingOutput { stream: "stdout" })?;
        Ok(serde_json::from_str(stdout)?)
    }

    /// Parse captured stdout as a JSON object (key → value mapping).
    ///
    /// # Errors
    ///
    /// Same as [`json`](Self::json); a JSON document that is not an object
    /// is a decode error.
    pub fn json_object(&self) -> Result<serde_json::Map<String, serde_json::Value>, RunnerError> {
        self.json()
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExecutionResult(command={:?}, exit_code={}",
            self.command, self.exit_code
        )?;
        if let Some(stdout) = &self.stdout {
            write!(f, ", stdout={stdout:?}")?;
        }
        if let Some(stderr) = &self.stderr {
            write!(f, ", stderr={stderr:?}")?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// ExecutionError - non-zero exit surfaced by raise_for_status
// ============================================================================

/// A process that exited with a non-zero status or died from a signal.
///
/// Only produced by [`ExecutionResult::raise_for_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionError {
    pub command: Vec<String>,
    pub exit_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl ExecutionError {
    /// Name of the terminating signal, if the process was killed by one the
    /// platform knows.
    #[must_use]
    pub fn signal(&self) -> Option<&'static str> {
        if self.exit_code < 0 {
            signal_name(-self.exit_code)
        } else {
            None
        }
    }
}

impl From<ExecutionResult> for ExecutionError {
    fn from(result: ExecutionResult) -> Self {
        Self {
            command: result.command,
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let command = self.command.join(" ");
        if self.exit_code < 0 {
            let signal = -self.exit_code;
            return match signal_name(signal) {
                Some(name) => write!(f, "Command '{command}' terminated by signal {name}."),
                None => write!(f, "Command '{command}' terminated by unknown signal {signal}."),
            };
        }

        write!(
            f,
            "Command '{command}' returned non-zero exit status {}.",
            self.exit_code
        )?;
        match self.stderr.as_deref() {
            Some(stderr) if !stderr.is_empty() => write!(f, "\n{stderr}"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ExecutionError {}
