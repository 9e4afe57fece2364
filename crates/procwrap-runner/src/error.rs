//! Error types for runner module

use std::time::Duration;
use thiserror::Error;

use crate::result::ExecutionError;

/// Failures surfaced while resolving, launching or interpreting a subprocess.
///
/// A non-zero exit status is *not* an error by default: it is returned as data
/// inside [`ExecutionResult`](crate::ExecutionResult) and only becomes
/// [`RunnerError::Execution`] when the caller opts in through
/// [`raise_for_status`](crate::ExecutionResult::raise_for_status).
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Runner configuration invalid: {reason}")]
    ConfigurationInvalid { reason: String },

    #[error("Executable binary '{binary}' not found. Install {binary} first ({reason})")]
    BinaryNotFound { binary: String, reason: String },

    #[error("'{binary}' has no sub-command '{name}'")]
    UnknownSubcommand { binary: String, name: String },

    #[error("Failed to spawn process '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("I/O failure while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{}' timed out after {} seconds", .command.join(" "), .timeout.as_secs_f64())]
    Timeout {
        command: Vec<String>,
        timeout: Duration,
        /// Output collected before the process was killed
        stdout: Option<String>,
        stderr: Option<String>,
    },

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Failed to decode process output as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No captured {stream} to decode (streaming mode or non-piped stream)")]
    MissingOutput { stream: &'static str },
}

impl RunnerError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Trait for errors that can provide user-friendly messages and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Resolution,
    Execution,
    Timeout,
    Decode,
}

impl UserFriendlyError for RunnerError {
    fn user_message(&self) -> String {
        match self {
            Self::ConfigurationInvalid { reason } => {
                format!("The runner was configured incorrectly: {reason}")
            }
            Self::BinaryNotFound { binary, .. } => {
                format!("Could not find the '{binary}' executable")
            }
            Self::UnknownSubcommand { binary, name } => {
                format!("'{name}' is not a registered sub-command of {binary}")
            }
            Self::SpawnFailed { program, reason } => {
                format!("Could not start '{program}': {reason}")
            }
            Self::Io { context, source } => format!("I/O failure while {context}: {source}"),
            Self::Timeout { timeout, .. } => format!(
                "The process did not finish within {} seconds and was killed",
                timeout.as_secs_f64()
            ),
            Self::Execution(err) => err.to_string(),
            Self::Decode(err) => format!("The process output is not valid JSON: {err}"),
            Self::MissingOutput { stream } => {
                format!("No {stream} was captured for this process")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::BinaryNotFound { .. } => Some(
                "Binaries are looked up on the PATH when the wrapper is constructed.".to_string(),
            ),
            Self::Timeout {
                stdout: Some(out), ..
            } if !out.is_empty() => Some(format!("Partial stdout before the kill:\n{out}")),
            Self::MissingOutput { .. } => Some(
                "Streaming mode delivers output through the line callback instead of capturing it."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigurationInvalid { .. } => {
                vec!["Pass a non-empty binary name or path".to_string()]
            }
            Self::BinaryNotFound { binary, .. } => vec![
                format!("Install {binary} and make sure it is on your PATH"),
                "Pass an absolute path to the executable instead of a bare name".to_string(),
            ],
            Self::UnknownSubcommand { .. } => {
                vec!["Register the sub-command when building the binary wrapper".to_string()]
            }
            Self::SpawnFailed { .. } => vec![
                "Check that the working directory exists".to_string(),
                "Check file permissions on the executable".to_string(),
            ],
            Self::Timeout { .. } => vec!["Increase the timeout or pass no timeout".to_string()],
            Self::Execution(_) => vec!["Inspect the captured stderr for details".to_string()],
            Self::Decode(_) => {
                vec!["Ask the binary for machine-readable (JSON) output".to_string()]
            }
            Self::MissingOutput { .. } => {
                vec!["Run without a stream callback to capture stdout".to_string()]
            }
            Self::Io { .. } => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationInvalid { .. } | Self::UnknownSubcommand { .. } => {
                ErrorCategory::Configuration
            }
            Self::BinaryNotFound { .. } => ErrorCategory::Resolution,
            Self::SpawnFailed { .. } | Self::Io { .. } | Self::Execution(_) => {
                ErrorCategory::Execution
            }
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Decode(_) | Self::MissingOutput { .. } => ErrorCategory::Decode,
        }
    }
}
