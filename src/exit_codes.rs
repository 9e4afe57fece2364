//! Exit code constants and error mapping for the procwrap CLI
//!
//! Library code never exits the process; the CLI maps errors and child exit
//! statuses to an [`ExitCode`] and `main.rs` hands it to `std::process::exit`.

use procwrap_config::ConfigError;
use procwrap_runner::{ExecutionResult, RunnerError};

/// Process exit code returned by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments or configuration error
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// The wrapped process exceeded its timeout and was killed
    pub const TIMEOUT: ExitCode = ExitCode(10);

    /// Captured stdout was requested as JSON but could not be decoded
    pub const DECODE_FAILURE: ExitCode = ExitCode(65);

    /// The wrapped process failed a `--check` or could not be launched
    pub const EXECUTION_FAILURE: ExitCode = ExitCode(70);

    /// The requested binary could not be resolved
    pub const NOT_FOUND: ExitCode = ExitCode(127);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }

    /// Exit code mirroring a finished child the way a POSIX shell reports it:
    /// the child's own code, or `128 + signal` for signal deaths.
    #[must_use]
    pub const fn from_child(exit_code: i32) -> Self {
        if exit_code < 0 {
            ExitCode(128 + (exit_code.wrapping_neg() & 0x7f))
        } else {
            ExitCode(exit_code & 0xff)
        }
    }

    #[must_use]
    pub fn from_result(result: &ExecutionResult) -> Self {
        Self::from_child(result.exit_code)
    }

    #[must_use]
    pub fn from_runner_error(error: &RunnerError) -> Self {
        match error {
            RunnerError::ConfigurationInvalid { .. } | RunnerError::UnknownSubcommand { .. } => {
                Self::CLI_ARGS
            }
            RunnerError::BinaryNotFound { .. } => Self::NOT_FOUND,
            RunnerError::Timeout { .. } => Self::TIMEOUT,
            RunnerError::Decode(_) | RunnerError::MissingOutput { .. } => Self::DECODE_FAILURE,
            RunnerError::SpawnFailed { .. }
            | RunnerError::Io { .. }
            | RunnerError::Execution(_) => Self::EXECUTION_FAILURE,
        }
    }

    /// Map an error surfaced at the CLI edge to an exit code.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        if let Some(runner) = error.downcast_ref::<RunnerError>() {
            Self::from_runner_error(runner)
        } else if error.downcast_ref::<ConfigError>().is_some() {
            Self::CLI_ARGS
        } else {
            Self::INTERNAL
        }
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_named_codes() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::TIMEOUT.as_i32(), 10);
        assert_eq!(ExitCode::EXECUTION_FAILURE.as_i32(), 70);
        assert_eq!(ExitCode::NOT_FOUND.as_i32(), 127);
    }

    #[test]
    fn test_child_signal_maps_like_a_shell() {
        assert_eq!(ExitCode::from_child(-9).as_i32(), 137);
        assert_eq!(ExitCode::from_child(-15).as_i32(), 143);
        assert_eq!(ExitCode::from_child(3).as_i32(), 3);
    }

    #[test]
    fn test_runner_error_mapping() {
        let timeout = RunnerError::Timeout {
            command: vec![],
            timeout: Duration::from_secs(1),
            stdout: None,
            stderr: None,
        };
        assert_eq!(ExitCode::from_runner_error(&timeout), ExitCode::TIMEOUT);

        let missing = RunnerError::BinaryNotFound {
            binary: "x".to_string(),
            reason: String::new(),
        };
        assert_eq!(ExitCode::from_runner_error(&missing), ExitCode::NOT_FOUND);

        let anyhow_err = anyhow::Error::new(missing);
        assert_eq!(ExitCode::from_error(&anyhow_err), ExitCode::NOT_FOUND);
    }

    #[test]
    fn test_config_error_maps_to_cli_args() {
        let err = anyhow::Error::new(ConfigError::InvalidFile("bad".to_string()));
        assert_eq!(ExitCode::from_error(&err), ExitCode::CLI_ARGS);
        assert_eq!(ExitCode::from_error(&anyhow::anyhow!("other")), ExitCode::INTERNAL);
    }

    proptest! {
        #[test]
        fn prop_child_codes_stay_in_byte_range(code in any::<i32>()) {
            let mapped = ExitCode::from_child(code).as_i32();
            prop_assert!((0..=255).contains(&mapped));
        }

        #[test]
        fn prop_plain_exit_codes_pass_through(code in 0i32..=255) {
            prop_assert_eq!(ExitCode::from_child(code).as_i32(), code);
        }
    }
}
