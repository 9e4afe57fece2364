use crate::error::RunnerError;
use crate::options::ProcessOptions;
use crate::result::ExecutionResult;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - Process Execution Interface
// ============================================================================

/// Trait for process execution.
///
/// Implementations launch `cmd` according to `options` and report how the
/// process finished. A non-zero exit status is a successful `run`; only
/// launch failures, I/O failures and timeouts are errors.
///
/// # Threading
///
/// `ProcessRunner` is a synchronous interface: `run` blocks the calling thread
/// until the process has finished (or has been killed). Implementations MAY
/// use helper threads internally but MUST NOT expose async in the public API.
///
/// # Example
///
/// ```rust
/// use procwrap_runner::{CommandSpec, ExecutionResult, ProcessOptions, ProcessRunner, RunnerError};
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(&self, cmd: &CommandSpec, _options: ProcessOptions) -> Result<ExecutionResult, RunnerError> {
///         Ok(ExecutionResult::new(cmd.command_vec(), 0, Some("ok\n".into()), Some(String::new())))
///     }
/// }
///
/// let result = CannedRunner.run(&CommandSpec::new("tool"), ProcessOptions::new()).unwrap();
/// assert!(result.success());
/// ```
pub trait ProcessRunner: Send + Sync {
    /// Execute a command.
    ///
    /// # Returns
    ///
    /// * `Ok(ExecutionResult)` - The process completed (possibly with non-zero exit code)
    /// * `Err(RunnerError::Timeout)` - The process exceeded `options.timeout` and was killed
    /// * `Err(RunnerError::*)` - Spawn or I/O failures
    fn run(&self, cmd: &CommandSpec, options: ProcessOptions)
    -> Result<ExecutionResult, RunnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// A mock implementation of ProcessRunner for testing
    struct MockRunner {
        expected: ExecutionResult,
    }

    impl ProcessRunner for MockRunner {
        fn run(
            &self,
            _cmd: &CommandSpec,
            _options: ProcessOptions,
        ) -> Result<ExecutionResult, RunnerError> {
            Ok(self.expected.clone())
        }
    }

    #[test]
    fn test_process_runner_trait_implementation() {
        let mock = MockRunner {
            expected: ExecutionResult::new(
                vec!["test".to_string()],
                0,
                Some("mock stdout".to_string()),
                Some("mock stderr".to_string()),
            ),
        };

        let cmd = CommandSpec::new("test").arg("--flag");
        let result = mock.run(&cmd, ProcessOptions::new()).unwrap();

        assert_eq!(result.stdout.as_deref(), Some("mock stdout"));
        assert_eq!(result.stderr.as_deref(), Some("mock stderr"));
        assert!(result.success());
    }

    #[test]
    fn test_process_runner_with_timeout_error() {
        /// A mock runner that simulates a timeout
        struct TimeoutRunner;

        impl ProcessRunner for TimeoutRunner {
            fn run(
                &self,
                cmd: &CommandSpec,
                options: ProcessOptions,
            ) -> Result<ExecutionResult, RunnerError> {
                Err(RunnerError::Timeout {
                    command: cmd.command_vec(),
                    timeout: options.timeout.unwrap_or_default(),
                    stdout: Some("partial".to_string()),
                    stderr: None,
                })
            }
        }

        let cmd = CommandSpec::new("test");
        let result = TimeoutRunner.run(&cmd, ProcessOptions::new().timeout(Duration::from_secs(60)));

        match result {
            Err(RunnerError::Timeout {
                timeout, stdout, ..
            }) => {
                assert_eq!(timeout, Duration::from_secs(60));
                assert_eq!(stdout.as_deref(), Some("partial"));
            }
            other => panic!("Expected Timeout error, got {other:?}"),
        }
    }

    #[test]
    fn test_process_runner_is_object_safe() {
        let runner: Box<dyn ProcessRunner> = Box::new(MockRunner {
            expected: ExecutionResult::new(vec![], 7, None, None),
        });
        let result = runner.run(&CommandSpec::new("x"), ProcessOptions::new()).unwrap();
        assert_eq!(result.exit_code, 7);
    }
}
