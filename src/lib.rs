//! procwrap: run external command-line binaries with uniform results
//!
//! A [`Binary`] is resolved on the search path once and then invoked any
//! number of times. Every invocation returns an [`ExecutionResult`] carrying
//! the command line, the exit code (negative for a signal death on Unix) and
//! the captured output. A non-zero exit code is data, not an error, until
//! [`ExecutionResult::raise_for_status`] is called.
//!
//! ```rust,no_run
//! use procwrap::{Binary, ProcessOptions};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), procwrap::RunnerError> {
//! let git = Binary::builder("git").subcommands(["status", "log"]).build()?;
//! let result = git
//!     .subcommand("log")?
//!     .call(["-n", "1"], ProcessOptions::new().timeout(Duration::from_secs(10)))?;
//! result.raise_for_status()?;
//! println!("{}", result.stdout.unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! The runner lives in `procwrap-runner` and configuration in
//! `procwrap-config`; this crate re-exports both and adds logging setup,
//! exit-code mapping and the `procwrap` CLI.

pub mod cli;
pub mod error_reporter;
pub mod exit_codes;
pub mod logging;

pub use exit_codes::ExitCode;

pub use procwrap_runner::{
    Binary, BinaryBuilder, BinaryWrapper, CommandSpec, ErrorCategory, ExecutionError,
    ExecutionResult, GenericWrapper, LaunchMode, LineCallback, NativeRunner, ProcessOptions,
    ProcessRunner, RunnerError, StdioMode, Subcommand, SubcommandRegistry, UserFriendlyError,
};

pub use procwrap_config::{CONFIG_ENV_VAR, CliArgs, Config, ConfigError, ConfigSource, RunnerConfig};

/// Signal helpers
pub mod signal {
    pub use procwrap_runner::signal::{exit_code_of, signal_name};
}
