//! Uniform invocation of external command-line binaries
//!
//! A [`Binary`] is resolved on the search path once, at construction time.
//! Every call takes the argv tokens and a fresh [`ProcessOptions`] value, runs
//! the process through a [`ProcessRunner`] and hands back an
//! [`ExecutionResult`] describing how it finished.
//!
//! # Launch modes
//!
//! By default arguments cross the process boundary as discrete argv elements
//! ([`LaunchMode::Argv`]). [`LaunchMode::Shell`] joins the command vector into
//! a single, platform-quoted command line and hands it to `sh -c` / `cmd /C`,
//! which enables pipes and globbing at the cost of shell interpretation.
//!
//! # Example
//!
//! ```rust,no_run
//! use procwrap_runner::{Binary, ProcessOptions};
//! use std::time::Duration;
//!
//! let git = Binary::builder("git").subcommands(["status"]).build()?;
//! let result = git
//!     .subcommand("status")?
//!     .call(["--short"], ProcessOptions::new().timeout(Duration::from_secs(10)))?;
//! result.raise_for_status()?;
//! println!("{}", result.stdout.unwrap_or_default());
//! # Ok::<(), procwrap_runner::RunnerError>(())
//! ```

pub mod binary;
pub mod command_spec;
pub mod error;
pub mod native;
pub mod options;
pub mod process;
pub mod quote;
pub mod result;
pub mod signal;
pub mod types;
pub mod wrapper;

pub use binary::{Binary, BinaryBuilder, Subcommand, SubcommandRegistry};
pub use command_spec::CommandSpec;
pub use error::{ErrorCategory, RunnerError, UserFriendlyError};
pub use native::NativeRunner;
pub use options::{LineCallback, ProcessOptions};
pub use process::ProcessRunner;
pub use result::{ExecutionError, ExecutionResult};
pub use types::{LaunchMode, StdioMode};
pub use wrapper::{BinaryWrapper, GenericWrapper};
