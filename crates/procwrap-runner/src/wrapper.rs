//! The per-binary wrapper contract
//!
//! Concrete wrappers own a [`Binary`] and describe how their domain arguments
//! become argv tokens. Execution, timeouts and streaming stay in the shared
//! helper.

use std::ffi::OsString;

use crate::binary::{Binary, Subcommand};
use crate::error::RunnerError;
use crate::options::ProcessOptions;
use crate::result::ExecutionResult;

/// A typed front-end for one external binary.
///
/// ```rust,no_run
/// use procwrap_runner::{Binary, BinaryWrapper, ProcessOptions, RunnerError};
/// use std::ffi::OsString;
///
/// struct Curl {
///     binary: Binary,
/// }
///
/// struct Fetch {
///     url: String,
///     silent: bool,
/// }
///
/// impl BinaryWrapper for Curl {
///     type Args = Fetch;
///
///     fn binary(&self) -> &Binary {
///         &self.binary
///     }
///
///     fn build_args(&self, args: &Fetch) -> Vec<OsString> {
///         let mut argv = Vec::new();
///         if args.silent {
///             argv.push("-s".into());
///         }
///         argv.push(args.url.clone().into());
///         argv
///     }
/// }
///
/// let curl = Curl { binary: Binary::resolve("curl")? };
/// let page = curl.call(
///     &Fetch { url: "https://example.com".into(), silent: true },
///     ProcessOptions::new(),
/// )?;
/// # Ok::<(), RunnerError>(())
/// ```
pub trait BinaryWrapper {
    /// Domain arguments of one call
    type Args;

    fn binary(&self) -> &Binary;

    /// Translate domain arguments into argv tokens (binary excluded).
    fn build_args(&self, args: &Self::Args) -> Vec<OsString>;

    /// Run the binary with `args` and `options`.
    ///
    /// # Errors
    ///
    /// See [`Binary::execute`].
    fn call(
        &self,
        args: &Self::Args,
        options: ProcessOptions,
    ) -> Result<ExecutionResult, RunnerError> {
        self.binary().execute(self.build_args(args), options)
    }

    /// Fetch a sub-command registered on the underlying binary.
    ///
    /// # Errors
    ///
    /// [`RunnerError::UnknownSubcommand`] for unregistered names.
    fn subcommand(&self, name: &str) -> Result<&Subcommand, RunnerError> {
        self.binary().subcommand(name)
    }
}

/// Pass-through wrapper: the arguments already are argv tokens.
#[derive(Debug, Clone)]
pub struct GenericWrapper {
    binary: Binary,
}

impl GenericWrapper {
    #[must_use]
    pub fn new(binary: Binary) -> Self {
        Self { binary }
    }

    /// Resolve `name` on `PATH` and wrap it.
    ///
    /// # Errors
    ///
    /// See [`Binary::resolve`].
    pub fn resolve(name: impl Into<String>) -> Result<Self, RunnerError> {
        Binary::resolve(name).map(Self::new)
    }
}

impl BinaryWrapper for GenericWrapper {
    type Args = Vec<OsString>;

    fn binary(&self) -> &Binary {
        &self.binary
    }

    fn build_args(&self, args: &Self::Args) -> Vec<OsString> {
        args.clone()
    }
}
