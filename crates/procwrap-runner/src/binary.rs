//! Binary resolution and the shared execution helper
//!
//! [`Binary`] is what concrete wrappers compose: it owns the resolved path,
//! the launch mode and the registry of sub-commands, and turns argv tokens
//! plus [`ProcessOptions`] into an [`ExecutionResult`] through a
//! [`ProcessRunner`].

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;
use crate::native::NativeRunner;
use crate::options::ProcessOptions;
use crate::process::ProcessRunner;
use crate::result::ExecutionResult;
use crate::types::LaunchMode;

/// Resolved path + launch mode + runner; cheap to clone.
#[derive(Clone)]
struct Invoker {
    path: PathBuf,
    launch_mode: LaunchMode,
    runner: Arc<dyn ProcessRunner>,
}

impl Invoker {
    fn execute<I, S>(&self, args: I, options: ProcessOptions) -> Result<ExecutionResult, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let spec = CommandSpec::new(self.path.as_os_str())
            .args(args)
            .launch_mode(self.launch_mode);
        self.runner.run(&spec, options)
    }
}

// ============================================================================
// Binary
// ============================================================================

/// An external executable, resolved once on the search path.
///
/// Construction fails when the name is empty or cannot be located; after that
/// the path never changes. A `Binary` carries no per-call state and can be
/// shared between threads.
///
/// ```rust,no_run
/// use procwrap_runner::{Binary, ProcessOptions};
///
/// let ls = Binary::resolve("ls")?;
/// let result = ls.execute(["-1", "/"], ProcessOptions::new())?;
/// assert!(result.success());
/// # Ok::<(), procwrap_runner::RunnerError>(())
/// ```
#[derive(Clone)]
pub struct Binary {
    name: String,
    invoker: Invoker,
    subcommands: SubcommandRegistry,
}

impl Binary {
    /// Resolve `name` on `PATH` with default settings.
    ///
    /// # Errors
    ///
    /// [`RunnerError::ConfigurationInvalid`] for an empty name,
    /// [`RunnerError::BinaryNotFound`] when it cannot be located.
    pub fn resolve(name: impl Into<String>) -> Result<Self, RunnerError> {
        Self::builder(name).build()
    }

    #[must_use]
    pub fn builder(name: impl Into<String>) -> BinaryBuilder {
        BinaryBuilder::new(name)
    }

    /// The name the binary was requested by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the resolved executable.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.invoker.path
    }

    #[must_use]
    pub fn launch_mode(&self) -> LaunchMode {
        self.invoker.launch_mode
    }

    /// Run the binary with `args`.
    ///
    /// # Errors
    ///
    /// Whatever the underlying [`ProcessRunner`] reports: spawn/I/O failures
    /// and [`RunnerError::Timeout`]. A non-zero exit status is not an error.
    pub fn execute<I, S>(&self, args: I, options: ProcessOptions) -> Result<ExecutionResult, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.invoker.execute(args, options)
    }

    /// Look up a registered sub-command.
    ///
    /// # Errors
    ///
    /// [`RunnerError::UnknownSubcommand`] when `name` was not registered.
    pub fn subcommand(&self, name: &str) -> Result<&Subcommand, RunnerError> {
        self.subcommands.get(name).ok_or_else(|| RunnerError::UnknownSubcommand {
            binary: self.name.clone(),
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn subcommands(&self) -> &SubcommandRegistry {
        &self.subcommands
    }
}

impl fmt::Debug for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binary")
            .field("name", &self.name)
            .field("path", &self.invoker.path)
            .field("launch_mode", &self.invoker.launch_mode)
            .field("subcommands", &self.subcommands.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BinaryBuilder
// ============================================================================

/// Builder for [`Binary`].
#[must_use]
pub struct BinaryBuilder {
    name: String,
    search_path: Option<OsString>,
    cwd: Option<PathBuf>,
    launch_mode: LaunchMode,
    subcommands: Vec<String>,
    runner: Option<Arc<dyn ProcessRunner>>,
}

impl BinaryBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            search_path: None,
            cwd: None,
            launch_mode: LaunchMode::default(),
            subcommands: Vec::new(),
            runner: None,
        }
    }

    /// Search these directories (`PATH` syntax) instead of the process `PATH`.
    pub fn search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    /// Base directory for resolving relative paths like `./tool`.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = mode;
        self
    }

    /// Register sub-commands that can later be fetched with
    /// [`Binary::subcommand`].
    pub fn subcommands<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcommands.extend(names.into_iter().map(Into::into));
        self
    }

    /// Execute through `runner` instead of [`NativeRunner`].
    pub fn runner(mut self, runner: impl ProcessRunner + 'static) -> Self {
        self.runner = Some(Arc::new(runner));
        self
    }

    /// Resolve the binary and freeze the configuration.
    ///
    /// # Errors
    ///
    /// [`RunnerError::ConfigurationInvalid`] for an empty binary or
    /// sub-command name, [`RunnerError::BinaryNotFound`] when the binary
    /// cannot be located or is not an executable file.
    pub fn build(self) -> Result<Binary, RunnerError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RunnerError::ConfigurationInvalid {
                reason: "path to executable binary not set".to_string(),
            });
        }

        let path = resolve_path(&name, self.search_path.as_deref(), self.cwd.as_deref())?;
        debug!(binary = %name, path = %path.display(), "Resolved binary");

        let invoker = Invoker {
            path,
            launch_mode: self.launch_mode,
            runner: self
                .runner
                .unwrap_or_else(|| Arc::new(NativeRunner::new())),
        };
        let subcommands = SubcommandRegistry::build(&name, &invoker, self.subcommands)?;

        Ok(Binary {
            name,
            invoker,
            subcommands,
        })
    }
}

fn resolve_path(
    name: &str,
    search_path: Option<&OsStr>,
    cwd: Option<&Path>,
) -> Result<PathBuf, RunnerError> {
    let not_found = |reason: String| RunnerError::BinaryNotFound {
        binary: name.to_string(),
        reason,
    };

    let current_dir = || {
        std::env::current_dir()
            .map_err(|e| not_found(format!("cannot determine current directory: {e}")))
    };
    // which_in joins relative names onto cwd, so cwd must already be absolute
    let cwd = match cwd {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current_dir()?.join(dir),
        None => current_dir()?,
    };
    let search_path = search_path
        .map(OsStr::to_os_string)
        .or_else(|| std::env::var_os("PATH"));

    let path = which::which_in(name, search_path, &cwd).map_err(|e| not_found(e.to_string()))?;

    if !path.is_file() {
        return Err(not_found(format!("{} is not a file", path.display())));
    }
    Ok(path)
}

// ============================================================================
// Sub-commands
// ============================================================================

/// A bound sub-command invoker: calls the binary with the sub-command name
/// prepended to the arguments (`git remote -v`).
#[derive(Clone)]
pub struct Subcommand {
    name: String,
    invoker: Invoker,
}

impl Subcommand {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `<binary> <name> <args...>`.
    ///
    /// # Errors
    ///
    /// Same as [`Binary::execute`].
    pub fn call<I, S>(&self, args: I, options: ProcessOptions) -> Result<ExecutionResult, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let argv = std::iter::once(OsString::from(&self.name))
            .chain(args.into_iter().map(Into::into));
        self.invoker.execute(argv, options)
    }
}

impl fmt::Debug for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcommand")
            .field("name", &self.name)
            .field("binary", &self.invoker.path)
            .finish()
    }
}

/// Sub-command name → invoker, built once when the binary is constructed.
#[derive(Clone, Default)]
pub struct SubcommandRegistry {
    entries: BTreeMap<String, Subcommand>,
}

impl SubcommandRegistry {
    fn build(binary: &str, invoker: &Invoker, names: Vec<String>) -> Result<Self, RunnerError> {
        let mut entries = BTreeMap::new();
        for name in names {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(RunnerError::ConfigurationInvalid {
                    reason: format!("empty sub-command name registered for {binary}"),
                });
            }
            entries.entry(name.clone()).or_insert_with(|| Subcommand {
                name,
                invoker: invoker.clone(),
            });
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Subcommand> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
