use std::ffi::OsString;
use std::process::Command;

use crate::quote;
use crate::types::LaunchMode;

// ============================================================================
// CommandSpec - the command vector of one invocation
// ============================================================================

/// Specification for a command to execute.
///
/// Holds the resolved program followed by its arguments as discrete `OsString`
/// elements. How those elements reach the operating system is decided by the
/// [`LaunchMode`]: as an argv vector, or joined into one quoted command line
/// for the platform shell.
///
/// # Example
///
/// ```rust
/// use procwrap_runner::{CommandSpec, LaunchMode};
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("/usr/bin/git")
///     .arg("log")
///     .args(["--oneline", "-n", "5"])
///     .launch_mode(LaunchMode::Argv);
///
/// assert_eq!(cmd.program, OsString::from("/usr/bin/git"));
/// assert_eq!(cmd.args.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements
    pub args: Vec<OsString>,
    /// How the command vector is handed to the OS
    pub launch_mode: LaunchMode,
}

impl CommandSpec {
    /// Create a new `CommandSpec` with the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            launch_mode: LaunchMode::default(),
        }
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = mode;
        self
    }

    /// The full command vector, `[program, ...args]`, as lossy UTF-8 strings.
    ///
    /// This is what ends up in [`ExecutionResult::command`](crate::ExecutionResult).
    #[must_use]
    pub fn command_vec(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| part.to_string_lossy().into_owned())
            .collect()
    }

    /// The command vector joined into one command line using the host
    /// platform's quoting rules.
    #[must_use]
    pub fn shell_line(&self) -> String {
        quote::join_for_platform(self.command_vec())
    }

    /// Convert this `CommandSpec` into a `std::process::Command` for the
    /// given launch mode.
    ///
    /// * [`LaunchMode::Argv`] → `Command::new(program).args(args)`
    /// * [`LaunchMode::Shell`] → `sh -c <line>` / `cmd /C <line>`
    ///
    /// Stdio, working directory and environment are left untouched; the
    /// runner applies them from [`ProcessOptions`](crate::ProcessOptions).
    #[must_use]
    pub fn to_command(&self, mode: LaunchMode) -> Command {
        match mode {
            LaunchMode::Argv => {
                let mut cmd = Command::new(&self.program);
                cmd.args(&self.args);
                cmd
            }
            LaunchMode::Shell => Self::shell_command(self.shell_line()),
        }
    }

    #[cfg(not(windows))]
    fn shell_command(line: String) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }

    #[cfg(windows)]
    fn shell_command(line: String) -> Command {
        use std::os::windows::process::CommandExt;

        let mut cmd = Command::new("cmd");
        // cmd.exe does its own parsing; the line is already quoted
        cmd.arg("/C").raw_arg(line);
        cmd
    }
}
