//! Per-call process configuration

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::{LaunchMode, StdioMode};

/// Callback receiving one line of output at a time, newline stripped.
pub type LineCallback = Box<dyn FnMut(&str) + Send>;

/// How the subprocess is launched and waited on.
///
/// Kept apart from the domain arguments of a call: wrappers turn their own
/// argument type into argv tokens, while everything here configures the
/// process itself. A value is consumed by each invocation, so nothing leaks
/// from one call into the next.
///
/// ```rust
/// use procwrap_runner::{ProcessOptions, StdioMode};
/// use std::time::Duration;
///
/// let options = ProcessOptions::new()
///     .timeout(Duration::from_secs(30))
///     .cwd("/tmp")
///     .env("LC_ALL", "C")
///     .stderr(StdioMode::Null);
/// assert_eq!(options.timeout, Some(Duration::from_secs(30)));
/// ```
#[derive(Default)]
pub struct ProcessOptions {
    /// Working directory of the child
    pub cwd: Option<PathBuf>,
    /// Environment overrides applied on top of the inherited environment
    pub env: HashMap<OsString, OsString>,
    /// Start from an empty environment instead of inheriting the parent's
    pub env_clear: bool,
    /// Upper bound on the wait; `None` waits forever
    pub timeout: Option<Duration>,
    /// When set, output is delivered line by line instead of captured
    pub stream_output: Option<LineCallback>,
    pub stdin: StdioMode,
    pub stdout: StdioMode,
    pub stderr: StdioMode,
    /// Overrides the binary's launch mode for this call only
    pub launch_mode: Option<LaunchMode>,
}

impl ProcessOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn envs<I, K, V>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.env
            .extend(envs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn env_clear(mut self, clear: bool) -> Self {
        self.env_clear = clear;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Switch the call to streaming mode.
    ///
    /// stderr is merged into stdout so `callback` observes both streams in
    /// the order the child wrote them.
    #[must_use]
    pub fn stream_output(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.stream_output = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn stdin(mut self, mode: StdioMode) -> Self {
        self.stdin = mode;
        self
    }

    #[must_use]
    pub fn stdout(mut self, mode: StdioMode) -> Self {
        self.stdout = mode;
        self
    }

    #[must_use]
    pub fn stderr(mut self, mode: StdioMode) -> Self {
        self.stderr = mode;
        self
    }

    #[must_use]
    pub fn launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.stream_output.is_some()
    }
}

impl fmt::Debug for ProcessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessOptions")
            .field("cwd", &self.cwd)
            .field("env", &self.env)
            .field("env_clear", &self.env_clear)
            .field("timeout", &self.timeout)
            .field("stream_output", &self.stream_output.as_ref().map(|_| "<callback>"))
            .field("stdin", &self.stdin)
            .field("stdout", &self.stdout)
            .field("stderr", &self.stderr)
            .field("launch_mode", &self.launch_mode)
            .finish()
    }
}
