//! Types used by the runner module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Stdio;
use std::str::FromStr;

/// How the command vector reaches the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Spawn the binary directly with discrete argv elements
    #[default]
    Argv,
    /// Join the command vector into one quoted string and run it through the
    /// platform shell (`sh -c` on Unix, `cmd /C` on Windows)
    Shell,
}

impl LaunchMode {
    /// Convert launch mode to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Argv => "argv",
            Self::Shell => "shell",
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argv" => Ok(Self::Argv),
            "shell" => Ok(Self::Shell),
            other => Err(format!(
                "unknown launch mode '{other}' (expected 'argv' or 'shell')"
            )),
        }
    }
}

/// Where one of the child's standard streams is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    /// Pipe to the parent; stdout/stderr are captured into the result
    #[default]
    Piped,
    /// Connect to the null device
    Null,
    /// Share the parent's stream
    Inherit,
}

impl StdioMode {
    #[must_use]
    pub fn to_stdio(self) -> Stdio {
        match self {
            Self::Piped => Stdio::piped(),
            Self::Null => Stdio::null(),
            Self::Inherit => Stdio::inherit(),
        }
    }

    #[must_use]
    pub const fn is_piped(self) -> bool {
        matches!(self, Self::Piped)
    }
}
