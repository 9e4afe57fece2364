//! Configuration for procwrap runner defaults
//!
//! Values are layered with precedence CLI > config file > built-in defaults.
//! The config file is `.procwrap/config.toml`, found by walking upward from the
//! start directory (stopping at a repository root), unless an explicit path or
//! the `PROCWRAP_CONFIG` environment variable names one.
//!
//! ```toml
//! [runner]
//! launch_mode = "argv"   # or "shell"
//! timeout_secs = 120
//!
//! [runner.env]
//! LC_ALL = "C"
//! ```

mod discovery;
mod model;
mod validation;

pub use discovery::CONFIG_ENV_VAR;
pub use model::{CliArgs, Config, ConfigSource, RunnerConfig};
pub use validation::ConfigError;
