//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// procwrap - run external binaries with uniform results
#[derive(Parser, Debug)]
#[command(name = "procwrap")]
#[command(about = "Run external command-line binaries and report their results uniformly")]
#[command(long_about = r#"
procwrap resolves an executable on PATH, runs it with the given arguments and
reports the exit code and captured output. Non-zero exit codes are not errors
unless --check is given.

EXAMPLES:
  # Run git and print its captured output
  procwrap run git -- status --short

  # Give up after five seconds
  procwrap run --timeout 5 curl -- -sS https://example.com

  # Stream output line by line as it is produced
  procwrap run --stream cargo -- build

  # Decode captured stdout as JSON
  procwrap run --decode gh -- api repos/owner/repo

  # Show where a binary resolves
  procwrap which git

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .procwrap/config.toml
  Use --config or PROCWRAP_CONFIG to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log lines as JSON objects
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a binary and report its result
    Run {
        /// Name or path of the binary to run
        binary: String,

        /// Arguments passed to the binary unchanged
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,

        /// Kill the process after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Working directory for the process
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Environment override (KEY=VALUE), repeatable
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
        env: Vec<(String, String)>,

        /// Start from an empty environment
        #[arg(long)]
        env_clear: bool,

        /// Launch through the platform shell instead of directly
        #[arg(long)]
        shell: bool,

        /// Print output line by line while the process runs
        #[arg(long, conflicts_with = "decode")]
        stream: bool,

        /// Fail when the process exits non-zero
        #[arg(long)]
        check: bool,

        /// Print the result as a JSON object instead of raw output
        #[arg(long, conflicts_with_all = ["stream", "decode"])]
        json: bool,

        /// Decode captured stdout as JSON and pretty-print it
        #[arg(long)]
        decode: bool,
    },

    /// Print the absolute path a binary resolves to
    Which {
        /// Name of the binary to look up
        binary: String,
    },

    /// Show the effective configuration and where each value came from
    Config,
}

/// Parse a `KEY=VALUE` pair for `--env`.
pub fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("missing key in '{raw}'")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
