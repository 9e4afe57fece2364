//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands::{self, RunRequest};

use crate::error_reporter::ErrorReport;
use crate::logging::{LogFormat, init_tracing};
use crate::{CliArgs, Config, ExitCode};

/// Main CLI execution function.
///
/// This function handles ALL output including errors. It returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())`
/// - When the command finished with a non-zero code (including a mirrored
///   child exit status) or failed: returns `Err(ExitCode)` after printing
///   any error report
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    run_with(cli)
}

/// Dispatch an already-parsed command line.
pub fn run_with(cli: Cli) -> Result<(), ExitCode> {
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    if let Err(e) = init_tracing(cli.verbose, format) {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }

    let cli_args = cli_args_for(&cli);
    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", ErrorReport::from_anyhow(&err).render("config"));
            return Err(ExitCode::from_error(&err));
        }
    };

    let (operation, outcome) = match cli.command {
        Commands::Run {
            binary,
            args,
            cwd,
            env_clear,
            stream,
            check,
            json,
            decode,
            ..
        } => {
            let request = RunRequest {
                binary,
                args,
                cwd,
                env_clear,
                stream,
                check,
                json,
                decode,
            };
            ("run", commands::execute_run_command(request, &config))
        }
        Commands::Which { binary } => ("which", commands::execute_which_command(&binary)),
        Commands::Config => ("config", commands::execute_config_command(&config)),
    };

    match outcome {
        Ok(code) if code == ExitCode::SUCCESS => Ok(()),
        Ok(code) => Err(code),
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), operation, "command failed");
            eprintln!("{}", ErrorReport::from_anyhow(&err).render(operation));
            Err(ExitCode::from_error(&err))
        }
    }
}

/// Values from the command line that take part in config layering.
fn cli_args_for(cli: &Cli) -> CliArgs {
    let mut cli_args = CliArgs {
        config_path: cli.config.clone(),
        ..CliArgs::default()
    };
    if let Commands::Run {
        timeout,
        env,
        shell,
        ..
    } = &cli.command
    {
        cli_args.timeout_secs = *timeout;
        cli_args.env = env.clone();
        if *shell {
            cli_args.launch_mode = Some("shell".to_string());
        }
    }
    cli_args
}
