//! CLI command implementations
//!
//! Each `execute_*` function handles one subcommand and returns the exit code
//! the process should end with. Errors are reported by the caller.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use crate::{Binary, BinaryWrapper, Config, ExitCode, GenericWrapper, ProcessOptions};

// ============================================================================
// Run Command
// ============================================================================

/// Flags of `procwrap run` that are not layered through [`Config`].
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub binary: String,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub env_clear: bool,
    pub stream: bool,
    pub check: bool,
    pub json: bool,
    pub decode: bool,
}

/// Execute `procwrap run`.
///
/// Mirrors the child's exit status unless `--check` turns a non-zero status
/// into an error.
pub fn execute_run_command(request: RunRequest, config: &Config) -> Result<ExitCode> {
    let launch_mode = config.launch_mode()?;
    let mut builder = Binary::builder(&request.binary).launch_mode(launch_mode);
    if let Some(cwd) = &request.cwd {
        builder = builder.cwd(cwd);
    }
    let wrapper = GenericWrapper::new(builder.build()?);

    let mut options: ProcessOptions = config.to_process_options()?;
    options = options.env_clear(request.env_clear);
    if let Some(cwd) = request.cwd {
        options = options.cwd(cwd);
    }
    if request.stream {
        let stdout = std::io::stdout();
        options = options.stream_output(move |line| {
            let mut out = stdout.lock();
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        });
    }

    let span = crate::logging::invocation_span(&request.binary, launch_mode.as_str());
    let _guard = span.enter();

    let result = wrapper.call(&request.args, options)?;
    tracing::debug!(exit_code = result.exit_code, "run finished");

    if request.json {
        let rendered =
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{rendered}");
    } else if request.decode {
        let value: serde_json::Value = result.json()?;
        let rendered =
            serde_json::to_string_pretty(&value).context("Failed to render decoded JSON")?;
        println!("{rendered}");
    } else {
        write_captured(result.stdout.as_deref(), result.stderr.as_deref())?;
    }

    if request.check {
        result.raise_for_status().map_err(crate::RunnerError::from)?;
    }

    Ok(ExitCode::from_result(&result))
}

fn write_captured(stdout: Option<&str>, stderr: Option<&str>) -> Result<()> {
    if let Some(out) = stdout {
        let mut handle = std::io::stdout().lock();
        handle
            .write_all(out.as_bytes())
            .context("Failed to write captured stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    }
    if let Some(err) = stderr {
        std::io::stderr()
            .lock()
            .write_all(err.as_bytes())
            .context("Failed to write captured stderr")?;
    }
    Ok(())
}

// ============================================================================
// Which Command
// ============================================================================

/// Execute `procwrap which`.
pub fn execute_which_command(binary: &str) -> Result<ExitCode> {
    let resolved = Binary::resolve(binary)?;
    println!("{}", resolved.path().display());
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Config Command
// ============================================================================

/// Execute `procwrap config`.
pub fn execute_config_command(config: &Config) -> Result<ExitCode> {
    println!("Effective configuration:");
    match &config.config_path {
        Some(path) => println!("  file: {}", path.display()),
        None => println!("  file: (none)"),
    }
    for (key, (value, source)) in config.effective_config() {
        println!("  {key} = {value}  [{source}]");
    }
    Ok(ExitCode::SUCCESS)
}
