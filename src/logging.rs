//! Logging initialisation for procwrap
//!
//! Library crates only emit `tracing` events; binaries decide where they go.
//! Output is written to stderr so a wrapped binary's stdout stays untouched.

use tracing::{Level, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one line per event
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Build the filter used by [`init_tracing`].
///
/// `RUST_LOG` wins when set; otherwise procwrap crates log at `debug` in
/// verbose mode and at `info` (everything else at `warn`) by default.
#[must_use]
pub fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("procwrap=debug,procwrap_runner=debug,procwrap_config=debug,info")
            } else {
                EnvFilter::try_new("procwrap=info,procwrap_runner=info,procwrap_config=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(default_filter(verbose));

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?,
        LogFormat::Compact if verbose => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?,
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?,
    }

    Ok(())
}

/// Span wrapping one CLI invocation of a binary.
pub fn invocation_span(binary: &str, launch_mode: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "invocation",
        binary = %binary,
        launch_mode = %launch_mode,
    )
}
