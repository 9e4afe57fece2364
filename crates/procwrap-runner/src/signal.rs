//! Exit status decoding and signal naming

use std::process::ExitStatus;

/// Fold an [`ExitStatus`] into a single integer.
///
/// A process killed by a signal yields the negated signal number, so callers
/// can tell `exit(9)` apart from death by `SIGKILL`. A status carrying neither
/// a code nor a signal maps to `-1`.
#[must_use]
pub fn exit_code_of(status: &ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    status.code().unwrap_or(-1)
}

/// Symbolic name of a signal number (`9` → `"SIGKILL"`).
///
/// Returns `None` for numbers the platform does not define. Windows has no
/// POSIX signals, so every lookup there returns `None`.
#[must_use]
pub fn signal_name(signal: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        nix::sys::signal::Signal::try_from(signal)
            .ok()
            .map(nix::sys::signal::Signal::as_str)
    }

    #[cfg(not(unix))]
    {
        let _ = signal;
        None
    }
}
