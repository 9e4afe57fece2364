use std::io::{BufRead, BufReader, Read};
use std::panic::{self, AssertUnwindSafe};
use std::process::{Child, Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::RunnerError;
use crate::options::{LineCallback, ProcessOptions};
use crate::result::ExecutionResult;
use crate::signal::exit_code_of;

use super::{CommandSpec, ProcessRunner};

// ============================================================================
// NativeRunner - Process Execution on the Host OS
// ============================================================================

/// Process runner backed by `std::process::Command`.
///
/// Two mutually exclusive modes, chosen by
/// [`ProcessOptions::stream_output`]:
///
/// * **Blocking** - a helper thread runs `wait_with_output` while the calling
///   thread waits on a channel for at most `timeout`. On expiry the process is
///   killed, the helper thread reaps it and whatever output it produced is
///   returned inside [`RunnerError::Timeout`].
/// * **Streaming** - stdout and stderr share one OS pipe; the calling thread
///   reads it line by line and invokes the callback for each line. A watchdog
///   thread enforces the timeout.
///
/// On Unix every child is started in its own process group and a kill
/// targets the whole group, so shell-mode pipelines do not leave orphans
/// holding the pipes open.
///
/// # Example
///
/// ```rust,no_run
/// use procwrap_runner::{CommandSpec, NativeRunner, ProcessOptions, ProcessRunner};
/// use std::time::Duration;
///
/// let runner = NativeRunner::new();
/// let cmd = CommandSpec::new("echo").arg("hello");
/// let result = runner
///     .run(&cmd, ProcessOptions::new().timeout(Duration::from_secs(5)))
///     .unwrap();
/// assert_eq!(result.stdout.as_deref(), Some("hello\n"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(
        &self,
        cmd: &CommandSpec,
        options: ProcessOptions,
    ) -> Result<ExecutionResult, RunnerError> {
        let ProcessOptions {
            cwd,
            env,
            env_clear,
            timeout,
            stream_output,
            stdin,
            stdout,
            stderr,
            launch_mode,
        } = options;

        let mode = launch_mode.unwrap_or(cmd.launch_mode);
        let mut command = cmd.to_command(mode);
        if env_clear {
            command.env_clear();
        }
        command.envs(&env);
        if let Some(dir) = &cwd {
            command.current_dir(dir);
        }
        command.stdin(stdin.to_stdio());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let invocation = Invocation {
            argv: cmd.command_vec(),
            program: cmd.program.to_string_lossy().into_owned(),
            timeout,
        };

        debug!(
            command = %invocation.argv.join(" "),
            launch_mode = %mode,
            timeout_ms = ?timeout.map(|t| t.as_millis()),
            streaming = stream_output.is_some(),
            "Spawning process"
        );

        match stream_output {
            Some(callback) => invocation.stream(command, callback),
            None => {
                command.stdout(stdout.to_stdio()).stderr(stderr.to_stdio());
                invocation.block(command, stdout.is_piped(), stderr.is_piped())
            }
        }
    }
}

/// State shared by both execution modes of a single call.
struct Invocation {
    argv: Vec<String>,
    program: String,
    timeout: Option<Duration>,
}

impl Invocation {
    fn spawn(&self, command: &mut Command) -> Result<Child, RunnerError> {
        let mut child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;
        // no input is ever written; closing stdin lets readers of it see EOF
        drop(child.stdin.take());
        Ok(child)
    }

    fn timed_out(&self, stdout: Option<String>, stderr: Option<String>) -> RunnerError {
        RunnerError::Timeout {
            command: self.argv.clone(),
            timeout: self.timeout.unwrap_or_default(),
            stdout,
            stderr,
        }
    }

    /// Blocking mode: collect stdout/stderr, bounded by the timeout.
    fn block(
        self,
        mut command: Command,
        capture_stdout: bool,
        capture_stderr: bool,
    ) -> Result<ExecutionResult, RunnerError> {
        let started = Instant::now();
        let child = self.spawn(&mut command)?;
        let pid = child.id();

        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let _ = tx.send(child.wait_with_output());
        });

        let received = match self.timeout {
            Some(limit) => rx.recv_timeout(limit),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let text = |bytes: Vec<u8>, captured: bool| {
            captured.then(|| String::from_utf8_lossy(&bytes).into_owned())
        };

        match received {
            Ok(Ok(output)) => {
                let _ = handle.join();
                let exit_code = exit_code_of(&output.status);
                debug!(
                    command = %self.argv.join(" "),
                    exit_code,
                    duration_ms = started.elapsed().as_millis(),
                    "Process finished"
                );
                Ok(ExecutionResult::new(
                    self.argv,
                    exit_code,
                    text(output.stdout, capture_stdout),
                    text(output.stderr, capture_stderr),
                ))
            }
            Ok(Err(e)) => {
                terminate_process(pid);
                let _ = handle.join();
                Err(RunnerError::io("waiting for the process", e))
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    command = %self.argv.join(" "),
                    pid,
                    timeout_ms = self.timeout.map(|t| t.as_millis()).unwrap_or_default(),
                    "Process timed out, killing it"
                );
                terminate_process(pid);

                // the helper thread reaps the child and sends what it collected
                let _ = handle.join();
                let partial: Option<Output> = rx.try_recv().ok().and_then(Result::ok);
                let (stdout, stderr) = match partial {
                    Some(output) => (
                        text(output.stdout, capture_stdout),
                        text(output.stderr, capture_stderr),
                    ),
                    None => (None, None),
                };
                Err(self.timed_out(stdout, stderr))
            }
            Err(RecvTimeoutError::Disconnected) => {
                terminate_process(pid);
                let _ = handle.join();
                Err(RunnerError::SpawnFailed {
                    program: self.program,
                    reason: "process monitoring thread terminated unexpectedly".to_string(),
                })
            }
        }
    }

    /// Streaming mode: feed merged stdout+stderr to `callback` line by line.
    fn stream(
        self,
        mut command: Command,
        mut callback: LineCallback,
    ) -> Result<ExecutionResult, RunnerError> {
        let started = Instant::now();
        let (reader, writer) =
            std::io::pipe().map_err(|e| RunnerError::io("creating the output pipe", e))?;
        let writer_for_stderr = writer
            .try_clone()
            .map_err(|e| RunnerError::io("duplicating the output pipe", e))?;
        command.stdout(writer).stderr(writer_for_stderr);

        let spawned = self.spawn(&mut command);
        // the Command owns our copies of the write end; EOF needs them closed
        drop(command);
        let mut child = spawned?;
        let pid = child.id();

        let expired = Arc::new(AtomicBool::new(false));
        let watchdog = self.timeout.map(|limit| {
            let (done_tx, done_rx) = mpsc::channel::<()>();
            let expired = Arc::clone(&expired);
            let handle = thread::spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(limit) {
                    expired.store(true, Ordering::SeqCst);
                    terminate_process(pid);
                }
            });
            (done_tx, handle)
        });

        let pumped = panic::catch_unwind(AssertUnwindSafe(|| pump_lines(reader, &mut callback)));

        if let Some((done_tx, handle)) = watchdog {
            let _ = done_tx.send(());
            let _ = handle.join();
        }
        let pumped = match pumped {
            Ok(pumped) => pumped,
            Err(payload) => {
                warn!(
                    command = %self.argv.join(" "),
                    pid,
                    "Line callback panicked, killing the process"
                );
                terminate_process(pid);
                let _ = child.wait();
                panic::resume_unwind(payload);
            }
        };
        if pumped.is_err() {
            terminate_process(pid);
        }

        let status = child
            .wait()
            .map_err(|e| RunnerError::io("waiting for the process", e))?;
        pumped?;

        if expired.load(Ordering::SeqCst) {
            warn!(
                command = %self.argv.join(" "),
                pid,
                "Streaming process timed out and was killed"
            );
            return Err(self.timed_out(None, None));
        }

        let exit_code = exit_code_of(&status);
        debug!(
            command = %self.argv.join(" "),
            exit_code,
            duration_ms = started.elapsed().as_millis(),
            "Streaming process finished"
        );
        Ok(ExecutionResult::new(self.argv, exit_code, None, None))
    }
}

/// Read `reader` until EOF, handing each line to `callback` without its
/// line terminator.
fn pump_lines(reader: impl Read, callback: &mut LineCallback) -> Result<(), RunnerError> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| RunnerError::io("reading process output", e))?;
        if read == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        callback(line);
    }
}

/// Kill a process by its PID.
///
/// On Unix, sends SIGKILL to the process group led by `pid`.
/// On Windows, uses TerminateProcess.
fn terminate_process(pid: u32) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let Ok(raw) = i32::try_from(pid) else {
            return;
        };
        if let Err(e) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
            debug!(pid, error = %e, "killpg failed, process group already gone");
        }
    }

    #[cfg(windows)]
    {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};

        unsafe {
            if let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) {
                let _ = TerminateProcess(handle, 1);
                let _ = CloseHandle(handle);
            }
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = pid;
    }
}
