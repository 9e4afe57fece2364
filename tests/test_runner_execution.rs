//! Integration tests for blocking execution through the public API
//!
//! Tests cover:
//! - Binary resolution on the search path
//! - Exit codes, captured stdout/stderr
//! - raise_for_status and JSON decoding
//! - Signal deaths and their messages
//! - Launch modes (argv and shell)
#![cfg(unix)]

use procwrap::{
    Binary, BinaryWrapper, ExecutionError, GenericWrapper, LaunchMode, ProcessOptions,
    RunnerError, StdioMode,
};
use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn sh() -> Binary {
    Binary::resolve("sh").unwrap()
}

fn script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolved_path_is_absolute_executable() {
    let binary = sh();
    assert_eq!(binary.name(), "sh");
    assert!(binary.path().is_absolute());
    let mode = std::fs::metadata(binary.path()).unwrap().permissions().mode();
    assert!(mode & 0o111 != 0);
}

#[test]
fn test_unresolvable_binary() {
    let err = Binary::resolve("procwrap-no-such-binary-xyz").unwrap_err();
    assert!(matches!(err, RunnerError::BinaryNotFound { .. }));
    assert!(err.to_string().contains("procwrap-no-such-binary-xyz"));
}

#[test]
fn test_empty_binary_name() {
    let err = Binary::resolve("   ").unwrap_err();
    assert!(matches!(err, RunnerError::ConfigurationInvalid { .. }));
}

#[test]
fn test_custom_search_path() {
    let temp = TempDir::new().unwrap();
    script(temp.path(), "hello-tool", "echo hello from tool");

    let binary = Binary::builder("hello-tool")
        .search_path(temp.path().as_os_str())
        .build()
        .unwrap();
    assert_eq!(
        std::fs::canonicalize(binary.path()).unwrap(),
        std::fs::canonicalize(temp.path().join("hello-tool")).unwrap()
    );

    let result = binary.execute(Vec::<OsString>::new(), ProcessOptions::new()).unwrap();
    assert_eq!(result.stdout.as_deref(), Some("hello from tool\n"));
}

// ============================================================================
// Captured output and exit codes
// ============================================================================

#[test]
fn test_success_captures_both_streams() {
    let result = sh()
        .execute(["-c", "echo out; echo err >&2"], ProcessOptions::new())
        .unwrap();
    assert_eq!(result.exit_code, 0);
    assert!(result.success());
    assert_eq!(result.stdout.as_deref(), Some("out\n"));
    assert_eq!(result.stderr.as_deref(), Some("err\n"));
    assert!(result.raise_for_status().is_ok());
}

#[test]
fn test_command_records_resolved_path_and_args() {
    let binary = sh();
    let result = binary.execute(["-c", "true"], ProcessOptions::new()).unwrap();
    assert_eq!(result.command[0], binary.path().to_string_lossy());
    assert_eq!(&result.command[1..], ["-c", "true"]);
}

#[test]
fn test_non_zero_exit_is_data_until_raised() {
    let result = sh()
        .execute(["-c", "echo boom >&2; exit 3"], ProcessOptions::new())
        .unwrap();
    assert_eq!(result.exit_code, 3);

    let err: ExecutionError = result.raise_for_status().unwrap_err();
    assert_eq!(err.exit_code, 3);
    let message = err.to_string();
    assert!(message.contains("non-zero exit status 3"), "got: {message}");
    assert!(message.ends_with("\nboom\n"), "got: {message:?}");
}

#[test]
fn test_null_stdout_is_not_captured() {
    let result = sh()
        .execute(
            ["-c", "echo hidden"],
            ProcessOptions::new().stdout(StdioMode::Null),
        )
        .unwrap();
    assert_eq!(result.stdout, None);
    assert_eq!(result.stderr.as_deref(), Some(""));
}

#[test]
fn test_cwd_and_env_are_applied() {
    let temp = TempDir::new().unwrap();
    let result = sh()
        .execute(
            ["-c", "pwd; printf '%s\\n' \"$PROCWRAP_TEST_VALUE\""],
            ProcessOptions::new()
                .cwd(temp.path())
                .env("PROCWRAP_TEST_VALUE", "from options"),
        )
        .unwrap();
    let stdout = result.stdout.unwrap();
    let mut lines = stdout.lines();
    let pwd = std::fs::canonicalize(lines.next().unwrap()).unwrap();
    assert_eq!(pwd, std::fs::canonicalize(temp.path()).unwrap());
    assert_eq!(lines.next(), Some("from options"));
}

#[test]
fn test_stdin_is_closed() {
    // cat exits immediately on EOF instead of waiting for input
    let cat = Binary::resolve("cat").unwrap();
    let result = cat
        .execute(
            Vec::<OsString>::new(),
            ProcessOptions::new().stdin(StdioMode::Piped),
        )
        .unwrap();
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout.as_deref(), Some(""));
}

// ============================================================================
// JSON decoding
// ============================================================================

#[test]
fn test_json_stdout_decodes_to_same_mapping() {
    let result = sh()
        .execute(
            ["-c", r#"echo '{"name": "procwrap", "count": 2, "tags": ["a", "b"]}'"#],
            ProcessOptions::new(),
        )
        .unwrap();

    let object = result.json_object().unwrap();
    assert_eq!(object["name"], "procwrap");
    assert_eq!(object["count"], 2);
    assert_eq!(object["tags"], serde_json::json!(["a", "b"]));
}

#[test]
fn test_invalid_json_is_a_decode_error() {
    let result = sh()
        .execute(["-c", "echo not-json"], ProcessOptions::new())
        .unwrap();
    let err = result.json::<serde_json::Value>().unwrap_err();
    assert!(matches!(err, RunnerError::Decode(_)));
}

// ============================================================================
// Signals
// ============================================================================

#[test]
fn test_signal_death_is_negative_and_named() {
    let result = sh()
        .execute(["-c", "kill -9 $$"], ProcessOptions::new())
        .unwrap();
    assert_eq!(result.exit_code, -9);

    let err = result.raise_for_status().unwrap_err();
    assert_eq!(err.signal(), Some("SIGKILL"));
    assert!(err.to_string().contains("terminated by signal SIGKILL"), "got: {err}");
}

#[test]
fn test_sigterm_is_named() {
    let result = sh()
        .execute(["-c", "kill -TERM $$"], ProcessOptions::new())
        .unwrap();
    assert_eq!(result.exit_code, -15);
    assert!(result.raise_for_status().unwrap_err().to_string().contains("SIGTERM"));
}

// ============================================================================
// Launch modes
// ============================================================================

#[test]
fn test_argv_mode_does_not_interpret_metacharacters() {
    let echo = Binary::resolve("echo").unwrap();
    let result = echo
        .execute(["$HOME", "a;b", "*"], ProcessOptions::new())
        .unwrap();
    assert_eq!(result.stdout.as_deref(), Some("$HOME a;b *\n"));
}

#[test]
fn test_shell_mode_round_trips_quoted_arguments() {
    let printf = Binary::builder("printf")
        .launch_mode(LaunchMode::Shell)
        .build()
        .unwrap();
    let result = printf
        .execute(
            ["%s|", "with space", "semi;colon", "$(whoami)", "it's"],
            ProcessOptions::new(),
        )
        .unwrap();
    assert_eq!(
        result.stdout.as_deref(),
        Some("with space|semi;colon|$(whoami)|it's|")
    );
}

#[test]
fn test_per_call_launch_mode_override() {
    let echo = Binary::resolve("echo").unwrap();
    let result = echo
        .execute(
            ["one", "two"],
            ProcessOptions::new().launch_mode(LaunchMode::Shell),
        )
        .unwrap();
    assert_eq!(result.stdout.as_deref(), Some("one two\n"));
    assert_eq!(echo.launch_mode(), LaunchMode::Argv);
}

// ============================================================================
// Wrappers and sub-commands
// ============================================================================

#[test]
fn test_generic_wrapper_and_subcommand() {
    let temp = TempDir::new().unwrap();
    script(temp.path(), "tool", r#"echo "$@""#);

    let binary = Binary::builder("tool")
        .search_path(temp.path().as_os_str())
        .subcommands(["build", "clean"])
        .build()
        .unwrap();
    let wrapper = GenericWrapper::new(binary);

    let result = wrapper
        .subcommand("build")
        .unwrap()
        .call(["--release"], ProcessOptions::new())
        .unwrap();
    assert_eq!(result.stdout.as_deref(), Some("build --release\n"));

    let direct = wrapper
        .call(&vec![OsString::from("plain")], ProcessOptions::new())
        .unwrap();
    assert_eq!(direct.stdout.as_deref(), Some("plain\n"));

    assert!(matches!(
        wrapper.subcommand("deploy"),
        Err(RunnerError::UnknownSubcommand { .. })
    ));
}

#[test]
fn test_binary_is_shareable_across_threads() {
    let binary = std::sync::Arc::new(sh());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let binary = std::sync::Arc::clone(&binary);
            std::thread::spawn(move || {
                binary
                    .execute(["-c".to_string(), format!("exit {i}")], ProcessOptions::new())
                    .unwrap()
                    .exit_code
            })
        })
        .collect();
    let codes: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(codes, vec![0, 1, 2, 3]);
}
