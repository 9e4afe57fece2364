//! Integration tests for the procwrap CLI binary
//!
//! These tests execute the compiled binary directly using `assert_cmd`.
#![cfg(unix)]

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn procwrap_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("procwrap"));
    // keep config discovery inside the temp dir
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    cmd.current_dir(dir.path());
    cmd.env_remove("PROCWRAP_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd.stdin(Stdio::null());
    cmd
}

#[test]
fn version_output() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("procwrap"));
}

#[test]
fn run_prints_captured_output() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "sh", "-c", "echo hello; echo oops >&2"])
        .assert()
        .success()
        .stdout("hello\n")
        .stderr(predicate::str::contains("oops"));
}

#[test]
fn run_mirrors_child_exit_code() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "sh", "-c", "exit 5"])
        .assert()
        .code(5);
}

#[test]
fn run_check_reports_failure() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--check", "sh", "-c", "echo bad >&2; exit 2"])
        .assert()
        .code(70)
        .stderr(predicate::str::contains("returned non-zero exit status 2"));
}

#[test]
fn run_timeout_exits_with_timeout_code() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--timeout", "1", "sleep", "30"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("did not finish within 1 seconds"));
}

#[test]
fn run_json_prints_result_object() {
    let temp = TempDir::new().unwrap();
    let output = procwrap_cmd(&temp)
        .args(["run", "--json", "echo", "hi"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["exit_code"], 0);
    assert_eq!(value["stdout"], "hi\n");
    assert_eq!(value["command"][1], "hi");
}

#[test]
fn run_decode_pretty_prints_stdout() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--decode", "echo", r#"{"k":[1,2]}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"k\": ["));
}

#[test]
fn run_decode_rejects_non_json() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--decode", "echo", "plain"])
        .assert()
        .code(65);
}

#[test]
fn run_json_and_decode_are_exclusive() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--json", "--decode", "echo", "{}"])
        .assert()
        .code(2);
}

#[test]
fn run_relative_cwd_resolves_local_tool() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let sub = temp.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    let tool = sub.join("tool");
    std::fs::write(&tool, "#!/bin/sh\necho local tool\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    procwrap_cmd(&temp)
        .args(["run", "--cwd", "sub", "./tool"])
        .assert()
        .success()
        .stdout("local tool\n");
}

#[test]
fn run_stream_prints_lines() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--stream", "sh", "-c", "echo a; echo b >&2; echo c"])
        .assert()
        .success()
        .stdout("a\nb\nc\n");
}

#[test]
fn run_env_and_cwd_flags() {
    let temp = TempDir::new().unwrap();
    let sub = temp.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--env", "GREETING=hey", "--cwd"])
        .arg(&sub)
        .args(["sh", "-c", "echo $GREETING; basename \"$(pwd)\""])
        .assert()
        .success()
        .stdout("hey\nsub\n");
}

#[test]
fn run_shell_flag_quotes_arguments() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "--shell", "echo", "a  b", "$HOME"])
        .assert()
        .success()
        .stdout("a  b $HOME\n");
}

#[test]
fn run_unknown_binary() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["run", "procwrap-no-such-binary-xyz"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("procwrap-no-such-binary-xyz"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn which_prints_absolute_path() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp)
        .args(["which", "sh"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/"))
        .stdout(predicate::str::ends_with("sh\n"));
}

#[test]
fn config_shows_file_values_and_sources() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join(".procwrap");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[runner]\ntimeout_secs = 42\n",
    )
    .unwrap();

    procwrap_cmd(&temp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_secs = 42"))
        .stdout(predicate::str::contains("[config ("))
        .stdout(predicate::str::contains("launch_mode = argv  [defaults]"));
}

#[test]
fn invalid_config_exits_with_cli_args_code() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join(".procwrap");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[runner]\nlaunch_mode = \"fish\"\n").unwrap();

    procwrap_cmd(&temp)
        .arg("config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("launch_mode"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let temp = TempDir::new().unwrap();
    procwrap_cmd(&temp).assert().failure().code(2);
}
