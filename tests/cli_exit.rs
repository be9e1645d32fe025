//! Exit codes of the `seedbench` binary for bad configuration.

use std::process::{Command, Output};

fn seedbench(args: &[&str], envs: &[(&str, &str)]) -> Output {
    // Empty working dir, so no stray .env file is picked up
    let cwd = tempfile::tempdir().unwrap();
    let dirs = cwd.path().display().to_string();

    let mut command = Command::new(env!("CARGO_BIN_EXE_seedbench"));
    command
        .current_dir(cwd.path())
        .args(["--submission-dir", &dirs, "--benchmark-dir", &dirs, "--cloud-cost", "1"])
        .args(args)
        .env_remove("RUST_LOG");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().unwrap()
}

#[test]
fn test_invalid_env_setting_exits_with_config_code() {
    let output = seedbench(&[], &[("SEEDBENCH_TIMING", "cpu")]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SEEDBENCH_TIMING"), "stderr: {}", stderr);
    assert!(!stderr.contains("backtrace"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_timeout_env_exits_with_config_code() {
    let output = seedbench(&["--dry-run"], &[("SEEDBENCH_TIMEOUT_SECS", "soon")]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_flag_value_exits_with_usage_code() {
    let output = seedbench(&["--timing", "cpu"], &[]);
    assert_eq!(output.status.code(), Some(2));
}
