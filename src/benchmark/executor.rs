//! External command execution
//!
//! Every subprocess the run driver needs goes through [`CommandExecutor`].
//! [`ProcessExecutor`] is the production implementation.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::MAX_STDERR_EXCERPT_CHARS;

/// Fully resolved invocation of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<OsString>,
    pub current_dir: PathBuf,
    pub envs: Vec<(String, String)>,
    /// Hard limit; None waits forever
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Command line as shown in logs and dry runs
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Result of executing an external command
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// Exited with status 0
    Success {
        stdout: String,
        stderr: String,
        elapsed: Duration,
    },
    /// Killed after the hard limit
    TimeLimitExceeded { limit: Duration },
    /// Non-zero exit or killed by a signal
    RuntimeError {
        exit_code: i32,
        message: String,
        elapsed: Duration,
    },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion. `Err` means it could not be spawned.
    async fn execute(&self, spec: &CommandSpec) -> std::io::Result<ExecutionResult>;
}

/// Runs commands as local child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, spec: &CommandSpec) -> std::io::Result<ExecutionResult> {
        tracing::debug!(
            command = %spec.display(),
            cwd = %spec.current_dir.display(),
            "Spawning external command"
        );

        let start = Instant::now();

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .current_dir(&spec.current_dir)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout can take down launchers and
        // everything they started
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn()?;
        let pid = child.id();

        let output = match spec.timeout {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    kill_process_group(pid);
                    return Ok(ExecutionResult::TimeLimitExceeded { limit });
                }
            },
            None => child.wait_with_output().await?,
        };

        let elapsed = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            return Ok(ExecutionResult::Success {
                stdout,
                stderr,
                elapsed,
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = output.status.signal() {
                return Ok(ExecutionResult::RuntimeError {
                    exit_code: -signal,
                    message: format!("Killed by signal {}", signal),
                    elapsed,
                });
            }
        }

        let exit_code = output.status.code().unwrap_or(-1);
        let message = if stderr.trim().is_empty() {
            format!("Process exited with code {}", exit_code)
        } else {
            stderr_excerpt(&stderr)
        };

        Ok(ExecutionResult::RuntimeError {
            exit_code,
            message,
            elapsed,
        })
    }
}

/// SIGKILL the group led by `pid`. The direct child is also killed when
/// its handle drops.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
        Err(e) => tracing::warn!(pgid = pid, error = %e, "Failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// Tail of stderr, where tracebacks end
fn stderr_excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    if count <= MAX_STDERR_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    trimmed.chars().skip(count - MAX_STDERR_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".into(), script.into()],
            current_dir: std::env::temp_dir(),
            envs: vec![("SEEDBENCH_TEST_VALUE".to_string(), "42".to_string())],
            timeout: None,
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(sh("exit 0").display(), "sh -c exit 0");
    }

    #[test]
    fn test_stderr_excerpt_keeps_tail() {
        let long = format!("{}END", "x".repeat(MAX_STDERR_EXCERPT_CHARS));
        let excerpt = stderr_excerpt(&long);
        assert_eq!(excerpt.chars().count(), MAX_STDERR_EXCERPT_CHARS);
        assert!(excerpt.ends_with("END"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_captures_output_and_env() {
        let result = ProcessExecutor::new()
            .execute(&sh("echo $SEEDBENCH_TEST_VALUE; echo oops >&2"))
            .await
            .unwrap();

        match result {
            ExecutionResult::Success { stdout, stderr, .. } => {
                assert_eq!(stdout.trim(), "42");
                assert_eq!(stderr.trim(), "oops");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let result = ProcessExecutor::new()
            .execute(&sh("echo broken >&2; exit 3"))
            .await
            .unwrap();

        match result {
            ExecutionResult::RuntimeError {
                exit_code, message, ..
            } => {
                assert_eq!(exit_code, 3);
                assert_eq!(message, "broken");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let mut spec = sh("sleep 5");
        spec.timeout = Some(Duration::from_millis(100));

        let result = ProcessExecutor::new().execute(&spec).await.unwrap();
        assert_eq!(
            result,
            ExecutionResult::TimeLimitExceeded {
                limit: Duration::from_millis(100)
            }
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_grandchildren() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("late_write");

        // The inner shell outlives the outer one unless its group is killed
        let mut spec = sh(&format!("sh -c 'sleep 1; touch {}'; true", marker.display()));
        spec.timeout = Some(Duration::from_millis(200));

        let result = ProcessExecutor::new().execute(&spec).await.unwrap();
        assert!(matches!(result, ExecutionResult::TimeLimitExceeded { .. }));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "grandchild kept running after the timeout");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let spec = CommandSpec {
            program: "seedbench-definitely-not-a-program".to_string(),
            args: vec![],
            current_dir: std::env::temp_dir(),
            envs: vec![],
            timeout: None,
        };
        assert!(ProcessExecutor::new().execute(&spec).await.is_err());
    }
}
