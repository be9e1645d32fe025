//! Run driver - executes the evaluator and timed trainer for every seed
//!
//! Seeds run strictly one after another: the trainer's wallclock time is
//! itself a measurement, and concurrent trials would contend for the same
//! machine.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use seedbench_common::{AppError, AppResult, CommandKind, RunResult, Seed};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::{CommandConfig, TimingMode};
use crate::constants::{
    SUBMISSION_FILE_EXTENSION, SUBMISSION_FILE_PREFIX, TIME_UTILITY_PORTABLE_FLAG,
    TIME_UTILITY_PROGRAM,
};
use crate::utils::{format_duration, format_seconds};

use super::executor::{CommandExecutor, CommandSpec, ExecutionResult};
use super::metrics::{MetricsCollector, RunSummary};
use super::parse::{parse_quality_metric, parse_time_report};

/// Commands that would run for one seed
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub seed: Seed,
    pub submission_file: PathBuf,
    pub evaluator: CommandSpec,
    pub trainer: CommandSpec,
}

/// Captured output of a successful command
struct CommandOutput {
    stdout: String,
    stderr: String,
    elapsed: Duration,
}

/// Drives the five-seed benchmark loop
pub struct RunDriver<E> {
    executor: E,
    commands: CommandConfig,
}

impl<E: CommandExecutor> RunDriver<E> {
    /// Create a new run driver
    pub fn new(executor: E, commands: CommandConfig) -> Self {
        Self { executor, commands }
    }

    /// Submission file for a seed: `<dir>/submission_seed_<seed>.csv`
    pub fn submission_file(submission_dir: &Path, seed: Seed) -> PathBuf {
        submission_dir.join(format!(
            "{}{}.{}",
            SUBMISSION_FILE_PREFIX, seed, SUBMISSION_FILE_EXTENSION
        ))
    }

    /// Evaluator invocation for a seed, run from the benchmark directory
    pub fn evaluator_command(
        &self,
        submission_dir: &Path,
        benchmark_dir: &Path,
        seed: Seed,
    ) -> CommandSpec {
        let evaluator = &self.commands.evaluator;
        let mut args: Vec<OsString> = evaluator.args.iter().map(OsString::from).collect();
        args.push(Self::submission_file(submission_dir, seed).into_os_string());

        CommandSpec {
            program: evaluator.program.clone(),
            args,
            current_dir: benchmark_dir.to_path_buf(),
            envs: self.seed_env(seed),
            timeout: self.commands.timeout,
        }
    }

    /// Trainer invocation for a seed, run from the submission directory
    pub fn trainer_command(&self, submission_dir: &Path, seed: Seed) -> CommandSpec {
        let trainer = &self.commands.trainer;

        let (program, args): (String, Vec<OsString>) = match self.commands.timing {
            TimingMode::Internal => (
                trainer.program.clone(),
                trainer.args.iter().map(OsString::from).collect(),
            ),
            TimingMode::TimeUtility => {
                let mut args = vec![
                    OsString::from(TIME_UTILITY_PORTABLE_FLAG),
                    OsString::from(&trainer.program),
                ];
                args.extend(trainer.args.iter().map(OsString::from));
                (TIME_UTILITY_PROGRAM.to_string(), args)
            }
        };

        CommandSpec {
            program,
            args,
            current_dir: submission_dir.to_path_buf(),
            envs: self.seed_env(seed),
            timeout: self.commands.timeout,
        }
    }

    /// Every seed's commands, without running anything
    pub fn plan(&self, submission_dir: &Path, benchmark_dir: &Path) -> Vec<PlannedRun> {
        Seed::ALL
            .iter()
            .map(|&seed| PlannedRun {
                seed,
                submission_file: Self::submission_file(submission_dir, seed),
                evaluator: self.evaluator_command(submission_dir, benchmark_dir, seed),
                trainer: self.trainer_command(submission_dir, seed),
            })
            .collect()
    }

    /// Run all five seeds in order and aggregate them.
    ///
    /// Stops at the first failing seed; no later seed is started and no
    /// partial summary is produced.
    pub async fn run_all(&self, submission_dir: &Path, benchmark_dir: &Path) -> AppResult<RunSummary> {
        let mut collector = MetricsCollector::new();

        for seed in Seed::ALL {
            let run = self.run_seed(submission_dir, benchmark_dir, seed).await?;
            collector.add_run(run);
        }

        collector.calculate_results()
    }

    /// Run the evaluator and the timed trainer for one seed
    pub async fn run_seed(
        &self,
        submission_dir: &Path,
        benchmark_dir: &Path,
        seed: Seed,
    ) -> AppResult<RunResult> {
        info!(seed = %seed, "Starting trial");

        let submission_file = Self::submission_file(submission_dir, seed);
        check_submission_file(&submission_file, seed).await?;

        let spec = self.evaluator_command(submission_dir, benchmark_dir, seed);
        let output = self.run_command(seed, CommandKind::Evaluator, &spec).await?;
        let quality_value = parse_quality_metric(&output.stdout).ok_or_else(|| {
            AppError::command_failure(
                seed,
                CommandKind::Evaluator,
                format!(
                    "`{}` printed no parseable quality metric (stdout: {:?})",
                    spec.display(),
                    output.stdout.trim()
                ),
            )
        })?;
        debug!(seed = %seed, quality = quality_value, "Evaluator finished");

        let spec = self.trainer_command(submission_dir, seed);
        let output = self.run_command(seed, CommandKind::Trainer, &spec).await?;
        let elapsed_seconds = match self.commands.timing {
            TimingMode::Internal => output.elapsed.as_secs_f64(),
            TimingMode::TimeUtility => parse_time_report(&output.stderr).ok_or_else(|| {
                AppError::command_failure(
                    seed,
                    CommandKind::Trainer,
                    format!("`{}` reported no `real` elapsed time on stderr", spec.display()),
                )
            })?,
        };

        info!(
            seed = %seed,
            quality = quality_value,
            elapsed = %format_seconds(elapsed_seconds),
            "Trial finished"
        );

        Ok(RunResult {
            seed,
            quality_value,
            elapsed_seconds,
        })
    }

    async fn run_command(
        &self,
        seed: Seed,
        kind: CommandKind,
        spec: &CommandSpec,
    ) -> AppResult<CommandOutput> {
        debug!(seed = %seed, command = %kind, line = %spec.display(), "Running command");

        let result = self.executor.execute(spec).await.map_err(|e| {
            AppError::command_failure(seed, kind, format!("failed to start `{}`: {}", spec.display(), e))
        })?;

        match result {
            ExecutionResult::Success {
                stdout,
                stderr,
                elapsed,
            } => Ok(CommandOutput {
                stdout,
                stderr,
                elapsed,
            }),
            ExecutionResult::TimeLimitExceeded { limit } => {
                warn!(seed = %seed, command = %kind, "Command timed out");
                Err(AppError::command_failure(
                    seed,
                    kind,
                    format!("`{}` timed out after {}", spec.display(), format_duration(limit)),
                ))
            }
            ExecutionResult::RuntimeError {
                exit_code, message, ..
            } => {
                warn!(seed = %seed, command = %kind, exit_code, "Command failed");
                Err(AppError::command_failure(
                    seed,
                    kind,
                    format!("`{}` exited with code {}: {}", spec.display(), exit_code, message),
                ))
            }
        }
    }

    fn seed_env(&self, seed: Seed) -> Vec<(String, String)> {
        vec![(self.commands.seed_env_var.clone(), seed.to_string())]
    }
}

/// The submission file must exist and be readable before the evaluator runs
async fn check_submission_file(path: &Path, seed: Seed) -> AppResult<()> {
    let unreadable = |detail: String| {
        AppError::command_failure(
            seed,
            CommandKind::Evaluator,
            format!("submission file {} {}", path.display(), detail),
        )
    };

    let file = fs::File::open(path)
        .await
        .map_err(|e| unreadable(format!("cannot be opened: {}", e)))?;
    let meta = file
        .metadata()
        .await
        .map_err(|e| unreadable(format!("cannot be inspected: {}", e)))?;

    if !meta.is_file() {
        return Err(unreadable("is not a regular file".to_string()));
    }
    Ok(())
}

/// Resolve a directory argument to an absolute path, failing if it is missing
pub async fn resolve_dir(path: &Path, label: &str) -> AppResult<PathBuf> {
    let resolved = fs::canonicalize(path).await.map_err(|e| {
        AppError::Validation(format!("{} {} is not accessible: {}", label, path.display(), e))
    })?;

    if !fs::metadata(&resolved).await?.is_dir() {
        return Err(AppError::Validation(format!(
            "{} {} is not a directory",
            label,
            path.display()
        )));
    }
    Ok(resolved)
}
