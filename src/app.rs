//! Top-level benchmark workflow: resolve inputs, run every seed, report

use std::path::PathBuf;

use chrono::Utc;
use seedbench_common::{AppError, AppResult, BenchmarkReport, CloudCost};
use tracing::info;

use crate::benchmark::report::write_output;
use crate::benchmark::runner::resolve_dir;
use crate::benchmark::{CommandExecutor, ReportFormat, Reporter, RunDriver};
use crate::config::CommandConfig;
use crate::utils::format_seconds;

/// Everything a single invocation needs
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub submission_dir: PathBuf,
    pub benchmark_dir: PathBuf,
    /// Required unless `dry_run`
    pub cloud_cost: Option<CloudCost>,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub commands: CommandConfig,
}

/// Run the benchmark and write the report.
///
/// Returns the report, or `None` for a dry run.
pub async fn run<E: CommandExecutor>(
    settings: RunSettings,
    executor: E,
) -> AppResult<Option<BenchmarkReport>> {
    let submission_dir = resolve_dir(&settings.submission_dir, "submission directory").await?;
    let benchmark_dir = resolve_dir(&settings.benchmark_dir, "benchmark directory").await?;

    let driver = RunDriver::new(executor, settings.commands);

    if settings.dry_run {
        let plan = driver.plan(&submission_dir, &benchmark_dir);
        write_output(&Reporter::render_plan(&plan), settings.output.as_deref()).await?;
        return Ok(None);
    }

    let cloud_cost = settings.cloud_cost.ok_or_else(|| {
        AppError::Validation("a cloud cost is required to produce a report".to_string())
    })?;

    info!(
        submission_dir = %submission_dir.display(),
        benchmark_dir = %benchmark_dir.display(),
        "Starting benchmark run"
    );

    let summary = driver.run_all(&submission_dir, &benchmark_dir).await?;

    info!(
        median_quality = summary.median_quality,
        median_time = %format_seconds(summary.median_time),
        "All seeds completed"
    );

    let report = summary.into_report(submission_dir, benchmark_dir, cloud_cost, Utc::now());
    let rendered = Reporter::render(&report, settings.format)?;
    write_output(&rendered, settings.output.as_deref()).await?;

    Ok(Some(report))
}
