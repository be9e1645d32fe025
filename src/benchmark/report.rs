//! Report rendering and output

use std::fmt::Write as _;
use std::path::Path;

use chrono::SecondsFormat;
use seedbench_common::{AppError, AppResult, BenchmarkReport};
use tokio::io::AsyncWriteExt;

use crate::utils::format_seconds;

use super::runner::PlannedRun;

/// Output format of the rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Renders benchmark reports. Output depends only on the report.
pub struct Reporter;

impl Reporter {
    /// Render a report in the requested format
    pub fn render(report: &BenchmarkReport, format: ReportFormat) -> AppResult<String> {
        match format {
            ReportFormat::Text => Ok(Self::render_text(report)),
            ReportFormat::Json => Self::render_json(report),
        }
    }

    /// Plain-text rendering listing every seed, both medians and the cost
    pub fn render_text(report: &BenchmarkReport) -> String {
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "Benchmark report");
        let _ = writeln!(out, "================");
        let _ = writeln!(
            out,
            "Generated:  {}",
            report.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let _ = writeln!(out, "Submission: {}", report.submission_dir.display());
        let _ = writeln!(out, "Benchmark:  {}", report.benchmark_dir.display());
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<6}{:<20}{:>12}", "Seed", "Quality", "Time (s)");
        for run in &report.runs {
            let _ = writeln!(
                out,
                "{:<6}{:<20}{:>12.3}",
                run.seed.value(),
                run.quality_value,
                run.elapsed_seconds
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Median quality: {}", report.median_quality);
        let _ = writeln!(
            out,
            "Median time:    {:.3} s ({})",
            report.median_time,
            format_seconds(report.median_time)
        );
        let _ = writeln!(out, "Cloud cost:     {}", report.cloud_cost);

        out
    }

    /// JSON rendering of the full report
    pub fn render_json(report: &BenchmarkReport) -> AppResult<String> {
        let mut json = serde_json::to_string_pretty(report)
            .map_err(|e| AppError::Serialization(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    /// Dry-run listing of the commands each seed would run
    pub fn render_plan(plan: &[PlannedRun]) -> String {
        let mut out = String::new();
        for run in plan {
            let _ = writeln!(out, "seed {}", run.seed);
            let _ = writeln!(out, "  submission: {}", run.submission_file.display());
            let _ = writeln!(
                out,
                "  evaluator:  (cd {} && {})",
                run.evaluator.current_dir.display(),
                run.evaluator.display()
            );
            let _ = writeln!(
                out,
                "  trainer:    (cd {} && {})",
                run.trainer.current_dir.display(),
                run.trainer.display()
            );
        }
        out
    }
}

/// Write rendered output to a file, or stdout when no path is given
pub async fn write_output(rendered: &str, output: Option<&Path>) -> AppResult<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, rendered).await?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
