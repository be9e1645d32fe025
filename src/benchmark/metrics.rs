//! Metrics collection and aggregation

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use seedbench_common::{AppError, AppResult, BenchmarkReport, CloudCost, RunResult, Seed, SEED_COUNT};

/// Median of exactly five values: the third smallest. No averaging.
pub fn median_of_five(mut values: [f64; SEED_COUNT]) -> f64 {
    values.sort_by(f64::total_cmp);
    values[SEED_COUNT / 2]
}

/// Collects per-seed results as the run driver produces them
#[derive(Debug, Default)]
pub struct MetricsCollector {
    runs: Vec<RunResult>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Add a seed's result
    pub fn add_run(&mut self, run: RunResult) {
        self.runs.push(run);
    }

    /// Get number of runs
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Aggregate collected runs into medians
    pub fn calculate_results(&self) -> AppResult<RunSummary> {
        RunSummary::from_runs(&self.runs)
    }
}

/// Raw per-seed values plus their medians
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Ordered by seed ascending
    pub runs: Vec<RunResult>,
    pub median_quality: f64,
    pub median_time: f64,
}

impl RunSummary {
    /// Aggregate results for all five seeds.
    ///
    /// Fails with `InsufficientRuns` unless every seed has a result, and
    /// with a validation error if any seed appears twice.
    pub fn from_runs(runs: &[RunResult]) -> AppResult<Self> {
        let mut by_seed: BTreeMap<Seed, RunResult> = BTreeMap::new();
        for run in runs {
            if by_seed.insert(run.seed, *run).is_some() {
                return Err(AppError::Validation(format!(
                    "duplicate result for seed {}",
                    run.seed
                )));
            }
        }

        if by_seed.len() < SEED_COUNT {
            return Err(AppError::InsufficientRuns {
                expected: SEED_COUNT,
                actual: by_seed.len(),
            });
        }

        let runs: Vec<RunResult> = by_seed.into_values().collect();

        let mut qualities = [0.0; SEED_COUNT];
        let mut times = [0.0; SEED_COUNT];
        for (i, run) in runs.iter().enumerate() {
            qualities[i] = run.quality_value;
            times[i] = run.elapsed_seconds;
        }

        Ok(Self {
            median_quality: median_of_five(qualities),
            median_time: median_of_five(times),
            runs,
        })
    }

    /// Attach the run context and operator-supplied cost
    pub fn into_report(
        self,
        submission_dir: PathBuf,
        benchmark_dir: PathBuf,
        cloud_cost: CloudCost,
        generated_at: DateTime<Utc>,
    ) -> BenchmarkReport {
        BenchmarkReport {
            submission_dir,
            benchmark_dir,
            generated_at,
            runs: self.runs,
            median_quality: self.median_quality,
            median_time: self.median_time,
            cloud_cost,
        }
    }
}
