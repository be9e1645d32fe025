//! Common types used across SeedBench components.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of repeated trials in a benchmark run
pub const SEED_COUNT: usize = 5;

/// Identifies one repeated trial. Always in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seed(u8);

impl Seed {
    /// Every seed, in ascending order
    pub const ALL: [Seed; SEED_COUNT] = [Seed(1), Seed(2), Seed(3), Seed(4), Seed(5)];

    /// Numeric value of the seed
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Seed {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=SEED_COUNT as u8).contains(&value) {
            Ok(Seed(value))
        } else {
            Err(AppError::Validation(format!(
                "seed must be between 1 and {}, got {}",
                SEED_COUNT, value
            )))
        }
    }
}

impl From<Seed> for u8 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which external command a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Scores a submission file and prints the quality metric
    Evaluator,
    /// Trains and scores the model under the wallclock timer
    Trainer,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Evaluator => write!(f, "evaluator"),
            CommandKind::Trainer => write!(f, "trainer"),
        }
    }
}

/// Outcome of a single seed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Seed the trial ran with
    pub seed: Seed,
    /// Metric printed by the evaluator
    pub quality_value: f64,
    /// Wallclock time of the trainer in seconds
    pub elapsed_seconds: f64,
}

/// Cloud cost figure entered by the operator from public, non-spot pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudCost {
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CloudCost {
    /// Build a cost entry, rejecting negative or non-finite amounts
    pub fn new(
        amount: f64,
        currency: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, AppError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::Validation(format!(
                "cloud cost must be a non-negative number, got {}",
                amount
            )));
        }

        let currency = currency.into();
        if currency.trim().is_empty() {
            return Err(AppError::Validation("currency must not be empty".to_string()));
        }

        Ok(Self {
            amount,
            currency,
            description: description.filter(|d| !d.trim().is_empty()),
        })
    }
}

impl std::fmt::Display for CloudCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)?;
        if let Some(description) = &self.description {
            write!(f, " ({})", description)?;
        }
        Ok(())
    }
}

/// Final report over all five seeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub submission_dir: PathBuf,
    pub benchmark_dir: PathBuf,
    pub generated_at: DateTime<Utc>,
    /// One entry per seed, ascending
    pub runs: Vec<RunResult>,
    pub median_quality: f64,
    pub median_time: f64,
    pub cloud_cost: CloudCost,
}
