//! Error types for SeedBench.

use thiserror::Error;

use crate::types::{CommandKind, Seed};

/// Main error type used across SeedBench components.
#[derive(Error, Debug)]
pub enum AppError {
    /// An evaluator or trainer invocation failed, timed out, or printed
    /// output that could not be parsed. A missing submission file for the
    /// seed is reported here too.
    #[error("{command} failed for seed {seed}: {reason}")]
    ExternalCommandFailure {
        seed: Seed,
        command: CommandKind,
        reason: String,
    },

    /// Aggregation was attempted without a result for every seed
    #[error("Insufficient runs: expected {expected}, got {actual}")]
    InsufficientRuns { expected: usize, actual: usize },

    /// Invalid input supplied by the operator
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid environment or command-line configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File I/O error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Shorthand for an external command failure
    pub fn command_failure(seed: Seed, command: CommandKind, reason: impl Into<String>) -> Self {
        AppError::ExternalCommandFailure {
            seed,
            command,
            reason: reason.into(),
        }
    }

    /// Returns the error code string for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ExternalCommandFailure { .. } => "EXTERNAL_COMMAND_FAILURE",
            AppError::InsufficientRuns { .. } => "INSUFFICIENT_RUNS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Io(_) => "FILE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) | AppError::Configuration(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
