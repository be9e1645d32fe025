//! SeedBench - Model Benchmark Run Coordinator
//!
//! Runs an external benchmark submission once per fixed seed (1 to 5),
//! measuring the evaluator's quality metric and the trainer's wallclock
//! time, then reports all raw values, their medians and the operator's
//! cloud cost figure.
//!
//! # Architecture
//!
//! - **Benchmark**: run driver, aggregator and reporter
//! - **Config**: environment configuration with CLI overrides
//! - **App**: the end-to-end workflow used by the binary

pub mod app;
pub mod benchmark;
pub mod cli;
pub mod config;
pub mod constants;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use seedbench_common::{
    AppError, AppResult, BenchmarkReport, CloudCost, CommandKind, RunResult, Seed,
};
