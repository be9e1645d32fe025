//! Benchmark execution engine
//!
//! A benchmark run is a single linear pass over the five seeds:
//!
//! 1. **Run driver** (`runner.rs`): per seed, runs the evaluator on
//!    `submission_seed_<seed>.csv` and the trainer under a wallclock timer.
//! 2. **Aggregator** (`metrics.rs`): medians of quality and time.
//! 3. **Reporter** (`report.rs`): text or JSON rendering.
//!
//! Subprocesses go through the `CommandExecutor` trait in `executor.rs`.

pub mod executor;
pub mod metrics;
pub mod parse;
pub mod report;
pub mod runner;

pub use executor::{CommandExecutor, CommandSpec, ExecutionResult, ProcessExecutor};
pub use metrics::{median_of_five, MetricsCollector, RunSummary};
pub use report::{ReportFormat, Reporter};
pub use runner::RunDriver;
