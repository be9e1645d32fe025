//! Command-line interface

use std::path::PathBuf;

use clap::Parser;
use seedbench_common::{AppError, AppResult, CloudCost};

use crate::app::RunSettings;
use crate::benchmark::ReportFormat;
use crate::config::{timeout_from_secs, CommandLine, Config, ConfigError, TimingMode};
use crate::constants::DEFAULT_CURRENCY;

/// Run a model benchmark submission across five fixed seeds and report
/// median quality, median wallclock time and cloud cost
#[derive(Debug, Parser)]
#[command(name = "seedbench", author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding submission_seed_<seed>.csv files and the trainer
    #[arg(long, value_name = "DIR")]
    pub submission_dir: PathBuf,

    /// Benchmark directory the evaluator runs from
    #[arg(long, value_name = "DIR")]
    pub benchmark_dir: PathBuf,

    /// Cloud cost of the measured setup from public, non-spot pricing
    #[arg(long, value_name = "AMOUNT", required_unless_present = "dry_run")]
    pub cloud_cost: Option<f64>,

    /// Currency of the cloud cost
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Free-text note on the cost, e.g. VM size and pricing page
    #[arg(long, value_name = "TEXT")]
    pub cost_description: Option<String>,

    /// Evaluator command line (overrides SEEDBENCH_EVALUATOR)
    #[arg(long, value_name = "COMMAND")]
    pub evaluator: Option<String>,

    /// Trainer command line (overrides SEEDBENCH_TRAINER)
    #[arg(long, value_name = "COMMAND")]
    pub trainer: Option<String>,

    /// How wallclock time is measured (overrides SEEDBENCH_TIMING)
    #[arg(long, value_enum)]
    pub timing: Option<TimingMode>,

    /// Hard limit per external command in seconds, 0 for none
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the commands for every seed without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Log filter, e.g. `debug` or `seedbench=trace` (overrides RUST_LOG)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded configuration
    pub fn into_settings(self, config: Config) -> AppResult<RunSettings> {
        let mut commands = config.commands;

        if let Some(line) = &self.evaluator {
            commands.evaluator = CommandLine::parse(line)
                .ok_or_else(|| ConfigError::InvalidValue("--evaluator".to_string()))?;
        }
        if let Some(line) = &self.trainer {
            commands.trainer = CommandLine::parse(line)
                .ok_or_else(|| ConfigError::InvalidValue("--trainer".to_string()))?;
        }
        if let Some(timing) = self.timing {
            commands.timing = timing;
        }
        if let Some(secs) = self.timeout_secs {
            commands.timeout = timeout_from_secs(secs);
        }

        let cloud_cost = match self.cloud_cost {
            Some(amount) => Some(CloudCost::new(amount, self.currency, self.cost_description)?),
            None if self.dry_run => None,
            None => {
                return Err(AppError::Validation(
                    "--cloud-cost is required to produce a report".to_string(),
                ));
            }
        };

        Ok(RunSettings {
            submission_dir: self.submission_dir,
            benchmark_dir: self.benchmark_dir,
            cloud_cost,
            format: self.format,
            output: self.output,
            dry_run: self.dry_run,
            commands,
        })
    }
}
