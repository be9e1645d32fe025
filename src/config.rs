//! Application configuration management
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured) and may then be overridden from the command line.

use std::env;
use std::fmt;
use std::time::Duration;

use seedbench_common::AppError;

use crate::constants::{
    DEFAULT_EVALUATOR_COMMAND, DEFAULT_LOG_FILTER, DEFAULT_SEED_ENV_VAR, DEFAULT_TRAINER_COMMAND,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub commands: CommandConfig,
    pub logging: LoggingConfig,
}

/// External command configuration
#[derive(Debug, Clone)]
pub struct CommandConfig {
    /// Evaluator invoked with the submission file appended
    pub evaluator: CommandLine,
    /// Trainer run under the wallclock timer
    pub trainer: CommandLine,
    /// Hard limit per external command (None = unlimited)
    pub timeout: Option<Duration>,
    /// How the trainer's wallclock time is measured
    pub timing: TimingMode,
    /// Environment variable that carries the seed
    pub seed_env_var: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub rust_log: String,
}

/// Wallclock timing strategy for the trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TimingMode {
    /// Measure elapsed real time around the child process
    #[default]
    Internal,
    /// Wrap the trainer in `time -p` and read the `real` line from stderr
    TimeUtility,
}

impl std::str::FromStr for TimingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internal" => Ok(TimingMode::Internal),
            "time-utility" | "time_utility" | "time" => Ok(TimingMode::TimeUtility),
            _ => Err(ConfigError::InvalidValue("SEEDBENCH_TIMING".to_string())),
        }
    }
}

/// A program plus its leading arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split a whitespace-separated command line. Quoting is not supported;
    /// wrap anything more involved in a script.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            commands: CommandConfig::from_lookup(&lookup)?,
            logging: LoggingConfig {
                rust_log: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            },
        })
    }
}

impl CommandConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let evaluator = lookup("SEEDBENCH_EVALUATOR")
            .unwrap_or_else(|| DEFAULT_EVALUATOR_COMMAND.to_string());
        let trainer =
            lookup("SEEDBENCH_TRAINER").unwrap_or_else(|| DEFAULT_TRAINER_COMMAND.to_string());

        let timeout = match lookup("SEEDBENCH_TIMEOUT_SECS") {
            Some(value) => parse_timeout(&value)
                .ok_or_else(|| ConfigError::InvalidValue("SEEDBENCH_TIMEOUT_SECS".to_string()))?,
            None => None,
        };

        let timing = match lookup("SEEDBENCH_TIMING") {
            Some(value) => value.parse()?,
            None => TimingMode::default(),
        };

        let seed_env_var =
            lookup("SEEDBENCH_SEED_ENV").unwrap_or_else(|| DEFAULT_SEED_ENV_VAR.to_string());
        if seed_env_var.is_empty() || seed_env_var.contains('=') {
            return Err(ConfigError::InvalidValue("SEEDBENCH_SEED_ENV".to_string()));
        }

        Ok(Self {
            evaluator: CommandLine::parse(&evaluator)
                .ok_or_else(|| ConfigError::InvalidValue("SEEDBENCH_EVALUATOR".to_string()))?,
            trainer: CommandLine::parse(&trainer)
                .ok_or_else(|| ConfigError::InvalidValue("SEEDBENCH_TRAINER".to_string()))?,
            timeout,
            timing,
            seed_env_var,
        })
    }
}

/// Parse a timeout in whole seconds; `0` disables the limit
pub fn parse_timeout(value: &str) -> Option<Option<Duration>> {
    let secs: u64 = value.trim().parse().ok()?;
    Some(timeout_from_secs(secs))
}

/// Hard limit for a whole number of seconds; `0` means none
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for setting: {0}")]
    InvalidValue(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.commands.evaluator.program, "python3");
        assert_eq!(config.commands.evaluator.args, vec!["evaluate.py"]);
        assert_eq!(config.commands.trainer.args, vec!["train_score.py"]);
        assert_eq!(config.commands.timeout, None);
        assert_eq!(config.commands.timing, TimingMode::Internal);
        assert_eq!(config.commands.seed_env_var, "BENCHMARK_SEED");
        assert_eq!(config.logging.rust_log, "seedbench=info");
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("SEEDBENCH_EVALUATOR", "Rscript eval.R --metric mape"),
            ("SEEDBENCH_TIMEOUT_SECS", "3600"),
            ("SEEDBENCH_TIMING", "time-utility"),
            ("SEEDBENCH_SEED_ENV", "SEED"),
        ]))
        .unwrap();

        assert_eq!(config.commands.evaluator.to_string(), "Rscript eval.R --metric mape");
        assert_eq!(config.commands.timeout, Some(Duration::from_secs(3600)));
        assert_eq!(config.commands.timing, TimingMode::TimeUtility);
        assert_eq!(config.commands.seed_env_var, "SEED");
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup_from(&[("SEEDBENCH_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SEEDBENCH_TIMING", "cpu")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SEEDBENCH_TRAINER", "   ")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SEEDBENCH_SEED_ENV", "A=B")])).is_err());
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        assert_eq!(parse_timeout("0"), Some(None));
        assert_eq!(parse_timeout("5"), Some(Some(Duration::from_secs(5))));
        assert_eq!(parse_timeout("-1"), None);
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(60), Some(Duration::from_secs(60)));
    }
}
