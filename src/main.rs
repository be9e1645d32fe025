//! SeedBench - Application Entry Point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seedbench::{
    app,
    benchmark::ProcessExecutor,
    cli::Cli,
    config::Config,
    constants::DEFAULT_LOG_FILTER,
    AppError,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration; tracing comes up either way so the error is logged
    let config = Config::from_env();
    let filter = match (&cli.log_level, &config) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.rust_log.clone(),
        (None, Err(_)) => DEFAULT_LOG_FILTER.to_string(),
    };
    init_tracing(&filter);

    let config = match config {
        Ok(config) => config,
        Err(e) => return Ok(fail(AppError::from(e), "Failed to load configuration")),
    };

    let settings = match cli.into_settings(config) {
        Ok(settings) => settings,
        Err(e) => return Ok(fail(e, "Invalid arguments")),
    };

    match app::run(settings, ProcessExecutor::new()).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => Ok(fail(e, "Benchmark run failed")),
    }
}

/// Tracing on stderr; stdout carries the report
fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(e: AppError, context: &str) -> ExitCode {
    tracing::error!(code = e.error_code(), "{}: {}", context, e);
    ExitCode::from(e.exit_code() as u8)
}
