// Anonymizer - rule-driven database anonymization tool
// Copyright (c) 2025 Anonymizer Contributors
// Licensed under the MIT License

use anonymizer::cli::{Cli, Commands};
use anonymizer::config::LoggingConfig;
use anonymizer::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = match &cli.log_dir {
        Some(dir) => LoggingConfig::with_file(dir.clone()),
        None => LoggingConfig::console(),
    };
    let log_guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Anonymizer - rule-driven database anonymization"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors
    drop(log_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config).await,
        Commands::Validate(args) => args.execute(&cli.config).await,
        Commands::Generators(args) => args.execute().await,
        Commands::Init(args) => args.execute().await,
    }
}
