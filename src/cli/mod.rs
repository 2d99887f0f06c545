//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the anonymizer using clap.

pub mod commands;

use crate::config::settings::ENV_CONFIG;
use clap::{Parser, Subcommand};

/// Anonymizer - rule-driven MySQL anonymization
#[derive(Parser, Debug)]
#[command(name = "anonymizer")]
#[command(version, about, long_about = None)]
#[command(author = "Anonymizer Contributors")]
pub struct Cli {
    /// Path to the rule document (.toml, .json, .yaml)
    #[arg(short, long, default_value = "anonymizer.toml", env = ENV_CONFIG)]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ANONYMIZER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Also write JSON logs to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize the configured database
    Run(commands::run::RunArgs),

    /// Validate the rule document
    Validate(commands::validate::ValidateArgs),

    /// List available generators and locales
    Generators(commands::generators::GeneratorsArgs),

    /// Write a sample rule document
    Init(commands::init::InitArgs),
}
