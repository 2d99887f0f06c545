//! Run command implementation
//!
//! This module implements the `run` command, which executes the rule
//! document against the configured database.

use crate::adapters::database::create_provider;
use crate::config::settings::{
    ENV_DATABASE, ENV_HOSTNAME, ENV_LOCALE, ENV_PASSWORD, ENV_PORT, ENV_SEED, ENV_TIMEOUT,
    ENV_USERNAME,
};
use crate::config::{load_rules, RuleDocument, RunConfig};
use crate::core::anonymize::{Orchestrator, RunResult};
use clap::Args;
use std::io::{self, Write};

/// Arguments for the run command
///
/// Connection flags fall back to their environment variables. Values are
/// parsed and validated when the run configuration is built.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Do not draw progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Database host
    #[arg(long, env = ENV_HOSTNAME)]
    pub host: Option<String>,

    /// Database port
    #[arg(long, env = ENV_PORT)]
    pub port: Option<String>,

    /// Database name
    #[arg(long, env = ENV_DATABASE)]
    pub database: Option<String>,

    /// Database user
    #[arg(long, env = ENV_USERNAME)]
    pub username: Option<String>,

    /// Database password
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Per-operation timeout in seconds
    #[arg(long, env = ENV_TIMEOUT)]
    pub timeout: Option<String>,

    /// Default locale for generated values
    #[arg(long, env = ENV_LOCALE)]
    pub locale: Option<String>,

    /// Seed for reproducible values
    #[arg(long, env = ENV_SEED)]
    pub seed: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let rules = match load_rules(config_path) {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load rule document");
                eprintln!("Failed to load rule document: {e}");
                return Ok(2);
            }
        };

        let config = match self.run_config() {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Invalid run configuration");
                eprintln!("Invalid run configuration: {e}");
                return Ok(2);
            }
        };

        if !self.yes && !confirm(&rules, &config)? {
            println!("Run cancelled.");
            return Ok(0);
        }

        println!("🚀 Starting anonymization...");
        println!();

        let provider = create_provider(&config.database);
        let result = Orchestrator::new(&config)
            .connect_and_execute(&rules, provider.as_ref())
            .await;

        result.log_summary();
        print_summary(&result);

        Ok(result.exit_code())
    }

    /// Builds the run configuration from the parsed flags
    pub fn run_config(&self) -> crate::domain::Result<RunConfig> {
        let config = RunConfig::from_lookup(|name| self.lookup(name))?;
        Ok(config.with_progress(!self.no_progress))
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let value = match name {
            ENV_HOSTNAME => &self.host,
            ENV_PORT => &self.port,
            ENV_DATABASE => &self.database,
            ENV_USERNAME => &self.username,
            ENV_PASSWORD => &self.password,
            ENV_TIMEOUT => &self.timeout,
            ENV_LOCALE => &self.locale,
            ENV_SEED => &self.seed,
            _ => return None,
        };
        value.clone()
    }
}

fn confirm(rules: &RuleDocument, config: &RunConfig) -> anyhow::Result<bool> {
    println!("Run Configuration:");
    println!("  Target: {}", config.database.display_safe());
    println!("  Locale: {}", config.locale);
    println!("  Before queries: {}", rules.before_queries.len());
    println!("  Tables: {}", rules.tables.len());
    for table in &rules.tables {
        println!(
            "    - {} ({} columns, batch size {})",
            table.table_name,
            table.columns.len(),
            table.batch_size
        );
    }
    println!("  After queries: {}", rules.after_queries.len());
    println!();
    println!("⚠️  Column values in the target database will be overwritten.");
    print!("Proceed with anonymization? [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_summary(result: &RunResult) {
    println!();
    println!("📊 Anonymization Summary:");
    println!("  Run ID: {}", result.run_id);
    println!("  Status: {}", result.phase);
    println!(
        "  Before queries executed: {}",
        result.before_queries_executed
    );
    for table in &result.tables {
        if table.skipped {
            println!("  Table {}: skipped (no column rules)", table.table);
        } else {
            println!(
                "  Table {}: {} rows in {} batches ({:.2}s)",
                table.table,
                table.rows_updated,
                table.batches,
                table.duration.as_secs_f64()
            );
        }
    }
    println!("  After queries executed: {}", result.after_queries_executed);
    println!("  Rows updated: {}", result.rows_updated);
    println!("  Batches executed: {}", result.batches_executed);
    println!("  Duration: {:.2}s", result.duration.as_secs_f64());
    println!();

    match &result.error {
        None => println!("✅ Anonymization completed"),
        Some(error) => {
            println!("❌ Anonymization failed ({})", error.kind());
            println!("   Phase: {}", error.phase());
            if let Some(table) = error.table() {
                println!("   Table: {table}");
            }
            if let Some(column) = error.column() {
                println!("   Column: {column}");
            }
            println!("   Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::Locale;

    fn args() -> RunArgs {
        RunArgs {
            database: Some("shop".to_string()),
            username: Some("root".to_string()),
            password: Some("secret".to_string()),
            ..RunArgs::default()
        }
    }

    #[test]
    fn test_run_config_defaults() {
        let config = args().run_config().unwrap();
        assert_eq!(config.database.host, "127.0.0.1");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.timeout_secs, 60);
        assert_eq!(config.locale, Locale::En);
        assert!(config.seed.is_none());
        assert!(config.show_progress);
    }

    #[test]
    fn test_run_config_overrides() {
        let args = RunArgs {
            host: Some("db.internal".to_string()),
            port: Some("3307".to_string()),
            timeout: Some("5".to_string()),
            locale: Some("zh_CN".to_string()),
            seed: Some("9".to_string()),
            no_progress: true,
            ..args()
        };
        let config = args.run_config().unwrap();
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.timeout_secs, 5);
        assert_eq!(config.locale, Locale::ZhCn);
        assert_eq!(config.seed, Some(9));
        assert!(!config.show_progress);
    }

    #[test]
    fn test_run_config_missing_password() {
        let args = RunArgs {
            password: None,
            ..args()
        };
        assert!(args.run_config().is_err());
    }

    #[test]
    fn test_run_config_bad_port() {
        let args = RunArgs {
            port: Some("not-a-port".to_string()),
            ..args()
        };
        assert!(args.run_config().is_err());
    }

    #[tokio::test]
    async fn test_execute_missing_rule_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let code = args()
            .execute(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
