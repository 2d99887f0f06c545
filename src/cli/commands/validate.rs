//! Validate command implementation
//!
//! This module implements the `validate` command: the rule document is
//! loaded and every column's generator is resolved, without connecting to
//! the database.

use crate::config::settings::ENV_LOCALE;
use crate::config::{load_rules, RuleDocument};
use crate::core::generator::{Locale, ValueGenerator};
use clap::Args;
use std::str::FromStr;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Locale used to resolve generators without a `locale` argument
    #[arg(long, env = ENV_LOCALE, default_value = "en")]
    pub locale: String,
}

impl ValidateArgs {
    /// Execute the validate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating rule document");

        println!("🔍 Validating rule document: {config_path}");
        println!();

        let locale = match Locale::from_str(&self.locale) {
            Ok(locale) => locale,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let rules = match load_rules(config_path) {
            Ok(rules) => {
                println!("✅ Rule document loaded successfully");
                rules
            }
            Err(e) => {
                println!("❌ Failed to load rule document");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let problems = generator_problems(&rules, locale);
        if !problems.is_empty() {
            println!("❌ Generator resolution failed");
            for problem in &problems {
                println!("   {problem}");
            }
            println!();
            return Ok(2);
        }

        println!("✅ All generators resolved");
        println!();
        println!("Rule Summary:");
        println!("  Before queries: {}", rules.before_queries.len());
        println!("  Tables: {}", rules.tables.len());
        for table in &rules.tables {
            let filter = table.filter.as_deref().unwrap_or("-");
            println!(
                "    - {} (key {}, batch size {}, where {})",
                table.table_name, table.primary_key, table.batch_size, filter
            );
            for column in &table.columns {
                println!("        {} <- {}", column.column, column.generator);
            }
        }
        println!("  Columns: {}", rules.column_count());
        println!("  After queries: {}", rules.after_queries.len());
        println!();
        Ok(0)
    }
}

/// Resolves every column rule and describes each failure
pub fn generator_problems(rules: &RuleDocument, locale: Locale) -> Vec<String> {
    let generator = ValueGenerator::new(locale, None);
    rules
        .tables
        .iter()
        .flat_map(|table| {
            let generator = &generator;
            table.columns.iter().filter_map(move |column| {
                generator
                    .resolve(column)
                    .err()
                    .map(|e| format!("{}.{}: {e}", table.table_name, column.column))
            })
        })
        .collect()
}
