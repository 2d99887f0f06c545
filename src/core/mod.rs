//! Core business logic for the anonymizer.
//!
//! # Modules
//!
//! - [`anonymize`] - Run orchestration, table processing, batch writing
//! - [`generator`] - Synthetic value generation
//! - [`progress`] - Progress and countdown display
//!
//! # Run Workflow
//!
//! 1. **Before queries**: raw SQL hooks, in order
//! 2. **Tables**: for each table rule, resolve generators, count rows, page
//!    through primary keys and rewrite each page with one batched update
//! 3. **After queries**: raw SQL hooks, in order
//! 4. **Release**: the connection is closed exactly once
//! 5. **Report**: a [`RunResult`](anonymize::RunResult) with counts and the
//!    terminating error, if any
//!
//! # Example
//!
//! ```rust,no_run
//! use anonymizer::adapters::database::create_provider;
//! use anonymizer::config::{load_rules, RunConfig};
//! use anonymizer::core::anonymize::Orchestrator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = load_rules("anonymizer.toml")?;
//! let config = RunConfig::from_env()?;
//! let provider = create_provider(&config.database);
//!
//! let result = Orchestrator::new(&config)
//!     .connect_and_execute(&rules, provider.as_ref())
//!     .await;
//!
//! println!("Rows updated: {}", result.rows_updated);
//! std::process::exit(result.exit_code());
//! # }
//! ```

pub mod anonymize;
pub mod generator;
pub mod progress;
