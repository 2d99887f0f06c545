// Anonymizer - rule-driven database anonymization tool
// Copyright (c) 2025 Anonymizer Contributors
// Licensed under the MIT License

//! # Anonymizer - rule-driven MySQL anonymization
//!
//! Rewrites personal data in a MySQL database with synthetic values of the
//! same shape, driven by a declarative rule document.
//!
//! ## Overview
//!
//! A run has three phases over a single connection:
//! - **Before queries**: raw SQL executed in order (disable triggers, drop
//!   constraints, ...)
//! - **Table rules**: each table is paged through by primary key and every
//!   page is rewritten with one batched `UPDATE`
//! - **After queries**: raw SQL executed in order once every table is done
//!
//! The first failure ends the run. The connection is always closed.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Run orchestration, value generation, progress display
//! - [`adapters`] - Database access (statement rendering, MySQL client)
//! - [`domain`] - Errors and SQL values
//! - [`config`] - Rule documents and run configuration
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anonymizer::adapters::database::create_provider;
//! use anonymizer::config::{load_rules, RunConfig};
//! use anonymizer::core::anonymize::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rules = load_rules("anonymizer.toml")?;
//!     let config = RunConfig::from_env()?;
//!     let provider = create_provider(&config.database);
//!
//!     let result = Orchestrator::new(&config)
//!         .connect_and_execute(&rules, provider.as_ref())
//!         .await;
//!
//!     result.log_summary();
//!     println!("Updated {} rows", result.rows_updated);
//!     Ok(())
//! }
//! ```
//!
//! ## Rule Documents
//!
//! ```toml
//! beforeQueries = ["SET FOREIGN_KEY_CHECKS = 0"]
//! afterQueries = ["SET FOREIGN_KEY_CHECKS = 1"]
//!
//! [[tables]]
//! tableName = "users"
//! primaryKey = "id"
//! batchSize = 500
//!
//! [[tables.columns]]
//! column = "email"
//! generator = "email"
//! ```
//!
//! Run `anonymizer generators` for the list of generator names.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
