//! Configuration management for the anonymizer.
//!
//! Two kinds of configuration feed a run:
//!
//! - The **rule document** ([`RuleDocument`]): hook queries and table rules,
//!   loaded from TOML, JSON or YAML by [`load_rules`].
//! - The **run configuration** ([`RunConfig`]): database settings, locale,
//!   seed. Built once from CLI flags or environment variables.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use anonymizer::config::{load_rules, RunConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = load_rules("anonymizer.toml")?;
//! let config = RunConfig::from_env()?;
//!
//! println!("{} tables against {}", rules.tables.len(), config.database.display_safe());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Rule Document
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
//!
//! [[tables.columns]]
//! column = "first_name"
//! generator = "firstName"
//! generatorArgs = { locale = "fr_FR" }
//! ```
//!
//! # Environment Variables
//!
//! Use `${VAR_NAME}` in a rule document to substitute a value at load time:
//!
//! ```toml
//! beforeQueries = ["USE ${ANONYMIZER_LOCAL_DATABASE}"]
//! ```

pub mod loader;
pub mod rules;
pub mod secret;
pub mod settings;

pub use loader::{load_rules, RuleDocumentSource, RuleFormat};
pub use rules::{ColumnRule, RuleDocument, TableRule, DEFAULT_BATCH_SIZE, MAX_BOUND_PARAMETERS};
pub use secret::{secret_string, SecretString, SecretValue};
pub use settings::{DatabaseSettings, LoggingConfig, RunConfig};
