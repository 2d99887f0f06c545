//! External system integrations for the anonymizer.
//!
//! - [`database`] - Connection traits and the statements the engine issues
//! - [`mysql`] - MySQL implementation built on `sqlx`
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the database driver and
//! enable testing with in-memory implementations. The engine only ever sees a
//! `Box<dyn Connection>`.
//!
//! ```rust,no_run
//! use anonymizer::adapters::database::{create_provider, ConnectionProvider};
//! use anonymizer::config::RunConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::from_env()?;
//! let provider = create_provider(&config.database);
//! let mut connection = provider.connect().await?;
//! println!("connected to {}", connection.describe());
//! connection.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod mysql;
