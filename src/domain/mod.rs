//! Domain types for the anonymizer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Error types** ([`AnonymizerError`], [`DatabaseError`], [`GeneratorError`])
//! - **Result type alias** ([`Result`])
//! - **SQL values** ([`SqlValue`]) used for primary-key cursors and generated data
//!
//! # Error Handling
//!
//! All fallible operations outside a run return [`Result<T, AnonymizerError>`]:
//!
//! ```rust,no_run
//! use anonymizer::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let rules = anonymizer::config::load_rules("anonymizer.toml")?;
//!     println!("{} table rules", rules.tables.len());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;
pub mod value;

pub use errors::{AnonymizerError, DatabaseError, GeneratorError};
pub use result::Result;
pub use value::SqlValue;
