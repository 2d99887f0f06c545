//! Domain error types
//!
//! This module defines the error hierarchy for the anonymizer. Errors are
//! domain-specific and don't expose driver or generator library types, so the
//! engine can be driven by any [`Connection`](crate::adapters::database::Connection)
//! implementation.

use thiserror::Error;

/// Main anonymizer error type
///
/// Used for everything outside a run: loading rule documents, building the
/// run configuration, initializing logging. Failures *inside* a run are
/// reported through [`RunError`](crate::core::anonymize::RunError) instead.
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rule document validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Value generator errors
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Database errors
///
/// Errors raised by a [`Connection`](crate::adapters::database::Connection)
/// or a [`ConnectionProvider`](crate::adapters::database::ConnectionProvider).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseError {
    /// Failed to establish the connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// A statement was rejected or failed while executing
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A round-trip exceeded the configured timeout
    #[error("Operation timed out after {seconds}s: {operation}")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// A value could not be decoded from a result row
    #[error("Failed to decode result: {0}")]
    Decode(String),

    /// The connection was already closed
    #[error("Connection is closed")]
    Closed,
}

/// Value generator errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// No generator is registered under this name
    #[error("Unknown generator '{0}'")]
    UnknownGenerator(String),

    /// The requested locale has no data set
    #[error("Unsupported locale '{0}'")]
    UnsupportedLocale(String),

    /// `generatorArgs` holds an unknown key or a value of the wrong shape
    #[error("Invalid arguments for generator '{generator}': {message}")]
    InvalidGeneratorArgs {
        /// Generator name
        generator: String,
        /// What was wrong
        message: String,
    },
}

impl GeneratorError {
    /// Shorthand for [`GeneratorError::InvalidGeneratorArgs`]
    pub fn invalid_args(generator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGeneratorArgs {
            generator: generator.into(),
            message: message.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymizerError {
    fn from(err: std::io::Error) -> Self {
        AnonymizerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AnonymizerError {
    fn from(err: serde_json::Error) -> Self {
        AnonymizerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymizerError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizerError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from yaml parse errors
impl From<serde_yaml::Error> for AnonymizerError {
    fn from(err: serde_yaml::Error) -> Self {
        AnonymizerError::Configuration(format!("YAML parse error: {err}"))
    }
}
