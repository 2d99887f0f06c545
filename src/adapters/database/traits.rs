//! Database abstraction traits
//!
//! The engine talks to the database only through these traits, so a run can
//! be driven against MySQL or against an in-memory double in tests.

use super::statement::{CountQuery, KeyPageQuery, UpdateBatch};
use crate::domain::{DatabaseError, SqlValue};
use async_trait::async_trait;

/// A single live database connection owned by one run
///
/// Every method is one round-trip. Implementations bound each round-trip
/// with their configured timeout. After [`close`](Connection::close) every
/// other method returns [`DatabaseError::Closed`].
#[async_trait]
pub trait Connection: Send {
    /// Executes a raw hook statement
    ///
    /// Returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or times out.
    async fn execute_hook(&mut self, sql: &str) -> Result<u64, DatabaseError>;

    /// Counts the rows of a table's row universe
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or times out.
    async fn count_rows(&mut self, query: &CountQuery) -> Result<u64, DatabaseError>;

    /// Fetches one ascending page of primary-key values
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails, times out or a key cannot be
    /// decoded.
    async fn fetch_keys(&mut self, query: &KeyPageQuery) -> Result<Vec<SqlValue>, DatabaseError>;

    /// Executes a multi-row update
    ///
    /// Returns the number of rows the statement matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or times out.
    async fn update_batch(&mut self, batch: &UpdateBatch) -> Result<u64, DatabaseError>;

    /// Closes the connection
    ///
    /// # Errors
    ///
    /// Returns an error if the server side could not be shut down cleanly.
    async fn close(&mut self) -> Result<(), DatabaseError>;

    /// Human readable target, safe to log (no credentials)
    fn describe(&self) -> String;
}

/// Opens connections
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Opens one connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established within the
    /// configured timeout.
    async fn connect(&self) -> Result<Box<dyn Connection>, DatabaseError>;
}
