//! Batch writer
//!
//! The only component that issues data-modifying statements built by the
//! engine. Each batch becomes one parameterized `UPDATE ... CASE` statement,
//! so a batch is applied atomically or not at all.

use super::outcome::TableError;
use crate::adapters::database::{BatchRow, Connection, UpdateBatch};
use crate::domain::SqlValue;

/// Outcome of one written batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Rows sent
    pub rows: usize,
    /// Rows the statement matched
    pub affected: u64,
    /// Last key of the batch, the next page cursor
    pub last_key: SqlValue,
}

/// Writes batches for one table
#[derive(Debug, Clone)]
pub struct BatchWriter {
    table: String,
    primary_key: String,
    columns: Vec<String>,
}

impl BatchWriter {
    /// Creates a writer for `columns` of `table`
    pub fn new(
        table: impl Into<String>,
        primary_key: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            columns,
        }
    }

    /// Builds the statement for `rows` without executing it
    pub fn build(&self, rows: Vec<BatchRow>) -> UpdateBatch {
        UpdateBatch {
            table: self.table.clone(),
            primary_key: self.primary_key.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Writes one batch
    ///
    /// Matching fewer rows than were sent is tolerated and logged (rows can
    /// disappear between paging and writing). Matching none is an anomaly.
    ///
    /// # Errors
    ///
    /// - [`TableError::Database`] if the statement fails
    /// - [`TableError::BatchWriteAnomaly`] if a non-empty batch matched no rows
    pub async fn write(
        &self,
        conn: &mut dyn Connection,
        rows: Vec<BatchRow>,
    ) -> Result<Option<BatchOutcome>, TableError> {
        let batch = self.build(rows);
        let Some((first_key, last_key)) = batch.key_range() else {
            return Ok(None);
        };
        let (first_key, last_key) = (first_key.clone(), last_key.clone());

        let affected = conn.update_batch(&batch).await?;
        let expected = batch.len();

        if affected == 0 {
            return Err(TableError::BatchWriteAnomaly {
                table: self.table.clone(),
                expected,
                first_key,
                last_key,
            });
        }
        if affected < expected as u64 {
            tracing::warn!(
                table = %self.table,
                expected,
                affected,
                first_key = %first_key,
                last_key = %last_key,
                "Batch matched fewer rows than it addressed"
            );
        }

        Ok(Some(BatchOutcome {
            rows: expected,
            affected,
            last_key,
        }))
    }
}
