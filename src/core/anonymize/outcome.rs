//! Run results and run errors

use super::state::Phase;
use crate::domain::{DatabaseError, GeneratorError, SqlValue};
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Failure of a single table rule
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    /// A column's generator could not be resolved
    #[error("column '{column}': {source}")]
    Generator {
        /// Column whose rule failed
        column: String,
        /// Underlying generator error
        source: GeneratorError,
    },

    /// A non-empty batch matched no rows
    #[error(
        "batch of {expected} rows in '{table}' matched no rows (keys {first_key}..={last_key})"
    )]
    BatchWriteAnomaly {
        /// Table name
        table: String,
        /// Rows in the batch
        expected: usize,
        /// First key of the batch
        first_key: SqlValue,
        /// Last key of the batch
        last_key: SqlValue,
    },

    /// Count, page or write round-trip failed
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl TableError {
    /// Column the failure is attributed to, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            TableError::Generator { column, .. } => Some(column),
            _ => None,
        }
    }
}

/// Category of a run failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    /// The connection could not be opened
    ConnectionAcquisitionFailure,
    /// A before query failed
    PreHookFailure,
    /// A table rule failed
    TableRuleFailure,
    /// An after query failed
    PostHookFailure,
    /// A phase panicked
    Fault,
}

impl fmt::Display for RunErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunErrorKind::ConnectionAcquisitionFailure => "ConnectionAcquisitionFailure",
            RunErrorKind::PreHookFailure => "PreHookFailure",
            RunErrorKind::TableRuleFailure => "TableRuleFailure",
            RunErrorKind::PostHookFailure => "PostHookFailure",
            RunErrorKind::Fault => "Fault",
        };
        f.write_str(name)
    }
}

/// The error that ended a run
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RunError {
    /// The connection could not be opened; no phase ran
    #[error("Could not acquire a database connection: {0}")]
    ConnectionAcquisition(DatabaseError),

    /// A before query failed; no table was processed
    #[error("Before query #{} failed: {source} [{statement}]", .index + 1)]
    PreHook {
        /// Zero-based position in `beforeQueries`
        index: usize,
        /// Statement text
        statement: String,
        /// Database error
        source: DatabaseError,
    },

    /// A table rule failed; later tables and after queries were skipped
    #[error("Table rule '{table}' (tables[{index}]) failed: {source}")]
    TableRule {
        /// Table name
        table: String,
        /// Zero-based position in `tables`
        index: usize,
        /// Table failure
        source: TableError,
    },

    /// An after query failed
    #[error("After query #{} failed: {source} [{statement}]", .index + 1)]
    PostHook {
        /// Zero-based position in `afterQueries`
        index: usize,
        /// Statement text
        statement: String,
        /// Database error
        source: DatabaseError,
    },

    /// A phase panicked
    #[error("Unexpected fault during {phase}: {message}")]
    Fault {
        /// Phase that was running
        phase: Phase,
        /// Panic message
        message: String,
    },
}

impl RunError {
    /// Failure category
    pub fn kind(&self) -> RunErrorKind {
        match self {
            RunError::ConnectionAcquisition(_) => RunErrorKind::ConnectionAcquisitionFailure,
            RunError::PreHook { .. } => RunErrorKind::PreHookFailure,
            RunError::TableRule { .. } => RunErrorKind::TableRuleFailure,
            RunError::PostHook { .. } => RunErrorKind::PostHookFailure,
            RunError::Fault { .. } => RunErrorKind::Fault,
        }
    }

    /// Phase the failure happened in
    pub fn phase(&self) -> Phase {
        match self {
            RunError::ConnectionAcquisition(_) => Phase::Idle,
            RunError::PreHook { .. } => Phase::RunningBefore,
            RunError::TableRule { .. } => Phase::RunningTables,
            RunError::PostHook { .. } => Phase::RunningAfter,
            RunError::Fault { phase, .. } => *phase,
        }
    }

    /// Table the failure is attributed to, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            RunError::TableRule { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Column the failure is attributed to, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            RunError::TableRule { source, .. } => source.column(),
            _ => None,
        }
    }
}

/// Result of processing one table rule
#[derive(Debug, Clone, PartialEq)]
pub struct TableResult {
    /// Table name
    pub table: String,
    /// Rows counted before paging
    pub rows_counted: u64,
    /// Rows rewritten
    pub rows_updated: u64,
    /// Batches executed
    pub batches: u64,
    /// Wall time
    pub duration: Duration,
    /// True when the rule had no columns and nothing was queried
    pub skipped: bool,
}

impl TableResult {
    /// Result of a table rule with no columns
    pub fn skipped(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows_counted: 0,
            rows_updated: 0,
            batches: 0,
            duration: Duration::ZERO,
            skipped: true,
        }
    }
}

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Identifier used in log lines
    pub run_id: Uuid,
    /// Terminal phase: `Done` or `Failed`
    pub phase: Phase,
    /// Rows updated across all tables
    pub rows_updated: u64,
    /// Batches executed across all tables
    pub batches_executed: u64,
    /// Completed tables, in order
    pub tables: Vec<TableResult>,
    /// Before queries that completed
    pub before_queries_executed: usize,
    /// After queries that completed
    pub after_queries_executed: usize,
    /// Error that ended the run
    pub error: Option<RunError>,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// Wall time
    pub duration: Duration,
}

impl RunResult {
    /// Whether the run reached [`Phase::Done`]
    pub fn is_success(&self) -> bool {
        self.phase == Phase::Done && self.error.is_none()
    }

    /// Process exit code for this outcome
    ///
    /// - 0 - Done
    /// - 1 - A phase failed
    /// - 4 - The connection could not be acquired
    pub fn exit_code(&self) -> i32 {
        match &self.error {
            None => 0,
            Some(RunError::ConnectionAcquisition(_)) => 4,
            Some(_) => 1,
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        let tables_completed = self.tables.len();
        match &self.error {
            None => tracing::info!(
                run_id = %self.run_id,
                tables = tables_completed,
                rows_updated = self.rows_updated,
                batches = self.batches_executed,
                before_queries = self.before_queries_executed,
                after_queries = self.after_queries_executed,
                duration_secs = self.duration.as_secs_f64(),
                "Anonymization completed"
            ),
            Some(error) => tracing::error!(
                run_id = %self.run_id,
                kind = %error.kind(),
                phase = %error.phase(),
                table = error.table().unwrap_or("-"),
                column = error.column().unwrap_or("-"),
                tables_completed,
                rows_updated = self.rows_updated,
                batches = self.batches_executed,
                duration_secs = self.duration.as_secs_f64(),
                error = %error,
                "Anonymization failed"
            ),
        }

        for table in &self.tables {
            tracing::debug!(
                run_id = %self.run_id,
                table = %table.table,
                rows_counted = table.rows_counted,
                rows_updated = table.rows_updated,
                batches = table.batches,
                skipped = table.skipped,
                duration_secs = table.duration.as_secs_f64(),
                "Table summary"
            );
        }
    }
}
