//! MySQL connection
//!
//! Wraps a single `sqlx` connection. Every round-trip is bounded by the
//! configured timeout; affected-row counts follow sqlx's default
//! `CLIENT_FOUND_ROWS` flag, so an update reports the rows it *matched*.

use crate::adapters::database::statement::{CountQuery, KeyPageQuery, RenderedStatement, UpdateBatch};
use crate::adapters::database::traits::Connection;
use crate::domain::{DatabaseError, SqlValue};
use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Connection as _, MySql, Row};
use std::future::Future;
use std::time::Duration;

/// A live MySQL connection
pub struct MySqlClient {
    conn: Option<sqlx::MySqlConnection>,
    timeout: Duration,
    target: String,
}

impl MySqlClient {
    /// Wraps an established connection
    pub fn new(conn: sqlx::MySqlConnection, timeout: Duration, target: impl Into<String>) -> Self {
        Self {
            conn: Some(conn),
            timeout,
            target: target.into(),
        }
    }

    fn live(&mut self) -> Result<&mut sqlx::MySqlConnection, DatabaseError> {
        self.conn.as_mut().ok_or(DatabaseError::Closed)
    }
}

#[async_trait]
impl Connection for MySqlClient {
    async fn execute_hook(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        let timeout = self.timeout;
        let conn = self.live()?;
        tracing::debug!(sql = %sql, "Executing hook statement");

        let result = timed(timeout, "hook statement", sqlx::Executor::execute(conn, sql)).await?;
        Ok(result.rows_affected())
    }

    async fn count_rows(&mut self, query: &CountQuery) -> Result<u64, DatabaseError> {
        let timeout = self.timeout;
        let conn = self.live()?;
        let RenderedStatement { sql, .. } = query.to_sql();
        tracing::debug!(sql = %sql, "Counting rows");

        let count: i64 = timed(
            timeout,
            format!("count rows in {}", query.table),
            sqlx::query_scalar::<_, i64>(&sql).fetch_one(conn),
        )
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn fetch_keys(&mut self, query: &KeyPageQuery) -> Result<Vec<SqlValue>, DatabaseError> {
        let timeout = self.timeout;
        let conn = self.live()?;
        let rendered = query.to_sql();
        tracing::trace!(sql = %rendered.sql, "Fetching key page");

        let statement = bind_all(sqlx::query(&rendered.sql), &rendered.params);
        let rows = timed(
            timeout,
            format!("fetch keys from {}", query.table),
            statement.fetch_all(conn),
        )
        .await?;

        rows.iter().map(decode_key).collect()
    }

    async fn update_batch(&mut self, batch: &UpdateBatch) -> Result<u64, DatabaseError> {
        let timeout = self.timeout;
        let conn = self.live()?;
        let rendered = batch.to_sql();
        tracing::trace!(
            table = %batch.table,
            rows = batch.len(),
            params = rendered.params.len(),
            "Executing batch update"
        );

        let statement = bind_all(sqlx::query(&rendered.sql), &rendered.params);
        let result = timed(
            timeout,
            format!("update batch in {}", batch.table),
            statement.execute(conn),
        )
        .await?;
        Ok(result.rows_affected())
    }

    async fn close(&mut self) -> Result<(), DatabaseError> {
        let Some(conn) = self.conn.take() else {
            return Err(DatabaseError::Closed);
        };
        timed(self.timeout, "close connection", conn.close()).await
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// Runs a sqlx future under `timeout`, mapping both failure modes
async fn timed<T, F>(
    timeout: Duration,
    operation: impl Into<String>,
    future: F,
) -> Result<T, DatabaseError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result.map_err(|e| DatabaseError::QueryFailed(e.to_string())),
        Err(_) => Err(DatabaseError::Timeout {
            operation: operation.into(),
            seconds: timeout.as_secs(),
        }),
    }
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &[SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::UInt(u) => query.bind(*u),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
        };
    }
    query
}

/// Decodes the first column of a key page row
///
/// Signed integers first, then unsigned, then anything textual.
fn decode_key(row: &MySqlRow) -> Result<SqlValue, DatabaseError> {
    if let Ok(v) = row.try_get::<i64, _>(0) {
        return Ok(SqlValue::Int(v));
    }
    if let Ok(v) = row.try_get::<u64, _>(0) {
        return Ok(SqlValue::from(v));
    }
    if let Ok(v) = row.try_get::<String, _>(0) {
        return Ok(SqlValue::Text(v));
    }
    Err(DatabaseError::Decode(
        "primary key column has an unsupported type (expected integer or string)".to_string(),
    ))
}
