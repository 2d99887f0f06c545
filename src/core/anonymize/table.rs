//! Table rule processor
//!
//! Processes one table rule:
//!
//! 1. Resolves every column's generator (nothing is written if one fails)
//! 2. Counts the row universe to size the progress display
//! 3. Pages through primary keys in ascending order, strictly after the last
//!    committed key
//! 4. Generates values for each page and hands it to the [`BatchWriter`]
//!
//! Rows inserted behind the cursor during a run are never revisited. A short
//! page ends the table. A failed batch ends the table; earlier batches stay
//! committed.

use super::outcome::{TableError, TableResult};
use super::state::RunState;
use super::writer::BatchWriter;
use crate::adapters::database::{BatchRow, Connection, CountQuery, KeyPageQuery};
use crate::config::TableRule;
use crate::core::generator::{ResolvedColumn, ValueGenerator};
use crate::core::progress::ProgressReporter;
use crate::domain::{DatabaseError, SqlValue};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Instant;

/// Number of batches needed for `rows` rows
pub fn expected_batches(rows: u64, batch_size: usize) -> u64 {
    let batch_size = batch_size.max(1) as u64;
    rows.div_ceil(batch_size)
}

/// Processes one table rule to completion
///
/// # Errors
///
/// Returns a [`TableError`] on the first generator, database or batch
/// failure.
pub async fn process_table(
    rule: &TableRule,
    conn: &mut dyn Connection,
    generator: &mut ValueGenerator,
    progress: &mut ProgressReporter,
    state: &mut RunState,
) -> Result<TableResult, TableError> {
    if rule.columns.is_empty() {
        tracing::info!(table = %rule.table_name, "No column rules; skipping table");
        return Ok(TableResult::skipped(&rule.table_name));
    }

    let columns = generator
        .resolve_all(&rule.columns)
        .map_err(|(column, source)| TableError::Generator { column, source })?;

    let started = Instant::now();
    let rows_counted = conn
        .count_rows(&CountQuery::new(&rule.table_name, rule.filter.clone()))
        .await?;
    let total_batches = expected_batches(rows_counted, rule.batch_size);

    crate::log_table_start!(&rule.table_name, rows_counted, total_batches);

    progress.start(total_batches);
    let paged = page_through(rule, &columns, conn, generator, progress, state).await;
    progress.finish();
    let (rows_updated, batches) = paged?;

    let duration = started.elapsed();
    crate::log_table_complete!(&rule.table_name, rows_updated, batches, duration);

    Ok(TableResult {
        table: rule.table_name.clone(),
        rows_counted,
        rows_updated,
        batches,
        duration,
        skipped: false,
    })
}

async fn page_through(
    rule: &TableRule,
    columns: &[ResolvedColumn],
    conn: &mut dyn Connection,
    generator: &mut ValueGenerator,
    progress: &mut ProgressReporter,
    state: &mut RunState,
) -> Result<(u64, u64), TableError> {
    let writer = BatchWriter::new(
        &rule.table_name,
        &rule.primary_key,
        columns.iter().map(|c| c.column.clone()).collect(),
    );
    let mut rows_updated = 0u64;
    let mut batches = 0u64;

    loop {
        let page = KeyPageQuery {
            table: rule.table_name.clone(),
            primary_key: rule.primary_key.clone(),
            after: state.cursor.clone(),
            limit: rule.batch_size,
            filter: rule.filter.clone(),
        };
        let keys = conn.fetch_keys(&page).await?;
        if keys.is_empty() {
            break;
        }
        let short_page = keys.len() < rule.batch_size;
        ensure_advancing(state.cursor.as_ref(), &keys)?;

        let rows: Vec<BatchRow> = keys
            .into_iter()
            .map(|key| BatchRow {
                key,
                values: columns.iter().map(|c| generator.generate(c)).collect(),
            })
            .collect();

        let Some(outcome) = writer.write(conn, rows).await? else {
            break;
        };

        batches += 1;
        rows_updated += outcome.affected;
        state.record_batch(outcome.last_key, outcome.affected);
        progress.advance(1);
        crate::log_batch_processing!(&rule.table_name, batches, progress.total());

        if short_page {
            break;
        }
    }

    Ok((rows_updated, batches))
}

/// A page must start past the cursor and never repeat a key
///
/// Numeric keys must also ascend. Text keys are ordered by the column
/// collation on the server and are only checked for repeats.
fn ensure_advancing(cursor: Option<&SqlValue>, keys: &[SqlValue]) -> Result<(), DatabaseError> {
    let mut seen: HashSet<&str> = cursor.and_then(SqlValue::as_text).into_iter().collect();
    let mut previous = cursor;
    for key in keys {
        if let Some(text) = key.as_text() {
            if !seen.insert(text) {
                return Err(DatabaseError::QueryFailed(format!(
                    "primary key page repeats {key}"
                )));
            }
        } else if let Some(prev) = previous {
            if matches!(key.cursor_cmp(prev), Some(Ordering::Less | Ordering::Equal)) {
                return Err(DatabaseError::QueryFailed(format!(
                    "primary key page is not strictly ascending ({key} after {prev})"
                )));
            }
        }
        previous = Some(key);
    }
    Ok(())
}
