//! Run orchestrator
//!
//! Drives one run over one connection:
//!
//! 1. **Before queries** in document order
//! 2. **Table rules** in document order
//! 3. **After queries** in document order, only if every table completed
//!
//! The first failure ends the run; later phases are skipped. Whatever
//! happens, including a panic inside a phase, the connection is closed
//! exactly once before the result is returned.

use super::outcome::{RunError, RunResult, TableResult};
use super::state::{Phase, RunState};
use super::table::process_table;
use crate::adapters::database::{Connection, ConnectionProvider};
use crate::config::{RuleDocument, RunConfig};
use crate::core::generator::ValueGenerator;
use crate::core::progress::{stderr_is_terminal, Countdown, ProgressReporter};
use crate::domain::DatabaseError;
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tally {
    tables: Vec<TableResult>,
    before_queries: usize,
    after_queries: usize,
}

/// Executes rule documents
pub struct Orchestrator {
    generator: ValueGenerator,
    render_progress: bool,
    hook_timeout_secs: u64,
}

impl Orchestrator {
    /// Creates an orchestrator for `config`
    ///
    /// Progress is drawn only when enabled in the config and stderr is a
    /// terminal.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            generator: ValueGenerator::new(config.locale, config.seed),
            render_progress: config.show_progress && stderr_is_terminal(),
            hook_timeout_secs: config.database.timeout_secs,
        }
    }

    /// Creates an orchestrator around an existing generator, without
    /// progress output
    pub fn with_generator(generator: ValueGenerator) -> Self {
        Self {
            generator,
            render_progress: false,
            hook_timeout_secs: crate::config::settings::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Opens a connection from `provider` and executes `rules` over it
    ///
    /// If the connection cannot be opened the run fails with
    /// [`RunError::ConnectionAcquisition`] and no phase is entered.
    pub async fn connect_and_execute(
        &mut self,
        rules: &RuleDocument,
        provider: &dyn ConnectionProvider,
    ) -> RunResult {
        match provider.connect().await {
            Ok(conn) => self.execute(rules, conn).await,
            Err(source) => {
                tracing::error!(error = %source, "Failed to acquire database connection");
                let mut state = RunState::new();
                state.transition(Phase::Failed);
                finish(
                    Uuid::new_v4(),
                    state,
                    Tally::default(),
                    Some(RunError::ConnectionAcquisition(source)),
                    Utc::now(),
                    Instant::now(),
                )
            }
        }
    }

    /// Executes `rules` over `conn`, taking ownership of the connection
    ///
    /// The connection is closed before this returns. A close failure is
    /// logged and does not change the result.
    pub async fn execute(&mut self, rules: &RuleDocument, mut conn: Box<dyn Connection>) -> RunResult {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut state = RunState::new();
        let mut tally = Tally::default();

        tracing::info!(
            run_id = %run_id,
            target_db = %conn.describe(),
            tables = rules.tables.len(),
            before_queries = rules.before_queries.len(),
            after_queries = rules.after_queries.len(),
            "Starting anonymization run"
        );

        let phases = AssertUnwindSafe(self.run_phases(rules, conn.as_mut(), &mut state, &mut tally))
            .catch_unwind()
            .await;

        let error = match phases {
            Ok(Ok(())) => None,
            Ok(Err(error)) => Some(error),
            Err(panic) => Some(RunError::Fault {
                phase: state.phase,
                message: panic_message(panic.as_ref()),
            }),
        };

        state.transition(if error.is_some() {
            Phase::Failed
        } else {
            Phase::Done
        });

        release(conn.as_mut()).await;

        finish(run_id, state, tally, error, started_at, clock)
    }

    async fn run_phases(
        &mut self,
        rules: &RuleDocument,
        conn: &mut dyn Connection,
        state: &mut RunState,
        tally: &mut Tally,
    ) -> Result<(), RunError> {
        state.transition(Phase::RunningBefore);
        for (index, statement) in rules.before_queries.iter().enumerate() {
            tracing::info!(index, statement = %statement, "Executing before query");
            self.run_hook(conn, statement)
                .await
                .map_err(|source| RunError::PreHook {
                    index,
                    statement: statement.clone(),
                    source,
                })?;
            tally.before_queries += 1;
        }

        state.transition(Phase::RunningTables);
        let mut progress = ProgressReporter::new(self.render_progress);
        for (index, rule) in rules.tables.iter().enumerate() {
            state.enter_table(index);
            let result = process_table(rule, conn, &mut self.generator, &mut progress, state)
                .await
                .map_err(|source| RunError::TableRule {
                    table: rule.table_name.clone(),
                    index,
                    source,
                })?;
            tally.tables.push(result);
        }

        state.transition(Phase::RunningAfter);
        for (index, statement) in rules.after_queries.iter().enumerate() {
            tracing::info!(index, statement = %statement, "Executing after query");
            self.run_hook(conn, statement)
                .await
                .map_err(|source| RunError::PostHook {
                    index,
                    statement: statement.clone(),
                    source,
                })?;
            tally.after_queries += 1;
        }

        Ok(())
    }

    async fn run_hook(&self, conn: &mut dyn Connection, sql: &str) -> Result<u64, DatabaseError> {
        let countdown = Countdown::start(self.hook_timeout_secs, self.render_progress);
        let result = conn.execute_hook(sql).await;
        countdown.finish();
        result
    }
}

async fn release(conn: &mut dyn Connection) {
    match conn.close().await {
        Ok(()) => tracing::debug!(target_db = %conn.describe(), "Connection closed"),
        Err(e) => tracing::warn!(
            target_db = %conn.describe(),
            error = %e,
            "Failed to close connection cleanly"
        ),
    }
}

fn finish(
    run_id: Uuid,
    state: RunState,
    tally: Tally,
    error: Option<RunError>,
    started_at: chrono::DateTime<Utc>,
    clock: Instant,
) -> RunResult {
    RunResult {
        run_id,
        phase: state.phase,
        rows_updated: state.rows_updated,
        batches_executed: state.batches_executed,
        tables: tally.tables,
        before_queries_executed: tally.before_queries,
        after_queries_executed: tally.after_queries,
        error,
        started_at,
        duration: clock.elapsed(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "panic with a non-string payload");
    }
}
