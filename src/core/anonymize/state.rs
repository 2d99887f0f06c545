//! Run state machine
//!
//! ```text
//! Idle -> RunningBefore -> RunningTables -> RunningAfter -> Done
//!              |                |                |
//!              +----------------+----------------+--> Failed
//! ```

use crate::domain::SqlValue;
use std::fmt;

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has run yet
    Idle,
    /// Executing pre-hooks
    RunningBefore,
    /// Processing table rules
    RunningTables,
    /// Executing post-hooks
    RunningAfter,
    /// Every phase completed
    Done,
    /// A phase failed
    Failed,
}

impl Phase {
    /// Whether the run has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::RunningBefore)
                | (Phase::RunningBefore, Phase::RunningTables)
                | (Phase::RunningTables, Phase::RunningAfter)
                | (Phase::RunningAfter, Phase::Done)
                | (Phase::Idle, Phase::Failed)
                | (Phase::RunningBefore, Phase::Failed)
                | (Phase::RunningTables, Phase::Failed)
                | (Phase::RunningAfter, Phase::Failed)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::RunningBefore => "before queries",
            Phase::RunningTables => "tables",
            Phase::RunningAfter => "after queries",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Mutable state of one run, owned by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    /// Current phase
    pub phase: Phase,
    /// Index of the table rule being processed
    pub table_index: Option<usize>,
    /// Last key committed in the current table
    pub cursor: Option<SqlValue>,
    /// Rows updated so far, across tables
    pub rows_updated: u64,
    /// Batches executed so far, across tables
    pub batches_executed: u64,
}

impl RunState {
    /// Fresh state in [`Phase::Idle`]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            table_index: None,
            cursor: None,
            rows_updated: 0,
            batches_executed: 0,
        }
    }

    /// Moves to `next`
    ///
    /// Illegal transitions are ignored and logged; terminal phases never
    /// change.
    pub fn transition(&mut self, next: Phase) {
        if self.phase.can_transition_to(next) {
            tracing::debug!(from = %self.phase, to = %next, "Run phase transition");
            self.phase = next;
        } else {
            tracing::warn!(from = %self.phase, to = %next, "Ignoring illegal run phase transition");
        }
    }

    /// Enters table `index`, resetting the cursor
    pub fn enter_table(&mut self, index: usize) {
        self.table_index = Some(index);
        self.cursor = None;
    }

    /// Records a committed batch
    pub fn record_batch(&mut self, last_key: SqlValue, rows: u64) {
        self.cursor = Some(last_key);
        self.rows_updated += rows;
        self.batches_executed += 1;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
