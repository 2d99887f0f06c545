//! Anonymization engine
//!
//! This module provides the three-phase run:
//! - Run orchestration and connection release ([`Orchestrator`])
//! - Table rule processing with keyset pagination ([`process_table`])
//! - Batched multi-row updates ([`BatchWriter`])
//! - Run state, results and errors

pub mod orchestrator;
pub mod outcome;
pub mod state;
pub mod table;
pub mod writer;

pub use orchestrator::Orchestrator;
pub use outcome::{RunError, RunErrorKind, RunResult, TableError, TableResult};
pub use state::{Phase, RunState};
pub use table::{expected_batches, process_table};
pub use writer::{BatchOutcome, BatchWriter};
