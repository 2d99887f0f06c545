//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output on stderr
//! - Configurable log levels (`--log-level`, `ANONYMIZER_LOG_LEVEL` or `RUST_LOG`)
//! - Optional JSON log files with rotation (`--log-dir`)
//!
//! # Example
//!
//! ```no_run
//! use anonymizer::logging::init_logging;
//! use anonymizer::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(table = "users", "Anonymizing table");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a table rule
///
/// # Example
///
/// ```no_run
/// use anonymizer::log_table_start;
///
/// log_table_start!("users", 5_u64, 3_u64);
/// ```
#[macro_export]
macro_rules! log_table_start {
    ($table:expr, $rows:expr, $batches:expr) => {
        tracing::info!(
            table = %$table,
            rows = $rows,
            batches = $batches,
            "Anonymizing table"
        );
    };
}

/// Log the completion of a table rule
///
/// # Example
///
/// ```no_run
/// use anonymizer::log_table_complete;
/// use std::time::Duration;
///
/// log_table_complete!("users", 5_u64, 3_u64, Duration::from_secs(2));
/// ```
#[macro_export]
macro_rules! log_table_complete {
    ($table:expr, $rows:expr, $batches:expr, $duration:expr) => {
        tracing::info!(
            table = %$table,
            rows_updated = $rows,
            batches = $batches,
            duration_ms = $duration.as_millis() as u64,
            "Table anonymized"
        );
    };
}

/// Log a written batch
///
/// # Example
///
/// ```no_run
/// use anonymizer::log_batch_processing;
///
/// log_batch_processing!("users", 1_u64, 3_u64);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($table:expr, $current:expr, $total:expr) => {
        tracing::debug!(
            table = %$table,
            batch = $current,
            total = $total,
            progress_pct = if $total == 0 { 100.0 } else { $current as f64 / $total as f64 * 100.0 },
            "Batch written"
        );
    };
}
