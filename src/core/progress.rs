//! Progress reporting
//!
//! Two displays, both on stderr:
//!
//! - [`ProgressReporter`] for phases with a known amount of work (batches of
//!   one table): `         3/10 1.2s [=========---------------------] 30%`
//! - [`Countdown`] for statements of unknown length (hooks): elapsed time
//!   against the statement timeout, redrawn once per second.
//!
//! Reporting never fails the run. Counting always happens; drawing only when
//! enabled.

use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const BAR_WIDTH: usize = 30;
const INDENT: &str = "         ";

/// Whether stderr is attached to a terminal
pub fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Completed/total progress for one unit of work
#[derive(Debug)]
pub struct ProgressReporter {
    enabled: bool,
    total: u64,
    completed: u64,
    started: Instant,
    active: bool,
}

impl ProgressReporter {
    /// Creates a reporter; `enabled` controls drawing only
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            total: 0,
            completed: 0,
            started: Instant::now(),
            active: false,
        }
    }

    /// A reporter that never draws
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Starts a new unit of work of `total` steps
    pub fn start(&mut self, total: u64) {
        self.total = total;
        self.completed = 0;
        self.started = Instant::now();
        self.active = true;
        self.draw();
    }

    /// Records `n` completed steps
    pub fn advance(&mut self, n: u64) {
        self.completed = self.completed.saturating_add(n);
        tracing::trace!(completed = self.completed, total = self.total, "Progress");
        self.draw();
    }

    /// Ends the current unit of work
    pub fn finish(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.draw();
        if self.enabled {
            let _ = writeln!(std::io::stderr());
        }
    }

    /// Steps completed since the last [`start`](Self::start)
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Steps expected since the last [`start`](Self::start)
    pub fn total(&self) -> u64 {
        self.total
    }

    fn draw(&self) {
        if !self.enabled {
            return;
        }
        let line = render_progress(self.completed, self.total, self.started.elapsed());
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\r{line}");
        let _ = stderr.flush();
    }
}

/// Elapsed-time display for a statement of unknown length
#[derive(Debug)]
pub struct Countdown {
    ticker: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Starts ticking once per second against `expected_secs`
    ///
    /// Nothing is spawned when `enabled` is false.
    pub fn start(expected_secs: u64, enabled: bool) -> Self {
        if !enabled {
            return Self { ticker: None };
        }

        let ticker = tokio::spawn(async move {
            let started = Instant::now();
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                let line = render_countdown(started.elapsed(), expected_secs);
                let mut stderr = std::io::stderr();
                let _ = write!(stderr, "\r{line}");
                let _ = stderr.flush();
            }
        });

        Self {
            ticker: Some(ticker),
        }
    }

    /// Stops the display
    pub fn finish(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            let _ = writeln!(std::io::stderr());
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `         {completed}/{total} {elapsed}s [====----] {percent}%`
pub fn render_progress(completed: u64, total: u64, elapsed: Duration) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (completed as f64 / total as f64).min(1.0)
    };
    format!(
        "{INDENT}{completed}/{total} {:.1}s [{}] {:.0}%",
        elapsed.as_secs_f64(),
        bar(ratio),
        ratio * 100.0
    )
}

/// `         {elapsed}s [====----]`
///
/// The bar spans `expected_secs + 1` ticks so it never fills while the
/// statement is still within its timeout.
pub fn render_countdown(elapsed: Duration, expected_secs: u64) -> String {
    let span = (expected_secs + 1) as f64;
    let ratio = (elapsed.as_secs_f64() / span).min(1.0);
    format!("{INDENT}{:.1}s [{}]", elapsed.as_secs_f64(), bar(ratio))
}

fn bar(ratio: f64) -> String {
    let filled = ((ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "=".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
