use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::CommandStatus;

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { commands: usize },
    CommandStarted { index: usize, command: String },
    CommandFinished {
        index: usize,
        command: String,
        status: CommandStatus,
        elapsed: Duration,
    },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Forwards execution events to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunFinished { metrics, .. } => tracing::debug!(%metrics, "run finished"),
            other => tracing::debug!(event = ?other, "execution event"),
        }
    }
}

/// Outcome counters for the latest run.
///
/// Updated by the engine from whichever thread ran the command; [`Self::snapshot`] can be taken
/// at any time.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    runs: AtomicU64,
    elapsed_ns: AtomicU64,
    answered: AtomicU64,
    without_result: AtomicU64,
    not_found: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        for counter in [&self.elapsed_ns, &self.answered, &self.without_result, &self.not_found] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn end_run(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_ns.store(nanos, Ordering::Relaxed);
    }

    pub(crate) fn record(&self, status: CommandStatus) {
        let counter = match status {
            CommandStatus::Ok => &self.answered,
            CommandStatus::NoResult => &self.without_result,
            CommandStatus::NotFound => &self.not_found,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        ExecutionMetricsSnapshot {
            run_id: self.runs.load(Ordering::Relaxed),
            elapsed: Duration::from_nanos(self.elapsed_ns.load(Ordering::Relaxed)),
            answered: self.answered.load(Ordering::Relaxed),
            without_result: self.without_result.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ExecutionMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    /// Number of runs started on this engine; the counters below belong to the latest one.
    pub run_id: u64,
    /// Wall time of the latest finished run, zero while it is still going.
    pub elapsed: Duration,
    pub answered: u64,
    pub without_result: u64,
    pub not_found: u64,
}

impl ExecutionMetricsSnapshot {
    /// Commands finished so far in the latest run.
    pub fn commands(&self) -> u64 {
        self.answered + self.without_result + self.not_found
    }
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {}: {} commands ({} answered, {} without result, {} not found) in {:?}",
            self.run_id,
            self.commands(),
            self.answered,
            self.without_result,
            self.not_found,
            self.elapsed
        )
    }
}
