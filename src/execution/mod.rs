//! Runs command lists against a loaded [`RecordStore`].
//!
//! This module sits "above" [`crate::queries`] and provides:
//!
//! - Resolution of command names through a [`QueryRegistry`], with unknown names reported per
//!   occurrence instead of aborting the run
//! - Optional parallel execution of independent commands on a rayon pool; results always come
//!   back in argument order
//! - Per-status outcome counters and observer hooks for monitoring
//! - Text and JSON-lines rendering of [`CommandOutcome`]s

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;

use crate::error::ExecutionError;
use crate::queries::QueryRegistry;
use crate::types::RecordStore;

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, TracingExecutionObserver,
};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Number of worker threads used to run commands.
    ///
    /// If `None`, commands run one after another on the calling thread.
    pub num_threads: Option<usize>,
}

/// How [`CommandOutcome`]s are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// The human-readable message only.
    #[default]
    Text,
    /// One JSON object per command.
    Json,
}

/// Result category of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    /// The query produced an answer.
    Ok,
    /// The query ran but had nothing to report.
    NoResult,
    /// No query is registered under the command name.
    NotFound,
}

/// Outcome of one command, in argument order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    /// Command name as given.
    pub command: String,
    /// Result category.
    pub status: CommandStatus,
    /// Line printed in text mode.
    pub message: String,
    /// Winning key or formatted average, when answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Group total backing `value`, when the query has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

impl CommandOutcome {
    /// Outcome for a command name with no registered query.
    pub fn not_found(command: &str) -> Self {
        Self {
            command: command.to_owned(),
            status: CommandStatus::NotFound,
            message: format!("Command '{command}' not found."),
            value: None,
            total: None,
        }
    }

    /// Render in the given format.
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.message.clone()),
            OutputFormat::Json => serde_json::to_string(self),
        }
    }
}

/// Resolves and runs commands against a [`RecordStore`].
pub struct ExecutionEngine {
    pool: Option<ThreadPool>,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// Fails if `num_threads == Some(0)` or the thread pool cannot be built.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ExecutionError> {
        let pool = match opts.num_threads {
            None => None,
            Some(0) => {
                return Err(ExecutionError::InvalidOptions {
                    message: "num_threads must be > 0 when set".to_string(),
                });
            }
            Some(n) => Some(ThreadPoolBuilder::new().num_threads(n).build()?),
        };

        Ok(Self {
            pool,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// An engine running commands sequentially on the calling thread.
    pub fn sequential() -> Self {
        Self {
            pool: None,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        }
    }

    /// Attach an observer for execution events.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// `true` if commands run on a worker pool.
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Run every command in `commands` and return one outcome per command, in order.
    ///
    /// Unknown names produce a [`CommandStatus::NotFound`] outcome and do not stop the run.
    pub fn run_commands<S>(
        &self,
        registry: &QueryRegistry,
        records: &RecordStore,
        commands: &[S],
    ) -> Vec<CommandOutcome>
    where
        S: AsRef<str> + Sync,
    {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted {
            commands: commands.len(),
        });

        let outcomes = match &self.pool {
            Some(pool) => pool.install(|| {
                commands
                    .par_iter()
                    .enumerate()
                    .map(|(index, command)| self.run_one(registry, records, index, command.as_ref()))
                    .collect::<Vec<_>>()
            }),
            None => commands
                .iter()
                .enumerate()
                .map(|(index, command)| self.run_one(registry, records, index, command.as_ref()))
                .collect(),
        };

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        outcomes
    }

    fn run_one(
        &self,
        registry: &QueryRegistry,
        records: &RecordStore,
        index: usize,
        command: &str,
    ) -> CommandOutcome {
        let start = Instant::now();
        self.emit(ExecutionEvent::CommandStarted {
            index,
            command: command.to_owned(),
        });

        let outcome = match registry.lookup(command) {
            None => CommandOutcome::not_found(command),
            Some(query) => {
                let output = query.run(records);
                let status = if output.result.is_some() {
                    CommandStatus::Ok
                } else {
                    CommandStatus::NoResult
                };
                let (value, total) = match output.result {
                    Some(result) => (Some(result.value), result.total),
                    None => (None, None),
                };
                CommandOutcome {
                    command: command.to_owned(),
                    status,
                    message: output.message,
                    value,
                    total,
                }
            }
        };

        self.metrics.record(outcome.status);
        self.emit(ExecutionEvent::CommandFinished {
            index,
            command: command.to_owned(),
            status: outcome.status,
            elapsed: start.elapsed(),
        });
        outcome
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(o) = &self.observer {
            o.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        CommandOutcome, CommandStatus, ExecutionEngine, ExecutionEvent, ExecutionObserver, ExecutionOptions,
        OutputFormat,
    };
    use crate::map::TaggedMap;
    use crate::queries::QueryRegistry;
    use crate::types::{fields, RecordStore};

    fn orders() -> RecordStore {
        [("A", "d1", 2.0), ("B", "d1", 5.0), ("A", "d2", 4.0)]
            .into_iter()
            .enumerate()
            .map(|(i, (name, date, quantity))| {
                let mut r = TaggedMap::new();
                r.insert(fields::ORDER_ID, i as f64);
                r.insert(fields::PIZZA_NAME, name);
                r.insert(fields::ORDER_DATE, date);
                r.insert(fields::QUANTITY, quantity);
                r.insert(fields::TOTAL_PRICE, quantity * 10.0);
                r
            })
            .collect()
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl ExecutionObserver for RecordingObserver {
        fn on_event(&self, event: &ExecutionEvent) {
            let label = match event {
                ExecutionEvent::RunStarted { commands } => format!("start:{commands}"),
                ExecutionEvent::CommandStarted { command, .. } => format!("begin:{command}"),
                ExecutionEvent::CommandFinished { command, status, .. } => {
                    format!("end:{command}:{status:?}")
                }
                ExecutionEvent::RunFinished { .. } => "finish".to_string(),
            };
            self.events.lock().unwrap().push(label);
        }
    }

    #[test]
    fn unknown_command_does_not_stop_the_run() {
        let engine = ExecutionEngine::sequential();
        let out = engine.run_commands(&QueryRegistry::standard(), &orders(), &["pms", "xyz", "pls"]);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].message, "The most ordered pizza is A.");
        assert_eq!(out[1], CommandOutcome::not_found("xyz"));
        assert_eq!(out[1].message, "Command 'xyz' not found.");
        assert_eq!(out[2].message, "The least ordered pizza is B.");
    }

    #[test]
    fn parallel_run_preserves_argument_order() {
        let registry = QueryRegistry::standard();
        let records = orders();
        let commands: Vec<String> = ["dms", "pms", "nope", "apd", "dls", "pls", "apo", "hp"]
            .iter()
            .cycle()
            .take(64)
            .map(|s| s.to_string())
            .collect();

        let sequential = ExecutionEngine::sequential().run_commands(&registry, &records, &commands);
        let engine = ExecutionEngine::new(ExecutionOptions { num_threads: Some(4) }).unwrap();
        assert!(engine.is_parallel());
        let parallel = engine.run_commands(&registry, &records, &commands);

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn zero_threads_is_rejected() {
        let err = ExecutionEngine::new(ExecutionOptions { num_threads: Some(0) }).err().unwrap();
        assert!(err.to_string().contains("num_threads"));
    }

    #[test]
    fn observer_sees_every_command() {
        let observer = Arc::new(RecordingObserver::default());
        let obs_trait: Arc<dyn ExecutionObserver> = observer.clone();
        let engine = ExecutionEngine::sequential().with_observer(obs_trait);

        engine.run_commands(&QueryRegistry::standard(), &orders(), &["apd", "zzz"]);

        assert_eq!(
            *observer.events.lock().unwrap(),
            vec![
                "start:2".to_string(),
                "begin:apd".to_string(),
                "end:apd:Ok".to_string(),
                "begin:zzz".to_string(),
                "end:zzz:NotFound".to_string(),
                "finish".to_string(),
            ]
        );
    }

    #[test]
    fn metrics_count_statuses() {
        let engine = ExecutionEngine::sequential();
        let metrics = engine.metrics();

        engine.run_commands(&QueryRegistry::standard(), &RecordStore::new(), &["pms", "apo", "bogus"]);

        let snap = metrics.snapshot();
        assert_eq!(snap.run_id, 1);
        assert_eq!(snap.commands(), 3);
        assert_eq!(snap.answered, 0);
        assert_eq!(snap.without_result, 2);
        assert_eq!(snap.not_found, 1);
    }

    #[test]
    fn two_placeholder_outcome_carries_total() {
        let out = ExecutionEngine::sequential().run_commands(&QueryRegistry::standard(), &orders(), &["dms"]);
        assert_eq!(out[0].status, CommandStatus::Ok);
        assert_eq!(out[0].value.as_deref(), Some("d1"));
        assert_eq!(out[0].total, Some(70.0));
        assert_eq!(
            out[0].message,
            "The date with the most revenue is d1 with a total of $70.00."
        );
    }

    #[test]
    fn renders_json_lines() {
        let registry = QueryRegistry::standard();
        let out = ExecutionEngine::sequential().run_commands(&registry, &orders(), &["pms", "x"]);
        assert_eq!(out[0].render(OutputFormat::Text).unwrap(), "The most ordered pizza is A.");
        assert_eq!(
            out[0].render(OutputFormat::Json).unwrap(),
            r#"{"command":"pms","status":"ok","message":"The most ordered pizza is A.","value":"A","total":6.0}"#
        );
        assert_eq!(
            out[1].render(OutputFormat::Json).unwrap(),
            r#"{"command":"x","status":"not_found","message":"Command 'x' not found."}"#
        );
    }

    #[test]
    fn run_ids_increase_per_run() {
        let engine = ExecutionEngine::sequential();
        let registry = QueryRegistry::standard();
        let records = orders();
        for _ in 0..3 {
            engine.run_commands(&registry, &records, &["pms"]);
        }
        assert_eq!(engine.metrics().snapshot().run_id, 3);
    }
}
