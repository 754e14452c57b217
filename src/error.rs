use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when loading an order file.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input has no header line at all.
    #[error("empty input: {}", path.display())]
    EmptyInput { path: PathBuf },

    /// The input has a header line but no data rows.
    #[error("no orders in input: {}", path.display())]
    NoOrders { path: PathBuf },
}

/// Error type returned when setting up query execution.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The worker thread pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid engine configuration.
    #[error("invalid execution options: {message}")]
    InvalidOptions { message: String },
}
