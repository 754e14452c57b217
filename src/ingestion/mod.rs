//! Loading order files.
//!
//! Most callers should use [`load_orders`] (from [`load`]) which:
//!
//! - reads the file with the lenient order reader in [`csv`]
//! - rejects empty and header-only files (configurable via [`LoadOptions`])
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]

pub mod csv;
pub mod load;
pub mod observability;

pub use self::csv::{read_orders_from_path, read_orders_from_reader, read_orders_from_str, OrderBatch};
pub use load::{load_orders, severity_for_error, LoadOptions};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
