//! Load entrypoint used by the query phase.
//!
//! [`load_orders`] reads an order file into a [`crate::types::RecordStore`] and, if an
//! [`super::observability::IngestionObserver`] is configured, reports success/failure/alerts to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::RecordStore;

use super::csv::read_orders_from_path;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Options controlling [`load_orders`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
    /// Fail with [`IngestionError::NoOrders`] when the file has a header but no data rows.
    pub require_rows: bool,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("require_rows", &self.require_rows)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
            require_rows: true,
        }
    }
}

/// Load an order file into memory.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use order_insights::ingestion::{load_orders, LoadOptions, TracingObserver};
///
/// # fn main() -> Result<(), order_insights::IngestionError> {
/// let opts = LoadOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
/// let orders = load_orders("pizza_sales.csv", &opts)?;
/// println!("orders={}", orders.len());
/// # Ok(())
/// # }
/// ```
pub fn load_orders(path: impl AsRef<Path>, options: &LoadOptions) -> IngestionResult<RecordStore> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
    };

    let result = read_orders_from_path(path).and_then(|batch| {
        if options.require_rows && batch.records.is_empty() {
            return Err(IngestionError::NoOrders {
                path: path.to_path_buf(),
            });
        }
        Ok(batch)
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(batch) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: batch.row_count(),
                    malformed_rows: batch.malformed_rows,
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(|batch| batch.records)
}

/// Severity assigned to a load failure.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ if error_chain_contains_io(err) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::EmptyInput { .. } => IngestionSeverity::Error,
        IngestionError::NoOrders { .. } => IngestionSeverity::Warning,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::severity_for_error;
    use crate::error::IngestionError;
    use crate::ingestion::IngestionSeverity;

    #[test]
    fn io_errors_are_critical() {
        let err = IngestionError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(severity_for_error(&err), IngestionSeverity::Critical);
    }

    #[test]
    fn empty_and_header_only_inputs_are_distinct() {
        let empty = IngestionError::EmptyInput { path: "a.csv".into() };
        let none = IngestionError::NoOrders { path: "a.csv".into() };
        assert_eq!(severity_for_error(&empty), IngestionSeverity::Error);
        assert_eq!(severity_for_error(&none), IngestionSeverity::Warning);
        assert_ne!(empty.to_string(), none.to_string());
    }
}
