//! CSV order-file reader.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::error::{IngestionError, IngestionResult};
use crate::map::TaggedMap;
use crate::types::{Field, Record, RecordStore, Schema, TaggedValue, ValueKind};

/// Result of reading an order file.
#[derive(Debug, Default)]
pub struct OrderBatch {
    /// The discarded header line, or `None` if the input had no lines at all.
    pub header: Option<StringRecord>,
    /// One record per data line.
    pub records: RecordStore,
    /// Data lines that did not yield all schema fields.
    pub malformed_rows: usize,
}

impl OrderBatch {
    /// Number of data rows read (including malformed ones).
    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Read an order file into an [`OrderBatch`].
///
/// Rules:
///
/// - The first line is a header and is discarded.
/// - Every following non-blank line becomes one record, in file order.
/// - Fields are parsed left to right following [`Schema::orders`]. Parsing of a line stops at the
///   first missing or unparsable field; the record keeps the fields read before it.
/// - Columns past the last schema field are joined back with `,` into the last field.
///
/// Returns [`IngestionError::EmptyInput`] when the file has no header line. A header-only file is
/// not an error here; it yields an empty [`RecordStore`].
pub fn read_orders_from_path(path: impl AsRef<Path>) -> IngestionResult<OrderBatch> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr = reader_builder().from_reader(file);
    let batch = read_orders_from_reader(&mut rdr)?;
    if batch.header.is_none() {
        return Err(IngestionError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(batch)
}

/// Read orders from an in-memory string (header line included).
pub fn read_orders_from_str(input: &str) -> IngestionResult<OrderBatch> {
    let mut rdr = reader_builder().from_reader(input.as_bytes());
    read_orders_from_reader(&mut rdr)
}

/// Read orders from an existing CSV reader.
///
/// The reader should be built with [`reader_builder`] (no header handling, flexible record
/// lengths) so the header line can be told apart from data and short lines are kept.
pub fn read_orders_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<OrderBatch> {
    let schema = Schema::orders();
    let mut batch = OrderBatch::default();

    for (line_idx0, result) in rdr.records().enumerate() {
        // 1-based line numbers for users.
        let line = line_idx0 + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) if is_recoverable(&e) => {
                warn!(line, error = %e, "unreadable order line, keeping an empty record");
                if batch.header.is_none() {
                    batch.header = Some(StringRecord::new());
                } else {
                    batch.records.push(TaggedMap::new());
                    batch.malformed_rows += 1;
                }
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if batch.header.is_none() {
            batch.header = Some(record);
            continue;
        }

        let (order, parsed) = parse_order(&schema, &record);
        if parsed < schema.fields.len() {
            debug!(line, parsed, expected = schema.fields.len(), "short order line");
            batch.malformed_rows += 1;
        }
        batch.records.push(order);
    }

    Ok(batch)
}

/// CSV reader configuration used for order files.
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);
    builder
}

fn is_recoverable(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Utf8 { .. })
}

/// Parse one data line; returns the record and the number of fields that were read.
fn parse_order(schema: &Schema, line: &StringRecord) -> (Record, usize) {
    let mut order = TaggedMap::new();
    let last = schema.fields.len() - 1;

    for (idx, field) in schema.fields.iter().enumerate() {
        let raw = if idx == last {
            trailing_columns(line, idx)
        } else {
            line.get(idx).map(Cow::Borrowed)
        };
        let Some(value) = raw.and_then(|raw| parse_value(field, &raw)) else {
            return (order, idx);
        };
        order.insert(field.name, value);
    }

    (order, schema.fields.len())
}

fn trailing_columns(line: &StringRecord, from: usize) -> Option<Cow<'_, str>> {
    match line.len() {
        n if n <= from => None,
        n if n == from + 1 => line.get(from).map(Cow::Borrowed),
        _ => Some(Cow::Owned(line.iter().skip(from).collect::<Vec<_>>().join(","))),
    }
}

fn parse_value(field: &Field, raw: &str) -> Option<TaggedValue> {
    match field.kind {
        ValueKind::Number => raw.trim().parse::<f64>().ok().map(TaggedValue::Number),
        ValueKind::Text if raw.is_empty() => None,
        ValueKind::Text => Some(TaggedValue::Text(raw.to_owned())),
    }
}
