//! Group-by aggregation with extremum/average reduction.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::map::TaggedMap;
use crate::types::{Record, RecordStore, TaggedValue};

/// How a finished group-totals map is reduced to a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Group with the largest positive total ([`TaggedMap::key_with_max_value`]).
    Most,
    /// Group with the smallest total ([`TaggedMap::key_with_min_value`]).
    Least,
    /// Mean of all group totals ([`TaggedMap::average_value`]).
    Average,
}

impl Reduction {
    /// Reduce `totals`, returning `None` when there is no answer.
    pub fn apply(self, totals: &TaggedMap) -> Option<AggregateResult> {
        match self {
            Self::Most => totals.key_with_max_value().map(|key| AggregateResult::group(key, totals)),
            Self::Least => totals.key_with_min_value().map(|key| AggregateResult::group(key, totals)),
            Self::Average => totals.average_value().map(|value| AggregateResult { value, total: None }),
        }
    }

    /// Lower-case name (`most`, `least`, `average`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Most => "most",
            Self::Least => "least",
            Self::Average => "average",
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown reduction name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reduction '{0}' (expected most, least or average)")]
pub struct ParseReductionError(pub String);

impl FromStr for Reduction {
    type Err = ParseReductionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "most" => Ok(Self::Most),
            "least" => Ok(Self::Least),
            "average" => Ok(Self::Average),
            _ => Err(ParseReductionError(s.to_owned())),
        }
    }
}

/// Answer produced by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Winning group key, or the formatted mean for [`Reduction::Average`].
    pub value: String,
    /// Accumulated total of the winning group; `None` for [`Reduction::Average`].
    pub total: Option<f64>,
}

impl AggregateResult {
    fn group(key: &str, totals: &TaggedMap) -> Self {
        Self {
            value: key.to_owned(),
            total: Some(totals.get_number(key)),
        }
    }
}

/// Group key of `record` under `field`.
///
/// Text fields are used as-is. Number fields are formatted as whole numbers, so `12.0` and
/// `12.000001` land in the same group. Returns `None` if the record has no such field.
pub fn group_key<'r>(record: &'r Record, field: &str) -> Option<Cow<'r, str>> {
    match record.get(field)? {
        TaggedValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
        TaggedValue::Number(n) => Some(Cow::Owned(format!("{n:.0}"))),
    }
}

/// Add `amount` to the running total of `key`, starting a new total if needed.
pub fn accumulate(totals: &mut TaggedMap, key: &str, amount: f64) {
    let total = match totals.try_number(key) {
        Some(current) => current + amount,
        None => amount,
    };
    totals.insert(key, total);
}

/// Sum `value_field` per distinct `group_field` value.
///
/// Missing values count as zero. Records without `group_field` are skipped.
pub fn group_totals(records: &RecordStore, group_field: &str, value_field: &str) -> TaggedMap {
    let mut totals = TaggedMap::new();
    let mut skipped = 0_usize;

    for record in records {
        let Some(key) = group_key(record, group_field) else {
            skipped += 1;
            continue;
        };
        accumulate(&mut totals, &key, record.get_number(value_field));
    }

    debug!(
        group_field,
        value_field,
        records = records.len(),
        groups = totals.len(),
        skipped,
        "grouped records"
    );
    totals
}

/// Group `records` by `group_field`, sum `value_field`, and reduce the totals.
///
/// ```rust
/// use order_insights::map::TaggedMap;
/// use order_insights::processing::{aggregate, Reduction};
/// use order_insights::types::RecordStore;
///
/// let records: RecordStore = [("A", 2.0), ("B", 5.0), ("A", 4.0)]
///     .into_iter()
///     .map(|(name, qty)| {
///         let mut r = TaggedMap::new();
///         r.insert("pizza_name", name);
///         r.insert("quantity", qty);
///         r
///     })
///     .collect();
///
/// let most = aggregate(&records, "pizza_name", "quantity", Reduction::Most).unwrap();
/// assert_eq!(most.value, "A");
/// assert_eq!(most.total, Some(6.0));
/// ```
pub fn aggregate(
    records: &RecordStore,
    group_field: &str,
    value_field: &str,
    reduction: Reduction,
) -> Option<AggregateResult> {
    let totals = group_totals(records, group_field, value_field);
    reduction.apply(&totals)
}
