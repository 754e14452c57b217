//! Aggregation over comma-separated list fields.
//!
//! Unlike [`super::aggregate()`], one record may contribute to many groups: every entry of the list
//! is credited with the record's full value.

use tracing::debug;

use crate::map::TaggedMap;
use crate::types::RecordStore;

use super::aggregate::{accumulate, AggregateResult, Reduction};

/// Split a comma-separated list, trimming leading spaces and dropping empty entries.
///
/// ```rust
/// use order_insights::processing::split_list;
///
/// let items: Vec<&str> = split_list("Cheese, Tomato,Basil").collect();
/// assert_eq!(items, vec!["Cheese", "Tomato", "Basil"]);
/// ```
pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',')
        .map(|item| item.trim_start_matches(' '))
        .filter(|item| !item.is_empty())
}

/// Sum `value_field` per list entry of `list_field`.
pub fn ingredient_totals(records: &RecordStore, list_field: &str, value_field: &str) -> TaggedMap {
    let mut totals = TaggedMap::new();

    for record in records {
        let Some(list) = record.get_text(list_field) else {
            continue;
        };
        let amount = record.get_number(value_field);
        for item in split_list(list) {
            accumulate(&mut totals, item, amount);
        }
    }

    debug!(list_field, value_field, groups = totals.len(), "split list totals");
    totals
}

/// [`ingredient_totals`] followed by `reduction`.
pub fn aggregate_ingredients(
    records: &RecordStore,
    list_field: &str,
    value_field: &str,
    reduction: Reduction,
) -> Option<AggregateResult> {
    reduction.apply(&ingredient_totals(records, list_field, value_field))
}
