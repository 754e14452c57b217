//! Core data model types.
//!
//! Orders are loaded into a [`RecordStore`]: one [`Record`] (a [`TaggedMap`]) per input row, keyed
//! by the field names of the fixed order [`Schema`].

use std::fmt;

use crate::map::TaggedMap;

/// Which variant a [`TaggedValue`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// UTF-8 text.
    Text,
    /// 64-bit floating point number.
    Number,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Number => f.write_str("number"),
        }
    }
}

/// A single value stored in a [`TaggedMap`].
///
/// There is no null variant: a missing value is a missing key.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedValue {
    /// Owned text.
    Text(String),
    /// 64-bit float.
    Number(f64),
}

impl TaggedValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
        }
    }

    /// Returns the text payload, if this is a [`TaggedValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Number(_) => None,
        }
    }

    /// Returns the numeric payload, if this is a [`TaggedValue::Number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            Self::Number(n) => Some(*n),
        }
    }
}

impl From<&str> for TaggedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for TaggedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for TaggedValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: &'static str,
    /// Kind of value stored under `name`.
    pub kind: ValueKind,
}

impl Field {
    /// Create a new field.
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }
}

/// Field names of the order schema, usable as record keys.
pub mod fields {
    pub const PIZZA_ID: &str = "pizza_id";
    pub const ORDER_ID: &str = "order_id";
    pub const PIZZA_NAME_ID: &str = "pizza_name_id";
    pub const QUANTITY: &str = "quantity";
    pub const ORDER_DATE: &str = "order_date";
    pub const ORDER_TIME: &str = "order_time";
    pub const UNIT_PRICE: &str = "unit_price";
    pub const TOTAL_PRICE: &str = "total_price";
    pub const PIZZA_SIZE: &str = "pizza_size";
    pub const PIZZA_CATEGORY: &str = "pizza_category";
    pub const PIZZA_INGREDIENTS: &str = "pizza_ingredients";
    pub const PIZZA_NAME: &str = "pizza_name";
}

const ORDER_FIELDS: [Field; 12] = [
    Field::new(fields::PIZZA_ID, ValueKind::Number),
    Field::new(fields::ORDER_ID, ValueKind::Number),
    Field::new(fields::PIZZA_NAME_ID, ValueKind::Text),
    Field::new(fields::QUANTITY, ValueKind::Number),
    Field::new(fields::ORDER_DATE, ValueKind::Text),
    Field::new(fields::ORDER_TIME, ValueKind::Text),
    Field::new(fields::UNIT_PRICE, ValueKind::Number),
    Field::new(fields::TOTAL_PRICE, ValueKind::Number),
    Field::new(fields::PIZZA_SIZE, ValueKind::Text),
    Field::new(fields::PIZZA_CATEGORY, ValueKind::Text),
    Field::new(fields::PIZZA_INGREDIENTS, ValueKind::Text),
    Field::new(fields::PIZZA_NAME, ValueKind::Text),
];

/// The ordered list of columns of an order file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: &'static [Field],
}

impl Schema {
    /// The fixed twelve-column order schema.
    pub const fn orders() -> Self {
        Self {
            fields: &ORDER_FIELDS,
        }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the declared kind of a field by name, if present.
    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::orders()
    }
}

/// One parsed input row.
pub type Record = TaggedMap;

/// In-memory collection of every loaded [`Record`], in file order.
///
/// The store is built once by ingestion and only read afterwards.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from already-built records.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Append a record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no data rows were loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Iterate records in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// All records as a slice.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
