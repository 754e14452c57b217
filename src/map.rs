//! Open-addressed string map holding [`TaggedValue`]s.
//!
//! [`TaggedMap`] backs both loaded records (one map per row, keyed by field name) and the
//! per-query group accumulators built by [`crate::processing`].
//!
//! Layout rules:
//!
//! - Slots are probed linearly from `djb2(key) % capacity`, wrapping at the end of the table.
//! - A key occupies at most one slot. Re-inserting a key overwrites that slot in place, even when
//!   the new value is of the other [`ValueKind`].
//! - When the number of entries reaches the capacity the table doubles and every entry is
//!   re-inserted against the new capacity.
//! - Typed getters only match a slot whose key *and* kind agree. A slot holding the key under the
//!   other kind is treated like any other colliding slot.

use std::fmt;
use std::mem;

use crate::types::{TaggedValue, ValueKind};

/// Capacity of a freshly created [`TaggedMap`].
pub const INITIAL_CAPACITY: usize = 12;

const DJB2_SEED: u64 = 5381;

/// Classic djb2 string hash: `h = h * 33 + byte` over every byte, seeded with 5381.
pub fn djb2(key: &str) -> u64 {
    key.bytes().fold(DJB2_SEED, |h, b| {
        h.wrapping_shl(5).wrapping_add(h).wrapping_add(u64::from(b))
    })
}

fn probe_start(key: &str, capacity: usize) -> usize {
    (djb2(key) % capacity as u64) as usize
}

#[derive(Clone)]
struct Entry {
    key: String,
    value: TaggedValue,
    // Assigned on first insertion of `key`; breaks ties in the extremum scans.
    seq: u64,
}

/// Open-addressed map from string keys to [`TaggedValue`]s.
///
/// See the [module docs](self) for the probing and growth rules.
///
/// ```rust
/// use order_insights::map::TaggedMap;
/// use order_insights::types::TaggedValue;
///
/// let mut totals = TaggedMap::new();
/// totals.insert("Margherita", TaggedValue::Number(4.0));
/// totals.insert("Hawaiian", TaggedValue::Number(6.0));
/// totals.insert("Margherita", TaggedValue::Number(7.0));
///
/// assert_eq!(totals.len(), 2);
/// assert_eq!(totals.get_number("Margherita"), 7.0);
/// assert_eq!(totals.get_text("Margherita"), None);
/// assert_eq!(totals.key_with_max_value(), Some("Margherita"));
/// assert_eq!(totals.key_with_min_value(), Some("Hawaiian"));
/// assert_eq!(totals.average_value().as_deref(), Some("6.5"));
/// ```
#[derive(Clone)]
pub struct TaggedMap {
    slots: Vec<Option<Entry>>,
    len: usize,
    next_seq: u64,
}

impl TaggedMap {
    /// Create an empty map with [`INITIAL_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty map with `capacity` slots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity.max(1)),
            len: 0,
            next_seq: 0,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Insert `value` under `key`, growing the table first if it is full.
    ///
    /// Returns the previous value when `key` was already present. The previous value may be of
    /// either kind; the slot is reused and the entry count does not change.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TaggedValue>) -> Option<TaggedValue> {
        let key = key.into();
        debug_assert!(!key.is_empty(), "TaggedMap keys must be non-empty");

        if self.len >= self.capacity() {
            self.grow();
        }

        let entry = Entry {
            key,
            value: value.into(),
            seq: self.next_seq,
        };
        let previous = self.place(entry);
        if previous.is_none() {
            self.len += 1;
            self.next_seq += 1;
        }
        previous
    }

    /// Text stored under `key`, or `None` if `key` is absent or holds a number.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.find(key, Some(ValueKind::Text))
            .and_then(|e| e.value.as_text())
    }

    /// Number stored under `key`, or `0.0` if `key` is absent or holds text.
    ///
    /// Use [`Self::try_number`] when "absent" and "zero" must be told apart.
    pub fn get_number(&self, key: &str) -> f64 {
        self.try_number(key).unwrap_or(0.0)
    }

    /// Number stored under `key`, or `None` if `key` is absent or holds text.
    pub fn try_number(&self, key: &str) -> Option<f64> {
        self.find(key, Some(ValueKind::Number))
            .and_then(|e| e.value.as_number())
    }

    /// Value stored under `key` regardless of its kind.
    pub fn get(&self, key: &str) -> Option<&TaggedValue> {
        self.find(key, None).map(|e| &e.value)
    }

    /// `true` if `key` is present under either kind.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key, None).is_some()
    }

    /// Key of the largest numeric value.
    ///
    /// The running maximum starts at zero and is only replaced by a strictly larger value, so a
    /// map whose numbers are all zero or negative has no maximum. Exact ties go to the key that
    /// was inserted first.
    pub fn key_with_max_value(&self) -> Option<&str> {
        let mut best: Option<(&Entry, f64)> = None;
        for (entry, value) in self.number_entries() {
            let replace = match best {
                None => value > 0.0,
                Some((b, highest)) => value > highest || (value == highest && entry.seq < b.seq),
            };
            if replace {
                best = Some((entry, value));
            }
        }
        best.map(|(e, _)| e.key.as_str())
    }

    /// Key of the smallest numeric value.
    ///
    /// Seeded with the first numeric entry; exact ties go to the key that was inserted first.
    pub fn key_with_min_value(&self) -> Option<&str> {
        let mut best: Option<(&Entry, f64)> = None;
        for (entry, value) in self.number_entries() {
            let replace = match best {
                None => true,
                Some((b, lowest)) => value < lowest || (value == lowest && entry.seq < b.seq),
            };
            if replace {
                best = Some((entry, value));
            }
        }
        best.map(|(e, _)| e.key.as_str())
    }

    /// Mean of every numeric value, or `None` if there are none.
    pub fn average(&self) -> Option<f64> {
        let (sum, count) = self
            .number_entries()
            .fold((0.0_f64, 0_usize), |(sum, count), (_, v)| (sum + v, count + 1));
        if count == 0 {
            return None;
        }
        Some(sum / count as f64)
    }

    /// [`Self::average`] formatted with one decimal place.
    pub fn average_value(&self) -> Option<String> {
        self.average().map(|mean| format!("{mean:.1}"))
    }

    /// Iterate `(key, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaggedValue)> + '_ {
        self.entries().map(|e| (e.key.as_str(), &e.value))
    }

    /// Iterate keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries().map(|e| e.key.as_str())
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.slots.iter().flatten()
    }

    fn number_entries(&self) -> impl Iterator<Item = (&Entry, f64)> + '_ {
        self.entries()
            .filter_map(|e| e.value.as_number().map(|v| (e, v)))
    }

    fn find(&self, key: &str, kind: Option<ValueKind>) -> Option<&Entry> {
        let capacity = self.capacity();
        let mut idx = probe_start(key, capacity);
        // Bounded so a miss on a completely full table still terminates.
        for _ in 0..capacity {
            match &self.slots[idx] {
                None => return None,
                Some(e) if e.key == key && kind.is_none_or(|k| e.value.kind() == k) => {
                    return Some(e);
                }
                Some(_) => {}
            }
            idx = (idx + 1) % capacity;
        }
        None
    }

    // Requires at least one empty slot unless `entry.key` is already present.
    fn place(&mut self, entry: Entry) -> Option<TaggedValue> {
        let capacity = self.capacity();
        let mut idx = probe_start(&entry.key, capacity);
        loop {
            match self.slots[idx].as_mut() {
                Some(existing) if existing.key == entry.key => {
                    return Some(mem::replace(&mut existing.value, entry.value));
                }
                Some(_) => idx = (idx + 1) % capacity,
                None => {
                    self.slots[idx] = Some(entry);
                    return None;
                }
            }
        }
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity() * 2;
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        for entry in old.into_iter().flatten() {
            self.place(entry);
        }
    }
}

fn empty_slots(capacity: usize) -> Vec<Option<Entry>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

impl Default for TaggedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaggedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for TaggedMap
where
    K: Into<String>,
    V: Into<TaggedValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for TaggedMap
where
    K: Into<String>,
    V: Into<TaggedValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
