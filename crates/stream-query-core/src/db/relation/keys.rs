use crate::{traits::FieldValue, value::Value};
use derive_more::{Deref, IntoIterator};
use std::collections::BTreeSet;

///
/// KeySet
///
/// Deduplicated set of lookup keys for one resolve call.
///
/// - Duplicate input keys collapse to one fetch target.
/// - Ordering is canonical (ascending by key) and does NOT reflect input order.
///

#[derive(Clone, Debug, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct KeySet<K>(BTreeSet<K>);

impl<K> KeySet<K> {
    /// Create an empty key set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }
}

impl<K: Ord> KeySet<K> {
    /// Wrap a single key.
    #[must_use]
    pub fn singleton(key: K) -> Self {
        Self(BTreeSet::from([key]))
    }

    /// Insert a key, returning `true` if it was newly inserted.
    pub fn insert(&mut self, key: K) -> bool {
        self.0.insert(key)
    }
}

impl<K: FieldValue> KeySet<K> {
    /// Keys in canonical order as store-facing values.
    #[must_use]
    pub fn to_values(&self) -> Vec<Value> {
        self.0.iter().map(FieldValue::to_value).collect()
    }
}

impl<K> Default for KeySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for KeySet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Ord> Extend<K> for KeySet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
