use derive_more::{Deref, IntoIterator};
use std::collections::{BTreeMap, btree_map::Entry};

///
/// ResultMap
///
/// Key -> value mapping produced by one resolve call.
///
/// Holds at most one entry per key. A key with no matching record is
/// simply absent; absence is never an error.
///

#[derive(Clone, Debug, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct ResultMap<K, V>(BTreeMap<K, V>);

impl<K, V> ResultMap<K, V> {
    /// Create an empty result map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Unwrap into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.0
    }
}

impl<K: Ord, V> ResultMap<K, V> {
    /// Insert `value` under `key`, combining with an existing entry through
    /// `merge(existing, incoming)`. Returns `true` when the key was already
    /// present.
    pub(crate) fn merge_with(&mut self, key: K, value: V, merge: impl Fn(V, V) -> V) -> bool {
        match self.0.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                false
            }
            Entry::Occupied(slot) => {
                let (key, existing) = slot.remove_entry();
                self.0.insert(key, merge(existing, value));
                true
            }
        }
    }

    /// Consume the map into its greatest entry; for single-key lookups this
    /// is the only entry.
    #[must_use]
    pub fn into_single(self) -> Option<(K, V)> {
        self.0.into_iter().next_back()
    }
}

impl<K, V> Default for ResultMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<ResultMap<K, V>> for BTreeMap<K, V> {
    fn from(map: ResultMap<K, V>) -> Self {
        map.0
    }
}
