use crate::{
    db::{
        query::{FetchRequest, predicate},
        store::RecordStore,
    },
    error::InternalError,
    traits::Entity,
};
use std::sync::atomic::{AtomicU64, Ordering};

///
/// MemoryStore
///
/// In-process record store that evaluates fetch requests itself:
/// key matching, predicate filtering and field selection.
///
/// Rows are kept in insertion order and returned in that order, so
/// duplicate keys resolve to the most recently inserted row.
///

#[derive(Debug)]
pub struct MemoryStore<E> {
    rows: Vec<E>,
    fetches: AtomicU64,
}

impl<E> MemoryStore<E>
where
    E: Entity + Clone,
{
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn insert(&mut self, row: E) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    /// Number of `fetch` calls served so far.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    // Reject requests naming another entity or fields `E` does not have.
    fn validate_request(request: &FetchRequest) -> Result<(), InternalError> {
        if request.entity != E::PATH {
            return Err(InternalError::store_unsupported(format!(
                "memory store for '{}' cannot serve entity '{}'",
                E::PATH,
                request.entity
            )));
        }

        if let Some(field) = request
            .referenced_fields()
            .into_iter()
            .find(|field| !E::has_field(field))
        {
            return Err(InternalError::store_unsupported(format!(
                "unknown field '{field}' on entity '{}'",
                E::PATH
            )));
        }

        Ok(())
    }

    fn matches(row: &E, request: &FetchRequest) -> bool {
        let key_match = row
            .get_value(request.key_field)
            .is_some_and(|key| key.in_list(&request.keys));

        key_match
            && request
                .refinement
                .predicate()
                .is_none_or(|predicate| predicate::eval(row, predicate))
    }

    fn apply_selection(mut row: E, selection: Option<&[&'static str]>) -> E {
        if let Some(selection) = selection {
            for field in E::FIELDS {
                if !selection.contains(field) {
                    row.clear_field(field);
                }
            }
        }

        row
    }
}

impl<E> Default for MemoryStore<E>
where
    E: Entity + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FromIterator<E> for MemoryStore<E>
where
    E: Entity + Clone,
{
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<E> Extend<E> for MemoryStore<E>
where
    E: Entity + Clone,
{
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl<E> RecordStore for MemoryStore<E>
where
    E: Entity + Clone,
{
    type Record = E;

    fn entity_path(&self) -> &'static str {
        E::PATH
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<E>, InternalError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Self::validate_request(request)?;

        let selection = request.refinement.selection();
        let rows = self
            .rows
            .iter()
            .filter(|row| Self::matches(row, request))
            .map(|row| Self::apply_selection(row.clone(), selection))
            .collect();

        Ok(rows)
    }
}
