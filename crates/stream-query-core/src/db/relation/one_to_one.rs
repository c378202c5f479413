use crate::{
    db::{
        query::Refinement,
        relation::{ResolveOptions, ResultMap, resolve},
        store::RecordStore,
    },
    error::ResolveError,
    model::field::Field,
    traits::FieldValue,
};

///
/// OneToOne
///
/// A store bound to the field that identifies its records.
///
/// Every call issues at most one fetch and yields at most one value per
/// distinct key. The `query_*` family covers the common shapes; `resolve`
/// takes a full `ResolveOptions` for everything else.
///

pub struct OneToOne<'s, S, K>
where
    S: RecordStore + ?Sized,
{
    store: &'s S,
    key_field: Field<S::Record, K>,
}

impl<'s, S, K> OneToOne<'s, S, K>
where
    S: RecordStore + ?Sized,
    K: FieldValue + Ord,
{
    #[must_use]
    pub const fn new(store: &'s S, key_field: Field<S::Record, K>) -> Self {
        Self { store, key_field }
    }

    #[must_use]
    pub const fn store(&self) -> &'s S {
        self.store
    }

    #[must_use]
    pub const fn key_field(&self) -> Field<S::Record, K> {
        self.key_field
    }

    // ------------------------------------------------------------------
    // Batch
    // ------------------------------------------------------------------

    /// Key -> whole record.
    pub fn query(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<ResultMap<K, S::Record>, ResolveError> {
        self.resolve(keys, ResolveOptions::new())
    }

    /// Key -> projected value.
    pub fn query_values<V>(
        &self,
        keys: impl IntoIterator<Item = K>,
        projector: impl Fn(S::Record) -> V,
    ) -> Result<ResultMap<K, V>, ResolveError> {
        self.resolve(keys, ResolveOptions::new().project(projector))
    }

    /// Key -> projected value, with the fetch narrowed by `customizer`.
    pub fn query_with<V>(
        &self,
        customizer: impl Fn(&mut Refinement),
        keys: impl IntoIterator<Item = K>,
        projector: impl Fn(S::Record) -> V,
    ) -> Result<ResultMap<K, V>, ResolveError> {
        let options = ResolveOptions::new()
            .customize(customizer)
            .project(projector);

        self.resolve(keys, options)
    }

    // ------------------------------------------------------------------
    // Single key
    // ------------------------------------------------------------------

    pub fn query_one(&self, key: K) -> Result<ResultMap<K, S::Record>, ResolveError> {
        self.query(std::iter::once(key))
    }

    pub fn query_one_values<V>(
        &self,
        key: K,
        projector: impl Fn(S::Record) -> V,
    ) -> Result<ResultMap<K, V>, ResolveError> {
        self.query_values(std::iter::once(key), projector)
    }

    pub fn query_one_with<V>(
        &self,
        customizer: impl Fn(&mut Refinement),
        key: K,
        projector: impl Fn(S::Record) -> V,
    ) -> Result<ResultMap<K, V>, ResolveError> {
        self.query_with(customizer, std::iter::once(key), projector)
    }

    // ------------------------------------------------------------------
    // Full options
    // ------------------------------------------------------------------

    pub fn resolve<V>(
        &self,
        keys: impl IntoIterator<Item = K>,
        options: ResolveOptions<'_, S::Record, V>,
    ) -> Result<ResultMap<K, V>, ResolveError> {
        resolve(self.store, keys, self.key_field, options)
    }

    pub fn resolve_one<V>(
        &self,
        key: K,
        options: ResolveOptions<'_, S::Record, V>,
    ) -> Result<ResultMap<K, V>, ResolveError> {
        self.resolve(std::iter::once(key), options)
    }

    /// Resolve the keys derived from a slice of source items, e.g. the
    /// foreign keys of a page of parent records.
    pub fn resolve_for<'i, I, V>(
        &self,
        items: impl IntoIterator<Item = &'i I>,
        item_key: impl Fn(&I) -> K,
        options: ResolveOptions<'_, S::Record, V>,
    ) -> Result<ResultMap<K, V>, ResolveError>
    where
        I: 'i + ?Sized,
    {
        self.resolve(items.into_iter().map(item_key), options)
    }
}

impl<S, K> Clone for OneToOne<'_, S, K>
where
    S: RecordStore + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, K> Copy for OneToOne<'_, S, K> where S: RecordStore + ?Sized {}
