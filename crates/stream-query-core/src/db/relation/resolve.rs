use crate::{
    db::{
        query::{FetchRequest, QueryCustomizer, QueryError, Refinement, predicate},
        relation::{KeySet, ResolveOptions, ResultMap},
        store::RecordStore,
    },
    error::ResolveError,
    func,
    model::field::Field,
    obs::sink::ResolveSpan,
    traits::FieldValue,
};

///
/// Folded
/// Result map plus the fold statistics reported to metrics.
///

struct Folded<K, V> {
    map: ResultMap<K, V>,
    collisions: u64,
    unrequested: u64,
}

impl<K, V> Folded<K, V> {
    const fn empty() -> Self {
        Self {
            map: ResultMap::new(),
            collisions: 0,
            unrequested: 0,
        }
    }
}

/// Resolve a batch of keys to one value per key with a single fetch.
///
/// Duplicate keys collapse; an empty key set returns an empty map without
/// touching the store. When several records share a key the last one in
/// fetch order wins. Records whose key was not requested are ignored.
pub fn resolve<S, K, V>(
    store: &S,
    keys: impl IntoIterator<Item = K>,
    key_field: Field<S::Record, K>,
    options: ResolveOptions<'_, S::Record, V>,
) -> Result<ResultMap<K, V>, ResolveError>
where
    S: RecordStore + ?Sized,
    K: FieldValue + Ord,
{
    let span = ResolveSpan::new(store.entity_path());

    match resolve_inner(store, keys, key_field, &options, &span) {
        Ok(folded) => {
            span.finish(folded.map.len(), folded.collisions, folded.unrequested);
            Ok(folded.map)
        }
        Err(err) => {
            span.fail(err.class());
            Err(err)
        }
    }
}

/// Resolve a single key. The result has zero or one entries.
pub fn resolve_one<S, K, V>(
    store: &S,
    key: K,
    key_field: Field<S::Record, K>,
    options: ResolveOptions<'_, S::Record, V>,
) -> Result<ResultMap<K, V>, ResolveError>
where
    S: RecordStore + ?Sized,
    K: FieldValue + Ord,
{
    resolve(store, std::iter::once(key), key_field, options)
}

/// Resolve the keys derived from borrowed source items.
pub fn resolve_for<'i, S, I, K, V>(
    store: &S,
    items: impl IntoIterator<Item = &'i I>,
    item_key: impl Fn(&I) -> K,
    key_field: Field<S::Record, K>,
    options: ResolveOptions<'_, S::Record, V>,
) -> Result<ResultMap<K, V>, ResolveError>
where
    S: RecordStore + ?Sized,
    I: 'i + ?Sized,
    K: FieldValue + Ord,
{
    let keys = items.into_iter().map(item_key);

    resolve(store, keys, key_field, options)
}

fn resolve_inner<S, K, V>(
    store: &S,
    keys: impl IntoIterator<Item = K>,
    key_field: Field<S::Record, K>,
    options: &ResolveOptions<'_, S::Record, V>,
    span: &ResolveSpan,
) -> Result<Folded<K, V>, ResolveError>
where
    S: RecordStore + ?Sized,
    K: FieldValue + Ord,
{
    // Phase 1: argument validation, before any I/O.
    let refinement = prepare_refinement(key_field.name(), options.customizer())?;
    let keys: KeySet<K> = keys.into_iter().collect();
    if let Some(limit) = options.key_limit()
        && keys.len() > limit
    {
        return Err(QueryError::TooManyKeys {
            count: keys.len(),
            limit,
        }
        .into());
    }

    if keys.is_empty() {
        span.skipped();
        return Ok(Folded::empty());
    }

    // Phase 2: the single round trip.
    let request = FetchRequest::new(
        store.entity_path(),
        key_field.name(),
        keys.to_values(),
        refinement,
    );
    let fetched = store.fetch(&request);
    span.fetched(keys.len(), fetched.as_ref().map_or(0, Vec::len));
    let records = fetched?;

    // Phase 3: fold.
    Ok(fold(records, &keys, key_field, options))
}

fn prepare_refinement(
    key_field: &str,
    customizer: Option<&dyn QueryCustomizer>,
) -> Result<Refinement, QueryError> {
    predicate::validate_field_name(key_field)?;

    let mut refinement = Refinement::new();
    if let Some(customizer) = customizer {
        customizer.customize(&mut refinement);
    }
    refinement.validate(key_field)?;

    Ok(refinement)
}

fn fold<R, K, V>(
    records: Vec<R>,
    keys: &KeySet<K>,
    key_field: Field<R, K>,
    options: &ResolveOptions<'_, R, V>,
) -> Folded<K, V>
where
    K: Ord,
{
    let last_wins = func::just_after();
    let mut folded = Folded::empty();

    for record in records {
        let key = key_field.get(&record);
        if !keys.contains(&key) {
            folded.unrequested += 1;
            continue;
        }

        let value = options.apply(record);
        if folded.map.merge_with(key, value, last_wins) {
            folded.collisions += 1;
        }
    }

    folded
}
