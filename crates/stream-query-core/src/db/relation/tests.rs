use crate::{
    db::{
        query::{QueryError, Refinement},
        relation::{KeySet, OneToOne, ResolveOptions, ResultMap, resolve, resolve_for, resolve_one},
        store::MemoryStore,
    },
    error::{ErrorClass, ErrorOrigin, InternalError, ResolveError},
    model::field::Field,
    obs::{metrics_report, metrics_reset_all},
    test_support::{FailingStore, ScriptedStore, UserInfo, seed_users, seeded_store},
    value::Value,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn users(store: &MemoryStore<UserInfo>) -> OneToOne<'_, MemoryStore<UserInfo>, u64> {
    OneToOne::new(store, UserInfo::ID)
}

fn name_of(user: UserInfo) -> Option<String> {
    user.name
}

// ---- basic shapes ------------------------------------------------------

#[test]
fn query_returns_whole_records_by_default() {
    let store = seeded_store();

    let result = users(&store).query([1, 3]).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[&1].name.as_deref(), Some("Jone"));
    assert_eq!(result[&3].age, Some(28));
    assert_eq!(store.fetch_count(), 1);
}

#[test]
fn query_values_applies_projector() {
    let store = seeded_store();

    let result = users(&store).query_values([2, 4], name_of).unwrap();

    assert_eq!(
        result.into_inner(),
        BTreeMap::from([(2, Some("Jack".to_string())), (4, Some("Sandy".to_string()))])
    );
}

#[test]
fn customizer_narrows_the_fetch() {
    let store = seeded_store();

    let result = users(&store)
        .query_with(
            |q| {
                q.lte(UserInfo::AGE, 22);
            },
            1..=5,
            |user| user.age,
        )
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![1, 2, 4]);
}

#[test]
fn missing_keys_are_absent_not_errors() {
    let store = seeded_store();

    let result = users(&store).query_one(999).unwrap();

    assert!(result.is_empty());
    assert_eq!(store.fetch_count(), 1);
}

#[test]
fn known_and_missing_keys_mix() {
    let store: MemoryStore<UserInfo> = seed_users().into_iter().take(1).collect();

    let result = users(&store).query([1, 999]).unwrap();

    assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn selection_and_text_filter_on_projected_values() {
    let store = seeded_store();

    let result = users(&store)
        .query_with(
            |q| {
                q.select(UserInfo::ID).select(UserInfo::NAME);
            },
            1..=5,
            |user| user.name.is_some_and(|name| name.contains('a')),
        )
        .unwrap();

    assert_eq!(result.len(), 5);
    assert_eq!(result.values().filter(|hit| **hit).count(), 2);
}

#[test]
fn selection_clears_unselected_fields_on_returned_records() {
    let store = seeded_store();

    let result = users(&store)
        .query_one_with(
            |q| {
                q.select(UserInfo::ID).select(UserInfo::NAME);
            },
            4,
            |user| user,
        )
        .unwrap();

    let (key, user) = result.into_single().unwrap();
    assert_eq!(key, 4);
    assert_eq!(user.name.as_deref(), Some("Sandy"));
    assert_eq!(user.age, None);
    assert_eq!(user.email, None);
}

#[test]
fn query_one_values_yields_at_most_one_entry() {
    let store = seeded_store();

    let result = users(&store).query_one_values(5, |user| user.age).unwrap();

    assert_eq!(result.into_single(), Some((5, Some(24))));
}

// ---- batching ----------------------------------------------------------

#[test]
fn empty_input_never_touches_the_store() {
    let store = ScriptedStore::new(seed_users());

    let result = resolve(&store, Vec::<u64>::new(), UserInfo::ID, ResolveOptions::new()).unwrap();

    assert!(result.is_empty());
    assert_eq!(store.fetch_count(), 0);
}

#[test]
fn duplicate_input_keys_are_fetched_once() {
    let store = ScriptedStore::new(seed_users());

    let result = resolve(&store, [3, 1, 3, 1, 1], UserInfo::ID, ResolveOptions::new()).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(store.fetch_count(), 1);

    let request = store.last_request().unwrap();
    assert_eq!(request.key_field, "id");
    assert_eq!(request.keys, vec![Value::Uint(1), Value::Uint(3)]);
    assert!(request.refinement.is_empty());
}

#[test]
fn unrequested_records_are_ignored() {
    // the scripted store answers with every row regardless of the request
    let store = ScriptedStore::new(seed_users());

    let result = resolve(&store, [2], UserInfo::ID, ResolveOptions::new()).unwrap();

    assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn colliding_records_resolve_to_the_last_one_fetched() {
    let store = ScriptedStore::new(vec![
        UserInfo::new(7, "first", 30, "a@example.com"),
        UserInfo::new(8, "other", 31, "b@example.com"),
        UserInfo::new(7, "second", 32, "c@example.com"),
    ]);

    let result = resolve(
        &store,
        [7, 8],
        UserInfo::ID,
        ResolveOptions::new().project(name_of),
    )
    .unwrap();

    assert_eq!(result[&7].as_deref(), Some("second"));
    assert_eq!(result[&8].as_deref(), Some("other"));
}

#[test]
fn resolve_for_derives_keys_from_items() {
    struct Order {
        user_id: u64,
    }

    let store = seeded_store();
    let orders = [Order { user_id: 5 }, Order { user_id: 2 }, Order { user_id: 5 }];

    let result = resolve_for(
        &store,
        &orders,
        |order: &Order| order.user_id,
        UserInfo::ID,
        ResolveOptions::new().project(name_of),
    )
    .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[&5].as_deref(), Some("Billie"));
    assert_eq!(store.fetch_count(), 1);

    let via_relation = users(&store)
        .resolve_for(&orders, |order: &Order| order.user_id, ResolveOptions::new())
        .unwrap();
    assert_eq!(via_relation.len(), 2);
}

#[test]
fn key_set_feeds_resolve_directly() {
    let store = seeded_store();
    let mut keys = KeySet::singleton(1);
    keys.insert(2);
    keys.extend([2, 3]);

    let result = users(&store).resolve(keys, ResolveOptions::new()).unwrap();

    assert_eq!(result.len(), 3);
}

#[test]
fn text_keyed_relations_work() {
    const NAME_KEY: Field<UserInfo, String> =
        Field::new("name", |u: &UserInfo| u.name.clone().unwrap_or_default());

    let store = seeded_store();
    let by_name = OneToOne::new(&store, NAME_KEY);

    let result = by_name
        .query_values(["Tom".to_string(), "Nobody".to_string()], |user| user.id)
        .unwrap();

    assert_eq!(result.into_inner(), BTreeMap::from([("Tom".to_string(), 3)]));
}

// ---- failures ----------------------------------------------------------

#[test]
fn store_failures_pass_through_unchanged() {
    let failure = InternalError::store_unavailable("connection refused");
    let store: FailingStore<UserInfo> = FailingStore::new(failure.clone());

    let err = resolve_one(&store, 1, UserInfo::ID, ResolveOptions::new()).unwrap_err();

    assert_eq!(err.as_store(), Some(&failure));
    assert_eq!(err.class(), ErrorClass::Unavailable);
    assert_eq!(err.to_string(), "connection refused");
    assert_eq!(store.fetch_count(), 1);
}

#[test]
fn empty_input_skips_a_failing_store() {
    let store: FailingStore<UserInfo> = FailingStore::new(InternalError::store_internal("boom"));

    let result = resolve(&store, Vec::<u64>::new(), UserInfo::ID, ResolveOptions::new()).unwrap();

    assert!(result.is_empty());
    assert_eq!(store.fetch_count(), 0);
}

#[test]
fn empty_key_field_name_is_invalid() {
    let store = ScriptedStore::new(seed_users());
    let unnamed: Field<UserInfo, u64> = Field::new("", |u: &UserInfo| u.id);

    let err = resolve(&store, [1], unnamed, ResolveOptions::new()).unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(store.fetch_count(), 0);
}

#[test]
fn invalid_refinement_is_rejected_before_fetch() {
    let store = ScriptedStore::new(seed_users());
    let missing_key = |q: &mut Refinement| {
        q.select(UserInfo::NAME);
    };

    let err = resolve(
        &store,
        [1],
        UserInfo::ID,
        ResolveOptions::new().customize(missing_key),
    )
    .unwrap_err();

    assert!(matches!(err, ResolveError::InvalidArgument { .. }));
    assert_eq!(
        err.to_string(),
        format!(
            "invalid argument: {}",
            QueryError::SelectionMissingKey { field: "id".into() }
        )
    );
    assert_eq!(store.fetch_count(), 0);
}

#[test]
fn validation_runs_even_for_empty_input() {
    let store = ScriptedStore::new(seed_users());
    let empty_in = |q: &mut Refinement| {
        q.in_(UserInfo::AGE, Vec::<u32>::new());
    };

    let err = resolve(
        &store,
        Vec::<u64>::new(),
        UserInfo::ID,
        ResolveOptions::new().customize(empty_in),
    )
    .unwrap_err();

    assert_eq!(err.class(), ErrorClass::InvalidArgument);
}

#[test]
fn max_keys_counts_distinct_keys() {
    let store = ScriptedStore::new(seed_users());

    let ok = resolve(
        &store,
        [1, 1, 2],
        UserInfo::ID,
        ResolveOptions::new().max_keys(2),
    );
    assert!(ok.is_ok());

    let err = resolve(
        &store,
        [1, 2, 3],
        UserInfo::ID,
        ResolveOptions::new().max_keys(2),
    )
    .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(store.fetch_count(), 1);
}

#[test]
fn unsupported_field_surfaces_as_store_error() {
    let store = seeded_store();

    let err = users(&store)
        .query_with(
            |q| {
                q.eq("nickname", "jj");
            },
            [1],
            name_of,
        )
        .unwrap_err();

    let store_err = err.as_store().unwrap();
    assert_eq!(store_err.class, ErrorClass::Unsupported);
    assert_eq!(store_err.origin, ErrorOrigin::Store);
}

// ---- metrics -----------------------------------------------------------

#[test]
fn resolve_calls_are_counted() {
    metrics_reset_all();
    let store = ScriptedStore::new(vec![
        UserInfo::new(1, "a", 1, "a@example.com"),
        UserInfo::new(1, "b", 2, "b@example.com"),
        UserInfo::new(9, "c", 3, "c@example.com"),
    ]);

    resolve(&store, [1, 2], UserInfo::ID, ResolveOptions::new()).unwrap();
    resolve(&store, Vec::<u64>::new(), UserInfo::ID, ResolveOptions::new()).unwrap();
    let unnamed: Field<UserInfo, u64> = Field::new("", |u: &UserInfo| u.id);
    resolve(&store, [1], unnamed, ResolveOptions::new()).unwrap_err();

    let report = metrics_report();
    let ops = report.counters.map(|c| c.ops).unwrap_or_default();
    assert_eq!(ops.resolve_calls, 3);
    assert_eq!(ops.resolve_failures, 1);
    assert_eq!(ops.invalid_arguments, 1);
    assert_eq!(ops.fetch_calls, 1);
    assert_eq!(ops.fetch_skipped, 1);
    assert_eq!(ops.keys_requested, 2);
    assert_eq!(ops.rows_fetched, 3);
    assert_eq!(ops.entries_resolved, 1);
    assert_eq!(ops.key_collisions, 1);
    assert_eq!(ops.rows_unrequested, 1);

    let scripted = &report.entity_counters[0];
    assert_eq!(scripted.path, "scripted");
    assert_eq!(scripted.resolve_calls, 3);
}

#[test]
fn failed_fetches_still_count_as_round_trips() {
    metrics_reset_all();
    let store: FailingStore<UserInfo> =
        FailingStore::new(InternalError::store_unavailable("connection refused"));

    resolve(&store, [1, 2], UserInfo::ID, ResolveOptions::new()).unwrap_err();

    let report = metrics_report();
    let ops = report.counters.map(|c| c.ops).unwrap_or_default();
    assert_eq!(store.fetch_count(), 1);
    assert_eq!(ops.fetch_calls, 1);
    assert_eq!(ops.keys_requested, 2);
    assert_eq!(ops.rows_fetched, 0);
    assert_eq!(ops.resolve_failures, 1);
    assert_eq!(ops.invalid_arguments, 0);
    assert_eq!(report.entity_counters[0].fetch_calls, 1);
}

// ---- properties --------------------------------------------------------

fn arb_keys() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..9, 0..12)
}

proptest! {
    #[test]
    fn result_size_is_distinct_matching_keys(keys in arb_keys()) {
        let store = seeded_store();
        let known: BTreeSet<u64> = store.rows().iter().map(|u| u.id).collect();
        let expected = keys.iter().collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|k| known.contains(k))
            .count();

        let result = users(&store).query(keys.clone()).unwrap();

        prop_assert_eq!(result.len(), expected);
        prop_assert!(result.keys().all(|k| keys.contains(k)));
        prop_assert!(result.iter().all(|(k, user)| user.id == *k));
        prop_assert_eq!(store.fetch_count(), u64::from(!keys.is_empty()));
    }

    #[test]
    fn resolving_twice_gives_the_same_map(keys in arb_keys()) {
        let store = seeded_store();
        let relation = users(&store);

        let first = relation.query_values(keys.clone(), name_of).unwrap();
        let second = relation.query_values(keys, name_of).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn single_key_matches_batch_of_one(key in 0u64..9) {
        let store = seeded_store();
        let relation = users(&store);

        let single = relation.query_one_values(key, name_of).unwrap();
        let batch = relation.query_values([key], name_of).unwrap();

        prop_assert_eq!(single, batch);
    }

    #[test]
    fn last_fetched_record_wins(
        rows in prop::collection::vec((0u64..4, 0u32..100), 0..16),
    ) {
        let records: Vec<UserInfo> = rows
            .iter()
            .map(|(id, age)| UserInfo { id: *id, age: Some(*age), ..Default::default() })
            .collect();
        let mut expected: BTreeMap<u64, Option<u32>> = BTreeMap::new();
        for (id, age) in &rows {
            expected.insert(*id, Some(*age));
        }
        let store = ScriptedStore::new(records);

        let result: ResultMap<u64, Option<u32>> =
            resolve(&store, 0..4, UserInfo::ID, ResolveOptions::new().project(UserInfo::AGE.projector())).unwrap();

        prop_assert_eq!(result.into_inner(), expected);
    }
}
