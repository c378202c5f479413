use serde::{Deserialize, Serialize};
use std::{cell::RefCell, cmp::Ordering, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for resolver activity on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Resolver entrypoints
    pub resolve_calls: u64,
    pub resolve_failures: u64,
    pub invalid_arguments: u64,

    // Store round trips
    pub fetch_calls: u64,
    pub fetch_skipped: u64,
    pub keys_requested: u64,
    pub rows_fetched: u64,

    // Fold outcome
    pub entries_resolved: u64,
    pub key_collisions: u64,
    pub rows_unrequested: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub resolve_calls: u64,
    pub resolve_failures: u64,
    pub fetch_calls: u64,
    pub keys_requested: u64,
    pub rows_fetched: u64,
    pub entries_resolved: u64,
    pub key_collisions: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
/// Event/counter report for this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since the last reset.
    pub counters: Option<EventState>,
    /// Per-entity counters and averages.
    pub entity_counters: Vec<EntitySummary>,
}

///
/// EntitySummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntitySummary {
    pub path: String,
    pub resolve_calls: u64,
    pub resolve_failures: u64,
    pub fetch_calls: u64,
    pub keys_requested: u64,
    pub rows_fetched: u64,
    pub entries_resolved: u64,
    pub key_collisions: u64,
    pub avg_keys_per_fetch: f64,
    pub hit_ratio: f64,
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Build a metrics report, busiest entities first.
#[must_use]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let mut entity_counters: Vec<EntitySummary> = snap
        .entities
        .iter()
        .map(|(path, ops)| EntitySummary {
            path: path.clone(),
            resolve_calls: ops.resolve_calls,
            resolve_failures: ops.resolve_failures,
            fetch_calls: ops.fetch_calls,
            keys_requested: ops.keys_requested,
            rows_fetched: ops.rows_fetched,
            entries_resolved: ops.entries_resolved,
            key_collisions: ops.key_collisions,
            avg_keys_per_fetch: ratio(ops.keys_requested, ops.fetch_calls),
            hit_ratio: ratio(ops.entries_resolved, ops.keys_requested),
        })
        .collect();

    entity_counters.sort_by(|a, b| match b.keys_requested.cmp(&a.keys_requested) {
        Ordering::Equal => a.path.cmp(&b.path),
        other => other,
    });

    EventReport {
        counters: Some(snap),
        entity_counters,
    }
}

///
/// TESTS
///
