//! Metrics sink boundary.
//!
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.
//! This module is the only bridge between resolver logic and the
//! thread-local metrics state.

use crate::{error::ErrorClass, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ResolveStart {
        entity_path: &'static str,
    },
    FetchSkipped {
        entity_path: &'static str,
    },
    Fetch {
        entity_path: &'static str,
        keys: u64,
        rows: u64,
    },
    ResolveFinish {
        entity_path: &'static str,
        entries: u64,
        collisions: u64,
        unrequested: u64,
    },
    ResolveFailed {
        entity_path: &'static str,
        class: ErrorClass,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ResolveStart { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.resolve_calls = m.ops.resolve_calls.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.resolve_calls = entry.resolve_calls.saturating_add(1);
                });
            }

            MetricsEvent::FetchSkipped { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.fetch_skipped = m.ops.fetch_skipped.saturating_add(1);
                });
            }

            MetricsEvent::Fetch {
                entity_path,
                keys,
                rows,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.fetch_calls = m.ops.fetch_calls.saturating_add(1);
                    m.ops.keys_requested = m.ops.keys_requested.saturating_add(keys);
                    m.ops.rows_fetched = m.ops.rows_fetched.saturating_add(rows);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.fetch_calls = entry.fetch_calls.saturating_add(1);
                    entry.keys_requested = entry.keys_requested.saturating_add(keys);
                    entry.rows_fetched = entry.rows_fetched.saturating_add(rows);
                });
            }

            MetricsEvent::ResolveFinish {
                entity_path,
                entries,
                collisions,
                unrequested,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.entries_resolved = m.ops.entries_resolved.saturating_add(entries);
                    m.ops.key_collisions = m.ops.key_collisions.saturating_add(collisions);
                    m.ops.rows_unrequested = m.ops.rows_unrequested.saturating_add(unrequested);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.entries_resolved = entry.entries_resolved.saturating_add(entries);
                    entry.key_collisions = entry.key_collisions.saturating_add(collisions);
                });
            }

            MetricsEvent::ResolveFailed { entity_path, class } => {
                metrics::with_state_mut(|m| {
                    m.ops.resolve_failures = m.ops.resolve_failures.saturating_add(1);
                    if class == ErrorClass::InvalidArgument {
                        m.ops.invalid_arguments = m.ops.invalid_arguments.saturating_add(1);
                    }
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.resolve_failures = entry.resolve_failures.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// ResolveSpan
/// RAII guard that emits start/finish events for one resolve call.
/// A span dropped without `finish` or `fail` (unwind out of a caller
/// closure) is reported as an internal failure.
///

pub(crate) struct ResolveSpan {
    entity_path: &'static str,
    closed: bool,
}

impl ResolveSpan {
    #[must_use]
    pub(crate) fn new(entity_path: &'static str) -> Self {
        record(MetricsEvent::ResolveStart { entity_path });

        Self {
            entity_path,
            closed: false,
        }
    }

    pub(crate) fn skipped(&self) {
        record(MetricsEvent::FetchSkipped {
            entity_path: self.entity_path,
        });
    }

    pub(crate) fn fetched(&self, keys: usize, rows: usize) {
        record(MetricsEvent::Fetch {
            entity_path: self.entity_path,
            keys: keys as u64,
            rows: rows as u64,
        });
    }

    pub(crate) fn finish(mut self, entries: usize, collisions: u64, unrequested: u64) {
        self.closed = true;
        record(MetricsEvent::ResolveFinish {
            entity_path: self.entity_path,
            entries: entries as u64,
            collisions,
            unrequested,
        });
    }

    pub(crate) fn fail(mut self, class: ErrorClass) {
        self.closed = true;
        record(MetricsEvent::ResolveFailed {
            entity_path: self.entity_path,
            class,
        });
    }
}

impl Drop for ResolveSpan {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            record(MetricsEvent::ResolveFailed {
                entity_path: self.entity_path,
                class: ErrorClass::Internal,
            });
        }
    }
}

///
/// TESTS
///
