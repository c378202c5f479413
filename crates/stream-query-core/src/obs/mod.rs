//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Resolver code never touches metrics state directly; it emits
//! `MetricsEvent`s through the sink boundary.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EntitySummary, EventOps, EventReport, EventState};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
