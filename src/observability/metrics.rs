//! Navigation metrics.
//!
//! # Metrics
//! - `router_navigations_total` (counter): finished navigations by outcome
//! - `router_navigation_duration_seconds` (histogram): location change to mount
//! - `router_controller_destroyed_total` (counter): controllers torn down
//!
//! # Design Decisions
//! - Outcome labels: mounted, superseded, not_found, loader_failed, init_failed
//! - Recording goes through the `metrics` facade; no exporter is bundled

use std::time::Instant;

pub const NAVIGATIONS_TOTAL: &str = "router_navigations_total";
pub const NAVIGATION_DURATION: &str = "router_navigation_duration_seconds";
pub const CONTROLLER_DESTROYED: &str = "router_controller_destroyed_total";

/// Record a finished navigation.
pub fn record_navigation(outcome: &'static str, started: Instant) {
    ::metrics::counter!(NAVIGATIONS_TOTAL, "outcome" => outcome).increment(1);
    ::metrics::histogram!(NAVIGATION_DURATION, "outcome" => outcome).record(started.elapsed().as_secs_f64());
}

/// Record a controller teardown.
pub fn record_destroyed() {
    ::metrics::counter!(CONTROLLER_DESTROYED).increment(1);
}
