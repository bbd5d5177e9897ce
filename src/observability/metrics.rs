//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_probes_total` (counter): probes by domain, region, result
//! - `failover_probe_duration_seconds` (histogram): probe latency
//! - `failover_region_healthy` (gauge): 1=healthy, 0=unhealthy
//! - `failover_transitions_total` (counter): active-region changes
//! - `failover_dns_updates_total` (counter): record writes by result
//!
//! # Design Decisions
//! - Prometheus exporter on its own listener, separate from the status API
//! - Low-overhead updates; labels limited to domain/region/result

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one probe outcome.
pub fn record_probe(domain: &str, region: &str, healthy: bool, latency: Duration) {
    let result = if healthy { "success" } else { "failure" };
    metrics::counter!(
        "failover_probes_total",
        "domain" => domain.to_string(),
        "region" => region.to_string(),
        "result" => result,
    )
    .increment(1);

    metrics::histogram!(
        "failover_probe_duration_seconds",
        "domain" => domain.to_string(),
        "region" => region.to_string(),
    )
    .record(latency.as_secs_f64());

    metrics::gauge!(
        "failover_region_healthy",
        "domain" => domain.to_string(),
        "region" => region.to_string(),
    )
    .set(if healthy { 1.0 } else { 0.0 });
}

/// Record an active-region transition.
pub fn record_transition(domain: &str, to_region: &str) {
    metrics::counter!(
        "failover_transitions_total",
        "domain" => domain.to_string(),
        "to_region" => to_region.to_string(),
    )
    .increment(1);
}

/// Record a DNS write attempt (or a failed fetch, which also counts as a
/// failed pass).
pub fn record_dns_update(domain: &str, success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!(
        "failover_dns_updates_total",
        "domain" => domain.to_string(),
        "result" => result,
    )
    .increment(1);
}
