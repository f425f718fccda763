//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mock_requests_total` (counter): catch-all requests by method, status, outcome
//! - `mock_request_duration_seconds` (histogram): catch-all latency
//! - `mock_registry_mutations_total` (counter): register/delete/flush by result
//! - `mock_routes` (gauge): registered route keys
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one resolved (or unresolved) mock request.
pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "mock_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("mock_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a registry mutation attempt.
pub fn record_mutation(op: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("mock_registry_mutations_total", "op" => op, "result" => result).increment(1);
}

pub fn set_route_count(count: usize) {
    metrics::gauge!("mock_routes").set(count as f64);
}
