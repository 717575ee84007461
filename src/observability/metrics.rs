//! Metrics collection and exposition.
//!
//! # Metrics
//! - `blog_proxy_requests_total` (counter): inbound requests by method, route, status
//! - `blog_proxy_request_duration_seconds` (histogram): inbound latency by method, route
//! - `blog_proxy_upstream_requests_total` (counter): upstream calls by operation, outcome
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished inbound request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "blog_proxy_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "blog_proxy_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call.
pub fn record_upstream(operation: &'static str, outcome: &'static str) {
    counter!(
        "blog_proxy_upstream_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
