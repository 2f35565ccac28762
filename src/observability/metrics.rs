//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_upstream_requests_total` (counter): Cloudflare calls by
//!   operation and outcome (`ok`, `authentication`, `transport`, ...)
//! - `gateway_upstream_request_duration_seconds` (histogram): latency of the
//!   outbound call by operation

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one outbound Cloudflare call.
pub fn record_upstream_call(operation: &'static str, outcome: &'static str, started: Instant) {
    metrics::counter!(
        "gateway_upstream_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "gateway_upstream_request_duration_seconds",
        "operation" => operation
    )
    .record(started.elapsed().as_secs_f64());
}
