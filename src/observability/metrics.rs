//! Metrics collection and exposition.
//!
//! # Metrics
//! - `portal_operations_total` (counter): operations by name and outcome
//!   (`ok` or an error kind)
//! - `portal_operation_duration_seconds` (histogram): latency by operation
//! - `portal_chain_healthy` (gauge): 1=endpoint answered the last probe

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished operation.
pub fn record_operation(operation: &'static str, outcome: &'static str, start: Instant) {
    counter!("portal_operations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    histogram!("portal_operation_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record the result of a liveness probe.
pub fn record_chain_health(healthy: bool) {
    gauge!("portal_chain_healthy").set(if healthy { 1.0 } else { 0.0 });
}
