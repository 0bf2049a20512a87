//! Prometheus metrics for request and database latency.
//!
//! The macros are no-ops until a recorder is installed; [`install_exporter`]
//! installs the Prometheus one on its own listener.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

use crate::error::ServiceError;

// === Metric Name Constants ===

/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Database operation latency metric name.
pub const METRIC_DB_OPERATION_LATENCY: &str = "db_operation_latency_ms";
/// Database operation failures counter metric name.
pub const METRIC_DB_OPERATION_FAILURES: &str = "db_operation_failures_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_DB_OPERATION_LATENCY,
        "Database round trip latency in milliseconds, connection included"
    );
    describe_counter!(
        METRIC_DB_OPERATION_FAILURES,
        "Total number of failed database operations"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter listening on `0.0.0.0:port`.
///
/// Must be called from within the Tokio runtime.
pub fn install_exporter(port: u16) -> Result<(), ServiceError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ServiceError::Metrics(e.to_string()))?;
    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record a served HTTP request.
pub fn record_http_request(method: &str, status: u16, latency: Duration) {
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "method" => method.to_string())
        .record(latency.as_secs_f64() * 1000.0);
}

/// Increment the failure counter for a database operation.
pub fn inc_db_failures(operation: &'static str, kind: &'static str) {
    counter!(METRIC_DB_OPERATION_FAILURES, "operation" => operation, "kind" => kind).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    operation: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for a database operation.
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_DB_OPERATION_LATENCY, "operation" => self.operation)
            .record(self.elapsed_ms());
    }
}

/// Create a latency timer for a database operation.
pub fn timer_db(operation: &'static str) -> LatencyTimer {
    LatencyTimer::new(operation)
}
