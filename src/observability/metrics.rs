//! Metrics collection and exposition.
//!
//! # Metrics
//! - `visitor_requests_total` (counter): handled requests by status
//! - `visitor_request_duration_seconds` (histogram): handler latency
//! - `visitor_store_errors_total` (counter): failed store operations by operation
//! - `visitor_request_timeouts_total` (counter): requests cut off by the timeout layer
//! - `visitor_count` (gauge): last counter value returned by the store
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own scrape listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(status: u16, start_time: Instant) {
    counter!("visitor_requests_total", "status" => status.to_string()).increment(1);
    histogram!("visitor_request_duration_seconds").record(start_time.elapsed().as_secs_f64());
}

pub fn record_store_error(operation: &'static str) {
    counter!("visitor_store_errors_total", "operation" => operation).increment(1);
}

pub fn record_timeout() {
    counter!("visitor_request_timeouts_total").increment(1);
}

pub fn record_visitor_count(count: i64) {
    gauge!("visitor_count").set(count as f64);
}
