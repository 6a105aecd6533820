//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): request latency
//! - `gateway_admissions_total` (counter): admission decisions by outcome
//! - `gateway_ocr_duration_seconds` (histogram): engine time by engine, outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! recorder, so handlers and tests never need to check whether it is on.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_DURATION: &str = "gateway_request_duration_seconds";
pub const ADMISSIONS_TOTAL: &str = "gateway_admissions_total";
pub const OCR_DURATION: &str = "gateway_ocr_duration_seconds";

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
    describe_histogram!(REQUEST_DURATION, "HTTP request duration in seconds");
    describe_counter!(ADMISSIONS_TOTAL, "Upload admission decisions");
    describe_histogram!(OCR_DURATION, "OCR engine duration in seconds");

    tracing::info!(address = %addr, "Prometheus metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!(REQUESTS_TOTAL, &labels).increment(1);
    histogram!(REQUEST_DURATION, &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_admission(outcome: &'static str) {
    counter!(ADMISSIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_ocr(engine: &'static str, ok: bool, elapsed: Duration) {
    let outcome = if ok { "success" } else { "failed" };
    histogram!(OCR_DURATION, "engine" => engine, "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
