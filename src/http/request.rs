//! Request tracking.
//!
//! # Responsibilities
//! - Name the request id header shared by the id layers and the logs
//! - Time every request and log `METHOD PATH - STATUS (N.NNms)`
//! - Feed request counters and latency histograms
//!
//! # Design Decisions
//! - Request ID added as early as possible (outer layer) for tracing
//! - Metric labels use the route, not the raw path, to bound cardinality

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::observability::metrics;
use crate::routes::ROUTE_PATHS;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read the correlation id set by the request id layer.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> &str {
        self.get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Timing wrapper around every request.
pub async fn track_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.headers().request_id().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        duration_ms = elapsed_ms,
        "{} {} - {} ({:.2}ms)",
        method,
        path,
        status,
        elapsed_ms
    );
    metrics::record_request(method.as_str(), status, route_label(&path), start);

    response
}

/// Metric label for `path`.
pub fn route_label(path: &str) -> &'static str {
    if let Some(known) = ROUTE_PATHS.iter().find(|p| **p == path) {
        return *known;
    }
    if path.starts_with("/static/") {
        return "/static";
    }
    "unmatched"
}
