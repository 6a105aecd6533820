//! API route handlers
//!
//! - `info`: service info (`GET /`) and API documentation (`GET /api`)
//! - `health`: liveness (`GET /health`)
//! - `ocr`: image submission (`POST /ocr`)
//! - `logs`: recent OCR log rows (`GET /logs`)
//! - `fallback`: the not-found responder for everything else

pub mod fallback;
pub mod health;
pub mod info;
pub mod logs;
pub mod ocr;

pub use fallback::not_found;

/// Paths served by the route table.
pub const ROUTE_PATHS: [&str; 5] = ["/", "/health", "/api", "/ocr", "/logs"];

/// Routes advertised by the not-found responder.
pub const AVAILABLE_ROUTES: [&str; 5] = ["/", "/health", "/api", "POST /ocr", "/logs"];

/// ISO-8601 UTC timestamp with millisecond precision.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
