//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID header, timing wrapper)
//!     → routes (/, /health, /api, POST /ocr, /logs) or not-found fallback
//!     → response.rs (error boundary: every failure becomes a JSON envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod state;

pub use request::{track_request, RequestIdExt, X_REQUEST_ID};
pub use response::ErrorEnvelope;
pub use server::HttpServer;
pub use state::{AppState, ServiceMetadata};
