//! OCR Gateway Library

pub mod admission;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod ocr;
pub mod routes;
pub mod storage;

pub use config::schema::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::{AppState, HttpServer};
pub use lifecycle::ShutdownCoordinator;
