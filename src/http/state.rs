//! Shared application state.

use std::sync::{Arc, LazyLock};
use std::time::Instant;

use crate::admission::{AdmissionPolicy, ALLOWED_EXTENSIONS};
use crate::config::{GatewayConfig, LogsConfig};
use crate::ocr::{OcrEngine, OcrProcessor};
use crate::storage::Persistence;

static PROCESS_START: LazyLock<Instant> = LazyLock::new(Instant::now);

/// When the process started. The first call pins the instant; `main` makes
/// that call before anything else.
pub fn process_started_at() -> Instant {
    *PROCESS_START
}

/// Process-wide service description. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct ServiceMetadata {
    pub name: String,
    pub version: &'static str,
    pub runtime_version: String,
    pub environment: String,
    pub test_page: String,
    pub field_name: String,
    pub supported_formats: Vec<&'static str>,
}

impl ServiceMetadata {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            name: config.service.name.clone(),
            version: env!("CARGO_PKG_VERSION"),
            runtime_version: format!("rust-{}", env!("CARGO_PKG_RUST_VERSION")),
            environment: config.environment.clone(),
            test_page: config.service.test_page.clone(),
            field_name: config.uploads.field_name.clone(),
            supported_formats: ALLOWED_EXTENSIONS.to_vec(),
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<ServiceMetadata>,
    pub persistence: Arc<dyn Persistence>,
    pub processor: Arc<OcrProcessor>,
    pub admission: AdmissionPolicy,
    pub logs: LogsConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: &GatewayConfig,
        persistence: Arc<dyn Persistence>,
        engine: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            metadata: Arc::new(ServiceMetadata::from_config(config)),
            processor: Arc::new(OcrProcessor::new(engine, persistence.clone())),
            persistence,
            admission: AdmissionPolicy::from_config(&config.uploads),
            logs: config.logs,
            started_at: process_started_at(),
        }
    }
}
