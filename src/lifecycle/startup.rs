//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Select and initialize the log store
//! - Build the OCR engine, shared state and router
//! - Bind the listener and serve until the coordinator closes
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)
//! - A log store that fails to initialize leaves the gateway degraded unless
//!   `database.require_on_startup` is set

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{DatabaseConfig, GatewayConfig};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::shutdown::ShutdownCoordinator;
use crate::lifecycle::signals::spawn_signal_listener;
use crate::observability::metrics;
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::storage::{MemoryPersistence, Persistence, PostgresPersistence, StorageError};

/// Fatal startup or serve failure.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(String),

    #[error("Log store unavailable: {0}")]
    Persistence(#[from] StorageError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// PostgreSQL when a URL is configured, the in-memory ring otherwise.
pub fn build_persistence(config: &DatabaseConfig) -> Result<Arc<dyn Persistence>, StorageError> {
    match config.url.as_deref() {
        Some(url) => {
            let store = PostgresPersistence::connect_lazy(url, config)?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, OCR logs are kept in memory only");
            Ok(Arc::new(MemoryPersistence::new()))
        }
    }
}

/// Run `initialize()` and apply the degraded-startup policy.
pub async fn initialize_persistence(
    persistence: &dyn Persistence,
    require: bool,
) -> Result<(), StartupError> {
    match persistence.initialize().await {
        Ok(()) => {
            tracing::info!(store = %persistence.info().kind, "Log store initialized");
            Ok(())
        }
        Err(e) if require => {
            tracing::error!(error = %e, "Failed to initialize database");
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to initialize database, continuing without a connected log store"
            );
            Ok(())
        }
    }
}

/// Start every subsystem and serve until shutdown.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let persistence = build_persistence(&config.database)?;
    initialize_persistence(persistence.as_ref(), config.database.require_on_startup).await?;

    let engine: Arc<dyn OcrEngine> = Arc::new(TesseractEngine::new(&config.ocr, &config.uploads));
    tracing::info!(engine = engine.name(), language = %config.ocr.language, "OCR engine ready");

    let state = AppState::new(&config, persistence.clone(), engine);
    let server = HttpServer::new(&config, state);

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        address = %address,
        environment = %config.environment,
        "{} listening on port {}",
        config.service.name,
        config.listener.port
    );

    let coordinator = Arc::new(ShutdownCoordinator::new(
        persistence,
        config.shutdown.drain_timeout(),
    ));
    spawn_signal_listener(coordinator.clone());

    server
        .run(listener, coordinator)
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Server closed");
    Ok(())
}
