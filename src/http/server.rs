//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the five routes and the not-found fallback
//! - Wire up middleware (panic catching, request ID, tracing, CORS, timing)
//! - Bound the `/ocr` body and serve `/static`
//! - Serve on a listener until the shutdown coordinator reports `Closed`

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::track_request;
use crate::http::response::panic_response;
use crate::http::state::AppState;
use crate::lifecycle::ShutdownCoordinator;
use crate::routes::{health, info, logs, not_found, ocr};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// HTTP server for the OCR gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(config: &GatewayConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Every route falls back to the not-found responder for other methods,
    /// and the router falls back to it for other paths and missing assets.
    /// Layers run outermost first: catch-panic, request id, trace, CORS, timing.
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let upload_limit = config.uploads.max_file_size.saturating_add(MULTIPART_OVERHEAD);

        let mut router = Router::new()
            .route("/", get(info::service_info).fallback(not_found))
            .route("/health", get(health::health_check).fallback(not_found))
            .route("/api", get(info::api_doc).fallback(not_found))
            .route(
                "/ocr",
                post(ocr::submit_ocr)
                    .fallback(not_found)
                    .layer(DefaultBodyLimit::max(upload_limit)),
            )
            .route("/logs", get(logs::list_logs).fallback(not_found));

        if config.static_files.enabled {
            // Missing files get the same JSON 404 as unknown routes.
            let assets = ServeDir::new(&config.static_files.dir)
                .not_found_service(not_found.with_state(()));
            router = router.nest_service("/static", assets);
        }

        router
            .fallback(not_found)
            .with_state(state)
            // The last layer added is the outermost.
            .layer(from_fn(track_request))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(CatchPanicLayer::custom(panic_response))
    }

    /// The router, for driving the gateway in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `coordinator` reaches `Closed`.
    ///
    /// In-flight requests finish before this returns. An error here means the
    /// listening socket could not be served or closed cleanly.
    pub async fn run(
        self,
        listener: TcpListener,
        coordinator: Arc<ShutdownCoordinator>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { coordinator.closed().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
