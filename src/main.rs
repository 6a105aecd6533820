//! OCR Gateway (v2)
//!
//! HTTP front door for image text recognition, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ listener ──▶ middleware ──▶ route table ──┬──▶ GET /, /health, /api
//!                                 (panic, id,                   ├──▶ POST /ocr ──▶ admission ──▶ OCR engine
//!                                  trace, cors,                 │                                   │
//!                                  timing)                      │                                   ▼
//!                                                               ├──▶ GET /logs ◀──────────────── log store
//!                                                               └──▶ not-found responder
//!
//!     Failures from any route ──▶ error boundary ──▶ JSON {error, message}
//!
//!     SIGINT / SIGTERM ──▶ shutdown coordinator ──▶ drain log store ──▶ close listener
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ocr_gateway::config::GatewayConfig;
use ocr_gateway::http::state::process_started_at;
use ocr_gateway::lifecycle;
use ocr_gateway::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "ocr-gateway", version, about = "HTTP gateway for OCR processing")]
struct Args {
    /// Path to a TOML config file. Environment variables override it.
    #[arg(short, long, env = "OCR_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    process_started_at();
    let args = Args::parse();

    let config = match GatewayConfig::from_env_and_file(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ocr-gateway: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("ocr-gateway: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        bind_address = %config.listener.bind_address(),
        max_file_size = config.uploads.max_file_size,
        database = config.database.url.is_some(),
        "ocr-gateway starting"
    );

    match lifecycle::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "ocr-gateway exited with error");
            ExitCode::FAILURE
        }
    }
}
