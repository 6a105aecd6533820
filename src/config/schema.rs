//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the OCR gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Deployment environment name reported by `GET /`.
    pub environment: String,

    /// Static service description.
    pub service: ServiceConfig,

    /// Upload admission settings.
    pub uploads: UploadConfig,

    /// OCR engine settings.
    pub ocr: OcrConfig,

    /// Persistence settings.
    pub database: DatabaseConfig,

    /// Shutdown coordination settings.
    pub shutdown: ShutdownConfig,

    /// Static asset serving.
    pub static_files: StaticFilesConfig,

    /// `GET /logs` paging limits.
    pub logs: LogsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            environment: "development".to_string(),
            service: ServiceConfig::default(),
            uploads: UploadConfig::default(),
            ocr: OcrConfig::default(),
            database: DatabaseConfig::default(),
            shutdown: ShutdownConfig::default(),
            static_files: StaticFilesConfig::default(),
            logs: LogsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Listen port. `PORT` overrides it.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Static service description shown by the info endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Human-readable service name.
    pub name: String,

    /// Path of the browser test page.
    pub test_page: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "OCR Gateway API".to_string(),
            test_page: "/static/index.html".to_string(),
        }
    }
}

/// Upload admission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    pub max_file_size: usize,

    /// Multipart field carrying the image.
    pub field_name: String,

    /// Scratch directory for files handed to the OCR engine.
    pub upload_dir: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            field_name: "image".to_string(),
            upload_dir: "uploads".to_string(),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract executable name or path.
    pub binary: String,

    /// Tesseract language pack (e.g., "eng", "eng+deu").
    pub language: String,

    /// Deadline for a single recognition run in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. Without it, log rows are kept in memory.
    pub url: Option<String>,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// How long a request waits for a pooled connection, in seconds.
    pub acquire_timeout_secs: u64,

    /// Refuse to start when the store cannot be initialized.
    pub require_on_startup: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
            require_on_startup: false,
        }
    }
}

/// Shutdown coordination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Upper bound on the connection pool drain, in seconds.
    pub drain_timeout_secs: u64,
}

impl ShutdownConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 10,
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Serve `/static/*`.
    pub enabled: bool,

    /// Directory served under `/static`.
    pub dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: "public".to_string(),
        }
    }
}

/// Paging limits for `GET /logs`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Rows returned when no `limit` is given.
    pub default_limit: u32,

    /// Upper clamp for `limit`.
    pub max_limit: u32,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 100,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
