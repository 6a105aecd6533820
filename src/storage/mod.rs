//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! OCR processor ──record()──▶ Persistence ◀──recent()── GET /logs
//!                                  ▲
//!                 info() ── GET /, GET /api
//!                 close() ── shutdown coordinator (drain)
//! ```
//!
//! # Implementations
//! - `postgres.rs`: sqlx pool, used when `DATABASE_URL` is set
//! - `memory.rs`: bounded in-process ring, used otherwise and in tests

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::MemoryPersistence;
pub use postgres::PostgresPersistence;

/// Outcome recorded for an OCR submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Failed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "success",
            LogStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("success") {
            LogStatus::Success
        } else {
            LogStatus::Failed
        }
    }
}

/// A row to be written.
#[derive(Debug, Clone)]
pub struct NewOcrLog {
    pub filename: String,
    pub mime_type: Option<String>,
    pub file_size: i64,
    pub extracted_text: Option<String>,
    pub confidence: Option<f64>,
    pub processing_time_ms: i64,
    pub status: LogStatus,
    pub error_message: Option<String>,
}

/// A stored OCR log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrLog {
    pub id: Uuid,
    pub filename: String,
    pub mime_type: Option<String>,
    pub file_size: i64,
    pub extracted_text: Option<String>,
    pub confidence: Option<f64>,
    pub processing_time_ms: i64,
    pub status: LogStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OcrLog {
    /// Stamp a new row with an id and creation time.
    pub fn from_new(entry: NewOcrLog) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: entry.filename,
            mime_type: entry.mime_type,
            file_size: entry.file_size,
            extracted_text: entry.extracted_text,
            confidence: entry.confidence,
            processing_time_ms: entry.processing_time_ms,
            status: entry.status,
            error_message: entry.error_message,
            created_at: Utc::now(),
        }
    }
}

/// Store descriptor reported by the info endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_connections: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

/// Persistence error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Log store is closed")]
    Closed,
}

/// Persistence collaborator.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Prepare the store. Called once at startup.
    async fn initialize(&self) -> Result<(), StorageError>;

    /// Current descriptor for status endpoints.
    fn info(&self) -> DatabaseInfo;

    /// Append a log row.
    async fn record(&self, entry: NewOcrLog) -> Result<OcrLog, StorageError>;

    /// Most recent rows, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<OcrLog>, StorageError>;

    /// Release pooled connections. Waits for in-use connections to return.
    async fn close(&self) -> Result<(), StorageError>;
}
