//! OCR submission processing.
//!
//! Runs the engine once per admitted upload and records the outcome in the
//! log store.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::admission::UploadedFile;
use crate::error::GatewayError;
use crate::observability::metrics;
use crate::ocr::engine::OcrEngine;
use crate::storage::{LogStatus, NewOcrLog, Persistence};

/// Body of a successful `POST /ocr`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub success: bool,
    pub extracted_text: String,
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub file: FileSummary,
    pub log_id: Option<Uuid>,
}

/// Client-visible description of the processed file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub original_name: String,
    pub mime_type: Option<String>,
    pub size: usize,
}

/// Couples the OCR engine with the log store.
pub struct OcrProcessor {
    engine: Arc<dyn OcrEngine>,
    persistence: Arc<dyn Persistence>,
}

impl OcrProcessor {
    pub fn new(engine: Arc<dyn OcrEngine>, persistence: Arc<dyn Persistence>) -> Self {
        Self { engine, persistence }
    }

    /// Recognize `upload` and record the outcome.
    pub async fn process(&self, upload: UploadedFile) -> Result<OcrResponse, GatewayError> {
        let started = Instant::now();
        let outcome = self.engine.recognize(&upload).await;
        let elapsed = started.elapsed();
        let processing_time_ms = elapsed.as_millis() as u64;

        metrics::record_ocr(self.engine.name(), outcome.is_ok(), elapsed);

        let mut entry = NewOcrLog {
            filename: upload.original_name.clone(),
            mime_type: upload.mime_type.clone(),
            file_size: upload.size as i64,
            extracted_text: None,
            confidence: None,
            processing_time_ms: processing_time_ms as i64,
            status: LogStatus::Success,
            error_message: None,
        };

        let recognition = match outcome {
            Ok(recognition) => recognition,
            Err(err) => {
                tracing::error!(
                    filename = %upload.original_name,
                    engine = self.engine.name(),
                    error = %err,
                    "OCR failed"
                );
                entry.status = LogStatus::Failed;
                entry.error_message = Some(err.to_string());
                self.record(entry).await;
                return Err(err.into());
            }
        };

        tracing::info!(
            filename = %upload.original_name,
            chars = recognition.text.len(),
            confidence = recognition.confidence,
            processing_time_ms,
            "OCR completed"
        );

        entry.extracted_text = Some(recognition.text.clone());
        entry.confidence = Some(recognition.confidence);
        let log_id = self.record(entry).await;

        Ok(OcrResponse {
            success: true,
            extracted_text: recognition.text,
            confidence: recognition.confidence,
            processing_time_ms,
            file: FileSummary {
                original_name: upload.original_name,
                mime_type: upload.mime_type,
                size: upload.size,
            },
            log_id,
        })
    }

    /// Best-effort log write. A failed write never fails the submission.
    async fn record(&self, entry: NewOcrLog) -> Option<Uuid> {
        match self.persistence.record(entry).await {
            Ok(row) => Some(row.id),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to record OCR log");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::engine::{OcrError, Recognition};
    use crate::storage::MemoryPersistence;
    use async_trait::async_trait;
    use axum::body::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEngine {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl OcrEngine for FixedEngine {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn recognize(&self, _file: &UploadedFile) -> Result<Recognition, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(OcrError::Timeout { secs: 1 })
            } else {
                Ok(Recognition {
                    text: "hello world".into(),
                    confidence: 88.0,
                })
            }
        }
    }

    fn upload() -> UploadedFile {
        UploadedFile {
            field_name: "image".into(),
            original_name: "hello_world.png".into(),
            mime_type: Some("image/png".into()),
            extension: Some("png".into()),
            size: 4,
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[tokio::test]
    async fn test_success_is_recorded() {
        let engine = Arc::new(FixedEngine { calls: AtomicUsize::new(0), fail: false });
        let store = Arc::new(MemoryPersistence::new());
        let processor = OcrProcessor::new(engine.clone(), store.clone());

        let response = processor.process(upload()).await.unwrap();
        assert_eq!(response.extracted_text, "hello world");
        assert_eq!(response.file.original_name, "hello_world.png");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);

        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(Some(rows[0].id), response.log_id);
        assert_eq!(rows[0].status, LogStatus::Success);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_returned() {
        let engine = Arc::new(FixedEngine { calls: AtomicUsize::new(0), fail: true });
        let store = Arc::new(MemoryPersistence::new());
        let processor = OcrProcessor::new(engine.clone(), store.clone());

        let err = processor.process(upload()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Ocr(OcrError::Timeout { secs: 1 })));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);

        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows[0].status, LogStatus::Failed);
        assert_eq!(rows[0].error_message.as_deref(), Some("OCR engine timed out after 1s"));
    }

    #[tokio::test]
    async fn test_store_failure_does_not_fail_submission() {
        let engine = Arc::new(FixedEngine { calls: AtomicUsize::new(0), fail: false });
        let store = Arc::new(MemoryPersistence::new());
        store.close().await.unwrap();
        let processor = OcrProcessor::new(engine, store);

        let response = processor.process(upload()).await.unwrap();
        assert!(response.success);
        assert!(response.log_id.is_none());
    }
}
