//! OCR engine contract.

use async_trait::async_trait;

use crate::admission::UploadedFile;

/// Text recognized in one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub text: String,
    /// Mean word confidence, 0-100.
    pub confidence: f64,
}

/// OCR engine failure.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start OCR engine '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR engine exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },

    #[error("OCR engine timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Unreadable OCR output: {0}")]
    Output(String),
}

/// Trait that every OCR engine implements.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine identifier (e.g., "tesseract").
    fn name(&self) -> &'static str;

    /// Extract text from an admitted upload.
    async fn recognize(&self, file: &UploadedFile) -> Result<Recognition, OcrError>;
}
