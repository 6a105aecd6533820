//! Error boundary.
//!
//! # Responsibilities
//! - Classify every `GatewayError` into a status code and JSON envelope
//! - Turn handler panics into the same 500 envelope
//! - Never expose stack traces or raw collaborator errors
//!
//! # Classification
//! ```text
//! Admission(PayloadTooLarge) → 400 {"error":"File too large", ...}
//! Admission(MissingFile)     → 400 {"error":"No image file provided", ...}
//! anything else              → 500 {"error":"Internal server error", "message": <error>}
//! ```

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::admission::AdmissionError;
use crate::error::GatewayError;

const BYTES_PER_KB: usize = 1024;
const BYTES_PER_MB: usize = 1024 * 1024;

/// JSON body of every failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Short machine-classifiable summary.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("Internal server error", message)
    }
}

impl GatewayError {
    /// Status code and body for this failure.
    pub fn classify(&self) -> (StatusCode, ErrorEnvelope) {
        match self {
            GatewayError::Admission(AdmissionError::PayloadTooLarge { limit }) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::new(
                    "File too large",
                    format!("Maximum file size is {}", human_size(*limit)),
                ),
            ),
            GatewayError::Admission(AdmissionError::MissingFile { field }) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::new(
                    "No image file provided",
                    format!("Send the image as multipart/form-data in the \"{}\" field", field),
                ),
            ),
            other => (StatusCode::INTERNAL_SERVER_ERROR, ErrorEnvelope::internal(other.to_string())),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, envelope) = self.classify();

        if status.is_server_error() {
            tracing::error!(
                collaborator = self.is_collaborator_failure(),
                error = %self,
                "Server error"
            );
        } else {
            tracing::debug!(error = %self, "Client error");
        }

        (status, Json(envelope)).into_response()
    }
}

/// `limit` in the largest unit that divides it exactly, e.g. `10MB`.
fn human_size(limit: usize) -> String {
    if limit >= BYTES_PER_MB && limit % BYTES_PER_MB == 0 {
        format!("{}MB", limit / BYTES_PER_MB)
    } else if limit >= BYTES_PER_KB && limit % BYTES_PER_KB == 0 {
        format!("{}KB", limit / BYTES_PER_KB)
    } else {
        format!("{} bytes", limit)
    }
}

/// Response for a handler that panicked.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    GatewayError::Internal(detail).into_response()
}
