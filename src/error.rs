//! Gateway error taxonomy.
//!
//! Every failure a request can hit is one of these. The HTTP mapping lives
//! in `http::response`, which is the only place a failure becomes a response.

use crate::admission::AdmissionError;
use crate::ocr::OcrError;
use crate::storage::StorageError;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Upload rejected by the admission filter.
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// The OCR engine failed.
    #[error(transparent)]
    Ocr(#[from] OcrError),

    /// The log store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A handler panicked or otherwise failed unexpectedly.
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Whether this failure came from a collaborator rather than the request.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, GatewayError::Ocr(_) | GatewayError::Storage(_))
    }
}
