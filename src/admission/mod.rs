//! Upload admission subsystem.
//!
//! # Data Flow
//! ```text
//! POST /ocr multipart body
//!     → upload.rs (walk parts, stream the `image` file, bound its size)
//!     → filter.rs (size bound, then media-type OR extension)
//!     → UploadedFile handed to the OCR processor
//! ```
//!
//! # Design Decisions
//! - The two type signals are separate predicates combined with OR
//! - Size is enforced while streaming, so oversized bodies abort early
//! - Every decision is logged with both sub-decisions

pub mod filter;
pub mod upload;

pub use filter::{
    evaluate, extension_allowed, file_extension, mime_type_allowed, AdmissionError, AdmissionPolicy,
    Admitted, Candidate, ALLOWED_EXTENSIONS, MAX_FILE_SIZE,
};
pub use upload::{receive_upload, UploadedFile};
