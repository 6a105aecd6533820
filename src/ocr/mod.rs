//! OCR subsystem.
//!
//! # Data Flow
//! ```text
//! UploadedFile (admitted)
//!     → processor.rs (exactly one engine call, timing, log row)
//!     → engine.rs trait → tesseract.rs (scratch file, CLI run, TSV parse)
//!     → OcrResponse, or OcrError into the error boundary
//! ```

pub mod engine;
pub mod processor;
pub mod tesseract;

pub use engine::{OcrEngine, OcrError, Recognition};
pub use processor::{FileSummary, OcrProcessor, OcrResponse};
pub use tesseract::TesseractEngine;
