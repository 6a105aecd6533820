//! Upload admission decision.
//!
//! Two independent signals admit a file: the declared media type, or the
//! filename extension. Either one alone is sufficient. The size bound is
//! checked first, so an oversized file is rejected as too large whatever
//! its type.

use crate::config::UploadConfig;
use crate::observability::metrics;

/// Default upper bound on an uploaded file.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Extensions admitted regardless of the declared media type.
pub const ALLOWED_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "svg"];

/// Any declared type in the image family is admitted.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Some clients report images (WebP in particular) as opaque bytes.
pub const BINARY_FALLBACK_MIME: &str = "application/octet-stream";

/// Admission rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("File too large: maximum file size is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Only image files are allowed!")]
    UnsupportedType {
        filename: String,
        mime_type: Option<String>,
        extension: Option<String>,
    },

    #[error("No file uploaded in field '{field}'")]
    MissingFile { field: String },

    #[error("Unexpected field")]
    UnexpectedField { field: String },

    #[error("Malformed multipart body: {0}")]
    Malformed(String),
}

/// Limits applied to every upload.
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    pub max_file_size: usize,
    pub field_name: String,
}

impl AdmissionPolicy {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            field_name: config.field_name.clone(),
        }
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            field_name: "image".to_string(),
        }
    }
}

/// What the filter knows about a file before handing it on.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub filename: &'a str,
    pub mime_type: Option<&'a str>,
    pub size: usize,
}

/// The sub-decisions behind an accepted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub extension: Option<String>,
    pub mime_ok: bool,
    pub extension_ok: bool,
}

/// Lowercased text after the last `.`, or `None` when the name has no `.`.
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rfind('.')
        .map(|idx| filename[idx + 1..].to_ascii_lowercase())
}

/// Media-type signal: image family or the binary fallback.
pub fn mime_type_allowed(mime_type: Option<&str>) -> bool {
    match mime_type {
        Some(mime) => {
            let mime = mime.trim().to_ascii_lowercase();
            mime.starts_with(IMAGE_MIME_PREFIX) || mime == BINARY_FALLBACK_MIME
        }
        None => false,
    }
}

/// Extension signal: member of the allow-list.
pub fn extension_allowed(extension: Option<&str>) -> bool {
    extension.is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}

/// Decide whether `candidate` may proceed to OCR.
pub fn evaluate(policy: &AdmissionPolicy, candidate: &Candidate<'_>) -> Result<Admitted, AdmissionError> {
    let extension = file_extension(candidate.filename);
    let mime_ok = mime_type_allowed(candidate.mime_type);
    let extension_ok = extension_allowed(extension.as_deref());

    if candidate.size > policy.max_file_size {
        tracing::warn!(
            filename = %candidate.filename,
            mime_type = ?candidate.mime_type,
            extension = ?extension,
            mime_ok,
            extension_ok,
            size = candidate.size,
            limit = policy.max_file_size,
            "Upload rejected: file too large"
        );
        metrics::record_admission("too_large");
        return Err(AdmissionError::PayloadTooLarge {
            limit: policy.max_file_size,
        });
    }

    if mime_ok || extension_ok {
        tracing::info!(
            filename = %candidate.filename,
            mime_type = ?candidate.mime_type,
            extension = ?extension,
            mime_ok,
            extension_ok,
            size = candidate.size,
            "Upload accepted"
        );
        metrics::record_admission("accepted");
        Ok(Admitted {
            extension,
            mime_ok,
            extension_ok,
        })
    } else {
        tracing::warn!(
            filename = %candidate.filename,
            mime_type = ?candidate.mime_type,
            extension = ?extension,
            mime_ok,
            extension_ok,
            "Upload rejected: not an image"
        );
        metrics::record_admission("rejected");
        Err(AdmissionError::UnsupportedType {
            filename: candidate.filename.to_string(),
            mime_type: candidate.mime_type.map(str::to_string),
            extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate<'a>(filename: &'a str, mime_type: Option<&'a str>, size: usize) -> Candidate<'a> {
        Candidate {
            filename,
            mime_type,
            size,
        }
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("trailing.").as_deref(), Some(""));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(""), None);
    }

    #[test]
    fn test_mime_predicate() {
        assert!(mime_type_allowed(Some("image/jpeg")));
        assert!(mime_type_allowed(Some("image/svg+xml")));
        assert!(mime_type_allowed(Some("Image/PNG")));
        assert!(mime_type_allowed(Some("application/octet-stream")));
        assert!(!mime_type_allowed(Some("application/pdf")));
        assert!(!mime_type_allowed(Some("text/plain")));
        assert!(!mime_type_allowed(None));
    }

    #[test]
    fn test_extension_predicate() {
        for ext in ALLOWED_EXTENSIONS {
            assert!(extension_allowed(Some(ext)), "{ext} should be allowed");
        }
        assert!(!extension_allowed(Some("pdf")));
        assert!(!extension_allowed(Some("")));
        assert!(!extension_allowed(None));
    }

    #[test]
    fn test_either_signal_admits() {
        let policy = AdmissionPolicy::default();

        let by_mime = evaluate(&policy, &candidate("scan.dat", Some("image/png"), 10)).unwrap();
        assert!(by_mime.mime_ok);
        assert!(!by_mime.extension_ok);

        let by_extension = evaluate(&policy, &candidate("photo.PNG", None, 2 * 1024 * 1024)).unwrap();
        assert!(!by_extension.mime_ok);
        assert!(by_extension.extension_ok);
        assert_eq!(by_extension.extension.as_deref(), Some("png"));

        let by_fallback =
            evaluate(&policy, &candidate("data.bin", Some("application/octet-stream"), 10)).unwrap();
        assert!(by_fallback.mime_ok);
    }

    #[test]
    fn test_neither_signal_rejects() {
        let policy = AdmissionPolicy::default();
        let err = evaluate(&policy, &candidate("notes.txt", Some("text/plain"), 10)).unwrap_err();
        assert_eq!(
            err,
            AdmissionError::UnsupportedType {
                filename: "notes.txt".into(),
                mime_type: Some("text/plain".into()),
                extension: Some("txt".into()),
            }
        );
        assert_eq!(err.to_string(), "Only image files are allowed!");
    }

    #[test]
    fn test_no_extension_falls_back_to_mime() {
        let policy = AdmissionPolicy::default();
        assert!(evaluate(&policy, &candidate("scan", Some("image/tiff"), 10)).is_ok());
        assert!(evaluate(&policy, &candidate("scan", None, 10)).is_err());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_size_rejection_logs_both_signals() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let policy = AdmissionPolicy::default();
        tracing::subscriber::with_default(subscriber, || {
            let oversized = candidate("photo.jpg", Some("text/plain"), MAX_FILE_SIZE + 1);
            assert!(evaluate(&policy, &oversized).is_err());
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("file too large"), "{output}");
        assert!(output.contains(r#"extension=Some("jpg")"#), "{output}");
        assert!(output.contains("mime_ok=false"), "{output}");
        assert!(output.contains("extension_ok=true"), "{output}");
    }

    #[test]
    fn test_size_bound_wins_over_type() {
        let policy = AdmissionPolicy::default();
        let oversized = MAX_FILE_SIZE + 1;

        let err = evaluate(&policy, &candidate("photo.jpg", Some("image/jpeg"), oversized)).unwrap_err();
        assert_eq!(err, AdmissionError::PayloadTooLarge { limit: MAX_FILE_SIZE });

        let err = evaluate(&policy, &candidate("notes.txt", Some("text/plain"), oversized)).unwrap_err();
        assert_eq!(err, AdmissionError::PayloadTooLarge { limit: MAX_FILE_SIZE });

        assert!(evaluate(&policy, &candidate("photo.jpg", None, MAX_FILE_SIZE)).is_ok());
    }
}
