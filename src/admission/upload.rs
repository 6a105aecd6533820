//! Multipart intake.
//!
//! Walks the multipart body, streams the single expected file part while
//! enforcing the size bound, and runs the admission decision on it.

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::admission::filter::{evaluate, AdmissionError, AdmissionPolicy, Candidate};

/// A file that passed admission. Owned by the request that carried it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Multipart field the file arrived in.
    pub field_name: String,
    /// Client-supplied filename.
    pub original_name: String,
    /// Declared media type, if the client sent one.
    pub mime_type: Option<String>,
    /// Lowercased extension of `original_name`.
    pub extension: Option<String>,
    /// Size in bytes.
    pub size: usize,
    /// File contents.
    pub bytes: Bytes,
}

/// Read the upload named by `policy.field_name` out of `multipart`.
pub async fn receive_upload(
    mut multipart: Multipart,
    policy: &AdmissionPolicy,
) -> Result<UploadedFile, AdmissionError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| classify(e, policy))? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            // Plain form values are not files.
            continue;
        };
        let name = field.name().unwrap_or_default().to_string();

        if name != policy.field_name || upload.is_some() {
            tracing::warn!(field = %name, filename = %filename, "Unexpected file field");
            return Err(AdmissionError::UnexpectedField { field: name });
        }

        let mime_type = field.content_type().map(str::to_string);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = field.chunk().await.map_err(|e| classify(e, policy))? {
            if buffer.len() + chunk.len() > policy.max_file_size {
                let candidate = Candidate {
                    filename: &filename,
                    mime_type: mime_type.as_deref(),
                    size: buffer.len() + chunk.len(),
                };
                evaluate(policy, &candidate)?;
            }
            buffer.extend_from_slice(&chunk);
        }

        let candidate = Candidate {
            filename: &filename,
            mime_type: mime_type.as_deref(),
            size: buffer.len(),
        };
        let admitted = evaluate(policy, &candidate)?;

        upload = Some(UploadedFile {
            field_name: name,
            original_name: filename,
            mime_type,
            extension: admitted.extension,
            size: buffer.len(),
            bytes: Bytes::from(buffer),
        });
    }

    upload.ok_or_else(|| AdmissionError::MissingFile {
        field: policy.field_name.clone(),
    })
}

/// Map a multipart decoding failure onto the admission taxonomy.
fn classify(err: MultipartError, policy: &AdmissionPolicy) -> AdmissionError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(limit = policy.max_file_size, "Request body exceeded transport limit");
        AdmissionError::PayloadTooLarge {
            limit: policy.max_file_size,
        }
    } else {
        AdmissionError::Malformed(err.body_text())
    }
}
