use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;

use crate::admission::{receive_upload, AdmissionError};
use crate::error::GatewayResult;
use crate::http::AppState;
use crate::ocr::OcrResponse;

/// Submit an image for OCR.
///
/// The admission filter runs before the processor sees anything; a rejected
/// upload never reaches the engine. A request that is not multipart at all
/// is treated as carrying no file.
pub async fn submit_ocr(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> GatewayResult<Json<OcrResponse>> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection, "Request is not multipart");
        AdmissionError::MissingFile {
            field: state.admission.field_name.clone(),
        }
    })?;

    let upload = receive_upload(multipart, &state.admission).await?;
    let response = state.processor.process(upload).await?;

    Ok(Json(response))
}
