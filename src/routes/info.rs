use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::http::AppState;
use crate::routes::timestamp;

/// Service status and info
///
/// Static metadata plus the live persistence descriptor. `nodeVersion` keeps
/// the key existing clients read; it carries the runtime description.
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    let meta = &state.metadata;
    Json(json!({
        "message": format!("{} is running!", meta.name),
        "version": meta.version,
        "nodeVersion": meta.runtime_version,
        "timestamp": timestamp(),
        "environment": meta.environment,
        "testPage": meta.test_page,
        "database": state.persistence.info(),
        "endpoints": {
            "GET /": "API status",
            "GET /health": "Health check",
            "GET /api": "API documentation",
            "POST /ocr": "OCR processing",
            "GET /logs": "View OCR logs",
            format!("GET {}", meta.test_page): "Test page",
        }
    }))
}

/// API documentation
pub async fn api_doc(State(state): State<AppState>) -> Json<Value> {
    let meta = &state.metadata;
    Json(json!({
        "name": meta.name,
        "version": meta.version,
        "nodeVersion": meta.runtime_version,
        "endpoints": {
            "GET /": "API status and info",
            "GET /health": "Health check",
            "GET /api": "API documentation",
            "POST /ocr": format!(
                "Upload image for OCR processing (multipart/form-data with \"{}\" field)",
                meta.field_name
            ),
            "GET /logs": "View recent OCR processing logs",
        },
        "usage": {
            "ocr": {
                "method": "POST",
                "url": "/ocr",
                "contentType": "multipart/form-data",
                "body": format!("image file in \"{}\" field", meta.field_name),
                "supportedFormats": meta.supported_formats,
            },
            "logs": {
                "method": "GET",
                "url": "/logs",
                "query": { "limit": format!("number of rows, default {}, max {}", state.logs.default_limit, state.logs.max_limit) },
            }
        },
        "database": state.persistence.info(),
    }))
}
