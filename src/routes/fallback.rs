use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::routes::AVAILABLE_ROUTES;

/// Body of a 404.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundBody {
    pub error: &'static str,
    pub message: String,
    pub available_routes: [&'static str; 5],
}

/// 404 Not Found handler
///
/// Registered as the router fallback and as the method fallback of every
/// route, so an unknown path and a wrong method both land here.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<NotFoundBody>) {
    tracing::debug!(uri = %uri, "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            error: "Not found",
            message: format!("Route {} not found", uri),
            available_routes: AVAILABLE_ROUTES,
        }),
    )
}
