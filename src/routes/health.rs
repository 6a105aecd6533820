use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::AppState;
use crate::routes::timestamp;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since the server state was built.
    pub uptime: f64,
    #[serde(rename = "nodeVersion")]
    pub runtime_version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness)
/// Returns 200 for as long as the process can answer.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime: state.started_at.elapsed().as_secs_f64(),
        runtime_version: state.metadata.runtime_version.clone(),
        timestamp: timestamp(),
    })
}
