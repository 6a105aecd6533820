use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::LogsConfig;
use crate::error::GatewayResult;
use crate::http::AppState;
use crate::storage::OcrLog;

/// Query parameters for `GET /logs`. Kept as text so bad input falls back
/// to the default instead of being rejected.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub success: bool,
    pub count: usize,
    pub logs: Vec<OcrLog>,
}

/// Recent OCR log rows, newest first.
pub async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> GatewayResult<Json<LogsResponse>> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let limit = resolve_limit(query.limit.as_deref(), &state.logs);

    let logs = state.persistence.recent(limit).await?;

    Ok(Json(LogsResponse {
        success: true,
        count: logs.len(),
        logs,
    }))
}

/// Parse `raw` leniently and clamp it to `1..=max_limit`.
pub fn resolve_limit(raw: Option<&str>, config: &LogsConfig) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(config.default_limit)
        .clamp(1, config.max_limit.max(1))
}
