//! Standalone sanitization endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    pub content: String,
    /// Sanitizing scanners to apply; defaults to `["anonymize"]`.
    #[serde(default)]
    pub sanitizers: Option<Vec<String>>,
}

/// POST /v1/security/sanitize
pub async fn sanitize_content(
    State(state): State<AppState>,
    Json(payload): Json<SanitizeRequest>,
) -> Response {
    match state
        .gatekeeper
        .sanitize(&payload.content, payload.sanitizers.as_deref())
        .await
    {
        Some(sanitized) => Json(serde_json::json!({ "sanitized_content": sanitized })).into_response(),
        None => (
            StatusCode::NOT_IMPLEMENTED,
            Json(serde_json::json!({ "error": "sanitization not available" })),
        )
            .into_response(),
    }
}
