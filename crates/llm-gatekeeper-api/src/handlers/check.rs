//! The security check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::atomic::Ordering;
use std::time::Instant;
use validator::Validate;

use llm_gatekeeper_core::{CheckRequest, ContentType};

use crate::state::AppState;

/// Inbound security check request.
#[derive(Debug, Deserialize, Validate)]
pub struct SecurityCheckRequest {
    pub content: String,
    pub content_type: ContentType,
    /// Optional subset of scanners to run.
    #[serde(default)]
    pub scanners: Option<Vec<String>>,
    /// Defaults to the policy's `default_risk_threshold` when omitted.
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub risk_threshold: Option<f64>,
    /// Original prompt, for output relevance checks.
    #[serde(default)]
    pub reference_prompt: Option<String>,
}

/// POST /v1/security/check
///
/// Always responds 200 with a verdict body for well-formed requests — the
/// core's `evaluate` is total, and scanner failures surface as fail-safe
/// verdicts, never as HTTP errors.
pub async fn check_security(
    State(state): State<AppState>,
    Json(payload): Json<SecurityCheckRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "validation failed",
                "details": errors.to_string(),
            })),
        )
            .into_response();
    }

    let content_type = payload.content_type;
    let risk_threshold = payload
        .risk_threshold
        .unwrap_or(state.gatekeeper.policy().default_risk_threshold);

    let request = CheckRequest {
        content: payload.content,
        content_type,
        scanners: payload.scanners,
        risk_threshold,
        reference_prompt: payload.reference_prompt,
    };

    let started = Instant::now();
    let verdict = state.gatekeeper.evaluate(&request).await;

    metrics::counter!(
        "security_checks_total",
        "content_type" => content_type.as_str(),
        "is_safe" => if verdict.is_safe { "true" } else { "false" },
    )
    .increment(1);
    metrics::histogram!("security_check_duration_seconds")
        .record(started.elapsed().as_secs_f64());

    state.metrics.checks_total.fetch_add(1, Ordering::Relaxed);
    if !verdict.is_safe {
        state.metrics.unsafe_total.fetch_add(1, Ordering::Relaxed);
    }
    if state.cache_connected {
        if verdict.from_cache {
            state.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("cache_hits_total").increment(1);
        } else {
            state.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("cache_misses_total").increment(1);
        }
    }

    Json(verdict).into_response()
}
