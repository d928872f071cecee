//! Route configuration

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
///
/// ## Routes
/// - GET /health - Service health with scanner/cache status
/// - GET /health/ready - Readiness probe
/// - GET /health/live - Liveness probe
/// - GET /version - Version information
/// - GET /v1/scanners - Registered scanner inventory
/// - POST /v1/security/check - Evaluate prompt or output content
/// - POST /v1/security/sanitize - Sanitize content without a verdict
/// - GET /v1/metrics/prometheus - Prometheus exposition
/// - GET /v1/metrics/security - Security counters snapshot
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::ready))
        .route("/health/live", get(handlers::live))
        .route("/version", get(handlers::version))
        .route("/v1/scanners", get(handlers::list_scanners))
        .route("/v1/security/check", post(handlers::check_security))
        .route("/v1/security/sanitize", post(handlers::sanitize_content))
        .route("/v1/metrics/prometheus", get(handlers::prometheus_metrics))
        .route("/v1/metrics/security", get(handlers::security_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
