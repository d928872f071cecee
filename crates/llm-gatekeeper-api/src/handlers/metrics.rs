//! Metrics exposition: Prometheus scrape format and a JSON summary.

use axum::extract::State;
use axum::Json;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::atomic::Ordering;
use std::sync::OnceLock;

use crate::state::AppState;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder (idempotent) and return the
/// render handle. Called once from `main`, and lazily by the handler.
pub fn prometheus_handle() -> &'static PrometheusHandle {
    PROMETHEUS.get_or_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .expect("failed to install Prometheus recorder")
    })
}

/// GET /v1/metrics/prometheus
pub async fn prometheus_metrics() -> String {
    prometheus_handle().render()
}

/// GET /v1/metrics/security
pub async fn security_metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let metrics = &state.metrics;
    Json(serde_json::json!({
        "checks_total": metrics.checks_total.load(Ordering::Relaxed),
        "unsafe_total": metrics.unsafe_total.load(Ordering::Relaxed),
        "cache_hits": metrics.cache_hits.load(Ordering::Relaxed),
        "cache_misses": metrics.cache_misses.load(Ordering::Relaxed),
    }))
}
