//! Shared application state.

use llm_gatekeeper_core::Gatekeeper;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

/// Process-local security counters backing `GET /v1/metrics/security`.
/// The Prometheus recorder carries the same data for scrapers.
#[derive(Debug, Default)]
pub struct SecurityMetrics {
    pub checks_total: AtomicU64,
    pub unsafe_total: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
}

/// State handed to every handler. The gatekeeper is built once at startup;
/// requests share it read-only.
#[derive(Clone)]
pub struct AppState {
    pub gatekeeper: Arc<Gatekeeper>,
    /// Whether a cache store was configured and enabled by policy.
    pub cache_connected: bool,
    pub metrics: Arc<SecurityMetrics>,
}

impl AppState {
    pub fn new(gatekeeper: Arc<Gatekeeper>) -> Self {
        let cache_connected = gatekeeper.cache_enabled();
        Self {
            gatekeeper,
            cache_connected,
            metrics: Arc::new(SecurityMetrics::default()),
        }
    }
}
