//! LLM Gatekeeper REST API server

use std::sync::Arc;

use llm_gatekeeper_api::handlers::metrics::prometheus_handle;
use llm_gatekeeper_api::{create_router, ApiSettings, AppState};
use llm_gatekeeper_core::{Gatekeeper, MemoryCacheStore};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let settings = ApiSettings::load()?;

    // Install the metrics recorder before any request is served.
    prometheus_handle();

    let gatekeeper = build_gatekeeper(&settings).await;
    let state = AppState::new(Arc::new(gatekeeper));
    let app = create_router(state);

    // Bind server (respect PORT env for container platforms)
    let port = std::env::var("PORT").unwrap_or_else(|_| settings.port.to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("{} listening on http://{}", settings.service_name, addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

#[cfg(feature = "redis")]
async fn build_gatekeeper(settings: &ApiSettings) -> Gatekeeper {
    use llm_gatekeeper_core::{CacheStore, RedisCacheStore};

    let cache: Arc<dyn CacheStore> = match &settings.redis_url {
        Some(url) => match RedisCacheStore::connect(url).await {
            Ok(store) => {
                info!("connected to Redis cache");
                Arc::new(store)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Redis unavailable, falling back to in-memory cache");
                Arc::new(MemoryCacheStore::new())
            }
        },
        None => Arc::new(MemoryCacheStore::new()),
    };

    Gatekeeper::builder()
        .with_policy(settings.policy.clone())
        .with_cache(cache)
        .with_verbose_init(true)
        .build()
}

#[cfg(not(feature = "redis"))]
async fn build_gatekeeper(settings: &ApiSettings) -> Gatekeeper {
    Gatekeeper::builder()
        .with_policy(settings.policy.clone())
        .with_cache(Arc::new(MemoryCacheStore::new()))
        .with_verbose_init(true)
        .build()
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, starting graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown..."),
    }
}
