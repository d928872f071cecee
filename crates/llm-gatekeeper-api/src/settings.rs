//! Service settings.
//!
//! Layered from an optional `gatekeeper.toml` file and `GATEKEEPER_`-prefixed
//! environment variables. The scanning policy itself is part of the settings
//! tree and is handed to the core fully materialized — the core never reads
//! configuration sources.

use llm_gatekeeper_core::PolicyConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub service_name: String,
    pub port: u16,
    /// Redis connection URL; used only when the `redis` feature is enabled.
    pub redis_url: Option<String>,
    /// Scanning policy handed to the gatekeeper core.
    pub policy: PolicyConfig,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            service_name: "llm-gatekeeper".to_string(),
            port: 8001,
            redis_url: None,
            policy: PolicyConfig::default(),
        }
    }
}

impl ApiSettings {
    /// Load settings: `gatekeeper.toml` (optional) overlaid with
    /// `GATEKEEPER_*` environment variables (`__` as the nesting separator,
    /// e.g. `GATEKEEPER_POLICY__DEFAULT_RISK_THRESHOLD=0.7`).
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("gatekeeper").required(false))
            .add_source(
                config::Environment::with_prefix("GATEKEEPER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = ApiSettings::default();
        assert_eq!(settings.port, 8001);
        assert_eq!(settings.service_name, "llm-gatekeeper");
        assert!(settings.redis_url.is_none());
        assert_eq!(settings.policy.default_risk_threshold, 0.6);
    }

    #[test]
    fn load_without_sources_yields_defaults() {
        let settings = ApiSettings::load().expect("load should not fail without sources");
        assert_eq!(settings.port, ApiSettings::default().port);
    }
}
