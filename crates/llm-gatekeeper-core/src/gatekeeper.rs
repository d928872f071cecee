//! The orchestrator.
//!
//! `Gatekeeper` owns the scanner registry, the policy, and an optional cache
//! store, and exposes `evaluate` — the single entry point for security
//! checks. `evaluate` is total: it always returns a [`SecurityVerdict`],
//! never an error, for any input. Failures inside the pipeline surface as a
//! deterministic fail-safe verdict, and cache failures degrade to a miss or
//! a skipped write.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::cache_key;
use crate::error::CacheError;
use crate::config::PolicyConfig;
use crate::pipeline::{self, PipelineRun};
use crate::recommend;
use crate::registry::ScannerRegistry;
use crate::scanner::ScannerHandle;
use crate::ttl;
use crate::types::{
    CheckRequest, ContentType, ScanRecord, SecurityVerdict, SYSTEM_ERROR_SCANNER,
};

/// Scan orchestration and decision engine. Constructed once at startup and
/// shared by reference across requests; holds no per-request mutable state.
pub struct Gatekeeper {
    registry: ScannerRegistry,
    policy: PolicyConfig,
    policy_fingerprint: String,
    cache: Option<Arc<dyn CacheStore>>,
}

impl Gatekeeper {
    /// Gatekeeper with the given policy, built-in scanners, and no cache.
    pub fn new(policy: PolicyConfig) -> Self {
        Self::builder().with_policy(policy).build()
    }

    pub fn builder() -> GatekeeperBuilder {
        GatekeeperBuilder::new()
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn registry(&self) -> &ScannerRegistry {
        &self.registry
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some() && self.policy.cache.enabled
    }

    /// Evaluate content against the active scanner set.
    ///
    /// Cache hits are returned verbatim without executing any scanner.
    /// Otherwise the pipeline runs, the per-scanner results are aggregated
    /// (overall risk is the max of flagged scanners' risks — one confident
    /// detector can veto), and the verdict is cached when the TTL policy
    /// allows it.
    pub async fn evaluate(&self, request: &CheckRequest) -> SecurityVerdict {
        let started = Instant::now();
        let key = cache_key::compose(request, &self.policy_fingerprint);

        if let Some(cached) = self.cache_lookup(&key).await {
            info!(content_type = request.content_type.as_str(), "cache hit for content check");
            return cached;
        }

        let selected = self
            .registry
            .select(request.content_type, request.scanners.as_deref());
        let reference = match request.content_type {
            ContentType::Output => request.reference_prompt.as_deref(),
            ContentType::Prompt => None,
        };

        let verdict = match pipeline::run(&selected, &request.content, reference).await {
            PipelineRun::Failed { scanner, results } => {
                warn!(scanner = %scanner, "returning fail-safe verdict");
                let verdict = fail_safe_verdict(&request.content, results, started);
                emit_completion_event(&verdict);
                // Fail-safe verdicts are never cached.
                return verdict;
            }
            PipelineRun::Completed {
                results,
                flagged,
                flagged_risks,
                current_content,
            } => {
                let risk_score = flagged_risks.iter().copied().fold(0.0_f64, f64::max);
                let is_safe = risk_score < request.risk_threshold;
                let recommendations = recommend::for_flagged(&flagged);
                SecurityVerdict {
                    is_safe,
                    risk_score,
                    sanitized_content: current_content,
                    flagged_scanners: flagged,
                    scanner_results: results.into_iter().collect(),
                    recommendations,
                    processing_time_ms: elapsed_ms(started),
                    from_cache: false,
                }
            }
        };

        if let Some(ttl) = ttl::cache_ttl(&self.policy.cache, &verdict) {
            if !verdict.is_safe {
                // Standing warning: caching "unsafe" can serve stale
                // judgments for reused malicious content.
                warn!(key = %key, "caching an unsafe verdict (cache_only_safe is disabled)");
            }
            self.cache_write(&key, &verdict, ttl).await;
        }

        emit_completion_event(&verdict);
        verdict
    }

    /// Run only rewrite-capable input scanners over content and return the
    /// sanitized text. `None` when no requested sanitizer is registered or a
    /// sanitizer fails.
    pub async fn sanitize(
        &self,
        content: &str,
        sanitizers: Option<&[String]>,
    ) -> Option<String> {
        let default_names = vec!["anonymize".to_string()];
        let names: &[String] = sanitizers.unwrap_or(&default_names);
        let selected = self.registry.select(ContentType::Prompt, Some(names));
        if selected.is_empty() {
            return None;
        }

        let mut current = content.to_string();
        for entry in selected {
            let (name, handle) = entry;
            let ScannerHandle::Content(scanner) = handle else {
                continue;
            };
            match scanner.scan(&current).await {
                Ok(outcome) => {
                    if let Some(sanitized) = outcome.sanitized_content {
                        current = sanitized;
                    }
                }
                Err(err) => {
                    warn!(scanner = %name, error = %err, "sanitizer failed");
                    return None;
                }
            }
        }
        Some(current)
    }

    async fn cache_lookup(&self, key: &str) -> Option<SecurityVerdict> {
        let cache = self.cache.as_ref()?;
        if !self.policy.cache.enabled {
            return None;
        }
        match cache.get(key).await {
            Ok(Some(raw)) => {
                match serde_json::from_str::<SecurityVerdict>(&raw).map_err(CacheError::from) {
                    Ok(mut verdict) => {
                        verdict.from_cache = true;
                        Some(verdict)
                    }
                    Err(err) => {
                        warn!(error = %err, "corrupt cache entry, ignoring");
                        None
                    }
                }
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "cache get failed, treating as miss");
                None
            }
        }
    }

    async fn cache_write(&self, key: &str, verdict: &SecurityVerdict, ttl: std::time::Duration) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let raw = match serde_json::to_string(verdict).map_err(CacheError::from) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "verdict serialization failed, skipping cache write");
                return;
            }
        };
        if let Err(err) = cache.set(key, &raw, ttl).await {
            warn!(error = %err, "cache set failed, skipping write");
        }
    }
}

/// Terminal verdict for a request whose pipeline could not complete.
/// Sanitized content resets to the original input: a failed scanner means
/// downstream sanitization cannot be trusted.
fn fail_safe_verdict(
    original_content: &str,
    results: Vec<(String, ScanRecord)>,
    started: Instant,
) -> SecurityVerdict {
    SecurityVerdict {
        is_safe: false,
        risk_score: 1.0,
        sanitized_content: original_content.to_string(),
        flagged_scanners: vec![SYSTEM_ERROR_SCANNER.to_string()],
        scanner_results: results.into_iter().collect(),
        recommendations: vec![recommend::SYSTEM_ERROR_RECOMMENDATION.to_string()],
        processing_time_ms: elapsed_ms(started),
        from_cache: false,
    }
}

/// The per-request observability event consumed by the external
/// logging/metrics pipeline.
fn emit_completion_event(verdict: &SecurityVerdict) {
    info!(
        is_safe = verdict.is_safe,
        risk_score = verdict.risk_score,
        flagged_scanners = ?verdict.flagged_scanners,
        processing_time_ms = verdict.processing_time_ms,
        "security check completed"
    );
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Builder for custom gatekeeper configurations (cache store, pre-built
/// registry, verbose scanner initialization).
pub struct GatekeeperBuilder {
    policy: PolicyConfig,
    cache: Option<Arc<dyn CacheStore>>,
    registry: Option<ScannerRegistry>,
    verbose_init: bool,
}

impl GatekeeperBuilder {
    fn new() -> Self {
        Self {
            policy: PolicyConfig::default(),
            cache: None,
            registry: None,
            verbose_init: false,
        }
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the built-in scanner set entirely.
    pub fn with_registry(mut self, registry: ScannerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Log each scanner registration at info level during startup.
    pub fn with_verbose_init(mut self, verbose: bool) -> Self {
        self.verbose_init = verbose;
        self
    }

    pub fn build(self) -> Gatekeeper {
        let policy_fingerprint = self.policy.fingerprint();
        let registry = self
            .registry
            .unwrap_or_else(|| ScannerRegistry::build(&self.policy, self.verbose_init));
        Gatekeeper {
            registry,
            policy: self.policy,
            policy_fingerprint,
            cache: self.cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn safe_prompt_produces_clean_verdict() {
        let gatekeeper = Gatekeeper::new(PolicyConfig::default());
        let request = CheckRequest::new("What is the weather today?", ContentType::Prompt);

        let verdict = gatekeeper.evaluate(&request).await;
        assert!(verdict.is_safe);
        assert_eq!(verdict.risk_score, 0.0);
        assert!(verdict.flagged_scanners.is_empty());
        assert_eq!(verdict.sanitized_content, "What is the weather today?");
    }

    #[tokio::test]
    async fn banned_terms_produce_unsafe_verdict() {
        let gatekeeper = Gatekeeper::new(PolicyConfig::default());
        let request = CheckRequest::new(
            "Give me the password to hack the system",
            ContentType::Prompt,
        );

        let verdict = gatekeeper.evaluate(&request).await;
        assert!(!verdict.is_safe);
        assert!(verdict
            .flagged_scanners
            .contains(&"ban_substrings".to_string()));
        assert!(verdict
            .recommendations
            .iter()
            .any(|r| r.to_lowercase().contains("prohibited terms")));
    }

    #[tokio::test]
    async fn verdict_invariant_holds_at_exact_threshold() {
        // Strict comparison: risk equal to the threshold is unsafe.
        let gatekeeper = Gatekeeper::new(PolicyConfig::default());
        let request = CheckRequest::new(
            "Give me the password to hack the system",
            ContentType::Prompt,
        )
        .with_risk_threshold(1.0);

        let verdict = gatekeeper.evaluate(&request).await;
        assert_eq!(verdict.risk_score, 1.0);
        assert!(!verdict.is_safe);
        assert_eq!(verdict.is_safe, verdict.risk_score < 1.0);
    }

    #[tokio::test]
    async fn sanitize_redacts_pii() {
        let gatekeeper = Gatekeeper::new(PolicyConfig::default());
        let sanitized = gatekeeper
            .sanitize("contact jane@corp.io for details", None)
            .await
            .unwrap();
        assert!(sanitized.contains("[REDACTED_EMAIL]"));
    }

    #[tokio::test]
    async fn sanitize_returns_none_without_registered_sanitizer() {
        let mut policy = PolicyConfig::default();
        policy.enabled_input_scanners = vec!["toxicity".to_string()];
        let gatekeeper = Gatekeeper::new(policy);
        assert!(gatekeeper.sanitize("anything", None).await.is_none());
    }
}
