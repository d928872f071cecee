//! Cache TTL policy: decides, per verdict, whether and for how long a
//! result may be persisted.
//!
//! Fail-safe verdicts never reach this decision — the orchestrator returns
//! them before the cache-write step.

use std::time::Duration;

use crate::config::CachePolicy;
use crate::types::SecurityVerdict;

/// Returns the TTL to persist the verdict under, or `None` when the verdict
/// must not be written. A configured TTL of zero or less always means "do
/// not cache", regardless of the eligibility flags.
pub fn cache_ttl(policy: &CachePolicy, verdict: &SecurityVerdict) -> Option<Duration> {
    if !policy.enabled {
        return None;
    }
    let ttl_secs = if verdict.is_safe {
        policy.safe_ttl_secs
    } else {
        if policy.cache_only_safe {
            return None;
        }
        policy.unsafe_ttl_secs
    };
    if ttl_secs <= 0 {
        return None;
    }
    Some(Duration::from_secs(ttl_secs as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn verdict(is_safe: bool) -> SecurityVerdict {
        SecurityVerdict {
            is_safe,
            risk_score: if is_safe { 0.0 } else { 1.0 },
            sanitized_content: String::new(),
            flagged_scanners: vec![],
            scanner_results: HashMap::new(),
            recommendations: vec![],
            processing_time_ms: 0.0,
            from_cache: false,
        }
    }

    #[test]
    fn safe_verdict_uses_safe_ttl() {
        let policy = CachePolicy::default();
        assert_eq!(
            cache_ttl(&policy, &verdict(true)),
            Some(Duration::from_secs(3600))
        );
    }

    #[test]
    fn unsafe_verdict_not_cached_by_default() {
        let policy = CachePolicy::default();
        assert_eq!(cache_ttl(&policy, &verdict(false)), None);
    }

    #[test]
    fn unsafe_verdict_cached_when_opted_out() {
        let policy = CachePolicy {
            cache_only_safe: false,
            unsafe_ttl_secs: 30,
            ..CachePolicy::default()
        };
        assert_eq!(
            cache_ttl(&policy, &verdict(false)),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn zero_or_negative_ttl_disables_caching() {
        let policy = CachePolicy {
            safe_ttl_secs: 0,
            ..CachePolicy::default()
        };
        assert_eq!(cache_ttl(&policy, &verdict(true)), None);

        let negative = CachePolicy {
            cache_only_safe: false,
            unsafe_ttl_secs: -5,
            ..CachePolicy::default()
        };
        assert_eq!(cache_ttl(&negative, &verdict(false)), None);
    }

    #[test]
    fn disabled_cache_never_writes() {
        let policy = CachePolicy {
            enabled: false,
            ..CachePolicy::default()
        };
        assert_eq!(cache_ttl(&policy, &verdict(true)), None);
    }
}
