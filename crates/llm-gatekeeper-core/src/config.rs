//! Policy configuration.
//!
//! `PolicyConfig` is materialized once at startup by the embedding
//! application (the core never reads files or environment variables) and is
//! read-only for the lifetime of every request. Its fingerprint is folded
//! into every cache key, so a policy change invalidates stale cache entries
//! without an explicit flush.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Canonical default risk threshold. A verdict is safe iff its risk score is
/// strictly below the threshold.
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.6;

/// Per-scanner tuning block. Every field a built-in scanner can consume;
/// which fields a given scanner requires is declared in the registry's
/// blueprint table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScannerTuning {
    /// A scanner can be listed as enabled but switched off here.
    pub enabled: bool,
    /// Per-scanner risk threshold for scanners that grade rather than
    /// hard-flag (toxicity, prompt injection, relevance).
    pub threshold: Option<f64>,
    /// Term list for list-based scanners (banned substrings, banned topics).
    pub terms: Option<Vec<String>>,
    /// Language list for the code scanner.
    pub languages: Option<Vec<String>>,
    /// Whether term matching is case sensitive.
    pub case_sensitive: bool,
}

impl Default for ScannerTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: None,
            terms: None,
            languages: None,
            case_sensitive: false,
        }
    }
}

/// Cache persistence policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CachePolicy {
    /// Master switch for verdict caching.
    pub enabled: bool,
    /// When true (the default posture), only safe verdicts are written.
    pub cache_only_safe: bool,
    /// TTL in seconds for safe verdicts. Zero or negative disables the write.
    pub safe_ttl_secs: i64,
    /// TTL in seconds for unsafe verdicts, used only when `cache_only_safe`
    /// is false. Zero or negative disables the write.
    pub unsafe_ttl_secs: i64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_only_safe: true,
            safe_ttl_secs: 3600,
            unsafe_ttl_secs: 0,
        }
    }
}

/// Process-wide scanning policy. Immutable after startup; a runtime policy
/// change requires rebuilding the registry (and therefore the gatekeeper).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Input scanner names, in execution order.
    pub enabled_input_scanners: Vec<String>,
    /// Output scanner names, in execution order.
    pub enabled_output_scanners: Vec<String>,
    /// Threshold applied when a request does not carry its own.
    pub default_risk_threshold: f64,
    /// Per-scanner tuning, keyed by scanner name. BTreeMap so fingerprint
    /// iteration order is stable.
    pub scanners: BTreeMap<String, ScannerTuning>,
    /// Verdict cache policy.
    pub cache: CachePolicy,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let mut scanners = BTreeMap::new();
        scanners.insert(
            "anonymize".to_string(),
            ScannerTuning::default(),
        );
        scanners.insert(
            "ban_substrings".to_string(),
            ScannerTuning {
                terms: Some(default_banned_substrings()),
                ..ScannerTuning::default()
            },
        );
        scanners.insert(
            "ban_topics".to_string(),
            ScannerTuning {
                terms: Some(default_banned_topics()),
                ..ScannerTuning::default()
            },
        );
        scanners.insert(
            "code".to_string(),
            ScannerTuning {
                languages: Some(default_code_languages()),
                ..ScannerTuning::default()
            },
        );
        scanners.insert(
            "prompt_injection".to_string(),
            ScannerTuning {
                threshold: Some(0.5),
                ..ScannerTuning::default()
            },
        );
        scanners.insert("secrets".to_string(), ScannerTuning::default());
        scanners.insert(
            "toxicity".to_string(),
            ScannerTuning {
                threshold: Some(0.5),
                ..ScannerTuning::default()
            },
        );
        scanners.insert("bias".to_string(), ScannerTuning::default());
        scanners.insert("no_refusal".to_string(), ScannerTuning::default());
        scanners.insert(
            "relevance".to_string(),
            ScannerTuning {
                threshold: Some(0.25),
                ..ScannerTuning::default()
            },
        );
        scanners.insert("sensitive".to_string(), ScannerTuning::default());

        Self {
            enabled_input_scanners: vec![
                "anonymize".to_string(),
                "ban_substrings".to_string(),
                "ban_topics".to_string(),
                "code".to_string(),
                "prompt_injection".to_string(),
                "secrets".to_string(),
                "toxicity".to_string(),
            ],
            enabled_output_scanners: vec![
                "bias".to_string(),
                "no_refusal".to_string(),
                "relevance".to_string(),
                "sensitive".to_string(),
            ],
            default_risk_threshold: DEFAULT_RISK_THRESHOLD,
            scanners,
            cache: CachePolicy::default(),
        }
    }
}

impl PolicyConfig {
    /// Stable hash over every tunable that affects scan outcomes: enabled
    /// scanner lists, the default threshold, and all per-scanner tuning.
    /// Cache policy is excluded — it affects persistence, not verdicts.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.enabled_input_scanners.join(","));
        hasher.update(b"|");
        hasher.update(self.enabled_output_scanners.join(","));
        hasher.update(b"|");
        hasher.update(self.default_risk_threshold.to_bits().to_le_bytes());
        for (name, tuning) in &self.scanners {
            hasher.update(b"|");
            hasher.update(name.as_bytes());
            hasher.update(if tuning.enabled { b":1" } else { b":0" });
            if let Some(threshold) = tuning.threshold {
                hasher.update(threshold.to_bits().to_le_bytes());
            }
            if let Some(terms) = &tuning.terms {
                hasher.update(terms.join(","));
            }
            if let Some(languages) = &tuning.languages {
                hasher.update(languages.join(","));
            }
            hasher.update(if tuning.case_sensitive { b"cs" } else { b"ci" });
        }
        hex::encode(hasher.finalize())
    }

    pub fn tuning(&self, scanner: &str) -> Option<&ScannerTuning> {
        self.scanners.get(scanner)
    }
}

pub(crate) fn default_banned_substrings() -> Vec<String> {
    ["password", "api_key", "secret", "token"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_banned_topics() -> Vec<String> {
    ["violence", "illegal", "hate"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_code_languages() -> Vec<String> {
    ["python", "javascript"].into_iter().map(String::from).collect()
}
