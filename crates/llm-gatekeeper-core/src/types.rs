//! Core data model: check requests, per-scanner outcomes, and the
//! aggregated security verdict returned to callers (and persisted to cache).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::DEFAULT_RISK_THRESHOLD;

/// Name recorded in `flagged_scanners` when the pipeline itself fails.
pub const SYSTEM_ERROR_SCANNER: &str = "system_error";

/// Kind of content being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A user prompt on its way to the model.
    Prompt,
    /// A model output on its way back to the user.
    Output,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Prompt => "prompt",
            ContentType::Output => "output",
        }
    }
}

/// One inbound evaluation request. Immutable for the duration of the check.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Content to evaluate.
    pub content: String,
    /// Whether this is a prompt or a model output.
    pub content_type: ContentType,
    /// Optional subset of scanner names to run. `None` means the full
    /// registered set for the content type.
    pub scanners: Option<Vec<String>>,
    /// Exclusive upper bound of "safe": a verdict is safe iff its risk
    /// score is strictly below this value.
    pub risk_threshold: f64,
    /// Original prompt, supplied alongside model output so relevance-class
    /// scanners can compare the two. Ignored for prompt requests.
    pub reference_prompt: Option<String>,
}

impl CheckRequest {
    /// Build a request with the canonical default risk threshold.
    pub fn new(content: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            content: content.into(),
            content_type,
            scanners: None,
            risk_threshold: DEFAULT_RISK_THRESHOLD,
            reference_prompt: None,
        }
    }

    pub fn with_scanners(mut self, scanners: Vec<String>) -> Self {
        self.scanners = Some(scanners);
        self
    }

    pub fn with_risk_threshold(mut self, threshold: f64) -> Self {
        self.risk_threshold = threshold;
        self
    }

    pub fn with_reference_prompt(mut self, reference: impl Into<String>) -> Self {
        self.reference_prompt = Some(reference.into());
        self
    }
}

/// What a single scanner reports for a single piece of content.
///
/// A scanner saying "this content is unsafe" (`is_valid == false`) is a
/// normal, successful outcome. Execution failure is signalled separately,
/// through `Err(ScannerError)` on the scan call itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    /// False when the scanner flags the content.
    pub is_valid: bool,
    /// Risk in `[0, 1]`.
    pub risk_score: f64,
    /// Rewritten content, when the scanner sanitizes (e.g. PII redaction).
    pub sanitized_content: Option<String>,
}

impl ScanOutcome {
    /// Clean pass: nothing detected, nothing rewritten.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            risk_score: 0.0,
            sanitized_content: None,
        }
    }

    /// Content flagged at the given risk.
    pub fn flagged(risk_score: f64) -> Self {
        Self {
            is_valid: false,
            risk_score: risk_score.clamp(0.0, 1.0),
            sanitized_content: None,
        }
    }

    pub fn with_sanitized(mut self, content: impl Into<String>) -> Self {
        self.sanitized_content = Some(content.into());
        self
    }
}

/// Per-scanner entry in a [`SecurityVerdict`]. Wire/cache representation of
/// a [`ScanOutcome`], plus an error string when the scanner failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanRecord {
    pub is_valid: bool,
    pub risk_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ScanOutcome> for ScanRecord {
    fn from(outcome: ScanOutcome) -> Self {
        Self {
            is_valid: outcome.is_valid,
            risk_score: outcome.risk_score,
            sanitized_content: outcome.sanitized_content,
            error: None,
        }
    }
}

impl ScanRecord {
    /// Record for a scanner that failed to execute.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            risk_score: 1.0,
            sanitized_content: None,
            error: Some(error.into()),
        }
    }
}

/// The aggregated decision for one request. This is the unit returned to
/// the caller and, when eligible, persisted to the cache store.
///
/// Invariant: `is_safe == (risk_score < risk_threshold)` for the threshold
/// the request was evaluated under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityVerdict {
    pub is_safe: bool,
    pub risk_score: f64,
    pub sanitized_content: String,
    pub flagged_scanners: Vec<String>,
    pub scanner_results: HashMap<String, ScanRecord>,
    pub recommendations: Vec<String>,
    pub processing_time_ms: f64,
    /// True when this verdict was served from the cache instead of computed.
    /// Process-local diagnostic; never persisted or sent over the wire.
    #[serde(skip)]
    pub from_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentType::Prompt).unwrap(),
            "\"prompt\""
        );
        assert_eq!(
            serde_json::to_string(&ContentType::Output).unwrap(),
            "\"output\""
        );
    }

    #[test]
    fn flagged_outcome_clamps_risk() {
        assert_eq!(ScanOutcome::flagged(1.7).risk_score, 1.0);
        assert_eq!(ScanOutcome::flagged(-0.3).risk_score, 0.0);
    }

    #[test]
    fn verdict_round_trips_through_json() {
        let mut results = HashMap::new();
        results.insert(
            "toxicity".to_string(),
            ScanRecord::from(ScanOutcome::flagged(0.8)),
        );
        let verdict = SecurityVerdict {
            is_safe: false,
            risk_score: 0.8,
            sanitized_content: "hello".to_string(),
            flagged_scanners: vec!["toxicity".to_string()],
            scanner_results: results,
            recommendations: vec!["rephrase".to_string()],
            processing_time_ms: 1.25,
            from_cache: true,
        };

        let raw = serde_json::to_string(&verdict).unwrap();
        let back: SecurityVerdict = serde_json::from_str(&raw).unwrap();
        assert!(!back.is_safe);
        // from_cache is a process-local flag, not part of the wire shape.
        assert!(!back.from_cache);
        assert_eq!(back.flagged_scanners, vec!["toxicity"]);
        assert_eq!(back.scanner_results["toxicity"].risk_score, 0.8);
    }

    #[test]
    fn failed_record_carries_error() {
        let record = ScanRecord::failed("backend down");
        assert!(!record.is_valid);
        assert_eq!(record.risk_score, 1.0);
        assert_eq!(record.error.as_deref(), Some("backend down"));
    }
}
