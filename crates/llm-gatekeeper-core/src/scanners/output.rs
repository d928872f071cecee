//! Output (model response) scanners.

use async_trait::async_trait;
use std::collections::HashSet;

use super::redact_pii;
use crate::error::ScannerError;
use crate::scanner::{ContentScanner, ReferenceScanner};
use crate::types::ScanOutcome;

static BIAS_PHRASES: &[&str] = &[
    "all women are",
    "all men are",
    "those people always",
    "everyone from that country",
    "people like them never",
    "that group is naturally",
];

/// Flags sweeping generalizations about protected groups in model output.
pub struct BiasScanner;

#[async_trait]
impl ContentScanner for BiasScanner {
    fn name(&self) -> &'static str {
        "bias"
    }

    async fn scan(&self, content: &str) -> Result<ScanOutcome, ScannerError> {
        let lowered = content.to_lowercase();
        let matched = BIAS_PHRASES.iter().any(|phrase| lowered.contains(phrase));
        if matched {
            return Ok(ScanOutcome::flagged(0.7));
        }
        Ok(ScanOutcome::valid())
    }
}

static REFUSAL_PHRASES: &[&str] = &[
    "i cannot assist",
    "i can't assist",
    "i cannot help with",
    "i can't help with",
    "i'm sorry, but i",
    "i am sorry, but i",
    "i am unable to",
    "i'm not able to",
    "as an ai, i cannot",
];

/// Flags outputs that are refusals rather than answers.
pub struct NoRefusalScanner;

#[async_trait]
impl ContentScanner for NoRefusalScanner {
    fn name(&self) -> &'static str {
        "no_refusal"
    }

    async fn scan(&self, content: &str) -> Result<ScanOutcome, ScannerError> {
        let lowered = content.to_lowercase();
        let matched = REFUSAL_PHRASES.iter().any(|phrase| lowered.contains(phrase));
        if matched {
            return Ok(ScanOutcome::flagged(0.8));
        }
        Ok(ScanOutcome::valid())
    }
}

static STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "to", "of", "in", "on", "and", "or", "for",
    "it", "this", "that", "what", "how", "why", "do", "does", "did", "you", "i", "me", "my",
];

/// Grades how relevant an output is to the original prompt via word overlap.
///
/// The reference-class scanner: it is registered as
/// [`crate::scanner::ScannerHandle::WithReference`] and receives the original
/// prompt alongside the candidate output.
pub struct RelevanceScanner {
    threshold: f64,
}

impl RelevanceScanner {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    fn keywords(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1 && !STOPWORDS.contains(w))
            .map(String::from)
            .collect()
    }
}

#[async_trait]
impl ReferenceScanner for RelevanceScanner {
    fn name(&self) -> &'static str {
        "relevance"
    }

    async fn scan_with_reference(
        &self,
        content: &str,
        reference: &str,
    ) -> Result<ScanOutcome, ScannerError> {
        if reference.trim().is_empty() {
            // Nothing to compare against.
            return Ok(ScanOutcome::valid());
        }
        let prompt_words = Self::keywords(reference);
        let output_words = Self::keywords(content);
        if prompt_words.is_empty() || output_words.is_empty() {
            return Ok(ScanOutcome::valid());
        }
        // Coverage of the prompt's keywords by the output, not full Jaccard:
        // a long but on-topic answer should not be penalized for extra words.
        let shared = prompt_words.intersection(&output_words).count() as f64;
        let overlap = shared / prompt_words.len() as f64;
        let risk = (1.0 - overlap).clamp(0.0, 1.0);
        if overlap < self.threshold {
            Ok(ScanOutcome::flagged(risk))
        } else {
            Ok(ScanOutcome {
                is_valid: true,
                risk_score: risk,
                sanitized_content: None,
            })
        }
    }
}

/// Detects and redacts personal data leaking through model output.
pub struct SensitiveScanner;

#[async_trait]
impl ContentScanner for SensitiveScanner {
    fn name(&self) -> &'static str {
        "sensitive"
    }

    async fn scan(&self, content: &str) -> Result<ScanOutcome, ScannerError> {
        let (redacted, replacements) = redact_pii(content);
        if replacements == 0 {
            return Ok(ScanOutcome::valid());
        }
        Ok(ScanOutcome::flagged(0.8).with_sanitized(redacted))
    }
}
