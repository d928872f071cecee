//! Built-in scanners.
//!
//! These are deliberately shallow, regex/lexicon heuristics: the orchestrator
//! treats scanner internals as an external concern and only depends on the
//! capability contract in [`crate::scanner`]. Anything here can be replaced
//! by a classifier-backed implementation without touching the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

pub mod input;
pub mod output;

struct PiiPattern {
    label: &'static str,
    regex: Lazy<Regex>,
}

static PII_PATTERNS: [PiiPattern; 5] = [
    PiiPattern {
        label: "EMAIL",
        regex: Lazy::new(|| {
            Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
        }),
    },
    PiiPattern {
        label: "PHONE",
        regex: Lazy::new(|| {
            Regex::new(r"\+?\d{1,3}[-. (]*\d{3}[-. )]*\d{3}[-. ]*\d{4}\b").expect("valid regex")
        }),
    },
    PiiPattern {
        label: "SSN",
        regex: Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("valid regex")),
    },
    PiiPattern {
        label: "IP",
        regex: Lazy::new(|| {
            Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("valid regex")
        }),
    },
    PiiPattern {
        label: "CREDIT_CARD",
        regex: Lazy::new(|| Regex::new(r"\b(?:\d[ -]?){13,16}\b").expect("valid regex")),
    },
];

/// Replace recognized PII spans with `[REDACTED_<LABEL>]` placeholders.
/// Returns the rewritten text and the number of replacements made.
pub(crate) fn redact_pii(content: &str) -> (String, usize) {
    let mut redacted = content.to_string();
    let mut replacements = 0;
    for pattern in PII_PATTERNS.iter() {
        let matches = pattern.regex.find_iter(&redacted).count();
        if matches > 0 {
            replacements += matches;
            redacted = pattern
                .regex
                .replace_all(&redacted, format!("[REDACTED_{}]", pattern.label).as_str())
                .into_owned();
        }
    }
    (redacted, replacements)
}

/// Case-aware substring containment for list-based scanners.
pub(crate) fn contains_term(content: &str, term: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        content.contains(term)
    } else {
        content.to_lowercase().contains(&term.to_lowercase())
    }
}
