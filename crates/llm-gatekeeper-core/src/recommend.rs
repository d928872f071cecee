//! Remediation messages for flagged scanners.
//!
//! The mapping must stay complete for every scanner name the registry can
//! produce; a flagged scanner with no message here is a gap to fix, not a
//! case to ignore silently.

use tracing::warn;

/// Recommendation attached to every fail-safe verdict.
pub const SYSTEM_ERROR_RECOMMENDATION: &str = "A security scanner failed during evaluation and \
the content was rejected as a precaution. Retry the request, or contact support if the problem \
persists.";

fn remediation(scanner: &str) -> Option<&'static str> {
    Some(match scanner {
        "anonymize" => "Personally identifiable information detected and redacted from the input.",
        "ban_substrings" => {
            "Prohibited terms detected. Remove the flagged terms before resubmitting."
        }
        "ban_topics" => "Content touches a banned topic. Rephrase to avoid the restricted subject.",
        "code" => "Code detected in input. Ensure code execution is intended.",
        "prompt_injection" => "Potential prompt injection detected. Review and sanitize user input.",
        "secrets" => "Sensitive data detected. Remove API keys or secrets from content.",
        "toxicity" => "Toxic content detected. Please rephrase in a constructive manner.",
        "bias" => "Potentially biased phrasing detected in the output. Consider regenerating.",
        "no_refusal" => "The model refused the request. Rephrase the prompt or adjust expectations.",
        "relevance" => "The output does not appear relevant to the original prompt.",
        "sensitive" => "Sensitive personal data detected in the output and redacted.",
        _ => return None,
    })
}

/// Generate the ordered recommendation list for the flagged scanners.
pub fn for_flagged(flagged: &[String]) -> Vec<String> {
    let mut recommendations = Vec::with_capacity(flagged.len());
    for name in flagged {
        match remediation(name) {
            Some(message) => recommendations.push(message.to_string()),
            None => {
                // Custom/embedder scanner without a registered message.
                warn!(scanner = %name, "flagged scanner has no remediation message");
            }
        }
    }
    recommendations
}
