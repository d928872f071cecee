//! Cache key composition.
//!
//! A key must change whenever anything that could change the verdict
//! changes: the content, the content type, the requested scanner subset, or
//! any policy tunable (via the policy fingerprint). The reference prompt is
//! part of the key only for output requests — for prompt requests it is
//! meaningless and must not perturb the key even if a caller supplies one.

use sha2::{Digest, Sha256};

use crate::types::{CheckRequest, ContentType};

const KEY_PREFIX: &str = "security";

/// Derive the deterministic cache key for a request under a given policy
/// fingerprint.
pub fn compose(request: &CheckRequest, policy_fingerprint: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.content.as_bytes());
    hasher.update(b"|");
    hasher.update(request.content_type.as_str().as_bytes());
    hasher.update(b"|");
    match &request.scanners {
        // An empty subset runs the full set, so it must key like one.
        Some(scanners) if !scanners.is_empty() => {
            let mut names: Vec<&str> = scanners.iter().map(String::as_str).collect();
            names.sort_unstable();
            hasher.update(names.join(",").as_bytes());
        }
        _ => hasher.update(b"all"),
    }
    hasher.update(b"|");
    hasher.update(policy_fingerprint.as_bytes());

    if request.content_type == ContentType::Output {
        match &request.reference_prompt {
            Some(reference) => {
                hasher.update(b"|ref:");
                hasher.update(reference.as_bytes());
            }
            None => hasher.update(b"|noref"),
        }
    }

    format!("{}:{}", KEY_PREFIX, hex::encode(hasher.finalize()))
}
