//! Error types for the gatekeeper core.
//!
//! Note the taxonomy: scanner execution failure is request-fatal (it triggers
//! the fail-safe verdict), cache failure is always recoverable (treated as a
//! miss or a skipped write), and configuration incompleteness is not an error
//! type at all — the registry degrades it to a logged warning.

/// A scanner failed to execute. Distinct from a scanner *flagging* content,
/// which is a normal outcome.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// The scanner's backend (classifier, rule engine, ...) failed.
    #[error("scanner backend failure: {0}")]
    Backend(String),

    /// The scanner exceeded its execution deadline.
    #[error("scanner timed out after {0}ms")]
    Timeout(u64),
}

/// The cache store could not be reached or misbehaved. Never propagated to
/// callers of `evaluate`; always degraded at the call site.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Connection or command failure against the backing store.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    /// A cached verdict could not be serialized or deserialized.
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
