//! # LLM Gatekeeper Core
//!
//! Scan orchestration and decision engine for a content-security layer in
//! front of a language-model application. Every prompt and every model
//! output is routed through a pipeline of scanners; the gatekeeper
//! aggregates their opinions into a single pass/fail verdict with a numeric
//! risk score, explains why content was flagged, and caches verdicts under
//! policy-versioned keys.
//!
//! ## Overview
//!
//! - Scanners are registered once at startup from a [`PolicyConfig`] and run
//!   sequentially per request, chaining sanitization rewrites.
//! - A single scanner execution failure aborts the pipeline and yields a
//!   deterministic fail-safe verdict (`is_safe = false`, risk 1.0): an
//!   orchestrator that cannot evaluate a scanner assumes the worst.
//! - [`Gatekeeper::evaluate`] is total — it always returns a
//!   [`SecurityVerdict`], never an error.
//! - Cache keys embed a policy fingerprint, so any policy change invalidates
//!   stale entries without an explicit flush.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use llm_gatekeeper_core::{CheckRequest, ContentType, Gatekeeper, PolicyConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gatekeeper = Gatekeeper::new(PolicyConfig::default());
//!
//!     let request = CheckRequest::new("What is the weather today?", ContentType::Prompt);
//!     let verdict = gatekeeper.evaluate(&request).await;
//!     println!("safe: {}, risk: {}", verdict.is_safe, verdict.risk_score);
//! }
//! ```

pub mod cache;
pub mod cache_key;
pub mod config;
pub mod error;
pub mod gatekeeper;
mod pipeline;
pub mod recommend;
pub mod registry;
pub mod scanner;
pub mod scanners;
pub mod ttl;
pub mod types;

// Primary exports
pub use cache::{CacheStore, MemoryCacheStore};
#[cfg(feature = "redis")]
pub use cache::RedisCacheStore;
pub use config::{CachePolicy, PolicyConfig, ScannerTuning, DEFAULT_RISK_THRESHOLD};
pub use error::{CacheError, ScannerError};
pub use gatekeeper::{Gatekeeper, GatekeeperBuilder};
pub use registry::ScannerRegistry;
pub use scanner::{ContentScanner, ReferenceScanner, ScannerHandle};
pub use types::{
    CheckRequest, ContentType, ScanOutcome, ScanRecord, SecurityVerdict, SYSTEM_ERROR_SCANNER,
};
