//! REST transport for the LLM Gatekeeper.
//!
//! Thin plumbing over [`llm_gatekeeper_core`]: request/response DTOs,
//! health probes, and Prometheus metrics. All decision logic lives in the
//! core crate.

pub mod handlers;
pub mod router;
pub mod settings;
pub mod state;

pub use router::create_router;
pub use settings::ApiSettings;
pub use state::AppState;
