//! HTTP request handlers

pub mod check;
pub mod health;
pub mod metrics;
pub mod sanitize;
pub mod scanners;

pub use check::check_security;
pub use health::{health, live, ready, version};
pub use metrics::{prometheus_metrics, security_metrics};
pub use sanitize::sanitize_content;
pub use scanners::list_scanners;
