//! The scanner capability contract.
//!
//! The orchestrator depends on exactly two scanner shapes, chosen at
//! registration time: content-only scanners, and reference scanners that
//! compare a model output against the original prompt. A scanner signals
//! execution failure by returning `Err(ScannerError)`; flagging content is a
//! normal `Ok` outcome.

use async_trait::async_trait;

use crate::error::ScannerError;
use crate::types::ScanOutcome;

/// A scanner that inspects a single piece of content.
///
/// All input scanners and most output scanners take this shape.
#[async_trait]
pub trait ContentScanner: Send + Sync {
    /// Stable name, used for registry lookup, flagging, and recommendations.
    fn name(&self) -> &'static str;

    async fn scan(&self, content: &str) -> Result<ScanOutcome, ScannerError>;
}

/// A scanner that must see the original prompt alongside the candidate
/// output (the relevance class of output scanner).
#[async_trait]
pub trait ReferenceScanner: Send + Sync {
    fn name(&self) -> &'static str;

    async fn scan_with_reference(
        &self,
        content: &str,
        reference: &str,
    ) -> Result<ScanOutcome, ScannerError>;
}

/// A registered scanner. The shape is fixed when the registry is built;
/// it is never re-discovered per call.
pub enum ScannerHandle {
    Content(Box<dyn ContentScanner>),
    WithReference(Box<dyn ReferenceScanner>),
}

impl ScannerHandle {
    pub fn name(&self) -> &'static str {
        match self {
            ScannerHandle::Content(scanner) => scanner.name(),
            ScannerHandle::WithReference(scanner) => scanner.name(),
        }
    }
}

impl std::fmt::Debug for ScannerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScannerHandle::Content(s) => write!(f, "ScannerHandle::Content({})", s.name()),
            ScannerHandle::WithReference(s) => {
                write!(f, "ScannerHandle::WithReference({})", s.name())
            }
        }
    }
}
