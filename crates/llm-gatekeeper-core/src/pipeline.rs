//! Sequential scanner execution.
//!
//! Scanners run in registration order; each scanner sees the current
//! (possibly already sanitized) content, so sanitization is cumulative and
//! order-dependent. Each scanner runs under a fixed deadline. A single
//! scanner execution failure invalidates the whole request: the loop aborts
//! immediately and the orchestrator falls back to the fail-safe verdict.
//! This is a short-circuit, not a retry.

use std::time::Duration;

use tracing::{debug, error};

use crate::error::ScannerError;
use crate::scanner::ScannerHandle;
use crate::types::{ScanRecord, ScanOutcome};

/// Per-scanner execution deadline. A scanner that exceeds it fails the
/// request like any other execution error.
const SCANNER_DEADLINE: Duration = Duration::from_secs(10);

/// Outcome of running the scanner loop.
pub(crate) enum PipelineRun {
    /// Every selected scanner executed (whether or not it flagged).
    Completed {
        /// Per-scanner records, in execution order.
        results: Vec<(String, ScanRecord)>,
        /// Names of scanners that flagged, in execution order.
        flagged: Vec<String>,
        /// Risk scores of the flagged scanners, matching `flagged`.
        flagged_risks: Vec<f64>,
        /// Content after all sanitization rewrites.
        current_content: String,
    },
    /// A scanner failed to execute; the rest of the loop was skipped.
    Failed {
        /// Name of the failing scanner.
        scanner: String,
        /// Records gathered up to and including the failure.
        results: Vec<(String, ScanRecord)>,
    },
}

pub(crate) async fn run(
    scanners: &[&(String, ScannerHandle)],
    content: &str,
    reference: Option<&str>,
) -> PipelineRun {
    let mut results: Vec<(String, ScanRecord)> = Vec::with_capacity(scanners.len());
    let mut flagged: Vec<String> = Vec::new();
    let mut flagged_risks: Vec<f64> = Vec::new();
    let mut current_content = content.to_string();

    for entry in scanners {
        let (name, handle) = entry;

        let scan = async {
            match handle {
                ScannerHandle::Content(scanner) => scanner.scan(&current_content).await,
                ScannerHandle::WithReference(scanner) => match reference {
                    Some(reference) => {
                        scanner.scan_with_reference(&current_content, reference).await
                    }
                    None => {
                        debug!(scanner = %name, "no reference prompt supplied, passing through");
                        Ok(ScanOutcome::valid())
                    }
                },
            }
        };
        let scanned = match tokio::time::timeout(SCANNER_DEADLINE, scan).await {
            Ok(scanned) => scanned,
            Err(_) => Err(ScannerError::Timeout(SCANNER_DEADLINE.as_millis() as u64)),
        };

        let outcome = match scanned {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(scanner = %name, error = %err, "scanner execution failed, aborting pipeline");
                results.push((name.clone(), ScanRecord::failed(err.to_string())));
                return PipelineRun::Failed {
                    scanner: name.clone(),
                    results,
                };
            }
        };

        if !outcome.is_valid {
            flagged.push(name.clone());
            flagged_risks.push(outcome.risk_score);
        }
        if let Some(sanitized) = &outcome.sanitized_content {
            current_content = sanitized.clone();
        }
        results.push((name.clone(), ScanRecord::from(outcome)));
    }

    PipelineRun::Completed {
        results,
        flagged,
        flagged_risks,
        current_content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScannerError;
    use crate::scanner::ContentScanner;
    use crate::types::ScanOutcome;
    use async_trait::async_trait;

    struct Fixed {
        name: &'static str,
        outcome: ScanOutcome,
    }

    #[async_trait]
    impl ContentScanner for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn scan(&self, _content: &str) -> Result<ScanOutcome, ScannerError> {
            Ok(self.outcome.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl ContentScanner for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        async fn scan(&self, _content: &str) -> Result<ScanOutcome, ScannerError> {
            Err(ScannerError::Backend("boom".to_string()))
        }
    }

    /// Appends a marker so chaining order is observable.
    struct Appending {
        name: &'static str,
        marker: &'static str,
    }

    #[async_trait]
    impl ContentScanner for Appending {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn scan(&self, content: &str) -> Result<ScanOutcome, ScannerError> {
            Ok(ScanOutcome::valid().with_sanitized(format!("{content}{}", self.marker)))
        }
    }

    fn handle(scanner: impl ContentScanner + 'static) -> ScannerHandle {
        ScannerHandle::Content(Box::new(scanner))
    }

    #[tokio::test]
    async fn records_flags_in_execution_order() {
        let scanners = vec![
            (
                "first".to_string(),
                handle(Fixed {
                    name: "first",
                    outcome: ScanOutcome::flagged(0.4),
                }),
            ),
            (
                "second".to_string(),
                handle(Fixed {
                    name: "second",
                    outcome: ScanOutcome::valid(),
                }),
            ),
            (
                "third".to_string(),
                handle(Fixed {
                    name: "third",
                    outcome: ScanOutcome::flagged(0.9),
                }),
            ),
        ];
        let refs: Vec<&(String, ScannerHandle)> = scanners.iter().collect();

        match run(&refs, "content", None).await {
            PipelineRun::Completed {
                flagged,
                flagged_risks,
                results,
                ..
            } => {
                assert_eq!(flagged, vec!["first", "third"]);
                assert_eq!(flagged_risks, vec![0.4, 0.9]);
                assert_eq!(results.len(), 3);
            }
            PipelineRun::Failed { .. } => panic!("pipeline should complete"),
        }
    }

    #[tokio::test]
    async fn sanitization_chains_cumulatively() {
        let scanners = vec![
            (
                "a".to_string(),
                handle(Appending {
                    name: "a",
                    marker: "-A",
                }),
            ),
            (
                "b".to_string(),
                handle(Appending {
                    name: "b",
                    marker: "-B",
                }),
            ),
        ];
        let refs: Vec<&(String, ScannerHandle)> = scanners.iter().collect();

        match run(&refs, "x", None).await {
            PipelineRun::Completed {
                current_content,
                results,
                ..
            } => {
                // Second scanner saw the first scanner's rewrite.
                assert_eq!(current_content, "x-A-B");
                assert_eq!(
                    results[1].1.sanitized_content.as_deref(),
                    Some("x-A-B")
                );
            }
            PipelineRun::Failed { .. } => panic!("pipeline should complete"),
        }
    }

    #[tokio::test]
    async fn failure_short_circuits_remaining_scanners() {
        let scanners = vec![
            ("failing".to_string(), handle(Failing)),
            (
                "never_runs".to_string(),
                handle(Fixed {
                    name: "never_runs",
                    outcome: ScanOutcome::flagged(1.0),
                }),
            ),
        ];
        let refs: Vec<&(String, ScannerHandle)> = scanners.iter().collect();

        match run(&refs, "content", None).await {
            PipelineRun::Failed { scanner, results } => {
                assert_eq!(scanner, "failing");
                assert_eq!(results.len(), 1);
                assert!(results[0].1.error.is_some());
            }
            PipelineRun::Completed { .. } => panic!("pipeline should fail"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_scanner_times_out_and_fails_pipeline() {
        struct Stalled;

        #[async_trait]
        impl ContentScanner for Stalled {
            fn name(&self) -> &'static str {
                "stalled"
            }
            async fn scan(&self, _content: &str) -> Result<ScanOutcome, ScannerError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(ScanOutcome::valid())
            }
        }

        let scanners = vec![("stalled".to_string(), handle(Stalled))];
        let refs: Vec<&(String, ScannerHandle)> = scanners.iter().collect();

        match run(&refs, "content", None).await {
            PipelineRun::Failed { scanner, results } => {
                assert_eq!(scanner, "stalled");
                assert!(results[0].1.error.as_deref().unwrap().contains("timed out"));
            }
            PipelineRun::Completed { .. } => panic!("pipeline should fail"),
        }
    }

    #[tokio::test]
    async fn reference_scanner_passes_through_without_reference() {
        use crate::scanner::ReferenceScanner;

        struct NeedsRef;

        #[async_trait]
        impl ReferenceScanner for NeedsRef {
            fn name(&self) -> &'static str {
                "needs_ref"
            }
            async fn scan_with_reference(
                &self,
                _content: &str,
                _reference: &str,
            ) -> Result<ScanOutcome, ScannerError> {
                Ok(ScanOutcome::flagged(1.0))
            }
        }

        let scanners = vec![(
            "needs_ref".to_string(),
            ScannerHandle::WithReference(Box::new(NeedsRef)),
        )];
        let refs: Vec<&(String, ScannerHandle)> = scanners.iter().collect();

        match run(&refs, "content", None).await {
            PipelineRun::Completed { flagged, .. } => assert!(flagged.is_empty()),
            PipelineRun::Failed { .. } => panic!("pipeline should complete"),
        }
    }
}
