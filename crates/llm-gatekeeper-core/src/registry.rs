//! Scanner registry.
//!
//! Builds the active input/output scanner sets from [`PolicyConfig`], in
//! enabled-scanner order, via a single declarative blueprint table. Building
//! the registry is the only place scanner initialization happens and it never
//! fails: every configuration anomaly degrades to a logged warning plus a
//! skipped or default-configured scanner. One misconfigured scanner must not
//! take the whole service down.

use tracing::{debug, error, info, warn};

use crate::config::{
    default_banned_substrings, default_banned_topics, default_code_languages, PolicyConfig,
    ScannerTuning,
};
use crate::scanner::ScannerHandle;
use crate::scanners::input::{
    AnonymizeScanner, BanSubstringsScanner, BanTopicsScanner, CodeScanner,
    PromptInjectionScanner, SecretsScanner, ToxicityScanner,
};
use crate::scanners::output::{BiasScanner, NoRefusalScanner, RelevanceScanner, SensitiveScanner};
use crate::types::ContentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Input,
    Output,
}

/// What to do when a required tunable is absent from the configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnMissing {
    /// A safe built-in default exists; log an error and use it.
    UseDefault,
    /// No safe default; log an error and skip registration.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Terms,
    Languages,
    Threshold,
}

impl Field {
    fn as_str(self) -> &'static str {
        match self {
            Field::Terms => "terms",
            Field::Languages => "languages",
            Field::Threshold => "threshold",
        }
    }

    fn missing_in(self, tuning: &ScannerTuning) -> bool {
        match self {
            Field::Terms => tuning.terms.is_none(),
            Field::Languages => tuning.languages.is_none(),
            Field::Threshold => tuning.threshold.is_none(),
        }
    }
}

struct Blueprint {
    name: &'static str,
    kind: Kind,
    required: &'static [Field],
    on_missing: OnMissing,
    build: fn(&ScannerTuning) -> ScannerHandle,
}

/// The one place scanner names map to constructors and validation rules.
static BLUEPRINTS: &[Blueprint] = &[
    Blueprint {
        name: "anonymize",
        kind: Kind::Input,
        required: &[],
        on_missing: OnMissing::UseDefault,
        build: |_| ScannerHandle::Content(Box::new(AnonymizeScanner)),
    },
    Blueprint {
        name: "ban_substrings",
        kind: Kind::Input,
        required: &[Field::Terms],
        on_missing: OnMissing::UseDefault,
        build: |t| {
            ScannerHandle::Content(Box::new(BanSubstringsScanner::new(
                t.terms.clone().unwrap_or_else(default_banned_substrings),
                t.case_sensitive,
            )))
        },
    },
    Blueprint {
        name: "ban_topics",
        kind: Kind::Input,
        required: &[Field::Terms],
        on_missing: OnMissing::UseDefault,
        build: |t| {
            ScannerHandle::Content(Box::new(BanTopicsScanner::new(
                t.terms.clone().unwrap_or_else(default_banned_topics),
            )))
        },
    },
    Blueprint {
        name: "code",
        kind: Kind::Input,
        required: &[Field::Languages],
        // Without a language list there is nothing meaningful to detect.
        on_missing: OnMissing::Skip,
        build: |t| {
            ScannerHandle::Content(Box::new(CodeScanner::new(
                t.languages.clone().unwrap_or_else(default_code_languages),
            )))
        },
    },
    Blueprint {
        name: "prompt_injection",
        kind: Kind::Input,
        required: &[Field::Threshold],
        on_missing: OnMissing::UseDefault,
        build: |t| {
            ScannerHandle::Content(Box::new(PromptInjectionScanner::new(
                t.threshold.unwrap_or(0.5),
            )))
        },
    },
    Blueprint {
        name: "secrets",
        kind: Kind::Input,
        required: &[],
        on_missing: OnMissing::UseDefault,
        build: |_| ScannerHandle::Content(Box::new(SecretsScanner)),
    },
    Blueprint {
        name: "toxicity",
        kind: Kind::Input,
        required: &[Field::Threshold],
        on_missing: OnMissing::UseDefault,
        build: |t| {
            ScannerHandle::Content(Box::new(ToxicityScanner::new(t.threshold.unwrap_or(0.5))))
        },
    },
    Blueprint {
        name: "bias",
        kind: Kind::Output,
        required: &[],
        on_missing: OnMissing::UseDefault,
        build: |_| ScannerHandle::Content(Box::new(BiasScanner)),
    },
    Blueprint {
        name: "no_refusal",
        kind: Kind::Output,
        required: &[],
        on_missing: OnMissing::UseDefault,
        build: |_| ScannerHandle::Content(Box::new(NoRefusalScanner)),
    },
    Blueprint {
        name: "relevance",
        kind: Kind::Output,
        required: &[Field::Threshold],
        on_missing: OnMissing::UseDefault,
        build: |t| {
            ScannerHandle::WithReference(Box::new(RelevanceScanner::new(
                t.threshold.unwrap_or(0.25),
            )))
        },
    },
    Blueprint {
        name: "sensitive",
        kind: Kind::Output,
        required: &[],
        on_missing: OnMissing::UseDefault,
        build: |_| ScannerHandle::Content(Box::new(SensitiveScanner)),
    },
];

/// Immutable, name-keyed scanner collections, built once per process.
pub struct ScannerRegistry {
    input: Vec<(String, ScannerHandle)>,
    output: Vec<(String, ScannerHandle)>,
}

impl ScannerRegistry {
    /// Build the registry from policy. `verbose` gates per-scanner
    /// registration logging at info level (debug otherwise).
    pub fn build(policy: &PolicyConfig, verbose: bool) -> Self {
        let mut input = Vec::new();
        let mut output = Vec::new();

        for name in &policy.enabled_input_scanners {
            Self::register(name, Kind::Input, policy, verbose, &mut input);
        }
        for name in &policy.enabled_output_scanners {
            Self::register(name, Kind::Output, policy, verbose, &mut output);
        }

        info!(
            input_scanners = input.len(),
            output_scanners = output.len(),
            "scanner registry initialized"
        );
        Self { input, output }
    }

    /// Assemble a registry from pre-built handles. Intended for embedders
    /// and tests that supply their own scanner implementations.
    pub fn from_parts(
        input: Vec<(String, ScannerHandle)>,
        output: Vec<(String, ScannerHandle)>,
    ) -> Self {
        Self { input, output }
    }

    fn register(
        name: &str,
        kind: Kind,
        policy: &PolicyConfig,
        verbose: bool,
        dest: &mut Vec<(String, ScannerHandle)>,
    ) {
        let Some(blueprint) = BLUEPRINTS
            .iter()
            .find(|b| b.name == name && b.kind == kind)
        else {
            warn!(scanner = %name, "unknown scanner name in enabled list, skipping");
            return;
        };

        let Some(tuning) = policy.tuning(name) else {
            warn!(scanner = %name, "enabled scanner has no configuration block, skipping");
            return;
        };
        if !tuning.enabled {
            warn!(scanner = %name, "scanner disabled by its configuration block, skipping");
            return;
        }

        for field in blueprint.required {
            if field.missing_in(tuning) {
                match blueprint.on_missing {
                    OnMissing::UseDefault => {
                        error!(
                            scanner = %name,
                            field = field.as_str(),
                            "required tunable missing, falling back to built-in default"
                        );
                    }
                    OnMissing::Skip => {
                        error!(
                            scanner = %name,
                            field = field.as_str(),
                            "required tunable missing and no safe default exists, skipping"
                        );
                        return;
                    }
                }
            }
        }

        // An empty list is valid configuration, just a useless one.
        if matches!(&tuning.terms, Some(terms) if terms.is_empty()) {
            warn!(scanner = %name, "term list is empty, scanner registered but ineffective");
        }

        let handle = (blueprint.build)(tuning);
        if verbose {
            info!(scanner = %name, kind = ?kind, "scanner registered");
        } else {
            debug!(scanner = %name, kind = ?kind, "scanner registered");
        }
        dest.push((name.to_string(), handle));
    }

    /// Active scanners for a content type, filtered to the requested subset
    /// (registration order is preserved; it determines execution and
    /// sanitization-chaining order).
    pub fn select(
        &self,
        content_type: ContentType,
        requested: Option<&[String]>,
    ) -> Vec<&(String, ScannerHandle)> {
        let source = match content_type {
            ContentType::Prompt => &self.input,
            ContentType::Output => &self.output,
        };
        match requested {
            // An explicitly empty subset means "no restriction": it must
            // never bypass scanning.
            Some(names) if !names.is_empty() => source
                .iter()
                .filter(|(name, _)| names.iter().any(|n| n == name))
                .collect(),
            _ => source.iter().collect(),
        }
    }

    pub fn input_scanner_names(&self) -> Vec<&str> {
        self.input.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn output_scanner_names(&self) -> Vec<&str> {
        self.output.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn scanner_count(&self) -> usize {
        self.input.len() + self.output.len()
    }
}
