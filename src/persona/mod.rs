//! Persona engine — rule-based trait inference over a user's posts and comments.
//!
//! # Pipeline
//!
//! ```text
//! RawRecord (posts, comments)
//!   ↓  content::normalize
//! ContentItem { text, context, locator }
//!   ↓  scanner::scan
//! ScanOutcome { length, signals }
//!   ↓  aggregator::Aggregator
//! Persona + EvidenceLog
//!   ↓  report::compose_report
//! String
//! ```
//!
//! Every stage is pure and synchronous. Nothing is shared between calls, so
//! independent users can be analyzed concurrently by the caller.

pub mod aggregator;
pub mod content;
pub mod report;
pub mod scanner;
pub mod traits;

pub use aggregator::{
    Aggregator, BehaviorTally, EvidenceEntry, EvidenceLog, Persona, RuleCounters, TraitValue,
};
pub use content::{normalize, ContentItem, RawRecord, REDDIT_ORIGIN};
pub use report::{compose_report, AGE_RANGE_DISCLAIMER, EVIDENCE_PER_CATEGORY};
pub use scanner::{scan, LengthClass, Rule, ScanOutcome, Signal};
pub use traits::{TraitCategory, NOT_DETERMINED};

use serde::Serialize;

/// Result of analyzing one user's content.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaAnalysis {
    /// The normalized items the persona was derived from.
    pub items: Vec<ContentItem>,
    pub persona: Persona,
    pub evidence: EvidenceLog,
    pub tally: BehaviorTally,
}

impl PersonaAnalysis {
    /// Render this analysis as a report for `username`.
    pub fn report(&self, username: &str) -> String {
        compose_report(username, &self.persona, &self.evidence)
    }

    /// The analyzed texts joined by newlines, as fed to narrative providers.
    pub fn corpus(&self) -> String {
        self.items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run the full inference pass.
///
/// Empty input is not an error: it yields an all-default persona.
pub fn analyze(posts: &[RawRecord], comments: &[RawRecord]) -> PersonaAnalysis {
    let items = normalize(posts, comments);

    let mut aggregator = Aggregator::new();
    for item in &items {
        aggregator.observe(&scan(item));
    }
    let tally = aggregator.tally();
    let (persona, evidence) = aggregator.finish();

    log::debug!(
        "analyzed {} items ({} long, {} short)",
        items.len(),
        tally.long,
        tally.short
    );

    PersonaAnalysis {
        items,
        persona,
        evidence,
        tally,
    }
}

/// Normalize, analyze, and render in one call.
pub fn build_report(username: &str, posts: &[RawRecord], comments: &[RawRecord]) -> String {
    analyze(posts, comments).report(username)
}
