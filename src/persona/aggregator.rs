//! Evidence aggregation — signals in, resolved persona and evidence log out.
//!
//! Resolution policy:
//!
//! - every signal appends its `(snippet, locator)` to the evidence of its
//!   category, exact duplicates suppressed;
//! - single-valued categories are last-writer-wins, so a later match
//!   replaces the stored value (earlier evidence stays);
//! - `TopInterests` accumulates a set;
//! - `RedditUsageBehavior` is derived from the long/short tally, and
//!   `PersonalityTraits` falls back to rule counters when no rule set it.
//!
//! Every determined category ends up with at least one evidence entry.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::scanner::{LengthClass, Rule, ScanOutcome, Signal};
use super::traits::{TraitCategory, NOT_DETERMINED};

pub const PREFERS_LONG_FORM: &str = "Prefers long-form posts";
pub const PREFERS_SHORT_FORM: &str = "Prefers short comments/posts";

// ============================================================================
// Evidence log
// ============================================================================

/// A cited snippet and the link it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EvidenceEntry {
    pub snippet: String,
    pub locator: String,
}

impl EvidenceEntry {
    pub fn new(snippet: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            locator: locator.into(),
        }
    }
}

/// Per-category evidence in scan order, without exact duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvidenceLog {
    entries: BTreeMap<TraitCategory, Vec<EvidenceEntry>>,
}

impl EvidenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns `false` if the category already holds it.
    pub fn record(&mut self, category: TraitCategory, entry: EvidenceEntry) -> bool {
        let list = self.entries.entry(category).or_default();
        if list.contains(&entry) {
            return false;
        }
        list.push(entry);
        true
    }

    /// All entries for a category, in first-occurrence order.
    pub fn entries(&self, category: TraitCategory) -> &[EvidenceEntry] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// At most `n` leading entries for a category.
    pub fn top(&self, category: TraitCategory, n: usize) -> &[EvidenceEntry] {
        let all = self.entries(category);
        &all[..all.len().min(n)]
    }

    pub fn has_evidence(&self, category: TraitCategory) -> bool {
        !self.entries(category).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

// ============================================================================
// Persona
// ============================================================================

/// Resolved value of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TraitValue {
    Text(String),
    Interests(BTreeSet<String>),
}

/// The resolved profile. Categories absent from the map are undetermined;
/// reading never inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Persona {
    values: BTreeMap<TraitCategory, TraitValue>,
}

impl Persona {
    pub fn get(&self, category: TraitCategory) -> Option<&TraitValue> {
        self.values.get(&category)
    }

    pub fn is_determined(&self, category: TraitCategory) -> bool {
        self.values.contains_key(&category)
    }

    /// Value of a category as display text, or the sentinel.
    ///
    /// Interests are joined with `", "` in sorted order.
    pub fn resolve(&self, category: TraitCategory) -> String {
        match self.get(category) {
            Some(TraitValue::Text(text)) => text.clone(),
            Some(TraitValue::Interests(set)) if !set.is_empty() => {
                set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
            }
            _ => NOT_DETERMINED.to_string(),
        }
    }

    /// Distinct interests in sorted order; empty when none were observed.
    pub fn interests(&self) -> Vec<&str> {
        match self.get(TraitCategory::TopInterests) {
            Some(TraitValue::Interests(set)) => set.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// How many items fell on each side of the long-form threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BehaviorTally {
    pub long: usize,
    pub short: usize,
}

impl BehaviorTally {
    /// Winning length class, if any items were seen. Ties go to long-form.
    pub fn preference(&self) -> Option<LengthClass> {
        if self.long > 0 && self.long >= self.short {
            Some(LengthClass::Long)
        } else if self.short > 0 {
            Some(LengthClass::Short)
        } else {
            None
        }
    }
}

/// Fire counts of the rules that drive the personality fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleCounters {
    pub expressive: usize,
    pub empathetic: usize,
    pub sarcastic: usize,
}

/// Accumulates scan outcomes for one user. Local to one invocation.
#[derive(Debug, Default)]
pub struct Aggregator {
    values: BTreeMap<TraitCategory, TraitValue>,
    evidence: EvidenceLog,
    tally: BehaviorTally,
    counters: RuleCounters,
    sarcasm_evidence: Vec<EvidenceEntry>,
    long_evidence: Vec<EvidenceEntry>,
    short_evidence: Vec<EvidenceEntry>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in everything scanned from one item.
    pub fn observe(&mut self, outcome: &ScanOutcome) {
        let citation = EvidenceEntry::new(outcome.snippet.as_str(), outcome.locator.as_str());
        match outcome.length {
            LengthClass::Long => {
                self.tally.long += 1;
                self.long_evidence.push(citation);
            }
            LengthClass::Short => {
                self.tally.short += 1;
                self.short_evidence.push(citation);
            }
        }

        for signal in &outcome.signals {
            self.absorb(signal);
        }
    }

    /// Fold in a single signal.
    pub fn absorb(&mut self, signal: &Signal) {
        match signal.rule {
            Rule::Expressiveness => self.counters.expressive += 1,
            Rule::Empathy => self.counters.empathetic += 1,
            Rule::Sarcasm => {
                self.counters.sarcastic += 1;
                self.sarcasm_evidence
                    .push(EvidenceEntry::new(signal.snippet.as_str(), signal.locator.as_str()));
            }
            _ => {}
        }

        self.evidence.record(
            signal.category,
            EvidenceEntry::new(signal.snippet.as_str(), signal.locator.as_str()),
        );

        if signal.category.is_multi_valued() {
            let slot = self
                .values
                .entry(signal.category)
                .or_insert_with(|| TraitValue::Interests(BTreeSet::new()));
            if let TraitValue::Interests(set) = slot {
                set.insert(signal.value.clone());
            }
        } else {
            self.values
                .insert(signal.category, TraitValue::Text(signal.value.clone()));
        }
    }

    pub fn tally(&self) -> BehaviorTally {
        self.tally
    }

    pub fn counters(&self) -> RuleCounters {
        self.counters
    }

    /// Apply the derived and fallback rules and hand back the results.
    pub fn finish(mut self) -> (Persona, EvidenceLog) {
        if let Some(class) = self.tally.preference() {
            let (label, citations) = match class {
                LengthClass::Long => (PREFERS_LONG_FORM, std::mem::take(&mut self.long_evidence)),
                LengthClass::Short => (PREFERS_SHORT_FORM, std::mem::take(&mut self.short_evidence)),
            };
            self.values.insert(
                TraitCategory::RedditUsageBehavior,
                TraitValue::Text(label.to_string()),
            );
            for citation in citations {
                self.evidence.record(TraitCategory::RedditUsageBehavior, citation);
            }
        }

        if !self.values.contains_key(&TraitCategory::PersonalityTraits) {
            let fallback = if self.counters.expressive > 0 {
                Some("Expressive")
            } else if self.counters.empathetic > 0 {
                Some("Empathetic")
            } else if self.counters.sarcastic > 0 {
                Some("Sarcastic")
            } else {
                None
            };

            if let Some(trait_name) = fallback {
                log::debug!("personality resolved by fallback: {}", trait_name);
                self.values.insert(
                    TraitCategory::PersonalityTraits,
                    TraitValue::Text(trait_name.to_string()),
                );
                // Only sarcasm lacks PersonalityTraits evidence of its own.
                if trait_name == "Sarcastic" {
                    for citation in std::mem::take(&mut self.sarcasm_evidence) {
                        self.evidence.record(TraitCategory::PersonalityTraits, citation);
                    }
                }
            }
        }

        (Persona { values: self.values }, self.evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::content::ContentItem;
    use crate::persona::scanner::scan;

    fn run(texts: &[(&str, &str, &str)]) -> (Persona, EvidenceLog) {
        let mut agg = Aggregator::new();
        for (text, context, locator) in texts {
            agg.observe(&scan(&ContentItem::new(*text, *context, *locator)));
        }
        agg.finish()
    }

    fn long_text() -> String {
        vec!["words"; 120].join(" ")
    }

    fn assert_auditable(persona: &Persona, evidence: &EvidenceLog) {
        for category in TraitCategory::ALL {
            if persona.is_determined(category) {
                assert!(
                    evidence.has_evidence(category),
                    "{} is determined but has no evidence",
                    category
                );
            }
        }
    }

    #[test]
    fn test_empty_input_is_all_default() {
        let (persona, evidence) = run(&[]);
        for category in TraitCategory::ALL {
            assert!(!persona.is_determined(category));
            assert_eq!(persona.resolve(category), NOT_DETERMINED);
        }
        assert!(evidence.is_empty());
    }

    #[test]
    fn test_interests_are_deduplicated() {
        let (persona, evidence) = run(&[
            ("new game out today", "x", "/a"),
            ("this game rocks", "gaming", "/b"),
        ]);
        assert_eq!(persona.interests(), vec!["Gaming"]);
        assert_eq!(evidence.entries(TraitCategory::TopInterests).len(), 2);
    }

    #[test]
    fn test_interests_collect_multiple_values() {
        let (persona, _) = run(&[("anime and a game", "x", "/a")]);
        assert_eq!(persona.interests(), vec!["Anime", "Gaming"]);
        assert_eq!(persona.resolve(TraitCategory::TopInterests), "Anime, Gaming");
    }

    #[test]
    fn test_last_writer_wins_but_evidence_is_kept() {
        let (persona, evidence) = run(&[
            ("I think cats are great", "x", "/a"),
            ("I believe dogs are better", "x", "/b"),
        ]);
        assert_eq!(
            persona.resolve(TraitCategory::CoreValuesAndBeliefs),
            "I believe dogs are better"
        );
        assert_eq!(evidence.entries(TraitCategory::CoreValuesAndBeliefs).len(), 2);
    }

    #[test]
    fn test_informal_overrides_sarcastic_in_same_item() {
        let (persona, _) = run(&[("as if lol", "x", "/a")]);
        assert_eq!(
            persona.resolve(TraitCategory::WritingStyleAndTone),
            crate::persona::scanner::INFORMAL_TONE
        );
    }

    #[test]
    fn test_exact_duplicate_evidence_is_suppressed() {
        let (_, evidence) = run(&[
            ("my job is fine", "x", "/same"),
            ("my job is fine", "x", "/same"),
            ("my job is fine", "x", "/other"),
        ]);
        let entries = evidence.entries(TraitCategory::Occupation);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].locator, "/same");
        assert_eq!(entries[1].locator, "/other");
    }

    #[test]
    fn test_record_reports_duplicates() {
        let mut log = EvidenceLog::new();
        assert!(log.record(TraitCategory::Occupation, EvidenceEntry::new("a", "/1")));
        assert!(!log.record(TraitCategory::Occupation, EvidenceEntry::new("a", "/1")));
        assert!(log.record(TraitCategory::PersonalityTraits, EvidenceEntry::new("a", "/1")));
    }

    #[test]
    fn test_top_caps_entries() {
        let mut log = EvidenceLog::new();
        for i in 0..5 {
            log.record(TraitCategory::Occupation, EvidenceEntry::new("job", format!("/{}", i)));
        }
        let top = log.top(TraitCategory::Occupation, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].locator, "/0");
        assert_eq!(top[2].locator, "/2");
        assert!(log.top(TraitCategory::TopInterests, 3).is_empty());
    }

    #[test]
    fn test_prefers_long_form() {
        let long = long_text();
        let (persona, evidence) = run(&[
            (&long, "x", "/1"),
            (&long, "x", "/2"),
            (&long, "x", "/3"),
            ("short one", "x", "/4"),
        ]);
        assert_eq!(persona.resolve(TraitCategory::RedditUsageBehavior), PREFERS_LONG_FORM);
        let cited: Vec<_> = evidence
            .entries(TraitCategory::RedditUsageBehavior)
            .iter()
            .map(|e| e.locator.as_str())
            .collect();
        assert_eq!(cited, vec!["/1", "/2", "/3"]);
    }

    #[test]
    fn test_prefers_short_form() {
        let long = long_text();
        let (persona, _) = run(&[
            ("a", "x", "/1"),
            ("b", "x", "/2"),
            ("c", "x", "/3"),
            (&long, "x", "/4"),
        ]);
        assert_eq!(persona.resolve(TraitCategory::RedditUsageBehavior), PREFERS_SHORT_FORM);
    }

    #[test]
    fn test_tie_goes_to_long_form() {
        let long = long_text();
        let (persona, _) = run(&[("a", "x", "/1"), (&long, "x", "/2")]);
        assert_eq!(persona.resolve(TraitCategory::RedditUsageBehavior), PREFERS_LONG_FORM);
    }

    #[test]
    fn test_expressive_only_resolves_expressive() {
        let (persona, _) = run(&[("I enjoy this", "x", "/1"), ("my favorite", "x", "/2")]);
        assert_eq!(persona.resolve(TraitCategory::PersonalityTraits), "Expressive");
    }

    #[test]
    fn test_later_empathy_overwrites_expressive() {
        let (persona, _) = run(&[("I love it", "x", "/1"), ("I'm sorry to hear", "x", "/2")]);
        assert_eq!(persona.resolve(TraitCategory::PersonalityTraits), "Empathetic");
    }

    #[test]
    fn test_sarcasm_only_falls_back_with_evidence() {
        let (persona, evidence) = run(&[("oh yeah, because that helps", "x", "/1")]);
        assert_eq!(persona.resolve(TraitCategory::PersonalityTraits), "Sarcastic");
        assert_eq!(persona.resolve(TraitCategory::WritingStyleAndTone), "Sarcastic");
        assert_eq!(evidence.entries(TraitCategory::PersonalityTraits).len(), 1);
        assert_auditable(&persona, &evidence);
    }

    #[test]
    fn test_counters_track_rule_fires() {
        let mut agg = Aggregator::new();
        for text in ["I love it", "I like it", "as if", "I feel fine"] {
            agg.observe(&scan(&ContentItem::new(text, "x", "/l")));
        }
        assert_eq!(
            agg.counters(),
            RuleCounters {
                expressive: 2,
                empathetic: 1,
                sarcastic: 1,
            }
        );
        assert_eq!(agg.tally(), BehaviorTally { long: 0, short: 4 });
    }

    #[test]
    fn test_goals_are_never_determined() {
        let (persona, _) = run(&[("I want to become a pilot someday", "x", "/1")]);
        assert!(!persona.is_determined(TraitCategory::GoalsAndAspirations));
    }

    #[test]
    fn test_every_determined_category_has_evidence() {
        let long = long_text();
        let (persona, evidence) = run(&[
            ("I love hiking and I think everyone should try it. work has been hard lately lol", "hiking", "/1"),
            ("anime night :)", "Anime", "/2"),
            (&long, "gaming", "/3"),
            ("sure, that'll work \u{1F644}", "x", "/4"),
            ("hope you're ok, that must be hard", "x", "/5"),
        ]);
        assert_auditable(&persona, &evidence);
    }

    #[test]
    fn test_persona_serializes_as_json_object() {
        let (persona, _) = run(&[("anime", "x", "/1"), ("my job", "x", "/2")]);
        let json = serde_json::to_value(&persona).unwrap();
        assert_eq!(json["values"]["occupation"], "Mentions work/job");
        assert_eq!(json["values"]["top_interests"][0], "Anime");
    }
}
