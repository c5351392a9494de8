//! Trait scanner — a fixed battery of lexical rules applied per content item.
//!
//! Rules are independent: one item may fire any subset of them, but each
//! rule fires at most once per item. Phrase rules match against the
//! lower-cased text; interest rules additionally look at the subreddit.

use serde::{Deserialize, Serialize};

use super::content::ContentItem;
use super::traits::TraitCategory;
use crate::utilities::string_utils::truncate_chars;

/// Items with more whitespace-delimited words than this count as long-form.
pub const LONG_FORM_WORD_THRESHOLD: usize = 100;

/// Number of leading characters kept as an evidence snippet.
pub const SNIPPET_CHARS: usize = 60;

const EMPATHY_PHRASES: &[&str] = &["i feel", "i'm sorry", "that must be hard", "hope you're ok"];
const SARCASM_PHRASES: &[&str] = &["oh yeah, because", "sure, that'll work", "as if", "\u{1F644}"];
const EXPRESSIVE_PHRASES: &[&str] = &["i love", "i enjoy", "my favorite", "i like"];
const OCCUPATION_WORDS: &[&str] = &["work", "job"];
const BELIEF_PHRASES: &[&str] = &["i believe", "i think"];
const PAIN_WORDS: &[&str] = &["struggle", "hard", "challenge"];
const INFORMAL_MARKERS: &[&str] = &[":)", ":(", "lol", "haha"];

pub const INFORMAL_TONE: &str = "Informal, uses emoticons or internet slang";
pub const MENTIONS_WORK: &str = "Mentions work/job";

/// Length class of one content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthClass {
    Long,
    Short,
}

impl LengthClass {
    pub fn of(text: &str) -> Self {
        if text.split_whitespace().count() > LONG_FORM_WORD_THRESHOLD {
            Self::Long
        } else {
            Self::Short
        }
    }
}

/// The scanning rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Empathy,
    Sarcasm,
    Expressiveness,
    AnimeInterest,
    GamingInterest,
    Occupation,
    Values,
    PainPoint,
    InformalTone,
}

impl Rule {
    /// Evaluation order. Later rules overwrite earlier ones that share a
    /// category, so this order is observable in the resolved persona.
    pub const ALL: [Rule; 9] = [
        Self::Empathy,
        Self::Sarcasm,
        Self::Expressiveness,
        Self::AnimeInterest,
        Self::GamingInterest,
        Self::Occupation,
        Self::Values,
        Self::PainPoint,
        Self::InformalTone,
    ];

    /// Category the rule's signals target.
    pub fn category(&self) -> TraitCategory {
        match self {
            Self::Empathy | Self::Expressiveness => TraitCategory::PersonalityTraits,
            Self::Sarcasm | Self::InformalTone => TraitCategory::WritingStyleAndTone,
            Self::AnimeInterest | Self::GamingInterest => TraitCategory::TopInterests,
            Self::Occupation => TraitCategory::Occupation,
            Self::Values => TraitCategory::CoreValuesAndBeliefs,
            Self::PainPoint => TraitCategory::PainPointsAndChallenges,
        }
    }

    fn matches(&self, lower: &str, context: &str) -> bool {
        let any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
        match self {
            Self::Empathy => any(EMPATHY_PHRASES),
            Self::Sarcasm => any(SARCASM_PHRASES),
            Self::Expressiveness => any(EXPRESSIVE_PHRASES),
            Self::AnimeInterest => lower.contains("anime") || context.to_lowercase() == "anime",
            // "game" also hits "gameplay", "endgame", ...
            Self::GamingInterest => lower.contains("game") || context.to_lowercase() == "gaming",
            Self::Occupation => any(OCCUPATION_WORDS),
            Self::Values => any(BELIEF_PHRASES),
            Self::PainPoint => any(PAIN_WORDS),
            Self::InformalTone => any(INFORMAL_MARKERS),
        }
    }

    fn value(&self, text: &str) -> String {
        match self {
            Self::Empathy => "Empathetic".to_string(),
            Self::Sarcasm => "Sarcastic".to_string(),
            Self::Expressiveness => "Expressive".to_string(),
            Self::AnimeInterest => "Anime".to_string(),
            Self::GamingInterest => "Gaming".to_string(),
            Self::Occupation => MENTIONS_WORK.to_string(),
            Self::Values | Self::PainPoint => text.to_string(),
            Self::InformalTone => INFORMAL_TONE.to_string(),
        }
    }
}

/// One piece of trait evidence extracted from a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub rule: Rule,
    pub category: TraitCategory,
    pub value: String,
    /// First [`SNIPPET_CHARS`] characters of the item's text.
    pub snippet: String,
    pub locator: String,
}

/// Everything the scanner learned from one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub length: LengthClass,
    /// Citation for the item as a whole, shared by all its signals.
    pub snippet: String,
    pub locator: String,
    pub signals: Vec<Signal>,
}

/// Apply every rule to one item.
pub fn scan(item: &ContentItem) -> ScanOutcome {
    let lower = item.text.to_lowercase();
    let snippet = truncate_chars(&item.text, SNIPPET_CHARS);

    let signals = Rule::ALL
        .iter()
        .filter(|rule| rule.matches(&lower, &item.context))
        .map(|rule| Signal {
            rule: *rule,
            category: rule.category(),
            value: rule.value(&item.text),
            snippet: snippet.clone(),
            locator: item.locator.clone(),
        })
        .collect();

    ScanOutcome {
        length: LengthClass::of(&item.text),
        snippet,
        locator: item.locator.clone(),
        signals,
    }
}
