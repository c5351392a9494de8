//! Trait categories — the closed set of persona fields.
//!
//! Declaration order is significant: the report lists categories, and their
//! evidence, in exactly this order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value shown for any category no rule ever resolved.
pub const NOT_DETERMINED: &str = "Not determined from data.";

/// One field of the persona profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitCategory {
    Occupation,
    TopInterests,
    GoalsAndAspirations,
    CoreValuesAndBeliefs,
    PainPointsAndChallenges,
    WritingStyleAndTone,
    PersonalityTraits,
    RedditUsageBehavior,
}

impl TraitCategory {
    /// All categories in canonical (report) order.
    pub const ALL: [TraitCategory; 8] = [
        Self::Occupation,
        Self::TopInterests,
        Self::GoalsAndAspirations,
        Self::CoreValuesAndBeliefs,
        Self::PainPointsAndChallenges,
        Self::WritingStyleAndTone,
        Self::PersonalityTraits,
        Self::RedditUsageBehavior,
    ];

    /// Human-readable label used in the rendered report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Occupation => "Occupation",
            Self::TopInterests => "Top Interests",
            Self::GoalsAndAspirations => "Goals and Aspirations",
            Self::CoreValuesAndBeliefs => "Core Values and Beliefs",
            Self::PainPointsAndChallenges => "Pain Points and Challenges",
            Self::WritingStyleAndTone => "Writing Style and Tone",
            Self::PersonalityTraits => "Personality Traits",
            Self::RedditUsageBehavior => "Reddit Usage Behavior",
        }
    }

    /// Whether the category resolves to a set of values rather than one.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::TopInterests)
    }
}

impl fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
