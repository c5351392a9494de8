//! Report composition — persona and evidence rendered as a fixed text layout.

use super::aggregator::{EvidenceLog, Persona};
use super::traits::{TraitCategory, NOT_DETERMINED};
use crate::utilities::string_utils::capitalize;

/// Evidence entries shown per category.
pub const EVIDENCE_PER_CATEGORY: usize = 3;

/// Age is never inferred; this line is the same for every user.
pub const AGE_RANGE_DISCLAIMER: &str =
    "Not explicitly determinable from the available posts and comments.";

/// Render the persona report for `username`.
///
/// Output depends only on the arguments.
pub fn compose_report(username: &str, persona: &Persona, evidence: &EvidenceLog) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("---\nUSER PERSONA\n".to_string());
    out.push(format!("**Name**: {} (generated)\n", capitalize(username)));
    out.push(format!("**Age Range**: {}\n", AGE_RANGE_DISCLAIMER));

    for category in TraitCategory::ALL {
        out.push(trait_line(category, persona));
    }

    out.push("\n---\n\n**EVIDENCE / CITATIONS:**\n".to_string());
    for category in TraitCategory::ALL {
        for entry in evidence.top(category, EVIDENCE_PER_CATEGORY) {
            out.push(format!(
                "- **{}**: \"{}...\" – [{}]({})",
                category.label(),
                entry.snippet,
                entry.locator,
                entry.locator
            ));
        }
    }

    out.join("\n")
}

fn trait_line(category: TraitCategory, persona: &Persona) -> String {
    if category == TraitCategory::TopInterests {
        let interests = persona.interests();
        if interests.is_empty() {
            return format!("**{}**: {}\n", category.label(), NOT_DETERMINED);
        }
        return format!("**{}**:\n- {}\n", category.label(), interests.join("\n- "));
    }
    format!("**{}**: {}\n", category.label(), persona.resolve(category))
}
