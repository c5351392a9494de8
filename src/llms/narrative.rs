//! Narrative analysis — an optional free-form persona write-up from a
//! hosted language model, appended after the rule-based report.
//!
//! Backends implement [`NarrativeProvider`]. They are only constructed when
//! the user asks for them, and they never fall back to built-in keys.

use async_trait::async_trait;
use thiserror::Error;

use crate::utilities::string_utils::truncate_chars;

/// Leading characters of the corpus included in the prompt.
pub const MAX_CORPUS_CHARS: usize = 3000;

/// Why a narrative could not be produced.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// No API key was supplied by flag or environment.
    #[error("{provider} API key required. Pass it explicitly or set {env_var}")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },

    /// The service answered with an error.
    #[error("{provider} API error{}: {message}", status_suffix(.status))]
    Service {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// The request never completed.
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered 2xx with a body we could not use.
    #[error("{provider} returned an unusable response: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" {}", s)).unwrap_or_default()
}

/// A backend able to write a persona narrative.
#[async_trait]
pub trait NarrativeProvider: Send + Sync + std::fmt::Debug {
    /// Label shown in the report heading, e.g. `"OpenAI"`.
    fn name(&self) -> &'static str;

    /// Model identifier sent to the service.
    fn model(&self) -> &str;

    /// Produce a narrative for `username` from their concatenated texts.
    async fn analyze(&self, username: &str, corpus: &str) -> Result<String, NarrativeError>;
}

/// Prompt shared by every backend.
pub fn build_narrative_prompt(username: &str, corpus: &str) -> String {
    format!(
        "\nYou are a user profiling expert. Given the following Reddit posts and comments from user '{}', \
generate a qualitative user persona including: Name, Age Range, Occupation, Top Interests, \
Goals and Aspirations, Core Values and Beliefs, Pain Points and Challenges, Writing Style and Tone, \
Personality Traits, Reddit Usage Behavior. For each trait, cite the post/comment (or a snippet) you used. \
If not clear, say 'Not clear from data.'\n\nReddit posts/comments:\n{}\n",
        username,
        truncate_chars(corpus, MAX_CORPUS_CHARS)
    )
}

/// Append a narrative section to a finished report.
pub fn append_narrative(report: &str, provider_label: &str, narrative: &str) -> String {
    format!(
        "{}\n\n---\n\n**LLM Persona Analysis ({}):**\n{}",
        report, provider_label, narrative
    )
}

/// Resolve an API key: explicit value first, then the environment.
///
/// Blank values count as absent.
pub fn resolve_api_key(
    explicit: Option<String>,
    env_var: &'static str,
    provider: &'static str,
) -> Result<String, NarrativeError> {
    explicit
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or(NarrativeError::MissingCredential { provider, env_var })
}
