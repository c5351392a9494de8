//! Optional language-model narratives.
//!
//! - [`narrative`] - the [`NarrativeProvider`] trait, prompt, and errors
//! - [`providers`] - OpenAI and Hugging Face backends

pub mod narrative;
pub mod providers;

pub use narrative::{
    append_narrative, build_narrative_prompt, NarrativeError, NarrativeProvider, MAX_CORPUS_CHARS,
};
pub use providers::{HuggingFaceNarrator, OpenAiNarrator};
