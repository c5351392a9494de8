//! Narrative provider implementations.
//!
//! | Provider | Module | Credential |
//! |----------|--------|------------|
//! | OpenAI | [`openai`] | `OPENAI_API_KEY` |
//! | Hugging Face | [`huggingface`] | `HF_API_KEY` |

pub mod huggingface;
pub mod openai;

pub use huggingface::HuggingFaceNarrator;
pub use openai::OpenAiNarrator;
