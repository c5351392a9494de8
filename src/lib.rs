//! # reddit-persona
//!
//! Derives a qualitative persona for a Reddit user from their public posts
//! and comments, with every inferred trait backed by cited snippets.
//!
//! The [`persona`] engine is a deterministic, rule-based classifier: pure,
//! synchronous, and free of I/O. Around it sit the collaborators that fetch
//! content ([`source`]), optionally ask a hosted model for a narrative
//! ([`llms`]), and write the report ([`utilities::file_handler`]).
//!
//! ```
//! use reddit_persona::persona::{build_report, RawRecord};
//!
//! let comments = vec![RawRecord {
//!     body: "I love this game lol".into(),
//!     subreddit: "gaming".into(),
//!     permalink: "/r/gaming/comments/abc/".into(),
//!     ..Default::default()
//! }];
//! let report = build_report("spez", &[], &comments);
//! assert!(report.contains("- Gaming"));
//! ```

pub mod cli;
pub mod llms;
pub mod persona;
pub mod source;
pub mod utilities;

pub use persona::{analyze, build_report, Persona, PersonaAnalysis, TraitCategory};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
