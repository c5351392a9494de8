//! Content sources — where posts and comments come from.
//!
//! The persona engine never performs I/O; this module is the network-facing
//! collaborator that hands it [`RawRecord`](crate::persona::RawRecord)s.

pub mod reddit;

pub use reddit::{extract_username, ListingKind, RedditClient, UserContent};
