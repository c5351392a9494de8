//! Error types for the collaborators around the persona engine.
//!
//! The engine itself is total; only fetching, configuration, and writing
//! can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from retrieving a user's content.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The profile URL does not name a Reddit user.
    #[error("Invalid Reddit user profile URL: {url}")]
    InvalidProfileUrl { url: String },

    /// Reddit answered 404 for one of the user listings.
    #[error("User '{username}' does not exist or is not accessible")]
    UserNotFound { username: String },

    /// Any other non-success status.
    #[error("Reddit returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Transport-level failure.
    #[error("Request to Reddit failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The listing body was not valid JSON.
    #[error("Could not decode Reddit listing from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
