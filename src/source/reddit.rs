//! Reddit listing client.
//!
//! Fetches one page of a user's submissions and one page of their comments
//! from the public `.json` endpoints. No pagination and no rate-limit
//! handling; errors are surfaced to the caller.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::persona::RawRecord;
use crate::utilities::config::PersonaConfig;
use crate::utilities::errors::FetchError;

static PROFILE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"reddit.com/user/([\w-]+)/?").expect("valid profile regex"));

/// Pull the username out of a profile URL such as
/// `https://www.reddit.com/user/spez/`.
pub fn extract_username(profile_url: &str) -> Result<String, FetchError> {
    PROFILE_URL
        .captures(profile_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| FetchError::InvalidProfileUrl {
            url: profile_url.to_string(),
        })
}

/// Which user listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Submitted,
    Comments,
}

impl ListingKind {
    fn endpoint(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted.json",
            Self::Comments => "comments.json",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingData {
    children: Vec<Value>,
}

impl Listing {
    fn into_records(self) -> Vec<RawRecord> {
        self.data
            .children
            .iter()
            .map(|child| RawRecord::from_value(child.get("data").unwrap_or(&Value::Null)))
            .collect()
    }
}

/// A user's posts and comments, each in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContent {
    pub posts: Vec<RawRecord>,
    pub comments: Vec<RawRecord>,
}

impl UserContent {
    /// True when neither listing returned anything.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.comments.is_empty()
    }
}

/// HTTP client for Reddit's public user listings.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
    limit: u32,
}

impl RedditClient {
    /// Build a client from configuration (user agent, timeout, base URL, limit).
    pub fn new(config: &PersonaConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.reddit_base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// URL of one listing for `username`.
    pub fn listing_url(&self, username: &str, kind: ListingKind) -> String {
        format!(
            "{}/user/{}/{}?limit={}",
            self.base_url,
            username,
            kind.endpoint(),
            self.limit
        )
    }

    /// Fetch both listings concurrently.
    ///
    /// A 404 on either listing means the user is missing or suspended, and
    /// takes precedence over any other failure of the other listing.
    pub async fn fetch_user_content(&self, username: &str) -> Result<UserContent, FetchError> {
        tracing::info!(username, limit = self.limit, "fetching reddit listings");

        let (posts, comments) = tokio::join!(
            self.fetch_listing(username, ListingKind::Submitted),
            self.fetch_listing(username, ListingKind::Comments),
        );

        for result in [&posts, &comments] {
            if let Err(FetchError::UserNotFound { .. }) = result {
                return Err(FetchError::UserNotFound {
                    username: username.to_string(),
                });
            }
        }
        let (posts, comments) = (posts?, comments?);

        tracing::debug!(
            username,
            posts = posts.len(),
            comments = comments.len(),
            "listings fetched"
        );
        Ok(UserContent { posts, comments })
    }

    async fn fetch_listing(
        &self,
        username: &str,
        kind: ListingKind,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let url = self.listing_url(username, kind);
        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::UserNotFound {
                username: username.to_string(),
            });
        }
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "reddit listing request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })?;
        Ok(listing.into_records())
    }
}
