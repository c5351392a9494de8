//! Content normalization — raw posts/comments into uniform content items.
//!
//! Raw records are tolerated in any shape: a field that is missing, `null`,
//! or not a string reads as the empty string.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Origin prepended to every relative permalink.
pub const REDDIT_ORIGIN: &str = "https://www.reddit.com";

/// A post or comment as returned by the listing endpoints.
///
/// Posts use `title`/`selftext`, comments use `body`; the unused fields stay
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub selftext: String,
    #[serde(deserialize_with = "lenient_string")]
    pub body: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subreddit: String,
    #[serde(deserialize_with = "lenient_string")]
    pub permalink: String,
}

/// Accept any JSON value, keeping only strings.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}

impl RawRecord {
    /// Build a record from an arbitrary JSON value. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            title: field("title"),
            selftext: field("selftext"),
            body: field("body"),
            subreddit: field("subreddit"),
            permalink: field("permalink"),
        }
    }

    /// Absolute link to the record.
    pub fn locator(&self) -> String {
        format!("{}{}", REDDIT_ORIGIN, self.permalink)
    }
}

/// One piece of user-authored text with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    /// The authored text, trimmed and never empty.
    pub text: String,
    /// Originating subreddit, case preserved.
    pub context: String,
    /// Absolute link back to the source.
    pub locator: String,
}

impl ContentItem {
    pub fn new(
        text: impl Into<String>,
        context: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            context: context.into(),
            locator: locator.into(),
        }
    }
}

/// Flatten posts then comments into content items, preserving order and
/// dropping records whose text is empty after trimming.
pub fn normalize(posts: &[RawRecord], comments: &[RawRecord]) -> Vec<ContentItem> {
    let post_items = posts.iter().filter_map(|post| {
        let text = format!("{}\n{}", post.title, post.selftext);
        to_item(text.trim(), post)
    });
    let comment_items = comments
        .iter()
        .filter_map(|comment| to_item(comment.body.trim(), comment));

    post_items.chain(comment_items).collect()
}

fn to_item(text: &str, record: &RawRecord) -> Option<ContentItem> {
    if text.is_empty() {
        return None;
    }
    Some(ContentItem::new(text, record.subreddit.as_str(), record.locator()))
}
