// Feed client: the remote site whose items we react to.
//
// The engine and daemon only see the FeedClient trait; StackerNewsClient is
// the real implementation, tests plug in fakes.

pub mod stacker;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// An item from the feed. Read-only to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "stacker::id_from_string_or_number")]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Discussions and other link-less items carry no URL.
    #[serde(default, deserialize_with = "stacker::null_as_empty")]
    pub url: String,
}

/// Feed sort orders the bot uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Recent,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Recent => "recent",
        }
    }
}

#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch one page of items.
    async fn fetch_recent_items(&self, sort: Sort, limit: u32) -> Result<Vec<Item>>;

    /// Reply to an item; returns the new comment's id.
    async fn create_comment(&self, parent_id: i64, body: &str) -> Result<i64>;

    /// Whether the bot account has unread notifications.
    async fn check_notifications(&self) -> Result<bool>;

    /// Keep the authenticated session alive.
    async fn refresh_session(&self) -> Result<()>;
}
