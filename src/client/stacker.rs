// Stacker News client: GraphQL over HTTP with a cookie session.
//
// Every call is a POST to /api/graphql carrying the next-auth session cookie.
// The session token rotates: GET /api/auth/session answers with a fresh
// Set-Cookie, which we swap in so the hourly keepalive keeps us logged in.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{FeedClient, Item, Sort};

/// Default Stacker News base URL.
pub const DEFAULT_API_URL: &str = "https://stacker.news";

/// Name of the next-auth session cookie.
pub const SESSION_COOKIE: &str = "__Secure-next-auth.session-token";

const ITEMS_QUERY: &str = "query items($sort: String, $limit: Limit) {
  items(sort: $sort, limit: $limit) {
    items { id title url }
  }
}";

const UPSERT_COMMENT_MUTATION: &str = "mutation upsertComment($parentId: ID!, $text: String!) {
  upsertComment(parentId: $parentId, text: $text) { id }
}";

const HAS_NEW_NOTES_QUERY: &str = "{ hasNewNotes }";

/// Authenticated HTTP client for the Stacker News API.
pub struct StackerNewsClient {
    client: reqwest::Client,
    base_url: String,
    session_token: RwLock<String>,
}

impl StackerNewsClient {
    /// Create a client for `base_url` authenticated with `session_token`.
    pub fn new(base_url: &str, session_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mirrorbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: RwLock::new(session_token.to_string()),
        })
    }

    async fn cookie_header(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.session_token.read().await)
    }

    /// POST a GraphQL operation and unwrap its `data`.
    ///
    /// `operation` is only used for logs and error messages.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}/api/graphql", self.base_url);

        debug!(operation, "GraphQL request");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::COOKIE, self.cookie_header().await)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .with_context(|| format!("GraphQL request failed: {operation}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GraphQL {operation} returned {status}: {body}");
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to deserialize {operation} response"))?;

        body.into_data(operation)
    }
}

#[async_trait]
impl FeedClient for StackerNewsClient {
    async fn fetch_recent_items(&self, sort: Sort, limit: u32) -> Result<Vec<Item>> {
        let data: ItemsData = self
            .graphql(
                "items",
                ITEMS_QUERY,
                json!({ "sort": sort.as_str(), "limit": limit }),
            )
            .await?;
        debug!(count = data.items.items.len(), "Fetched items");
        Ok(data.items.items)
    }

    async fn create_comment(&self, parent_id: i64, body: &str) -> Result<i64> {
        let data: UpsertCommentData = self
            .graphql(
                "upsertComment",
                UPSERT_COMMENT_MUTATION,
                json!({ "parentId": parent_id.to_string(), "text": body }),
            )
            .await?;
        Ok(data.upsert_comment.id)
    }

    async fn check_notifications(&self) -> Result<bool> {
        let data: HasNewNotesData = self
            .graphql("hasNewNotes", HAS_NEW_NOTES_QUERY, json!({}))
            .await?;
        Ok(data.has_new_notes)
    }

    async fn refresh_session(&self) -> Result<()> {
        let url = format!("{}/api/auth/session", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::COOKIE, self.cookie_header().await)
            .send()
            .await
            .context("Session refresh request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Session refresh returned {status}");
        }

        let rotated = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(session_token_from_set_cookie)
            .map(str::to_string);

        match rotated {
            Some(token) => {
                *self.session_token.write().await = token;
                info!("Session token rotated");
            }
            None => debug!("Session refreshed without a new token"),
        }
        Ok(())
    }
}

/// Extract the session token from one `Set-Cookie` header value.
///
/// Returns `None` for other cookies and for the empty value next-auth sends
/// when it clears the session.
pub fn session_token_from_set_cookie(header: &str) -> Option<&str> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
}

// -- GraphQL envelope --

/// The `{ data, errors }` envelope every GraphQL response comes in.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// The data, or the first GraphQL error as an `anyhow` error.
    pub fn into_data(self, operation: &str) -> Result<T> {
        if let Some(err) = self.errors.first() {
            anyhow::bail!("GraphQL {operation} failed: {}", err.message);
        }
        self.data
            .ok_or_else(|| anyhow::anyhow!("GraphQL {operation} returned no data"))
    }
}

// -- Operation payloads --

#[derive(Debug, Deserialize)]
pub struct ItemsData {
    pub items: ItemsPage,
}

#[derive(Debug, Deserialize)]
pub struct ItemsPage {
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertCommentData {
    #[serde(rename = "upsertComment")]
    pub upsert_comment: CommentRef,
}

#[derive(Debug, Deserialize)]
pub struct CommentRef {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct HasNewNotesData {
    #[serde(rename = "hasNewNotes")]
    pub has_new_notes: bool,
}

/// GraphQL `ID`s arrive as strings; accept plain numbers too.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
