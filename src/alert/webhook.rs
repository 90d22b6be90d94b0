// Webhook alert sink: POSTs `{"text": ...}` to a configured URL.
//
// Works with Slack-style incoming webhooks and anything else that accepts
// a JSON body with a `text` field.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::AlertSink;

pub struct WebhookAlertSink {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

impl WebhookAlertSink {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mirrorbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { text })
            .send()
            .await
            .context("Alert webhook request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Alert webhook returned {status}: {body}");
        }
        Ok(())
    }
}

#[async_trait]
impl AlertSink for WebhookAlertSink {
    async fn send(&self, text: &str) {
        match self.deliver(text).await {
            Ok(()) => debug!("Alert delivered"),
            Err(e) => warn!(error = %e, alert = text, "Failed to deliver alert"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape() {
        let json = serde_json::to_string(&WebhookPayload { text: "new notifications" }).unwrap();
        assert_eq!(json, r#"{"text":"new notifications"}"#);
    }

    #[tokio::test]
    async fn unreachable_webhook_does_not_panic() {
        // Port 9 (discard) on localhost is closed in test environments
        let sink = WebhookAlertSink::new("http://127.0.0.1:9/hook").unwrap();
        sink.send("hello").await;
    }
}
