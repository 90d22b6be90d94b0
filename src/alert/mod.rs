// Alert sink: short plain-text messages for whoever operates the bot.
//
// Delivery is best-effort: a sink never returns an error, it logs its own
// failures. The daemon mirrors every surfaced failure here.

pub mod webhook;

use async_trait::async_trait;
use tracing::warn;

pub use webhook::WebhookAlertSink;

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, text: &str);
}

/// Sink used when no webhook is configured: alerts only reach the log.
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn send(&self, text: &str) {
        warn!(alert = text, "Alert");
    }
}
