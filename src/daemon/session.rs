// Session keepalive: refresh the login cookie every hour.

use std::time::Duration;
use tracing::{info, warn};

use crate::alert::AlertSink;
use crate::client::FeedClient;
use crate::schedule;

const REFRESH_PERIOD: Duration = Duration::from_secs(3600);

/// Refresh once; failures are logged and alerted, never propagated.
pub async fn refresh_once(client: &dyn FeedClient, alerts: &dyn AlertSink) -> bool {
    info!("Refreshing session...");
    match client.refresh_session().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Session refresh failed");
            alerts.send(&format!("session refresh failed: {e:#}")).await;
            false
        }
    }
}

pub async fn run(client: &dyn FeedClient, alerts: &dyn AlertSink) {
    loop {
        refresh_once(client, alerts).await;
        schedule::wait_until_next(REFRESH_PERIOD).await;
    }
}
