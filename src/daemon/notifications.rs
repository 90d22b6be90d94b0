// Notification watcher: alert once when unread notifications show up.
//
// The flag is polled hourly. Only the false -> true edge alerts; while it
// stays true we just log. State lives in memory, so a restart while the
// flag is set alerts once more.

use std::time::Duration;
use tracing::{info, warn};

use crate::alert::AlertSink;
use crate::client::FeedClient;
use crate::schedule::{self, RisingEdge};

const CHECK_PERIOD: Duration = Duration::from_secs(3600);

pub const NEW_NOTIFICATIONS_ALERT: &str = "new notifications";

#[derive(Debug, Default)]
pub struct NotificationWatcher {
    edge: RisingEdge,
}

impl NotificationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the flag once. Returns whether an alert was sent.
    ///
    /// A failed check is forwarded as an alert and leaves the edge state as
    /// it was.
    pub async fn check_once(&mut self, client: &dyn FeedClient, alerts: &dyn AlertSink) -> bool {
        info!("Checking notifications...");
        match client.check_notifications().await {
            Ok(has_new) => {
                if self.edge.update(has_new) {
                    alerts.send(NEW_NOTIFICATIONS_ALERT).await;
                    info!("Forwarded notifications to monitoring");
                    true
                } else {
                    if has_new {
                        info!("Notifications already forwarded");
                    }
                    false
                }
            }
            Err(e) => {
                warn!(error = %e, "Notification check failed");
                alerts.send(&format!("{e:#}")).await;
                false
            }
        }
    }

    pub async fn run(mut self, client: &dyn FeedClient, alerts: &dyn AlertSink) {
        loop {
            self.check_once(client, alerts).await;
            schedule::wait_until_next(CHECK_PERIOD).await;
        }
    }
}
