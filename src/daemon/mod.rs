// Daemon: three independent loops sharing one client and one ledger.
//
//   poll           every minute: fetch items, react to each
//   notifications  every hour: alert on new notifications
//   session        every hour: refresh the login cookie
//
// The watcher and keepalive run as their own tokio tasks so a stalled call
// in one loop never holds up another. Polling runs on the caller's task and
// is the only loop that can end the process.

pub mod notifications;
pub mod poll;
pub mod session;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::alert::AlertSink;
use crate::client::FeedClient;
use crate::engine::ReactionEngine;
use notifications::NotificationWatcher;

pub struct Daemon {
    pub client: Arc<dyn FeedClient>,
    pub alerts: Arc<dyn AlertSink>,
    pub engine: ReactionEngine,
    pub page_size: u32,
    pub retry_delay: Duration,
}

impl Daemon {
    /// Run until the poll loop hits a fatal error.
    pub async fn run(self) -> anyhow::Result<()> {
        let watcher = {
            let client = Arc::clone(&self.client);
            let alerts = Arc::clone(&self.alerts);
            tokio::spawn(async move {
                NotificationWatcher::new()
                    .run(client.as_ref(), alerts.as_ref())
                    .await
            })
        };

        let keepalive = {
            let client = Arc::clone(&self.client);
            let alerts = Arc::clone(&self.alerts);
            tokio::spawn(async move { session::run(client.as_ref(), alerts.as_ref()).await })
        };

        info!(page_size = self.page_size, "Daemon started");

        let fatal = poll::run_loop(
            self.client.as_ref(),
            &self.engine,
            self.alerts.as_ref(),
            self.page_size,
            self.retry_delay,
        )
        .await;

        watcher.abort();
        keepalive.abort();

        Err(fatal.into())
    }
}
