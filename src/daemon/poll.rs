// Item polling: fetch the newest page and run the engine over each item.
//
// Items are processed strictly in feed order, one at a time. A failed fetch
// abandons the cycle; a failed post only abandons that item.

use std::time::Duration;
use tracing::{error, info, warn};

use crate::alert::AlertSink;
use crate::client::{FeedClient, Sort};
use crate::engine::{ReactionEngine, ReactionOutcome};
use crate::error::BotError;
use crate::schedule;

const CYCLE_PERIOD: Duration = Duration::from_secs(60);

/// Tally of one poll cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub items_seen: usize,
    pub committed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CycleReport {
    fn record(&mut self, outcome: &ReactionOutcome) {
        match outcome {
            ReactionOutcome::Committed { .. } | ReactionOutcome::AlreadyCommitted { .. } => {
                self.committed += 1
            }
            ReactionOutcome::Skipped { .. } | ReactionOutcome::NoMirrors { .. } => {
                self.skipped += 1
            }
            ReactionOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// One fetch-and-react pass over the most recent items.
pub async fn run_cycle(
    client: &dyn FeedClient,
    engine: &ReactionEngine,
    page_size: u32,
) -> Result<CycleReport, BotError> {
    info!("Fetching items...");
    let items = client
        .fetch_recent_items(Sort::Recent, page_size)
        .await
        .map_err(BotError::RemoteFetch)?;

    let mut report = CycleReport {
        items_seen: items.len(),
        ..Default::default()
    };
    for item in &items {
        for outcome in engine.react(item).await? {
            report.record(&outcome);
        }
    }
    Ok(report)
}

/// Poll forever. Returns only with a fatal error.
pub async fn run_loop(
    client: &dyn FeedClient,
    engine: &ReactionEngine,
    alerts: &dyn AlertSink,
    page_size: u32,
    retry_delay: Duration,
) -> BotError {
    loop {
        match run_cycle(client, engine, page_size).await {
            Ok(report) => {
                info!(
                    items = report.items_seen,
                    committed = report.committed,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Poll cycle complete"
                );
                schedule::wait_until_next(CYCLE_PERIOD).await;
            }
            Err(err) if err.is_fatal() => {
                error!(error = %err, "Fatal error, stopping");
                alerts.send(&err.to_string()).await;
                return err;
            }
            Err(err) => {
                warn!(error = %err, retry_secs = retry_delay.as_secs(), "Poll cycle failed");
                alerts.send(&err.to_string()).await;
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}
