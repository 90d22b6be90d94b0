// Scheduling helpers: sleep-to-boundary and rising-edge detection.
//
// The loops wake on aligned wall-clock boundaries (every full minute, every
// full hour) rather than a fixed interval after the last run, so a slow
// cycle doesn't drift the cadence.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

/// Time from `now` until the next multiple of `period` since the Unix epoch.
///
/// A `now` sitting exactly on a boundary waits a full period.
pub fn until_next_boundary(now: DateTime<Utc>, period: Duration) -> Duration {
    let period_ms = period.as_millis().max(1) as i64;
    let into_period = now.timestamp_millis().rem_euclid(period_ms);
    let sub_ms_nanos = now.timestamp_subsec_nanos() % 1_000_000;
    Duration::from_millis((period_ms - into_period) as u64)
        .saturating_sub(Duration::from_nanos(u64::from(sub_ms_nanos)))
}

/// Sleep until the next `period` boundary.
pub async fn wait_until_next(period: Duration) {
    let dur = until_next_boundary(Utc::now(), period);
    info!(secs = dur.as_secs(), "Sleeping until next boundary");
    tokio::time::sleep(dur).await;
}

/// Remembers the last value of a boolean signal and reports `false → true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RisingEdge {
    previous: bool,
}

impl RisingEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value; true only if it just turned on.
    pub fn update(&mut self, current: bool) -> bool {
        let fired = current && !self.previous;
        self.previous = current;
        fired
    }

    pub fn current(&self) -> bool {
        self.previous
    }
}
