// Error taxonomy for the reaction pipeline.
//
// Plumbing (config, HTTP, CLI) uses anyhow like the rest of the crate. The
// types here exist because callers branch on them: a duplicate ledger key is
// success in disguise, and a broken ledger must stop the process.

use thiserror::Error;

use crate::links::LinkFamily;

/// Errors from a reaction ledger backend.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The (item, family) key already has a committed reaction.
    #[error("item {item_id} already has a {family} reaction")]
    Duplicate { item_id: i64, family: LinkFamily },

    /// The backing store failed. Never retried.
    #[error("ledger storage failure: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl LedgerError {
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        LedgerError::Storage(err.into())
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Failures surfaced by the poll cycle and reaction engine.
#[derive(Debug, Error)]
pub enum BotError {
    /// Fetching the feed failed; the cycle is abandoned and retried later.
    #[error("failed to fetch recent items: {0:#}")]
    RemoteFetch(#[source] anyhow::Error),

    /// Posting a comment failed; only this item's reaction is abandoned.
    #[error("failed to comment on item {item_id}: {cause:#}")]
    RemoteSubmit {
        item_id: i64,
        #[source]
        cause: anyhow::Error,
    },

    /// The ledger is unreachable. Fatal: continuing could post duplicates.
    #[error("reaction ledger unavailable: {0}")]
    LedgerIo(#[source] LedgerError),
}

impl BotError {
    /// Whether the process must stop rather than carry on degraded.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BotError::LedgerIo(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ledger_io_is_fatal() {
        assert!(BotError::LedgerIo(LedgerError::storage(anyhow::anyhow!("disk gone"))).is_fatal());
        assert!(!BotError::RemoteFetch(anyhow::anyhow!("503")).is_fatal());
        assert!(!BotError::RemoteSubmit {
            item_id: 1,
            cause: anyhow::anyhow!("rate limited"),
        }
        .is_fatal());
    }

    #[test]
    fn messages_include_context() {
        let err = BotError::RemoteSubmit {
            item_id: 42,
            cause: anyhow::anyhow!("rate limited"),
        };
        assert_eq!(err.to_string(), "failed to comment on item 42: rate limited");

        let dup = LedgerError::Duplicate {
            item_id: 7,
            family: LinkFamily::Nostr,
        };
        assert_eq!(dup.to_string(), "item 7 already has a nostr reaction");
    }
}
