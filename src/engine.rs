// Reaction engine: classify, dedupe, compose, post, record. One item at a time.
//
// For every (item, family) pair:
//   classify -> exists? -> synthesize + compose -> create_comment -> commit
//
// `exists` runs before the remote call so an item already in the ledger
// never gets a second comment. `commit` runs only after the comment is
// posted; a failed post leaves nothing recorded and the next cycle retries.
// The ledger's key constraint settles races between overlapping cycles.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::alert::AlertSink;
use crate::client::{FeedClient, Item};
use crate::error::{BotError, LedgerError};
use crate::ledger::{Ledger, NewReaction};
use crate::links::{compose, LinkFamily, LinkMatch, MirrorSynthesizer, PatternRegistry};

/// What happened for one matched (item, family) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Already in the ledger; nothing was posted.
    Skipped { family: LinkFamily },
    /// Comment posted and recorded.
    Committed { family: LinkFamily, comment_id: i64 },
    /// Comment posted, but another writer recorded this key first.
    AlreadyCommitted { family: LinkFamily, comment_id: i64 },
    /// Posting failed; nothing recorded, retried next cycle.
    Failed { family: LinkFamily, reason: String },
    /// No mirror hosts are configured for this family; nothing was posted
    /// or recorded, so the item is picked up again once hosts are added.
    NoMirrors { family: LinkFamily },
}

/// A comment the engine would post, without posting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedComment {
    pub link: LinkMatch,
    pub body: String,
}

/// The comment body for a classified link.
pub fn render(synthesizer: &MirrorSynthesizer, link: &LinkMatch) -> String {
    let endpoints = synthesizer.synthesize(link);
    compose(link.family, &endpoints)
}

/// Every comment the engine would post for `url`, ignoring the ledger.
/// Pure: no network, no ledger.
pub fn plan(
    registry: &PatternRegistry,
    synthesizer: &MirrorSynthesizer,
    url: &str,
) -> Vec<PlannedComment> {
    registry
        .classify_all(url)
        .into_iter()
        .map(|link| PlannedComment {
            body: render(synthesizer, &link),
            link,
        })
        .collect()
}

pub struct ReactionEngine {
    registry: Arc<PatternRegistry>,
    synthesizer: Arc<MirrorSynthesizer>,
    ledger: Arc<dyn Ledger>,
    client: Arc<dyn FeedClient>,
    alerts: Arc<dyn AlertSink>,
}

impl ReactionEngine {
    pub fn new(
        registry: Arc<PatternRegistry>,
        synthesizer: Arc<MirrorSynthesizer>,
        ledger: Arc<dyn Ledger>,
        client: Arc<dyn FeedClient>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            registry,
            synthesizer,
            ledger,
            client,
            alerts,
        }
    }

    /// Every comment `react` would post for `url`, ignoring the ledger.
    pub fn plan(&self, url: &str) -> Vec<PlannedComment> {
        plan(&self.registry, &self.synthesizer, url)
    }

    /// Run every registered family against one item.
    ///
    /// Returns one outcome per matching family. Only a ledger failure is
    /// returned as an error, and it is always fatal.
    pub async fn react(&self, item: &Item) -> Result<Vec<ReactionOutcome>, BotError> {
        let mut outcomes = Vec::new();
        for family in self.registry.families() {
            match self.registry.match_family(family, &item.url) {
                Some(link) => {
                    info!(item_id = item.id, %family, "Item matches link family");
                    outcomes.push(self.react_to_match(item, &link).await?);
                }
                None => debug!(item_id = item.id, %family, "Item does not match"),
            }
        }
        Ok(outcomes)
    }

    async fn react_to_match(
        &self,
        item: &Item,
        link: &LinkMatch,
    ) -> Result<ReactionOutcome, BotError> {
        let family = link.family;

        let already = self
            .ledger
            .exists(item.id, family)
            .await
            .map_err(BotError::LedgerIo)?;
        if already {
            info!(item_id = item.id, %family, "Item already has a reaction, skipping");
            return Ok(ReactionOutcome::Skipped { family });
        }

        let endpoints = self.synthesizer.synthesize(link);
        if endpoints.is_empty() {
            warn!(item_id = item.id, %family, "No mirrors configured, not commenting");
            return Ok(ReactionOutcome::NoMirrors { family });
        }
        let body = compose(family, &endpoints);

        let comment_id = match self.client.create_comment(item.id, &body).await {
            Ok(id) => id,
            Err(cause) => {
                let err = BotError::RemoteSubmit {
                    item_id: item.id,
                    cause,
                };
                warn!(item_id = item.id, %family, error = %err, "Failed to post comment");
                self.alerts.send(&err.to_string()).await;
                return Ok(ReactionOutcome::Failed {
                    family,
                    reason: err.to_string(),
                });
            }
        };
        info!(item_id = item.id, %family, comment_id, "Created comment");

        let reaction = NewReaction {
            item_id: item.id,
            family,
            comment_id,
            body,
        };
        match self.ledger.commit(&reaction).await {
            Ok(()) => Ok(ReactionOutcome::Committed { family, comment_id }),
            Err(LedgerError::Duplicate { .. }) => {
                warn!(
                    item_id = item.id,
                    %family,
                    comment_id,
                    "Reaction was recorded concurrently; keeping the existing row"
                );
                Ok(ReactionOutcome::AlreadyCommitted { family, comment_id })
            }
            Err(e) => Err(BotError::LedgerIo(e)),
        }
    }
}
