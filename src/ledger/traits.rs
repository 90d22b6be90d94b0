// Ledger trait: backend-agnostic async interface for the reaction store.
//
// Implementors: SqliteLedger (wraps rusqlite), PgLedger (wraps sqlx).
// All methods are async so both sync (rusqlite via Mutex) and native async
// (sqlx) backends fit behind a single interface.
//
// Uniqueness of (item_id, family) is enforced by the store itself. `exists`
// followed by `commit` is not atomic, so `commit` is the final arbiter.

use async_trait::async_trait;

use super::models::{NewReaction, Reaction};
use crate::error::LedgerResult;
use crate::links::LinkFamily;

#[async_trait]
pub trait Ledger: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> LedgerResult<i64>;

    // --- Idempotency ---

    /// True iff a reaction for this (item, family) has been durably committed.
    async fn exists(&self, item_id: i64, family: LinkFamily) -> LedgerResult<bool>;

    /// True iff the item has a committed reaction of any family.
    async fn has_any_reaction(&self, item_id: i64) -> LedgerResult<bool>;

    /// Insert a reaction. Fails with `LedgerError::Duplicate` on key
    /// collision; never overwrites.
    async fn commit(&self, reaction: &NewReaction) -> LedgerResult<()>;

    // --- Reporting ---

    async fn reaction_count(&self) -> LedgerResult<i64>;

    /// Most recent reactions first.
    async fn recent_reactions(&self, limit: u32) -> LedgerResult<Vec<Reaction>>;

    /// Every reaction, oldest first (used by `migrate`).
    async fn all_reactions(&self) -> LedgerResult<Vec<Reaction>>;
}
