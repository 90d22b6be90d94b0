// SqliteLedger: rusqlite backend implementing the Ledger trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{NewReaction, Reaction};
use super::traits::Ledger;
use crate::error::{LedgerError, LedgerResult};
use crate::links::LinkFamily;

pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// In-memory ledger with the schema applied. Nothing survives the process.
    pub fn in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory().map_err(LedgerError::storage)?;
        super::schema::create_tables(&conn).map_err(LedgerError::Storage)?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn table_count(&self) -> LedgerResult<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn).map_err(LedgerError::Storage)
    }

    async fn exists(&self, item_id: i64, family: LinkFamily) -> LedgerResult<bool> {
        let conn = self.conn.lock().await;
        super::queries::exists(&conn, item_id, family)
    }

    async fn has_any_reaction(&self, item_id: i64) -> LedgerResult<bool> {
        let conn = self.conn.lock().await;
        super::queries::has_any_reaction(&conn, item_id)
    }

    async fn commit(&self, reaction: &NewReaction) -> LedgerResult<()> {
        let conn = self.conn.lock().await;
        super::queries::commit(&conn, reaction)
    }

    async fn reaction_count(&self) -> LedgerResult<i64> {
        let conn = self.conn.lock().await;
        super::queries::reaction_count(&conn)
    }

    async fn recent_reactions(&self, limit: u32) -> LedgerResult<Vec<Reaction>> {
        let conn = self.conn.lock().await;
        super::queries::recent_reactions(&conn, limit)
    }

    async fn all_reactions(&self) -> LedgerResult<Vec<Reaction>> {
        let conn = self.conn.lock().await;
        super::queries::all_reactions(&conn)
    }
}
