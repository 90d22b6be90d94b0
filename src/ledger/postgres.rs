// PgLedger: PostgreSQL backend implementing the Ledger trait.
//
// Uses sqlx PgPool for native async queries. All queries use runtime
// parameter binding (not compile-time macros) to avoid requiring
// DATABASE_URL at compile time.
//
// Key differences from SQLite:
// - TIMESTAMPTZ instead of TEXT for created_at
// - BIGINT ids
// - unique violations are detected through the driver's error kind

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx_core::pool::Pool;
use sqlx_core::row::Row;
use sqlx_postgres::{PgRow, Postgres};

use super::models::{NewReaction, Reaction};
use super::traits::Ledger;
use crate::error::{LedgerError, LedgerResult};
use crate::links::LinkFamily;

/// Type alias for the PostgreSQL connection pool.
pub type PgPool = Pool<Postgres>;

const CREATE_REACTIONS: &str = "
    CREATE TABLE IF NOT EXISTS reactions (
        item_id BIGINT NOT NULL,
        family TEXT NOT NULL,
        comment_id BIGINT NOT NULL,
        body TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (item_id, family)
    );
    CREATE INDEX IF NOT EXISTS idx_reactions_created ON reactions(created_at);
";

const SELECT_COLUMNS: &str = "SELECT item_id, family, comment_id, body,
        to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at
    FROM reactions";

pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    /// Connect to PostgreSQL and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        let ledger = Self { pool };
        ledger.run_migrations().await?;
        Ok(ledger)
    }

    /// Run all pending migrations.
    ///
    /// Holds a session-level advisory lock on a dedicated connection so two
    /// bot processes starting together don't race on the same migration.
    /// The unlock always runs, even when a migration fails.
    async fn run_migrations(&self) -> Result<()> {
        // ASCII "MIRRORBT" as a big-endian i64.
        const MIGRATION_LOCK_KEY: i64 = 0x4D4952524F524254_u64 as i64;

        let mut lock_conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection for migration advisory lock")?;

        sqlx_core::query::query("SELECT pg_advisory_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to acquire migration advisory lock")?;

        let migration_result: Result<()> = async {
            sqlx_core::query::query(
                "CREATE TABLE IF NOT EXISTS schema_version (
                    version INTEGER PRIMARY KEY,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
            )
            .execute(&self.pool)
            .await?;

            let applied: bool = sqlx_core::query::query(
                "SELECT COUNT(*) > 0 FROM schema_version WHERE version = 1",
            )
            .fetch_one(&self.pool)
            .await
            .map(|row| row.get::<bool, _>(0))?;

            if !applied {
                let mut tx = self.pool.begin().await?;
                sqlx_core::raw_sql::raw_sql(CREATE_REACTIONS)
                    .execute(&mut *tx)
                    .await?;
                sqlx_core::query::query("INSERT INTO schema_version (version) VALUES (1)")
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
            }

            Ok(())
        }
        .await;

        let unlock_result = sqlx_core::query::query("SELECT pg_advisory_unlock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to release migration advisory lock");

        // Migration error takes priority over unlock error.
        migration_result?;
        unlock_result?;

        Ok(())
    }
}

fn row_to_reaction(row: &PgRow) -> LedgerResult<Reaction> {
    let family: String = row.try_get("family").map_err(LedgerError::storage)?;
    Ok(Reaction {
        item_id: row.try_get("item_id").map_err(LedgerError::storage)?,
        family: family.parse::<LinkFamily>().map_err(LedgerError::Storage)?,
        comment_id: row.try_get("comment_id").map_err(LedgerError::storage)?,
        body: row.try_get("body").map_err(LedgerError::storage)?,
        created_at: row.try_get("created_at").map_err(LedgerError::storage)?,
    })
}

fn is_unique_violation(err: &sqlx_core::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[async_trait]
impl Ledger for PgLedger {
    async fn table_count(&self) -> LedgerResult<i64> {
        let row = sqlx_core::query::query(
            "SELECT COUNT(*)::bigint FROM information_schema.tables
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(LedgerError::storage)?;
        Ok(row.get::<i64, _>(0))
    }

    async fn exists(&self, item_id: i64, family: LinkFamily) -> LedgerResult<bool> {
        let row = sqlx_core::query::query(
            "SELECT COUNT(1) > 0 FROM reactions WHERE item_id = $1 AND family = $2",
        )
        .bind(item_id)
        .bind(family.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(LedgerError::storage)?;
        Ok(row.get::<bool, _>(0))
    }

    async fn has_any_reaction(&self, item_id: i64) -> LedgerResult<bool> {
        let row = sqlx_core::query::query("SELECT COUNT(1) > 0 FROM reactions WHERE item_id = $1")
            .bind(item_id)
            .fetch_one(&self.pool)
            .await
            .map_err(LedgerError::storage)?;
        Ok(row.get::<bool, _>(0))
    }

    async fn commit(&self, reaction: &NewReaction) -> LedgerResult<()> {
        sqlx_core::query::query(
            "INSERT INTO reactions (item_id, family, comment_id, body) VALUES ($1, $2, $3, $4)",
        )
        .bind(reaction.item_id)
        .bind(reaction.family.as_str())
        .bind(reaction.comment_id)
        .bind(reaction.body.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::Duplicate {
                    item_id: reaction.item_id,
                    family: reaction.family,
                }
            } else {
                LedgerError::storage(e)
            }
        })?;
        Ok(())
    }

    async fn reaction_count(&self) -> LedgerResult<i64> {
        let row = sqlx_core::query::query("SELECT COUNT(*)::bigint FROM reactions")
            .fetch_one(&self.pool)
            .await
            .map_err(LedgerError::storage)?;
        Ok(row.get::<i64, _>(0))
    }

    async fn recent_reactions(&self, limit: u32) -> LedgerResult<Vec<Reaction>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, item_id DESC LIMIT $1");
        let rows = sqlx_core::query::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(LedgerError::storage)?;
        rows.iter().map(row_to_reaction).collect()
    }

    async fn all_reactions(&self) -> LedgerResult<Vec<Reaction>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at ASC, item_id ASC");
        let rows = sqlx_core::query::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(LedgerError::storage)?;
        rows.iter().map(row_to_reaction).collect()
    }
}
