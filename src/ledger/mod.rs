// Reaction ledger: the durable record of which items already got a comment.
//
// SQLite (rusqlite, bundled) is the default backend; the database file lives
// wherever MIRRORBOT_DB_PATH points (defaults to ./mirrorbot.db). PostgreSQL
// is available behind the `postgres` feature.

pub mod models;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod queries;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use models::{NewReaction, Reaction};
pub use traits::Ledger;

use anyhow::Result;
use std::sync::Arc;

#[cfg(feature = "sqlite")]
use anyhow::Context;
#[cfg(feature = "sqlite")]
use rusqlite::Connection;
#[cfg(feature = "sqlite")]
use std::path::Path;

/// Open (or create) the SQLite ledger and run migrations.
///
/// Called by `mirrorbot init` and by `mirrorbot run`, which both create the
/// schema if absent.
#[cfg(feature = "sqlite")]
pub fn initialize(db_path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for ledger: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open ledger at {}", db_path))?;

    // WAL lets `status` read while the daemon writes
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing SQLite ledger (fails if it doesn't exist yet).
#[cfg(feature = "sqlite")]
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Ledger not found at {}. Run `mirrorbot init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open ledger at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(conn)
}

/// Create (if needed) and wrap the SQLite ledger behind the trait.
#[cfg(feature = "sqlite")]
pub fn initialize_sqlite(db_path: &str) -> Result<Arc<dyn Ledger>> {
    let conn = initialize(db_path)?;
    Ok(Arc::new(sqlite::SqliteLedger::new(conn)))
}

/// Open an existing SQLite ledger behind the trait.
#[cfg(feature = "sqlite")]
pub fn open_sqlite(db_path: &str) -> Result<Arc<dyn Ledger>> {
    let conn = open(db_path)?;
    Ok(Arc::new(sqlite::SqliteLedger::new(conn)))
}

/// Connect to PostgreSQL, run migrations, and wrap the ledger behind the trait.
#[cfg(feature = "postgres")]
pub async fn connect_postgres(database_url: &str) -> Result<Arc<dyn Ledger>> {
    let ledger = postgres::PgLedger::connect(database_url).await?;
    Ok(Arc::new(ledger))
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mirrorbot-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_open_missing_ledger_fails() {
        let path = temp_path("missing/ledger.db");
        let err = open(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("mirrorbot init"));
    }

    #[tokio::test]
    async fn test_ledger_survives_reopen() {
        let dir = temp_path("reopen");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("ledger.db");
        let path = path.to_str().unwrap();

        let ledger = initialize_sqlite(path).unwrap();
        ledger
            .commit(&NewReaction {
                item_id: 12,
                family: crate::links::LinkFamily::Nostr,
                comment_id: 34,
                body: "b".into(),
            })
            .await
            .unwrap();
        drop(ledger);

        let reopened = open_sqlite(path).unwrap();
        assert!(reopened
            .exists(12, crate::links::LinkFamily::Nostr)
            .await
            .unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
