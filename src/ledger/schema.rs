// Ledger schema: table creation and migrations.
//
// A `schema_version` table tracks which migrations have run, and each
// migration is a function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Title lines earlier bot versions put at the top of their comments,
/// used to recover the family of legacy rows.
const LEGACY_TITLES: [(&str, &str); 2] = [
    ("**Twitter2Nitter**", "twitter"),
    ("**Nostr Client Picker**", "nostr"),
];

/// Create all tables if they don't exist yet.
///
/// Idempotent, so safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per (item, family) that received a reply comment.
        -- The composite primary key is what stops a second comment.
        CREATE TABLE IF NOT EXISTS reactions (
            item_id INTEGER NOT NULL,
            family TEXT NOT NULL,              -- 'twitter' or 'nostr'
            comment_id INTEGER NOT NULL,       -- id of the comment we posted
            body TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (item_id, family)
        );

        CREATE INDEX IF NOT EXISTS idx_reactions_created
            ON reactions(created_at);
        ",
    )
    .context("Failed to create ledger tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: import the `comments` table written by the original
    // single-table layout, if this database still has one.
    run_migration(conn, 2, import_legacy_comments)?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

fn import_legacy_comments(conn: &Connection) -> rusqlite::Result<()> {
    let has_legacy: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'comments'",
        [],
        |row| row.get(0),
    )?;
    if !has_legacy {
        return Ok(());
    }

    for (title, family) in LEGACY_TITLES {
        let imported = conn.execute(
            "INSERT OR IGNORE INTO reactions (item_id, family, comment_id, body, created_at)
             SELECT parent_id, ?1, id, text, created_at
             FROM comments
             WHERE substr(text, 1, length(?2)) = ?2",
            rusqlite::params![family, title],
        )?;
        tracing::info!(family, imported, "Imported legacy comments");
    }
    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
