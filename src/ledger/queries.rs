// Ledger queries: every SQL statement against the reactions table.
//
// Keeps SQL contained in one place and gives the rest of the app clean Rust
// interfaces. Errors are typed so callers can tell a duplicate key apart
// from a broken store.

use rusqlite::{params, Connection};

use super::models::{NewReaction, Reaction};
use crate::error::{LedgerError, LedgerResult};
use crate::links::LinkFamily;

/// Whether a reaction for this (item, family) has been committed.
pub fn exists(conn: &Connection, item_id: i64, family: LinkFamily) -> LedgerResult<bool> {
    conn.query_row(
        "SELECT COUNT(1) > 0 FROM reactions WHERE item_id = ?1 AND family = ?2",
        params![item_id, family.as_str()],
        |row| row.get(0),
    )
    .map_err(LedgerError::storage)
}

/// Whether the item has a reaction of any family.
pub fn has_any_reaction(conn: &Connection, item_id: i64) -> LedgerResult<bool> {
    conn.query_row(
        "SELECT COUNT(1) > 0 FROM reactions WHERE item_id = ?1",
        params![item_id],
        |row| row.get(0),
    )
    .map_err(LedgerError::storage)
}

/// Insert a new reaction. A key collision is reported as
/// [`LedgerError::Duplicate`]; the existing row is never overwritten.
pub fn commit(conn: &Connection, reaction: &NewReaction) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO reactions (item_id, family, comment_id, body) VALUES (?1, ?2, ?3, ?4)",
        params![
            reaction.item_id,
            reaction.family.as_str(),
            reaction.comment_id,
            reaction.body,
        ],
    )
    .map_err(|e| {
        if is_key_violation(&e) {
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

fn is_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Total number of committed reactions.
pub fn reaction_count(conn: &Connection) -> LedgerResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM reactions", [], |row| row.get(0))
        .map_err(LedgerError::storage)
}

/// Most recent reactions first.
pub fn recent_reactions(conn: &Connection, limit: u32) -> LedgerResult<Vec<Reaction>> {
    select_reactions(
        conn,
        "SELECT item_id, family, comment_id, body, created_at
         FROM reactions
         ORDER BY created_at DESC, item_id DESC
         LIMIT ?1",
        params![limit],
    )
}

/// Every reaction, oldest first.
pub fn all_reactions(conn: &Connection) -> LedgerResult<Vec<Reaction>> {
    select_reactions(
        conn,
        "SELECT item_id, family, comment_id, body, created_at
         FROM reactions
         ORDER BY created_at ASC, item_id ASC",
        [],
    )
}

/// Look up the reaction for one (item, family) key.
#[cfg(test)]
pub fn get_reaction(
    conn: &Connection,
    item_id: i64,
    family: LinkFamily,
) -> LedgerResult<Option<Reaction>> {
    use rusqlite::OptionalExtension;

    let mut stmt = conn
        .prepare(
            "SELECT item_id, family, comment_id, body, created_at
             FROM reactions WHERE item_id = ?1 AND family = ?2",
        )
        .map_err(LedgerError::storage)?;
    stmt.query_row(params![item_id, family.as_str()], row_to_reaction)
        .optional()
        .map_err(LedgerError::storage)
}

fn select_reactions(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> LedgerResult<Vec<Reaction>> {
    let mut stmt = conn.prepare(sql).map_err(LedgerError::storage)?;
    let rows = stmt
        .query_map(params, row_to_reaction)
        .map_err(LedgerError::storage)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(LedgerError::storage)
}

fn row_to_reaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reaction> {
    let family: String = row.get(1)?;
    let family = family.parse::<LinkFamily>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(Reaction {
        item_id: row.get(0)?,
        family,
        comment_id: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn reaction(item_id: i64, family: LinkFamily, comment_id: i64) -> NewReaction {
        NewReaction {
            item_id,
            family,
            comment_id,
            body: format!("body {comment_id}"),
        }
    }

    #[test]
    fn test_exists_after_commit() {
        let conn = test_conn();
        assert!(!exists(&conn, 1, LinkFamily::Twitter).unwrap());
        commit(&conn, &reaction(1, LinkFamily::Twitter, 500)).unwrap();
        assert!(exists(&conn, 1, LinkFamily::Twitter).unwrap());
        assert!(!exists(&conn, 1, LinkFamily::Nostr).unwrap());
        assert!(has_any_reaction(&conn, 1).unwrap());
        assert!(!has_any_reaction(&conn, 2).unwrap());
    }

    #[test]
    fn test_duplicate_commit_is_rejected_without_overwrite() {
        let conn = test_conn();
        commit(&conn, &reaction(9, LinkFamily::Twitter, 1)).unwrap();
        let err = commit(&conn, &reaction(9, LinkFamily::Twitter, 2)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Duplicate {
                item_id: 9,
                family: LinkFamily::Twitter
            }
        ));

        let stored = get_reaction(&conn, 9, LinkFamily::Twitter).unwrap().unwrap();
        assert_eq!(stored.comment_id, 1);
        assert_eq!(reaction_count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_one_item_two_families() {
        let conn = test_conn();
        commit(&conn, &reaction(3, LinkFamily::Twitter, 10)).unwrap();
        commit(&conn, &reaction(3, LinkFamily::Nostr, 11)).unwrap();
        assert_eq!(reaction_count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_recent_and_all_ordering() {
        let conn = test_conn();
        for (item, comment) in [(1, 100), (2, 200), (3, 300)] {
            commit(&conn, &reaction(item, LinkFamily::Twitter, comment)).unwrap();
        }
        // Same-second inserts fall back to item_id ordering
        let recent = recent_reactions(&conn, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].item_id, 3);
        assert_eq!(recent[1].item_id, 2);

        let all = all_reactions(&conn).unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(all[0].body, "body 100");
        assert!(!all[0].created_at.is_empty());
    }

    #[test]
    fn test_unknown_family_row_is_a_storage_error() {
        let conn = test_conn();
        conn.execute(
            "INSERT INTO reactions (item_id, family, comment_id, body) VALUES (1, 'bogus', 1, 'x')",
            [],
        )
        .unwrap();
        assert!(matches!(
            all_reactions(&conn),
            Err(LedgerError::Storage(_))
        ));
    }

    #[test]
    fn test_broken_connection_is_a_storage_error() {
        let conn = Connection::open_in_memory().unwrap();
        // No tables created
        assert!(matches!(
            exists(&conn, 1, LinkFamily::Twitter),
            Err(LedgerError::Storage(_))
        ));
    }
}
