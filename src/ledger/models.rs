// Data models: Rust structs that map to ledger rows.
//
// Kept separate from the queries so other modules can use them without
// depending on rusqlite directly.

use serde::{Deserialize, Serialize};

use crate::links::LinkFamily;

/// A committed reaction: proof that an item already got its comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub item_id: i64,
    pub family: LinkFamily,
    pub comment_id: i64,
    pub body: String,
    pub created_at: String,
}

/// A reaction about to be committed. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReaction {
    pub item_id: i64,
    pub family: LinkFamily,
    pub comment_id: i64,
    pub body: String,
}

impl From<&Reaction> for NewReaction {
    fn from(r: &Reaction) -> Self {
        Self {
            item_id: r.item_id,
            family: r.family,
            comment_id: r.comment_id,
            body: r.body.clone(),
        }
    }
}
