//! Users as seen by the ledger.

use gemledger_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// A user who records entries or is authorized on a book/account.
///
/// Authentication lives upstream; the ledger only needs identity and the
/// username for history snapshots and summaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
}

impl User {
    /// Creates a user with a fresh ID.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}
