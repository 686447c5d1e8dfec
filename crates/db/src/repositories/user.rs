//! User repository for database operations.

use gemledger_core::User;
use gemledger_shared::types::UserId;
use rusqlite::{Connection, OptionalExtension, params};

use crate::codec;
use crate::error::DbError;

/// User repository for creating and finding users.
#[derive(Debug, Clone, Copy)]
pub struct UserRepository<'a> {
    conn: &'a Connection,
}

impl<'a> UserRepository<'a> {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Conflict` if the username is taken.
    pub fn create(&self, user: &User) -> Result<(), DbError> {
        self.conn
            .execute(
                "INSERT INTO users (id, username) VALUES (?1, ?2)",
                params![user.id.to_string(), user.username],
            )
            .map_err(|e| DbError::from_write(e, || format!("user {}", user.username)))?;
        Ok(())
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(decode).transpose()
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_by_id(&self, id: UserId) -> Result<Option<User>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?1",
                params![id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(decode).transpose()
    }
}

pub(crate) fn decode((id, username): (String, String)) -> Result<User, DbError> {
    Ok(User {
        id: codec::id("users.id", &id, UserId::from_uuid)?,
        username,
    })
}
