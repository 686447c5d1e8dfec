//! Book repository for database operations.

use gemledger_core::User;
use gemledger_core::book::Book;
use gemledger_shared::types::{BookId, UserId};
use rusqlite::{Connection, OptionalExtension, params};

use super::user;
use crate::codec;
use crate::error::DbError;

/// Book repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct BookRepository<'a> {
    conn: &'a Connection,
}

impl<'a> BookRepository<'a> {
    /// Creates a new book repository.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts a book together with its users.
    ///
    /// Must not be called while the connection holds an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Conflict` if the slug is taken.
    pub fn create(&self, book: &Book) -> Result<(), DbError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO books (id, slug, name) VALUES (?1, ?2, ?3)",
            params![book.id.to_string(), book.slug, book.name],
        )
        .map_err(|e| DbError::from_write(e, || format!("book {}", book.slug)))?;
        for user in &book.users {
            tx.execute(
                "INSERT INTO book_users (book_id, user_id) VALUES (?1, ?2)",
                params![book.id.to_string(), user.id.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Grants a user access to a book. Granting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the book or user does not exist.
    pub fn add_user(&self, book: BookId, user: UserId) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO book_users (book_id, user_id) VALUES (?1, ?2)",
            params![book.to_string(), user.to_string()],
        )?;
        Ok(())
    }

    /// Finds a book by slug, with its users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Book>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, slug, name FROM books WHERE slug = ?1",
                params![slug],
                |row| Ok((row.get::<_, String>(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        row.map(|row| self.decode(row)).transpose()
    }

    /// Lists every book, by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list(&self) -> Result<Vec<Book>, DbError> {
        let mut stmt = self.conn.prepare("SELECT id, slug, name FROM books ORDER BY slug")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<(String, String, String)>, _>>()?;
        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    /// Lists the books a user can access, by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_for_user(&self, user: UserId) -> Result<Vec<Book>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT b.id, b.slug, b.name FROM books b
             JOIN book_users bu ON bu.book_id = b.id
             WHERE bu.user_id = ?1
             ORDER BY b.slug",
        )?;
        let rows = stmt
            .query_map(params![user.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<(String, String, String)>, _>>()?;
        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    fn users(&self, book: &str) -> Result<Vec<User>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.username FROM users u
             JOIN book_users bu ON bu.user_id = u.id
             WHERE bu.book_id = ?1
             ORDER BY u.username",
        )?;
        let rows = stmt
            .query_map(params![book], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, String)>, _>>()?;
        rows.into_iter().map(user::decode).collect()
    }

    fn decode(&self, (id, slug, name): (String, String, String)) -> Result<Book, DbError> {
        let users = self.users(&id)?;
        Ok(Book {
            id: codec::id("books.id", &id, BookId::from_uuid)?,
            slug,
            name,
            users,
        })
    }
}
