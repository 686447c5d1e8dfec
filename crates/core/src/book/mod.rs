//! Books: shared ledgers owning entries.

pub mod summary;

use gemledger_shared::types::{BookId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slug::slugify;
use crate::user::User;

pub use summary::BookSummary;

/// Errors for book construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Book name produced an empty slug.
    #[error("Book name {0:?} does not produce a usable slug")]
    EmptySlug(String),
}

/// The parts of a book an entry needs to carry around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRef {
    /// The book ID.
    pub id: BookId,
    /// The book slug.
    pub slug: String,
}

/// A shared ledger with its authorized users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// The book ID.
    pub id: BookId,
    /// Unique slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Users allowed to read and record entries.
    pub users: Vec<User>,
}

impl Book {
    /// Creates a book, deriving the slug from the name when absent.
    ///
    /// # Errors
    ///
    /// Returns `BookError::EmptySlug` if no usable slug results.
    pub fn new(name: &str, slug: Option<&str>) -> Result<Self, BookError> {
        let slug = slug.map_or_else(|| slugify(name), str::to_string);
        if slug.is_empty() {
            return Err(BookError::EmptySlug(name.to_string()));
        }

        Ok(Self {
            id: BookId::new(),
            slug,
            name: name.to_string(),
            users: Vec::new(),
        })
    }

    /// Adds a user unless already present.
    pub fn add_user(&mut self, user: User) {
        if !self.has_user(user.id) {
            self.users.push(user);
        }
    }

    /// Returns true if the user may access this book.
    #[must_use]
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }

    /// Returns the reference carried by entries.
    #[must_use]
    pub fn reference(&self) -> BookRef {
        BookRef {
            id: self.id,
            slug: self.slug.clone(),
        }
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
