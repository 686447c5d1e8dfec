//! `SQLite` persistence for Gemledger.
//!
//! This crate provides:
//! - Plain-SQL migrations
//! - Repositories for users, books, accounts and entries
//! - [`SqliteStore`], the database-backed [`gemledger_core::ledger::EntryStore`]

mod codec;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod store;

pub use error::DbError;
pub use migration::{Migration, MigrationStatus, Migrator};
pub use repositories::{AccountRepository, BookRepository, EntryRepository, UserRepository};
pub use store::{SqliteStore, SqliteTransaction};

/// Opens a migrated store at `path`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub fn connect(path: &str) -> Result<SqliteStore, DbError> {
    let mut store = SqliteStore::open(path)?;
    store.migrate()?;
    Ok(store)
}
