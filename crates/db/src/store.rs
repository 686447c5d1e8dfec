//! `SQLite` implementation of the entry store.

use std::path::Path;

use gemledger_core::account::AccountRef;
use gemledger_core::ledger::{
    Entry, EntryHistory, EntryStore, EntryTransaction, HistoryReceipt, StoreError,
};
use gemledger_shared::types::{BookId, EntryId};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::DbError;
use crate::migration::Migrator;
use crate::repositories::EntryRepository;

/// Entry store backed by a single `SQLite` connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wraps an existing connection, enabling foreign keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be set.
    pub fn from_connection(conn: Connection) -> Result<Self, DbError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Applies pending migrations and returns their names.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub fn migrate(&mut self) -> Result<Vec<&'static str>, DbError> {
        Migrator::up(&mut self.conn)
    }

    /// The underlying connection, for repositories.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access to the connection, for migrations.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    fn entries(&self) -> EntryRepository<'_> {
        EntryRepository::new(&self.conn)
    }
}

impl EntryStore for SqliteStore {
    type Transaction<'a> = SqliteTransaction<'a>;

    fn begin(&mut self) -> Result<Self::Transaction<'_>, StoreError> {
        let tx = self.conn.transaction().map_err(DbError::from)?;
        debug!("Transaction started");
        Ok(SqliteTransaction { tx })
    }

    fn book_entries(&self, book: BookId) -> Result<Vec<Entry>, StoreError> {
        Ok(self.entries().list_by_book(book)?)
    }

    fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        Ok(self.entries().find(id)?)
    }

    fn entry_count(&self) -> Result<usize, StoreError> {
        Ok(self.entries().count()?)
    }

    fn history(&self) -> Result<Vec<EntryHistory>, StoreError> {
        Ok(self.entries().history()?)
    }
}

/// Transaction over a [`SqliteStore`]. Rolls back when dropped.
#[derive(Debug)]
pub struct SqliteTransaction<'a> {
    tx: rusqlite::Transaction<'a>,
}

impl SqliteTransaction<'_> {
    fn entries(&self) -> EntryRepository<'_> {
        EntryRepository::new(&self.tx)
    }
}

impl EntryTransaction for SqliteTransaction<'_> {
    fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        Ok(self.entries().find(id)?)
    }

    fn insert_entry(&mut self, entry: &Entry) -> Result<(), StoreError> {
        Ok(self.entries().insert(entry)?)
    }

    fn update_account(&mut self, id: EntryId, account: &AccountRef) -> Result<Entry, StoreError> {
        self.entries()
            .update_account(id, account)?
            .ok_or(StoreError::EntryNotFound(id))
    }

    fn append_history(&mut self, record: &EntryHistory) -> Result<(), StoreError> {
        Ok(self.entries().append_history(record)?)
    }

    fn remove_entry(&mut self, receipt: HistoryReceipt) -> Result<(), StoreError> {
        if self.entries().delete(receipt.entry_id())? {
            Ok(())
        } else {
            Err(StoreError::EntryNotFound(receipt.entry_id()))
        }
    }

    fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().map_err(DbError::from)?;
        debug!("Transaction committed");
        Ok(())
    }

    fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().map_err(DbError::from)?;
        debug!("Transaction rolled back");
        Ok(())
    }
}
