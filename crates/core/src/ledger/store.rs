//! The entry store contract.
//!
//! The core never talks to a database directly. Callers hand it an
//! [`EntryStore`] and every mutation goes through an [`EntryTransaction`]
//! that the caller explicitly commits or rolls back. Dropping a
//! transaction without committing rolls it back.

use gemledger_shared::types::{BookId, EntryId};

use super::entry::Entry;
use super::error::StoreError;
use super::history::{EntryHistory, HistoryReceipt};
use crate::account::AccountRef;

/// A queryable, transactional entry store.
pub trait EntryStore {
    /// The transaction type handed out by [`EntryStore::begin`].
    type Transaction<'a>: EntryTransaction
    where
        Self: 'a;

    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the backend cannot start one.
    fn begin(&mut self) -> Result<Self::Transaction<'_>, StoreError>;

    /// All entries of a book, ordered by date and then by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` on read failure.
    fn book_entries(&self, book: BookId) -> Result<Vec<Entry>, StoreError>;

    /// Looks up a single entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` on read failure.
    fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError>;

    /// Total number of live entries.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` on read failure.
    fn entry_count(&self) -> Result<usize, StoreError>;

    /// The history ledger, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` on read failure.
    fn history(&self) -> Result<Vec<EntryHistory>, StoreError>;
}

/// A unit of work against an [`EntryStore`].
///
/// Entries can only be removed with a [`HistoryReceipt`], which only
/// [`HistoryRecorder::delete`](super::HistoryRecorder::delete) can produce
/// after appending the snapshot.
pub trait EntryTransaction {
    /// Reads an entry as seen by this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` on read failure.
    fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError>;

    /// Inserts a new entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEntry` if the entry key is taken.
    fn insert_entry(&mut self, entry: &Entry) -> Result<(), StoreError>;

    /// Moves an entry to another account and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EntryNotFound` if the entry does not exist, or
    /// `StoreError::DuplicateEntry` if the moved entry's key is taken.
    fn update_account(&mut self, id: EntryId, account: &AccountRef) -> Result<Entry, StoreError>;

    /// Appends a history record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` on write failure.
    fn append_history(&mut self, record: &EntryHistory) -> Result<(), StoreError>;

    /// Removes the entry named by the receipt.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EntryNotFound` if the entry is already gone.
    fn remove_entry(&mut self, receipt: HistoryReceipt) -> Result<(), StoreError>;

    /// Makes every change of this transaction visible.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the commit fails.
    fn commit(self) -> Result<(), StoreError>;

    /// Discards every change of this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the rollback fails.
    fn rollback(self) -> Result<(), StoreError>;
}
