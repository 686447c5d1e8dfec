//! In-memory entry store.
//!
//! Transactions work on a staged copy of the whole state and swap it in on
//! commit. Good enough for tests, previews and small imports.

use std::collections::{BTreeMap, HashSet};

use gemledger_shared::types::{BookId, EntryId};

use crate::account::AccountRef;

use super::entry::{Entry, EntryKey};
use super::error::StoreError;
use super::history::{EntryHistory, HistoryReceipt};
use super::store::{EntryStore, EntryTransaction};

#[derive(Debug, Clone, Default)]
struct State {
    entries: BTreeMap<EntryId, Entry>,
    keys: HashSet<EntryKey>,
    history: Vec<EntryHistory>,
}

/// An [`EntryStore`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: State,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `entries`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEntry` if two entries share a key.
    pub fn with_entries<I>(entries: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut store = Self::new();
        let mut tx = store.begin()?;
        for entry in entries {
            tx.insert_entry(&entry)?;
        }
        tx.commit()?;
        Ok(store)
    }
}

impl EntryStore for MemoryStore {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin(&mut self) -> Result<Self::Transaction<'_>, StoreError> {
        let staged = self.state.clone();
        Ok(MemoryTransaction {
            target: &mut self.state,
            staged,
        })
    }

    fn book_entries(&self, book: BookId) -> Result<Vec<Entry>, StoreError> {
        let mut entries: Vec<Entry> = self
            .state
            .entries
            .values()
            .filter(|e| e.book.id == book)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.when.cmp(&b.when).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        Ok(self.state.entries.get(&id).cloned())
    }

    fn entry_count(&self) -> Result<usize, StoreError> {
        Ok(self.state.entries.len())
    }

    fn history(&self) -> Result<Vec<EntryHistory>, StoreError> {
        Ok(self.state.history.clone())
    }
}

/// Transaction over a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    target: &'a mut State,
    staged: State,
}

impl EntryTransaction for MemoryTransaction<'_> {
    fn entry(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        Ok(self.staged.entries.get(&id).cloned())
    }

    fn insert_entry(&mut self, entry: &Entry) -> Result<(), StoreError> {
        let key = entry.key();
        if self.staged.keys.contains(&key) {
            return Err(StoreError::DuplicateEntry(key.to_string()));
        }
        self.staged.keys.insert(key);
        self.staged.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    fn update_account(&mut self, id: EntryId, account: &AccountRef) -> Result<Entry, StoreError> {
        let entry = self
            .staged
            .entries
            .get_mut(&id)
            .ok_or(StoreError::EntryNotFound(id))?;
        let old = entry.key();
        let mut new = old.clone();
        new.account = account.id;
        if new != old && self.staged.keys.contains(&new) {
            return Err(StoreError::DuplicateEntry(new.to_string()));
        }

        entry.account = account.clone();
        self.staged.keys.remove(&old);
        self.staged.keys.insert(new);
        Ok(entry.clone())
    }

    fn append_history(&mut self, record: &EntryHistory) -> Result<(), StoreError> {
        self.staged.history.push(record.clone());
        Ok(())
    }

    fn remove_entry(&mut self, receipt: HistoryReceipt) -> Result<(), StoreError> {
        let entry = self
            .staged
            .entries
            .remove(&receipt.entry_id())
            .ok_or(StoreError::EntryNotFound(receipt.entry_id()))?;
        self.staged.keys.remove(&entry.key());
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        *self.target = self.staged;
        Ok(())
    }

    fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}
