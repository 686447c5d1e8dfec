//! Ledger service for recording and removing entries.

use gemledger_shared::types::EntryId;
use tracing::info;

use super::entry::{Entry, NewEntry};
use super::error::LedgerError;
use super::history::{EntryHistory, HistoryReason, HistoryRecorder};
use super::store::{EntryStore, EntryTransaction};
use crate::account::AccountRef;
use crate::tags::TagVocabulary;

/// Entry-level operations against an [`EntryStore`].
pub struct LedgerService;

impl LedgerService {
    /// Validates and stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`NewEntry::into_entry`], or
    /// `StoreError::DuplicateEntry` if the same transaction is already
    /// recorded.
    pub fn record<S: EntryStore>(
        store: &mut S,
        vocabulary: &TagVocabulary,
        input: NewEntry,
    ) -> Result<Entry, LedgerError> {
        let entry = input.into_entry(vocabulary)?;

        let mut tx = store.begin()?;
        tx.insert_entry(&entry)?;
        tx.commit()?;

        info!(
            entry_id = %entry.id,
            book = %entry.book.slug,
            account = %entry.account.slug,
            "Entry recorded"
        );
        Ok(entry)
    }

    /// Deletes one entry, leaving a `delete` history record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EntryNotFound` if the entry does not exist.
    pub fn delete<S: EntryStore>(store: &mut S, id: EntryId) -> Result<EntryHistory, LedgerError> {
        let mut tx = store.begin()?;
        let record = HistoryRecorder::delete(&mut tx, id, HistoryReason::Delete)?;
        tx.commit()?;
        Ok(record)
    }

    /// Deletes several entries in one transaction.
    ///
    /// Either every entry is removed or none is.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EntryNotFound` for the first missing entry.
    pub fn delete_entries<S: EntryStore>(
        store: &mut S,
        ids: &[EntryId],
    ) -> Result<Vec<EntryHistory>, LedgerError> {
        let mut tx = store.begin()?;
        let records = ids
            .iter()
            .map(|id| HistoryRecorder::delete(&mut tx, *id, HistoryReason::Delete))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;
        Ok(records)
    }

    /// Moves entries to another account in one transaction.
    ///
    /// Either every entry is moved or none is. The target's currency is not
    /// checked against the entries.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EntryNotFound` for the first missing entry, or
    /// `StoreError::DuplicateEntry` if a moved entry collides with one
    /// already recorded on the target account.
    pub fn change_account<S: EntryStore>(
        store: &mut S,
        ids: &[EntryId],
        target: &AccountRef,
    ) -> Result<Vec<Entry>, LedgerError> {
        let mut tx = store.begin()?;
        let moved = ids
            .iter()
            .map(|id| tx.update_account(*id, target))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;

        info!(count = moved.len(), account = %target.slug, "Entries moved");
        Ok(moved)
    }
}
