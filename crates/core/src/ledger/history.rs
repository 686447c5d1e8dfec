//! Entry history: the append-only audit trail of deletions.

use chrono::{DateTime, NaiveDate, Utc};
use gemledger_shared::types::{CountryCode, EntryId, HistoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::entry::Entry;
use super::error::StoreError;
use super::store::EntryTransaction;

/// Why an entry was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryReason {
    /// Direct removal.
    Delete,
    /// Consumed by a merge.
    Merge,
}

impl HistoryReason {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Merge => "merge",
        }
    }
}

impl std::fmt::Display for HistoryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HistoryReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(Self::Delete),
            "merge" => Ok(Self::Merge),
            other => Err(format!("unknown history reason: {other}")),
        }
    }
}

/// Denormalized snapshot of a removed entry. Never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryHistory {
    /// The record ID.
    pub id: HistoryId,
    /// Book slug.
    pub book: String,
    /// Username of the recorder.
    pub who: String,
    /// Entry date.
    pub when: NaiveDate,
    /// Entry description.
    pub what: String,
    /// Account slug.
    pub account: String,
    /// Unsigned amount.
    pub amount: Decimal,
    /// Income flag.
    pub is_income: bool,
    /// Tag labels, sorted.
    pub tags: Vec<String>,
    /// Country code.
    pub country: CountryCode,
    /// Entry notes.
    pub notes: String,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// Why the entry was removed.
    pub reason: HistoryReason,
}

/// Proof that a history record was appended for an entry.
///
/// Required by [`EntryTransaction::remove_entry`].
#[derive(Debug)]
pub struct HistoryReceipt {
    entry_id: EntryId,
    history_id: HistoryId,
}

impl HistoryReceipt {
    /// The entry to remove.
    #[must_use]
    pub const fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    /// The history record written for it.
    #[must_use]
    pub const fn history_id(&self) -> HistoryId {
        self.history_id
    }
}

/// Snapshots entries before they are removed.
pub struct HistoryRecorder;

impl HistoryRecorder {
    /// Builds the snapshot of `entry` without touching any store.
    #[must_use]
    pub fn snapshot(entry: &Entry, reason: HistoryReason) -> EntryHistory {
        EntryHistory {
            id: HistoryId::new(),
            book: entry.book.slug.clone(),
            who: entry.who.username.clone(),
            when: entry.when,
            what: entry.what.clone(),
            account: entry.account.slug.clone(),
            amount: entry.amount,
            is_income: entry.is_income,
            tags: entry.tags.labels(),
            country: entry.country,
            notes: entry.notes.clone(),
            created_at: Utc::now(),
            reason,
        }
    }

    /// Removes an entry inside `tx`, recording its snapshot first.
    ///
    /// The snapshot is read from the live entry as the transaction sees it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EntryNotFound` if the entry does not exist, or
    /// any store error from appending or removing.
    pub fn delete<T: EntryTransaction>(
        tx: &mut T,
        entry_id: EntryId,
        reason: HistoryReason,
    ) -> Result<EntryHistory, StoreError> {
        let entry = tx
            .entry(entry_id)?
            .ok_or(StoreError::EntryNotFound(entry_id))?;

        let record = Self::snapshot(&entry, reason);
        tx.append_history(&record)?;
        tx.remove_entry(HistoryReceipt {
            entry_id,
            history_id: record.id,
        })?;

        info!(
            entry_id = %entry_id,
            history_id = %record.id,
            book = %record.book,
            reason = %reason,
            "Entry removed"
        );
        Ok(record)
    }
}
