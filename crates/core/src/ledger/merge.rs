//! Collapsing several entries into one.
//!
//! Validation and derivation are pure ([`EntryMerger::prepare`]); the store
//! is only touched once every precondition holds.

use std::collections::HashSet;

use chrono::NaiveDate;
use gemledger_shared::types::{CountryCode, EntryId};
use rust_decimal::Decimal;
use tracing::info;

use super::entry::{AMOUNT_SCALE, Entry};
use super::error::LedgerError;
use super::history::{EntryHistory, HistoryReason, HistoryRecorder};
use super::store::{EntryStore, EntryTransaction};
use crate::book::BookRef;
use crate::tags::TagSet;
use crate::user::User;

/// Overrides and flags for a merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Recorder of the merged entry; defaults to the first entry's.
    pub who: Option<User>,
    /// Date of the merged entry; defaults to the first entry's.
    pub when: Option<NaiveDate>,
    /// Description of the merged entry; defaults to a digest of the sources.
    pub what: Option<String>,
    /// Run the whole merge and roll it back.
    pub dry_run: bool,
}

/// What a merge did, or would have done.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged entry.
    pub entry: Entry,
    /// One history record per consumed entry, in input order.
    pub history: Vec<EntryHistory>,
    /// False for dry runs.
    pub committed: bool,
}

/// Merges entries of one book, account and country.
pub struct EntryMerger;

impl EntryMerger {
    /// Validates `entries` and derives the merged entry.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `InsufficientEntries` if fewer than two distinct entries are given
    /// - `RepeatedMergeEntry` if an entry is listed more than once
    /// - `CrossBookMerge` if an entry is not in `book`
    /// - `CrossAccountMerge` if the entries use more than one account
    /// - `CrossCountryMerge` if the entries span more than one country
    pub fn prepare(
        book: &BookRef,
        entries: &[Entry],
        options: &MergeOptions,
    ) -> Result<Entry, LedgerError> {
        let [first, ..] = entries else {
            return Err(LedgerError::InsufficientEntries { count: 0 });
        };
        let mut ids = HashSet::new();
        let mut repeated = None;
        for entry in entries {
            if !ids.insert(entry.id) && repeated.is_none() {
                repeated = Some(entry.id);
            }
        }
        if ids.len() < 2 {
            return Err(LedgerError::InsufficientEntries { count: ids.len() });
        }
        if let Some(id) = repeated {
            return Err(LedgerError::RepeatedMergeEntry(id));
        }

        if let Some(foreign) = entries.iter().find(|e| e.book.id != book.id) {
            return Err(LedgerError::CrossBookMerge {
                book: book.slug.clone(),
                found: foreign.book.slug.clone(),
            });
        }

        let accounts = distinct(entries.iter().map(|e| e.account.slug.clone()));
        if accounts.len() > 1 {
            return Err(LedgerError::CrossAccountMerge { accounts });
        }

        let countries = distinct(entries.iter().map(|e| e.country));
        if countries.len() > 1 {
            return Err(LedgerError::CrossCountryMerge {
                countries: countries.iter().map(CountryCode::to_string).collect(),
            });
        }

        let total: Decimal = entries.iter().map(Entry::signed_amount).sum();
        let mut amount = total.abs();
        amount.rescale(AMOUNT_SCALE);

        let tags = entries.iter().fold(TagSet::new(), |mut acc, e| {
            acc.extend_from(&e.tags);
            acc
        });
        let notes = entries
            .iter()
            .map(|e| e.notes.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Entry {
            id: EntryId::new(),
            book: book.clone(),
            who: options.who.clone().unwrap_or_else(|| first.who.clone()),
            when: options.when.unwrap_or(first.when),
            what: options
                .what
                .clone()
                .unwrap_or_else(|| Self::merged_description(entries)),
            notes,
            account: first.account.clone(),
            amount,
            is_income: total > Decimal::ZERO,
            tags,
            country: first.country,
        })
    }

    /// Sorted, `|`-joined `"<what> <sign><amount>"` renderings of `entries`.
    ///
    /// Independent of input order.
    #[must_use]
    pub fn merged_description(entries: &[Entry]) -> String {
        let mut parts: Vec<String> = entries
            .iter()
            .map(|e| {
                let sign = if e.is_income { '+' } else { '-' };
                format!("{} {sign}{}", e.what, e.amount)
            })
            .collect();
        parts.sort();
        parts.join("|")
    }

    /// Merges `entries` into one new entry inside a single transaction.
    ///
    /// The merged entry is inserted first, then every source entry is
    /// removed through [`HistoryRecorder`] with reason `merge`. With
    /// `dry_run` the transaction is rolled back and the store is unchanged.
    ///
    /// # Errors
    ///
    /// Any error from [`EntryMerger::prepare`] (nothing is written), or a
    /// store error, in which case the transaction is rolled back.
    pub fn merge<S: EntryStore>(
        store: &mut S,
        book: &BookRef,
        entries: &[Entry],
        options: &MergeOptions,
    ) -> Result<MergeOutcome, LedgerError> {
        let merged = Self::prepare(book, entries, options)?;

        let mut tx = store.begin()?;
        tx.insert_entry(&merged)?;
        let history = entries
            .iter()
            .map(|e| HistoryRecorder::delete(&mut tx, e.id, HistoryReason::Merge))
            .collect::<Result<Vec<_>, _>>()?;

        if options.dry_run {
            tx.rollback()?;
        } else {
            tx.commit()?;
        }

        info!(
            book = %book.slug,
            sources = entries.len(),
            entry_id = %merged.id,
            amount = %merged.amount,
            is_income = merged.is_income,
            committed = !options.dry_run,
            "Entries merged"
        );
        Ok(MergeOutcome {
            entry: merged,
            history,
            committed: !options.dry_run,
        })
    }
}

/// Distinct values in first-seen order.
fn distinct<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
