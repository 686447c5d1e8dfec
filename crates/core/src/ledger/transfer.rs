//! Moving money between two accounts of a book.
//!
//! A transfer is an expense on the source account plus an income on the
//! target account, recorded together. Amounts differ when the accounts use
//! different currencies; no conversion happens here.

use chrono::NaiveDate;
use gemledger_shared::types::{CountryCode, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::entry::{Entry, normalize_amount};
use super::error::LedgerError;
use super::store::{EntryStore, EntryTransaction};
use crate::account::AccountRef;
use crate::book::BookRef;
use crate::tags::{Tag, TagSet};
use crate::user::User;

/// Input for a transfer.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// Account the money leaves.
    pub source: AccountRef,
    /// Amount leaving the source, in its currency.
    pub source_amount: Decimal,
    /// Account the money arrives at.
    pub target: AccountRef,
    /// Amount arriving at the target, in its currency.
    pub target_amount: Decimal,
    /// Date of both entries.
    pub when: NaiveDate,
    /// Base description.
    pub what: String,
    /// Country of both entries.
    pub country: CountryCode,
}

/// The two entries of a recorded transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Expense on the source account.
    pub source: Entry,
    /// Income on the target account.
    pub target: Entry,
}

/// Records transfers.
pub struct TransferService;

impl TransferService {
    /// Records both legs of a transfer in one transaction.
    ///
    /// Descriptions get a `" (source)"` / `" (target)"` suffix and both
    /// entries carry `transfer_tag`.
    ///
    /// # Errors
    ///
    /// - `SameAccountTransfer` if source and target are the same account
    /// - `NonPositiveAmount` if either amount is zero or negative
    /// - `InvalidPrecision` for sub-cent amounts
    /// - `EmptyDescription` if `what` is blank
    /// - `Store` if either leg is a duplicate; nothing is recorded then
    pub fn transfer<S: EntryStore>(
        store: &mut S,
        book: &BookRef,
        who: &User,
        input: TransferInput,
        transfer_tag: &Tag,
    ) -> Result<Transfer, LedgerError> {
        if input.source.id == input.target.id {
            return Err(LedgerError::SameAccountTransfer(input.source.id));
        }
        if input.what.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        let source_amount = positive_amount(input.source_amount)?;
        let target_amount = positive_amount(input.target_amount)?;

        let tags: TagSet = std::iter::once(transfer_tag.clone()).collect();
        let leg = |suffix: &str, account: AccountRef, amount: Decimal, is_income: bool| Entry {
            id: EntryId::new(),
            book: book.clone(),
            who: who.clone(),
            when: input.when,
            what: format!("{} ({suffix})", input.what),
            notes: String::new(),
            account,
            amount,
            is_income,
            tags: tags.clone(),
            country: input.country,
        };
        let transfer = Transfer {
            source: leg("source", input.source.clone(), source_amount, false),
            target: leg("target", input.target.clone(), target_amount, true),
        };

        let mut tx = store.begin()?;
        tx.insert_entry(&transfer.source)?;
        tx.insert_entry(&transfer.target)?;
        tx.commit()?;

        info!(
            book = %book.slug,
            source = %transfer.source.account.slug,
            target = %transfer.target.account.slug,
            when = %input.when,
            "Transfer recorded"
        );
        Ok(transfer)
    }
}

fn positive_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    normalize_amount(amount)
}
