//! Property-based tests for EntryMerger.
//!
//! - The merged amount is the net of the sources
//! - The default description does not depend on input order
//! - Dry runs never change the store

use chrono::NaiveDate;
use gemledger_shared::types::{CountryCode, Currency};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::{Entry, NewEntry};
use super::memory::MemoryStore;
use super::merge::{EntryMerger, MergeOptions};
use super::store::EntryStore;
use crate::account::Account;
use crate::book::{Book, BookRef};
use crate::tags::{TagSet, TagVocabulary};
use crate::user::User;

/// Strategy to generate (amount, `is_income`) pairs, amounts 0.00 to 1,000.00.
fn source_strategy() -> impl Strategy<Value = Vec<(Decimal, bool)>> {
    prop::collection::vec(
        ((0i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2)), any::<bool>()),
        2..8,
    )
}

/// Helper to build entries of one book, account and country.
fn make_entries(sources: &[(Decimal, bool)]) -> (BookRef, Vec<Entry>) {
    let vocabulary = TagVocabulary::default();
    let book = Book::new("Home", None).unwrap().reference();
    let account = Account::new("Cash", None, Currency::Eur).unwrap().reference();
    let who = User::new("alice");

    let entries = sources
        .iter()
        .enumerate()
        .map(|(i, (amount, is_income))| {
            NewEntry {
                book: book.clone(),
                who: who.clone(),
                when: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
                what: format!("item {i}"),
                notes: String::new(),
                account: account.clone(),
                amount: *amount,
                is_income: *is_income,
                tags: TagSet::new(),
                country: CountryCode::parse("ES").unwrap(),
            }
            .into_entry(&vocabulary)
            .unwrap()
        })
        .collect();
    (book, entries)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_merged_amount_is_net_of_sources(sources in source_strategy()) {
        let (book, entries) = make_entries(&sources);
        let net: Decimal = entries.iter().map(Entry::signed_amount).sum();

        let merged = EntryMerger::prepare(&book, &entries, &MergeOptions::default()).unwrap();

        prop_assert!(!merged.amount.is_sign_negative());
        prop_assert_eq!(merged.amount, net.abs());
        prop_assert_eq!(merged.is_income, net > Decimal::ZERO);
        prop_assert_eq!(
            merged.signed_amount(),
            net,
            "Merged signed amount must equal the net of the sources"
        );
    }

    #[test]
    fn prop_description_is_order_independent(sources in source_strategy()) {
        let (_, entries) = make_entries(&sources);
        let mut reversed = entries.clone();
        reversed.reverse();

        prop_assert_eq!(
            EntryMerger::merged_description(&entries),
            EntryMerger::merged_description(&reversed)
        );
    }

    #[test]
    fn prop_dry_run_keeps_store_unchanged(sources in source_strategy()) {
        let (book, entries) = make_entries(&sources);
        let mut store = MemoryStore::with_entries(entries.clone()).unwrap();
        let options = MergeOptions { dry_run: true, ..MergeOptions::default() };

        let outcome = EntryMerger::merge(&mut store, &book, &entries, &options).unwrap();

        prop_assert!(!outcome.committed);
        prop_assert_eq!(store.entry_count().unwrap(), entries.len());
        prop_assert!(store.history().unwrap().is_empty());
    }
}
