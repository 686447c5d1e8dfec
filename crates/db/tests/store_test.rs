//! Integration tests for the `SQLite` entry store.
//!
//! Every test runs the core ledger services against a fresh in-memory
//! database, so the SQL paths see the same calls as production.

mod common;

use common::{Fixture, country, date};
use gemledger_core::ledger::{
    EntryMerger, EntryStore, EntryTransaction, HistoryReason, LedgerError, LedgerService,
    MergeOptions, StoreError, TransferInput, TransferService,
};
use gemledger_core::reports::BalanceReport;
use gemledger_shared::types::EntryId;
use rust_decimal_macros::dec;

// ============================================================================
// Recording
// ============================================================================

#[test]
fn test_record_round_trips_through_sqlite() {
    let mut fx = Fixture::new();
    let mut input = fx.input("Super Devoto", dec!(12.5), false);
    input.tags = fx.vocabulary.tag_set(["food", "house"]).unwrap();
    input.notes = "weekly".to_string();

    let entry = LedgerService::record(&mut fx.store, &fx.vocabulary, input).unwrap();

    let stored = fx.store.entry(entry.id).unwrap().unwrap();
    assert_eq!(stored, entry);
    assert_eq!(stored.amount.to_string(), "12.50");
    assert_eq!(stored.tags.labels(), vec!["food", "house"]);
    assert_eq!(fx.store.book_entries(fx.home.id).unwrap(), vec![entry]);
    assert_eq!(fx.store.entry_count().unwrap(), 1);
}

#[test]
fn test_duplicate_entry_is_rejected() {
    let mut fx = Fixture::new();
    {
        let input = fx.input("Rent", dec!(100), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();

    // A different recorder does not make it a different transaction.
    let mut again = fx.input("Rent", dec!(100), false);
    again.who = fx.bob.clone();
    let err = LedgerService::record(&mut fx.store, &fx.vocabulary, again).unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Store(StoreError::DuplicateEntry(_))
    ));
    assert_eq!(fx.store.entry_count().unwrap(), 1);
}

#[test]
fn test_book_entries_are_ordered_by_date() {
    let mut fx = Fixture::new();
    let mut late = fx.input("Late", dec!(1), false);
    late.when = date(2016, 12, 1);
    let mut early = fx.input("Early", dec!(1), false);
    early.when = date(2016, 1, 1);

    LedgerService::record(&mut fx.store, &fx.vocabulary, late).unwrap();
    LedgerService::record(&mut fx.store, &fx.vocabulary, early).unwrap();

    let whats: Vec<_> = fx
        .store
        .book_entries(fx.home.id)
        .unwrap()
        .into_iter()
        .map(|e| e.what)
        .collect();
    assert_eq!(whats, vec!["Early", "Late"]);
}

#[test]
fn test_dropped_transaction_rolls_back() {
    let mut fx = Fixture::new();
    let entry = fx
        .input("Taxi", dec!(3), false)
        .into_entry(&fx.vocabulary)
        .unwrap();
    {
        let mut tx = fx.store.begin().unwrap();
        tx.insert_entry(&entry).unwrap();
        assert!(tx.entry(entry.id).unwrap().is_some());
    }
    assert_eq!(fx.store.entry_count().unwrap(), 0);
}

// ============================================================================
// Deleting
// ============================================================================

#[test]
fn test_delete_writes_history_first() {
    let mut fx = Fixture::new();
    let mut input = fx.input("Cinema", dec!(8), false);
    input.tags = fx.vocabulary.tag_set(["fun"]).unwrap();
    let entry = LedgerService::record(&mut fx.store, &fx.vocabulary, input).unwrap();

    LedgerService::delete(&mut fx.store, entry.id).unwrap();

    assert_eq!(fx.store.entry_count().unwrap(), 0);
    let history = fx.store.history().unwrap();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.book, "home");
    assert_eq!(record.who, "alice");
    assert_eq!(record.account, "cash");
    assert_eq!(record.what, "Cinema");
    assert_eq!(record.amount, dec!(8));
    assert_eq!(record.tags, vec!["fun"]);
    assert_eq!(record.country, country("AR"));
    assert_eq!(record.reason, HistoryReason::Delete);
}

#[test]
fn test_delete_missing_entry_leaves_no_history() {
    let mut fx = Fixture::new();
    let entry = fx
        .input("Ghost", dec!(1), false)
        .into_entry(&fx.vocabulary)
        .unwrap();

    let err = LedgerService::delete(&mut fx.store, entry.id).unwrap_err();

    assert!(matches!(err, LedgerError::Store(StoreError::EntryNotFound(id)) if id == entry.id));
    assert!(fx.store.history().unwrap().is_empty());
}

#[test]
fn test_history_is_append_only() {
    let mut fx = Fixture::new();
    let entry = {
        let input = fx.input("Bus", dec!(1), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    LedgerService::delete(&mut fx.store, entry.id).unwrap();

    let conn = fx.store.connection();
    assert!(
        conn.execute("UPDATE entry_history SET what = 'x'", [])
            .is_err()
    );
    assert!(conn.execute("DELETE FROM entry_history", []).is_err());
    assert_eq!(fx.store.history().unwrap().len(), 1);
}

// ============================================================================
// Moving entries between accounts
// ============================================================================

#[test]
fn test_change_account_updates_rows() {
    let mut fx = Fixture::new();
    let a = {
        let input = fx.input("A", dec!(1), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let b = {
        let input = fx.input("B", dec!(2), true);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let visa = fx.visa.reference();

    let moved = LedgerService::change_account(&mut fx.store, &[a.id, b.id], &visa).unwrap();

    assert_eq!(moved.len(), 2);
    let stored = fx.store.entry(a.id).unwrap().unwrap();
    assert_eq!(stored.account, visa);
    assert_eq!(stored, moved[0]);
    assert!(fx.store.history().unwrap().is_empty());
}

#[test]
fn test_change_account_collision_rolls_back() {
    let mut fx = Fixture::new();
    let first = {
        let input = fx.input("First", dec!(5), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let groceries = {
        let input = fx.input("Groceries", dec!(3), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let mut on_visa = fx.input("Groceries", dec!(3), false);
    on_visa.account = fx.visa.reference();
    LedgerService::record(&mut fx.store, &fx.vocabulary, on_visa).unwrap();

    let err = LedgerService::change_account(
        &mut fx.store,
        &[first.id, groceries.id],
        &fx.visa.reference(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Store(StoreError::DuplicateEntry(_))
    ));
    assert_eq!(
        fx.store.entry(first.id).unwrap().unwrap().account,
        fx.cash.reference()
    );
    assert_eq!(
        fx.store.entry(groceries.id).unwrap().unwrap().account,
        fx.cash.reference()
    );
}

#[test]
fn test_change_account_missing_entry_rolls_back() {
    let mut fx = Fixture::new();
    let a = {
        let input = fx.input("A", dec!(1), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let missing = EntryId::new();

    let err = LedgerService::change_account(&mut fx.store, &[a.id, missing], &fx.visa.reference())
        .unwrap_err();

    assert!(matches!(err, LedgerError::Store(StoreError::EntryNotFound(id)) if id == missing));
    assert_eq!(
        fx.store.entry(a.id).unwrap().unwrap().account,
        fx.cash.reference()
    );
}

// ============================================================================
// Merging and transfers
// ============================================================================

#[test]
fn test_merge_nets_amounts_and_records_history() {
    let mut fx = Fixture::new();
    let expense = {
        let input = fx.input("A", dec!(10), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let income = {
        let input = fx.input("B", dec!(15), true);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();

    let outcome = EntryMerger::merge(
        &mut fx.store,
        &fx.home.reference(),
        &[expense, income],
        &MergeOptions::default(),
    )
    .unwrap();

    assert!(outcome.committed);
    assert_eq!(outcome.entry.amount, dec!(5));
    assert!(outcome.entry.is_income);
    assert_eq!(fx.store.entry_count().unwrap(), 1);
    assert_eq!(
        fx.store.entry(outcome.entry.id).unwrap(),
        Some(outcome.entry)
    );

    let reasons: Vec<_> = fx
        .store
        .history()
        .unwrap()
        .iter()
        .map(|h| h.reason)
        .collect();
    assert_eq!(reasons, vec![HistoryReason::Merge, HistoryReason::Merge]);
}

#[test]
fn test_merge_dry_run_leaves_database_unchanged() {
    let mut fx = Fixture::new();
    let a = {
        let input = fx.input("A", dec!(1), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let b = {
        let input = fx.input("B", dec!(2), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();
    let before = fx.store.book_entries(fx.home.id).unwrap();

    let options = MergeOptions {
        dry_run: true,
        ..MergeOptions::default()
    };
    let outcome =
        EntryMerger::merge(&mut fx.store, &fx.home.reference(), &[a, b], &options).unwrap();

    assert!(!outcome.committed);
    assert_eq!(outcome.history.len(), 2);
    assert_eq!(fx.store.book_entries(fx.home.id).unwrap(), before);
    assert!(fx.store.history().unwrap().is_empty());
}

#[test]
fn test_transfer_records_both_legs() {
    let mut fx = Fixture::new();
    let change = fx.vocabulary.tag("change").unwrap();
    let input = TransferInput {
        source: fx.visa.reference(),
        source_amount: dec!(100),
        target: fx.cash.reference(),
        target_amount: dec!(1500),
        when: date(2016, 11, 21),
        what: "Exchange".to_string(),
        country: country("AR"),
    };

    let transfer = TransferService::transfer(
        &mut fx.store,
        &fx.home.reference(),
        &fx.alice,
        input,
        &change,
    )
    .unwrap();

    assert_eq!(fx.store.entry_count().unwrap(), 2);
    let source = fx.store.entry(transfer.source.id).unwrap().unwrap();
    assert_eq!(source.what, "Exchange (source)");
    assert!(!source.is_income);
    assert_eq!(source.account.currency, fx.visa.currency());
    let target = fx.store.entry(transfer.target.id).unwrap().unwrap();
    assert!(target.is_income);
    assert!(target.tags.contains(&change));
}

// ============================================================================
// Reports over stored entries
// ============================================================================

#[test]
fn test_report_over_stored_entries() {
    let mut fx = Fixture::new();
    let mut salary = fx.input("Salary", dec!(1000), true);
    salary.when = date(2016, 10, 5);
    LedgerService::record(&mut fx.store, &fx.vocabulary, salary).unwrap();
    {
        let input = fx.input("Rent", dec!(400), false);
        LedgerService::record(&mut fx.store, &fx.vocabulary, input)
    }
    .unwrap();

    let entries = fx.store.book_entries(fx.home.id).unwrap();
    let report = BalanceReport::report(&entries, None, None)
        .unwrap()
        .unwrap();

    assert_eq!(report.months.len(), 2);
    assert_eq!(report.complete.income, dec!(1000));
    assert_eq!(report.complete.expense, dec!(400));
    assert_eq!(report.complete.result, dec!(600));
}
