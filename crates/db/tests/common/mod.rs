//! Shared fixture for database integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use gemledger_core::User;
use gemledger_core::account::Account;
use gemledger_core::book::Book;
use gemledger_core::ledger::NewEntry;
use gemledger_core::tags::{TagSet, TagVocabulary};
use gemledger_db::{AccountRepository, BookRepository, SqliteStore, UserRepository};
use gemledger_shared::types::{CountryCode, Currency};
use rust_decimal::Decimal;

/// A migrated in-memory store with two users, a book and two accounts.
pub struct Fixture {
    pub store: SqliteStore,
    pub vocabulary: TagVocabulary,
    pub alice: User,
    pub bob: User,
    pub home: Book,
    pub cash: Account,
    pub visa: Account,
}

impl Fixture {
    pub fn new() -> Self {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        let vocabulary = TagVocabulary::default();

        let alice = User::new("alice");
        let bob = User::new("bob");
        let mut home = Book::new("Home", None).unwrap();
        home.add_user(alice.clone());
        home.add_user(bob.clone());

        let mut cash = Account::new("Cash", None, Currency::Ars).unwrap();
        cash.users.push(alice.clone());
        cash.add_rule(&vocabulary, "Super", "food", None).unwrap();
        let visa = Account::new("Visa", None, Currency::Usd).unwrap();

        let conn = store.connection();
        UserRepository::new(conn).create(&alice).unwrap();
        UserRepository::new(conn).create(&bob).unwrap();
        BookRepository::new(conn).create(&home).unwrap();
        AccountRepository::new(conn).create(&cash).unwrap();
        AccountRepository::new(conn).create(&visa).unwrap();

        Self {
            store,
            vocabulary,
            alice,
            bob,
            home,
            cash,
            visa,
        }
    }

    pub fn input(&self, what: &str, amount: Decimal, is_income: bool) -> NewEntry {
        NewEntry {
            book: self.home.reference(),
            who: self.alice.clone(),
            when: date(2016, 11, 21),
            what: what.to_string(),
            notes: String::new(),
            account: self.cash.reference(),
            amount,
            is_income,
            tags: TagSet::new(),
            country: country("AR"),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn country(code: &str) -> CountryCode {
    CountryCode::parse(code).unwrap()
}
