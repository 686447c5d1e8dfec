//! Database seeder for Gemledger development and testing.
//!
//! Seeds two users, a shared `home` book, an ARS cash account and a USD
//! card with tag rules, a few months of entries and one transfer.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use gemledger_core::User;
use gemledger_core::account::{Account, ClassifierCache};
use gemledger_core::book::Book;
use gemledger_core::ledger::{EntryStore, LedgerService, NewEntry, TransferInput, TransferService};
use gemledger_core::tags::{TagSet, TagVocabulary};
use gemledger_db::{AccountRepository, BookRepository, UserRepository};
use gemledger_shared::types::{CountryCode, Currency};
use gemledger_shared::{AppConfig, logging};
use rust_decimal::Decimal;
use tracing::info;

/// (date, description, amount, is income) recorded on the cash account.
const CASH_ENTRIES: &[(&str, &str, &str, bool)] = &[
    ("2016-09-01", "Sueldo septiembre", "45000.00", true),
    ("2016-09-03", "Super Devoto", "1830.50", false),
    ("2016-09-10", "Alquiler", "12000.00", false),
    ("2016-10-01", "Sueldo octubre", "45000.00", true),
    ("2016-10-08", "Super Devoto", "2100.00", false),
    ("2016-10-10", "Alquiler", "12000.00", false),
    ("2016-10-22", "Cine", "420.00", false),
    ("2016-11-01", "Sueldo noviembre", "45000.00", true),
    ("2016-11-10", "Alquiler", "12000.00", false),
    ("2016-11-21", "Farmacia", "310.25", false),
];

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging).map_err(|e| anyhow!(e))?;

    let vocabulary = TagVocabulary::from_config(&config.tags)?;
    let transfer_tag = vocabulary.tag(&config.tags.transfer_tag)?;

    let mut store = gemledger_db::connect(&config.database.path)?;

    if BookRepository::new(store.connection())
        .find_by_slug("home")?
        .is_some()
    {
        println!("Book 'home' already exists, skipping...");
        return Ok(());
    }

    println!("Seeding users...");
    let alice = User::new("alice");
    let bob = User::new("bob");
    let users = UserRepository::new(store.connection());
    users.create(&alice)?;
    users.create(&bob)?;

    println!("Seeding book...");
    let mut home = Book::new("Home", None)?;
    home.add_user(alice.clone());
    home.add_user(bob.clone());
    BookRepository::new(store.connection()).create(&home)?;

    println!("Seeding accounts...");
    let mut visa = Account::new("Visa", None, Currency::Usd)?;
    visa.users.push(alice.clone());
    let mut cash = Account::new("Cash", None, Currency::Ars)?;
    cash.users = vec![alice.clone(), bob.clone()];
    cash.add_rule(&vocabulary, "Super", "food", None)?;
    cash.add_rule(&vocabulary, "Alquiler", "rent", None)?;
    cash.add_rule(&vocabulary, "Cine", "fun", None)?;
    cash.add_rule(&vocabulary, "Farmacia", "health", None)?;
    cash.add_rule(&vocabulary, "Compra USD", "change", Some(visa.id))?;
    let accounts = AccountRepository::new(store.connection());
    accounts.create(&visa)?;
    accounts.create(&cash)?;

    println!("Seeding entries...");
    let cache = ClassifierCache::new();
    let classifier = cache.classifier(&cash)?;
    let argentina = CountryCode::parse("AR").map_err(|e| anyhow!(e))?;

    for (when, what, amount, is_income) in CASH_ENTRIES {
        let tags: TagSet = classifier.classify(what).into_keys().collect();
        let entry = LedgerService::record(
            &mut store,
            &vocabulary,
            NewEntry {
                book: home.reference(),
                who: alice.clone(),
                when: NaiveDate::from_str(when)?,
                what: (*what).to_string(),
                notes: String::new(),
                account: cash.reference(),
                amount: Decimal::from_str(amount)?,
                is_income: *is_income,
                tags,
                country: argentina,
            },
        )?;
        info!(entry_id = %entry.id, what = %entry.what, "Seeded entry");
    }

    println!("Seeding transfer...");
    TransferService::transfer(
        &mut store,
        &home.reference(),
        &bob,
        TransferInput {
            source: visa.reference(),
            source_amount: Decimal::from_str("100.00")?,
            target: cash.reference(),
            target_amount: Decimal::from_str("1520.00")?,
            when: NaiveDate::from_str("2016-11-15")?,
            what: "Compra USD".to_string(),
            country: argentina,
        },
        &transfer_tag,
    )?;

    println!("Seeding complete! {} entries stored", store.entry_count()?);
    Ok(())
}
