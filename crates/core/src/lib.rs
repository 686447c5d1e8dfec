//! Core ledger engine for Gemledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the [`ledger::EntryStore`] traits.
//!
//! # Modules
//!
//! - `tags` - Tag labels, tag sets and the configured vocabulary
//! - `account` - Accounts, tag rules and the regex tag classifier
//! - `book` - Books (shared ledgers) and per-book summaries
//! - `ledger` - Entries, history, merging, transfers and the store contract
//! - `reports` - Balance aggregation and monthly reports

pub mod account;
pub mod book;
pub mod ledger;
pub mod reports;
pub mod slug;
pub mod tags;
pub mod user;

pub use user::User;
