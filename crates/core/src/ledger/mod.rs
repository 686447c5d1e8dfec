//! Ledger entries and the operations that mutate them.
//!
//! This module implements:
//! - Entries and their validation
//! - The entry store contract and an in-memory store
//! - The history recorder (snapshot-then-delete)
//! - Entry merging with dry runs
//! - Account transfers
//! - Error types for ledger operations

pub mod entry;
pub mod error;
pub mod history;
pub mod memory;
pub mod merge;
pub mod service;
pub mod store;
pub mod transfer;

#[cfg(test)]
mod merge_props;

pub use entry::{AMOUNT_SCALE, Entry, EntryKey, MAX_AMOUNT, NewEntry};
pub use error::{LedgerError, StoreError};
pub use history::{EntryHistory, HistoryReason, HistoryReceipt, HistoryRecorder};
pub use memory::{MemoryStore, MemoryTransaction};
pub use merge::{EntryMerger, MergeOptions, MergeOutcome};
pub use service::LedgerService;
pub use store::{EntryStore, EntryTransaction};
pub use transfer::{Transfer, TransferInput, TransferService};
