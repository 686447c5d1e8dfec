//! Ledger error types for entry validation, merges, transfers and storage.

use gemledger_shared::types::{AccountId, EntryId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::tags::TagError;

/// Errors raised by an entry store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An entry with the same (book, account, when, what, amount, is_income)
    /// already exists.
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// The entry does not exist.
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// The storage backend failed.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::Backend(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateEntry(_) => 409,
            Self::EntryNotFound(_) => 404,
            Self::Backend(_) => 500,
        }
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Entry Validation Errors ==========
    /// Entry amount cannot be negative.
    #[error("Entry amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Entry amount has more than two decimal places.
    #[error("Entry amount must have at most two decimal places: {0}")]
    InvalidPrecision(Decimal),

    /// Entry amount exceeds the twelve-digit limit.
    #[error("Entry amount exceeds 9999999999.99: {0}")]
    AmountTooLarge(Decimal),

    /// Entry description is blank.
    #[error("Entry description cannot be empty")]
    EmptyDescription,

    /// A tag is malformed or outside the vocabulary.
    #[error(transparent)]
    Tag(#[from] TagError),

    // ========== Merge Errors ==========
    /// A merge needs at least two entries.
    #[error("Merge needs at least 2 entries, got {count}")]
    InsufficientEntries {
        /// Number of entries supplied.
        count: usize,
    },

    /// The same entry was listed more than once.
    #[error("Entry {0} is listed more than once")]
    RepeatedMergeEntry(EntryId),

    /// Some entries belong to a different book.
    #[error("Cannot merge entries of book {found} into book {book}")]
    CrossBookMerge {
        /// Slug of the target book.
        book: String,
        /// Slug of the first foreign book found.
        found: String,
    },

    /// Entries span more than one account.
    #[error("Cannot merge entries from different accounts: {}", .accounts.join(", "))]
    CrossAccountMerge {
        /// Distinct account slugs, in first-seen order.
        accounts: Vec<String>,
    },

    /// Entries span more than one country.
    #[error("Cannot merge entries from different countries: {}", .countries.join(", "))]
    CrossCountryMerge {
        /// Distinct country codes, in first-seen order.
        countries: Vec<String>,
    },

    // ========== Transfer Errors ==========
    /// Source and target of a transfer are the same account.
    #[error("Cannot transfer from account {0} to itself")]
    SameAccountTransfer(AccountId),

    /// Transfer amounts must be strictly positive.
    #[error("Transfer amount must be positive: {0}")]
    NonPositiveAmount(Decimal),

    // ========== Store Errors ==========
    /// The entry store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidPrecision(_) => "INVALID_PRECISION",
            Self::AmountTooLarge(_) => "AMOUNT_TOO_LARGE",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::Tag(TagError::InvalidLabel(_)) => "INVALID_TAG",
            Self::Tag(TagError::UnknownTag(_)) => "UNKNOWN_TAG",
            Self::InsufficientEntries { .. } => "INSUFFICIENT_ENTRIES",
            Self::RepeatedMergeEntry(_) => "REPEATED_MERGE_ENTRY",
            Self::CrossBookMerge { .. } => "CROSS_BOOK_MERGE",
            Self::CrossAccountMerge { .. } => "CROSS_ACCOUNT_MERGE",
            Self::CrossCountryMerge { .. } => "CROSS_COUNTRY_MERGE",
            Self::SameAccountTransfer(_) => "SAME_ACCOUNT_TRANSFER",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InsufficientEntries { .. }
            | Self::RepeatedMergeEntry(_)
            | Self::CrossBookMerge { .. }
            | Self::CrossAccountMerge { .. }
            | Self::CrossCountryMerge { .. }
            | Self::SameAccountTransfer(_) => 422,
            Self::Store(err) => err.http_status_code(),
            _ => 400,
        }
    }

    /// Returns true for merge precondition failures.
    #[must_use]
    pub const fn is_merge_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientEntries { .. }
                | Self::RepeatedMergeEntry(_)
                | Self::CrossBookMerge { .. }
                | Self::CrossAccountMerge { .. }
                | Self::CrossCountryMerge { .. }
        )
    }
}

impl From<LedgerError> for gemledger_shared::AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Store(StoreError::DuplicateEntry(_)) => Self::Conflict(err.to_string()),
            LedgerError::Store(StoreError::EntryNotFound(_)) => Self::NotFound(err.to_string()),
            LedgerError::Store(StoreError::Backend(_)) => Self::Database(err.to_string()),
            LedgerError::InsufficientEntries { .. }
            | LedgerError::RepeatedMergeEntry(_)
            | LedgerError::CrossBookMerge { .. }
            | LedgerError::CrossAccountMerge { .. }
            | LedgerError::CrossCountryMerge { .. }
            | LedgerError::SameAccountTransfer(_) => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
