//! Database error types.

use gemledger_core::ledger::StoreError;
use thiserror::Error;

/// Errors raised by the database layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite reported an error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A schema migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    /// A unique constraint rejected the write.
    #[error("Already exists: {0}")]
    Conflict(String),

    /// A stored value could not be decoded.
    #[error("Invalid value {value:?} in column {column}: {reason}")]
    InvalidColumn {
        /// Column name.
        column: &'static str,
        /// Raw stored value.
        value: String,
        /// Parse failure.
        reason: String,
    },

    /// A referenced row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl DbError {
    /// Builds an `InvalidColumn` error.
    pub(crate) fn invalid(column: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidColumn {
            column,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Maps unique-constraint failures to `Conflict`, keeping other errors.
    pub(crate) fn from_write(err: rusqlite::Error, what: impl FnOnce() -> String) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict(what())
        } else {
            Self::Sqlite(err)
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidColumn { .. } => "CORRUPT_ROW",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Conflict(_) => 409,
            Self::NotFound(_) => 404,
            Self::Sqlite(_) | Self::Migration(_) | Self::InvalidColumn { .. } => 500,
        }
    }
}

/// Returns true if `err` is a UNIQUE or PRIMARY KEY constraint failure.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(what) => Self::DuplicateEntry(what),
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<DbError> for gemledger_shared::AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(_) => Self::Conflict(err.to_string()),
            DbError::NotFound(_) => Self::NotFound(err.to_string()),
            DbError::Sqlite(_) | DbError::Migration(_) | DbError::InvalidColumn { .. } => {
                Self::Database(err.to_string())
            }
        }
    }
}
