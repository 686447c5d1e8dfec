//! Report error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// The monthly results do not add up to the whole-range result.
    ///
    /// Always a defect in the month boundaries, never bad input.
    #[error(
        "Monthly results for {start}..{end} add up to {actual}, whole range gives {expected}"
    )]
    InternalInconsistency {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
        /// Whole-range result.
        expected: Decimal,
        /// Sum of the monthly results.
        actual: Decimal,
    },
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::InternalInconsistency { .. } => "INTERNAL_INCONSISTENCY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidRange { .. } => 400,
            Self::InternalInconsistency { .. } => 500,
        }
    }
}

impl From<ReportError> for gemledger_shared::AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidRange { .. } => Self::Validation(err.to_string()),
            ReportError::InternalInconsistency { .. } => Self::Internal(err.to_string()),
        }
    }
}
