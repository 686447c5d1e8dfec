//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income, expense and net result over an inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
    /// Sum of income amounts.
    pub income: Decimal,
    /// Sum of expense amounts.
    pub expense: Decimal,
    /// `income - expense`.
    pub result: Decimal,
}

impl Balance {
    /// A balance with every total at zero.
    #[must_use]
    pub const fn zero(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            result: Decimal::ZERO,
        }
    }
}

/// A whole-range balance plus its month-by-month breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    /// The whole range.
    pub complete: Balance,
    /// One balance per calendar month, ascending.
    pub months: Vec<Balance>,
}
