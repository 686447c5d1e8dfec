//! Balance report generation.
//!
//! This module provides pure business logic for balance reports:
//! - Month boundaries of a date range
//! - Income/expense aggregation over a window
//! - Whole-range reports with a monthly breakdown and a consistency check
//! - Per-currency reports

pub mod balance;
pub mod error;
pub mod months;
pub mod service;
pub mod types;


pub use balance::BalanceAggregator;
pub use error::ReportError;
pub use months::{MonthSequencer, MonthStarts};
pub use service::BalanceReport;
pub use types::{Balance, MonthlyBalance};
