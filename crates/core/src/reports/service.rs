//! Balance reports.
//!
//! Pure business logic over an already filtered slice of entries. Nothing
//! here touches a store, so reports can run concurrently on the same data.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gemledger_shared::types::Currency;
use rust_decimal::Decimal;
use tracing::error;

use super::balance::BalanceAggregator;
use super::error::ReportError;
use super::months::MonthSequencer;
use super::types::{Balance, MonthlyBalance};
use crate::ledger::Entry;

/// Whole-range and monthly balance reports.
pub struct BalanceReport;

impl BalanceReport {
    /// Reports the whole range and each calendar month in it.
    ///
    /// `start` and `end` default to the earliest and latest entry dates.
    /// Returns `None` when there are no entries at all, which callers must
    /// tell apart from a zero balance.
    ///
    /// # Errors
    ///
    /// - `InvalidRange` if the effective start is after the effective end
    /// - `InternalInconsistency` if the monthly results do not add up to
    ///   the whole-range result
    pub fn report(
        entries: &[Entry],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<MonthlyBalance>, ReportError> {
        let Some((first, last)) = date_span(entries) else {
            return Ok(None);
        };
        Self::report_range(entries, start.unwrap_or(first), end.unwrap_or(last)).map(Some)
    }

    /// Aggregates exactly `start..=end`, without a monthly split.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidRange` if `start > end`.
    pub fn breakdown(
        entries: &[Entry],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Balance, ReportError> {
        BalanceAggregator::aggregate(entries, start, end)
    }

    /// Reports each currency separately.
    ///
    /// Omitted bounds default to the span of all `entries`, so every
    /// currency gets the same months.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceReport::report`].
    pub fn report_by_currency(
        entries: &[Entry],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<BTreeMap<Currency, MonthlyBalance>, ReportError> {
        let Some((first, last)) = date_span(entries) else {
            return Ok(BTreeMap::new());
        };
        let (start, end) = (start.unwrap_or(first), end.unwrap_or(last));

        let mut groups: BTreeMap<Currency, Vec<&Entry>> = BTreeMap::new();
        for entry in entries {
            groups.entry(entry.currency()).or_default().push(entry);
        }

        groups
            .into_iter()
            .map(|(currency, group)| {
                Self::report_range(group, start, end).map(|report| (currency, report))
            })
            .collect()
    }

    fn report_range<'a, I>(
        entries: I,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MonthlyBalance, ReportError>
    where
        I: IntoIterator<Item = &'a Entry>,
        I::IntoIter: Clone,
    {
        let entries = entries.into_iter();
        let complete = BalanceAggregator::aggregate(entries.clone(), start, end)?;
        let months = MonthSequencer::new(start, end)?
            .windows()
            .map(|(from, to)| BalanceAggregator::aggregate(entries.clone(), from, to))
            .collect::<Result<Vec<_>, _>>()?;

        verify_months(&complete, &months)?;
        Ok(MonthlyBalance { complete, months })
    }
}

/// Checks that the monthly results add up to the whole-range result.
pub(crate) fn verify_months(complete: &Balance, months: &[Balance]) -> Result<(), ReportError> {
    let actual: Decimal = months.iter().map(|m| m.result).sum();
    if actual == complete.result {
        return Ok(());
    }

    error!(
        start = %complete.start,
        end = %complete.end,
        expected = %complete.result,
        actual = %actual,
        months = months.len(),
        "Monthly balances do not add up to the complete balance"
    );
    Err(ReportError::InternalInconsistency {
        start: complete.start,
        end: complete.end,
        expected: complete.result,
        actual,
    })
}

fn date_span(entries: &[Entry]) -> Option<(NaiveDate, NaiveDate)> {
    let first = entries.iter().map(|e| e.when).min()?;
    let last = entries.iter().map(|e| e.when).max()?;
    Some((first, last))
}
