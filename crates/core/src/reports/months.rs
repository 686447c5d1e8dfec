//! Calendar month boundaries of a date range.

use chrono::{Datelike, Months, NaiveDate};

use super::error::ReportError;

/// The calendar months spanned by an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSequencer {
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthSequencer {
    /// Creates a sequencer for `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First-of-month dates of every month in the range, ascending.
    ///
    /// Includes the months containing both `start` and `end`. Each call
    /// starts over.
    #[must_use]
    pub fn iter(&self) -> MonthStarts {
        MonthStarts {
            next: Some(first_of_month(self.start)),
            last: self.end,
        }
    }

    /// Month windows clipped to the range.
    ///
    /// The first window starts at `start` and the last ends at `end`; the
    /// others cover whole calendar months. Together they cover the range
    /// exactly once.
    pub fn windows(&self) -> impl Iterator<Item = (NaiveDate, NaiveDate)> + '_ {
        self.iter().map(|month| {
            let month_end = month
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(NaiveDate::MAX);
            (month.max(self.start), month_end.min(self.end))
        })
    }
}

impl IntoIterator for &MonthSequencer {
    type Item = NaiveDate;
    type IntoIter = MonthStarts;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over first-of-month dates. See [`MonthSequencer::iter`].
#[derive(Debug, Clone)]
pub struct MonthStarts {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for MonthStarts {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|month| *month <= self.last)?;
        self.next = current.checked_add_months(Months::new(1));
        Some(current)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
