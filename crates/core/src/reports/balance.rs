//! Summing entries over a date window.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::Balance;
use crate::ledger::Entry;

/// Sums entry amounts into income, expense and result.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Aggregates the entries dated within `start..=end`.
    ///
    /// Entries outside the window are ignored; an empty window gives zero
    /// totals. Pure decimal arithmetic, exact to the cent.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidRange` if `start > end`.
    pub fn aggregate<'a, I>(entries: I, start: NaiveDate, end: NaiveDate) -> Result<Balance, ReportError>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        if start > end {
            return Err(ReportError::InvalidRange { start, end });
        }

        let (income, expense) = entries
            .into_iter()
            .filter(|e| (start..=end).contains(&e.when))
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), e| {
                if e.is_income {
                    (income + e.amount, expense)
                } else {
                    (income, expense + e.amount)
                }
            });

        Ok(Balance {
            start,
            end,
            income,
            expense,
            result: income - expense,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::book::Book;
    use crate::ledger::NewEntry;
    use crate::tags::{TagSet, TagVocabulary};
    use crate::user::User;
    use gemledger_shared::types::{CountryCode, Currency};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entries(rows: &[(NaiveDate, Decimal, bool)]) -> Vec<Entry> {
        let book = Book::new("Home", None).unwrap();
        let account = Account::new("Cash", None, Currency::Gbp).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, (when, amount, is_income))| {
                NewEntry {
                    book: book.reference(),
                    who: User::new("alice"),
                    when: *when,
                    what: format!("row {i}"),
                    notes: String::new(),
                    account: account.reference(),
                    amount: *amount,
                    is_income: *is_income,
                    tags: TagSet::new(),
                    country: CountryCode::parse("GB").unwrap(),
                }
                .into_entry(&TagVocabulary::default())
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_partitions_by_direction() {
        let entries = entries(&[
            (date(2020, 1, 1), dec!(100.10), true),
            (date(2020, 1, 2), dec!(30.05), false),
            (date(2020, 1, 3), dec!(0.10), false),
            (date(2020, 1, 4), dec!(0.20), false),
        ]);

        let balance = BalanceAggregator::aggregate(&entries, date(2020, 1, 1), date(2020, 1, 31)).unwrap();

        assert_eq!(balance.income, dec!(100.10));
        assert_eq!(balance.expense, dec!(30.35));
        assert_eq!(balance.result, dec!(69.75));
    }

    #[test]
    fn test_window_is_inclusive() {
        let entries = entries(&[
            (date(2020, 1, 31), dec!(1), true),
            (date(2020, 2, 1), dec!(2), true),
            (date(2020, 2, 29), dec!(4), true),
            (date(2020, 3, 1), dec!(8), true),
        ]);

        let balance = BalanceAggregator::aggregate(&entries, date(2020, 2, 1), date(2020, 2, 29)).unwrap();
        assert_eq!(balance.income, dec!(6.00));
        assert_eq!(balance.expense, Decimal::ZERO);
    }

    #[test]
    fn test_empty_window_is_zero() {
        let entries = entries(&[(date(2020, 1, 1), dec!(5), false)]);
        let balance = BalanceAggregator::aggregate(&entries, date(2021, 1, 1), date(2021, 1, 2)).unwrap();
        assert_eq!(balance, Balance::zero(date(2021, 1, 1), date(2021, 1, 2)));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let err = BalanceAggregator::aggregate(&Vec::<Entry>::new(), date(2020, 2, 1), date(2020, 1, 1)).unwrap_err();
        assert!(matches!(err, ReportError::InvalidRange { .. }));
    }
}
