//! Column encodings.
//!
//! IDs are stored as hyphenated UUID text, dates as `YYYY-MM-DD`, amounts
//! as decimal text with two places and timestamps as RFC 3339.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use gemledger_core::tags::Tag;
use gemledger_shared::types::{CountryCode, Currency};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_amount(amount: Decimal) -> String {
    let mut amount = amount;
    amount.rescale(2);
    amount.to_string()
}

pub(crate) fn id<T>(column: &'static str, value: &str, wrap: fn(Uuid) -> T) -> Result<T, DbError> {
    Uuid::parse_str(value)
        .map(wrap)
        .map_err(|e| DbError::invalid(column, value, e))
}

pub(crate) fn date(column: &'static str, value: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| DbError::invalid(column, value, e))
}

pub(crate) fn amount(column: &'static str, value: &str) -> Result<Decimal, DbError> {
    Decimal::from_str(value).map_err(|e| DbError::invalid(column, value, e))
}

pub(crate) fn currency(column: &'static str, value: &str) -> Result<Currency, DbError> {
    Currency::from_str(value).map_err(|e| DbError::invalid(column, value, e))
}

pub(crate) fn country(column: &'static str, value: &str) -> Result<CountryCode, DbError> {
    CountryCode::parse(value).map_err(|e| DbError::invalid(column, value, e))
}

pub(crate) fn timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DbError::invalid(column, value, e))
}

pub(crate) fn tag(column: &'static str, value: &str) -> Result<Tag, DbError> {
    Tag::parse(value).map_err(|e| DbError::invalid(column, value, e))
}

/// Splits a comma-joined label list; empty or NULL means no labels.
pub(crate) fn labels(value: Option<&str>) -> Vec<&str> {
    value
        .map(|v| v.split(',').filter(|l| !l.is_empty()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemledger_shared::types::EntryId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_is_stored_with_cents() {
        assert_eq!(format_amount(dec!(5)), "5.00");
        assert_eq!(format_amount(dec!(12.5)), "12.50");
        assert_eq!(amount("amount", "12.50").unwrap(), dec!(12.5));
    }

    #[test]
    fn test_date_round_trip() {
        let day = NaiveDate::from_ymd_opt(2016, 2, 29).unwrap();
        assert_eq!(format_date(day), "2016-02-29");
        assert_eq!(date("date", "2016-02-29").unwrap(), day);
    }

    #[test]
    fn test_bad_values_name_the_column() {
        let err = id("id", "nope", EntryId::from_uuid).unwrap_err();
        assert!(matches!(err, DbError::InvalidColumn { column: "id", .. }));
        assert!(date("date", "21/11/2016").is_err());
        assert!(currency("currency", "XXX").is_err());
        assert!(country("country", "ARG").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(labels(Some("food,fun")), vec!["food", "fun"]);
        assert!(labels(Some("")).is_empty());
        assert!(labels(None).is_empty());
    }
}
