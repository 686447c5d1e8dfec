//! Ledger entries.

use chrono::NaiveDate;
use gemledger_shared::types::{AccountId, BookId, CountryCode, Currency, EntryId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::account::AccountRef;
use crate::book::BookRef;
use crate::tags::{TagSet, TagVocabulary};
use crate::user::User;

/// Number of decimal places every stored amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest accepted amount: twelve digits, two of them decimals.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, AMOUNT_SCALE);

/// A ledger line item.
///
/// `amount` is never negative; the direction lives in `is_income`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The entry ID.
    pub id: EntryId,
    /// Owning book.
    pub book: BookRef,
    /// User who recorded the entry.
    pub who: User,
    /// Date of the transaction.
    pub when: NaiveDate,
    /// Free-text description.
    pub what: String,
    /// Free-text notes.
    pub notes: String,
    /// Account the money moved through.
    pub account: AccountRef,
    /// Unsigned amount, scale 2.
    pub amount: Decimal,
    /// True for income, false for expense.
    pub is_income: bool,
    /// Tags.
    pub tags: TagSet,
    /// Country where the transaction happened.
    pub country: CountryCode,
}

impl Entry {
    /// `+amount` for income, `-amount` for expenses.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        if self.is_income {
            self.amount
        } else {
            -self.amount
        }
    }

    /// Signed amount in the account currency.
    #[must_use]
    pub fn money(&self) -> Money {
        Money::signed(self.amount, self.is_income, self.account.currency)
    }

    /// The account currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.account.currency
    }

    /// The identity used to reject recording the same transaction twice.
    #[must_use]
    pub fn key(&self) -> EntryKey {
        EntryKey {
            book: self.book.id,
            account: self.account.id,
            when: self.when,
            what: self.what.clone(),
            amount: self.amount,
            is_income: self.is_income,
        }
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} {}, by {} on {})",
            self.what, self.amount, self.account.slug, self.who, self.when
        )
    }
}

/// Uniqueness key of an entry: (book, account, when, what, amount, is_income).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    /// Book ID.
    pub book: BookId,
    /// Account ID.
    pub account: AccountId,
    /// Entry date.
    pub when: NaiveDate,
    /// Description.
    pub what: String,
    /// Amount, scale 2.
    pub amount: Decimal,
    /// Income flag.
    pub is_income: bool,
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_income { '+' } else { '-' };
        write!(
            f,
            "book {} account {} on {}: {:?} {sign}{}",
            self.book, self.account, self.when, self.what, self.amount
        )
    }
}

/// Input for recording a new entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Owning book.
    pub book: BookRef,
    /// Recording user.
    pub who: User,
    /// Entry date.
    pub when: NaiveDate,
    /// Description.
    pub what: String,
    /// Notes.
    pub notes: String,
    /// Account.
    pub account: AccountRef,
    /// Unsigned amount, at most two decimal places.
    pub amount: Decimal,
    /// Income flag.
    pub is_income: bool,
    /// Tags, checked against the vocabulary.
    pub tags: TagSet,
    /// Country code.
    pub country: CountryCode,
}

impl NewEntry {
    /// Validates the input and assigns a fresh ID.
    ///
    /// # Errors
    ///
    /// - `EmptyDescription` if `what` is blank
    /// - `NegativeAmount` if `amount < 0`
    /// - `InvalidPrecision` if `amount` has more than two decimal places
    /// - `Tag` if a tag is outside the vocabulary
    pub fn into_entry(self, vocabulary: &TagVocabulary) -> Result<Entry, LedgerError> {
        if self.what.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        let amount = normalize_amount(self.amount)?;
        vocabulary.validate(&self.tags)?;

        Ok(Entry {
            id: EntryId::new(),
            book: self.book,
            who: self.who,
            when: self.when,
            what: self.what,
            notes: self.notes,
            account: self.account,
            amount,
            is_income: self.is_income,
            tags: self.tags,
            country: self.country,
        })
    }
}

/// Checks sign, precision and magnitude, then rescales to two decimal places.
pub(crate) fn normalize_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::NegativeAmount(amount));
    }
    if amount.round_dp(AMOUNT_SCALE) != amount {
        return Err(LedgerError::InvalidPrecision(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::AmountTooLarge(amount));
    }

    let mut normalized = amount.abs();
    normalized.rescale(AMOUNT_SCALE);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::book::Book;
    use crate::tags::TagError;
    use rust_decimal_macros::dec;

    fn new_entry(amount: Decimal, is_income: bool) -> NewEntry {
        let book = Book::new("Home", None).unwrap();
        let account = Account::new("Cash", None, Currency::Ars).unwrap();
        NewEntry {
            book: book.reference(),
            who: User::new("alice"),
            when: NaiveDate::from_ymd_opt(2016, 11, 21).unwrap(),
            what: "Groceries".to_string(),
            notes: String::new(),
            account: account.reference(),
            amount,
            is_income,
            tags: TagSet::new(),
            country: CountryCode::parse("AR").unwrap(),
        }
    }

    #[test]
    fn test_signed_amount_and_money() {
        let vocabulary = TagVocabulary::default();
        let expense = new_entry(dec!(10), false).into_entry(&vocabulary).unwrap();
        assert_eq!(expense.signed_amount(), dec!(-10.00));
        assert_eq!(expense.money(), Money::new(dec!(-10.00), Currency::Ars));
        assert_eq!(expense.currency(), Currency::Ars);

        let income = new_entry(dec!(15.5), true).into_entry(&vocabulary).unwrap();
        assert_eq!(income.signed_amount(), dec!(15.50));
    }

    #[test]
    fn test_amount_is_rescaled_to_cents() {
        let entry = new_entry(dec!(7), false)
            .into_entry(&TagVocabulary::default())
            .unwrap();
        assert_eq!(entry.amount.to_string(), "7.00");
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let entry = new_entry(dec!(0), false)
            .into_entry(&TagVocabulary::default())
            .unwrap();
        assert!(entry.amount.is_zero());
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let err = new_entry(dec!(-1.00), false)
            .into_entry(&TagVocabulary::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::NegativeAmount(_)));
    }

    #[test]
    fn test_sub_cent_amount_is_rejected() {
        let err = new_entry(dec!(1.005), false)
            .into_entry(&TagVocabulary::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPrecision(_)));
    }

    #[test]
    fn test_amount_upper_bound() {
        assert_eq!(MAX_AMOUNT, dec!(9999999999.99));

        let entry = new_entry(dec!(9999999999.99), true)
            .into_entry(&TagVocabulary::default())
            .unwrap();
        assert_eq!(entry.amount, MAX_AMOUNT);

        let err = new_entry(dec!(10000000000.00), true)
            .into_entry(&TagVocabulary::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountTooLarge(_)));
        assert_eq!(err.error_code(), "AMOUNT_TOO_LARGE");

        let err = new_entry(dec!(792281625142643375935439503.35), true)
            .into_entry(&TagVocabulary::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountTooLarge(_)));
    }

    #[test]
    fn test_trailing_zero_precision_is_accepted() {
        let entry = new_entry(dec!(1.5000), false)
            .into_entry(&TagVocabulary::default())
            .unwrap();
        assert_eq!(entry.amount.to_string(), "1.50");
    }

    #[test]
    fn test_blank_description_is_rejected() {
        let mut input = new_entry(dec!(1), false);
        input.what = "   ".to_string();
        assert!(matches!(
            input.into_entry(&TagVocabulary::default()),
            Err(LedgerError::EmptyDescription)
        ));
    }

    #[test]
    fn test_tags_outside_vocabulary_are_rejected() {
        let vocabulary = TagVocabulary::new(["food"]).unwrap();
        let mut input = new_entry(dec!(1), false);
        input.tags = TagVocabulary::default().tag_set(["rent"]).unwrap();

        let err = input.into_entry(&vocabulary).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Tag(TagError::UnknownTag(ref t)) if t == "rent"
        ));
    }

    #[test]
    fn test_key_ignores_who_and_tags() {
        let vocabulary = TagVocabulary::default();
        let a = new_entry(dec!(3), false).into_entry(&vocabulary).unwrap();
        let mut b = a.clone();
        b.id = EntryId::new();
        b.who = User::new("bob");
        b.tags = vocabulary.tag_set(["food"]).unwrap();
        assert_eq!(a.key(), b.key());

        b.is_income = true;
        assert_ne!(a.key(), b.key());
    }
}
