//! Account and tag rule types.

use gemledger_shared::types::{AccountId, Currency, TagRuleId};
use serde::{Deserialize, Serialize};

use super::classifier::TagClassifier;
use super::error::AccountError;
use crate::slug::slugify;
use crate::tags::{Tag, TagVocabulary};
use crate::user::User;

/// The parts of an account an entry needs to carry around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRef {
    /// The account ID.
    pub id: AccountId,
    /// The account slug.
    pub slug: String,
    /// The account currency, fixed at creation.
    pub currency: Currency,
}

/// An ordered regex rule mapping descriptions to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// The rule ID.
    pub id: TagRuleId,
    /// Regular expression matched against the start of a description.
    pub regex: String,
    /// Tag assigned on match.
    pub tag: Tag,
    /// Counterpart account when a match represents a transfer.
    pub transfer: Option<AccountId>,
}

/// A money account, denominated in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// Unique slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Currency, fixed at creation.
    currency: Currency,
    /// Users allowed to record against this account.
    pub users: Vec<User>,
    /// Tag rules in evaluation order.
    rules: Vec<TagRule>,
    /// Inactive accounts are kept for history but hidden from pickers.
    pub is_active: bool,
    /// Identifier of the external CSV importer for this account, if any.
    pub parser: Option<String>,
}

impl Account {
    /// Creates an active account with no rules.
    ///
    /// When `slug` is `None` it is derived from `name`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::EmptySlug` if no usable slug results.
    pub fn new(name: &str, slug: Option<&str>, currency: Currency) -> Result<Self, AccountError> {
        let slug = slug.map_or_else(|| slugify(name), str::to_string);
        if slug.is_empty() {
            return Err(AccountError::EmptySlug(name.to_string()));
        }

        Ok(Self {
            id: AccountId::new(),
            slug,
            name: name.to_string(),
            currency,
            users: Vec::new(),
            rules: Vec::new(),
            is_active: true,
            parser: None,
        })
    }

    /// Rebuilds an account from stored parts, keeping rule order.
    #[must_use]
    pub fn from_parts(
        id: AccountId,
        slug: String,
        name: String,
        currency: Currency,
        rules: Vec<TagRule>,
    ) -> Self {
        Self {
            id,
            slug,
            name,
            currency,
            users: Vec::new(),
            rules,
            is_active: true,
            parser: None,
        }
    }

    /// The account currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Tag rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    /// Returns the reference carried by entries.
    #[must_use]
    pub fn reference(&self) -> AccountRef {
        AccountRef {
            id: self.id,
            slug: self.slug.clone(),
            currency: self.currency,
        }
    }

    /// Appends a tag rule after the existing ones.
    ///
    /// # Errors
    ///
    /// - `Tag` if the tag is outside the vocabulary
    /// - `InvalidPattern` if the regex does not compile
    /// - `DuplicateRule` if (regex, tag) is already present
    /// - `SelfTransfer` if the transfer account is this account
    pub fn add_rule(
        &mut self,
        vocabulary: &TagVocabulary,
        regex: &str,
        tag: &str,
        transfer: Option<AccountId>,
    ) -> Result<&TagRule, AccountError> {
        let tag = vocabulary.tag(tag)?;
        TagClassifier::compile(regex)?;

        if self.rules.iter().any(|r| r.regex == regex && r.tag == tag) {
            return Err(AccountError::DuplicateRule {
                account: self.slug.clone(),
                regex: regex.to_string(),
                tag: tag.to_string(),
            });
        }
        if transfer == Some(self.id) {
            return Err(AccountError::SelfTransfer(self.slug.clone()));
        }

        self.rules.push(TagRule {
            id: TagRuleId::new(),
            regex: regex.to_string(),
            tag,
            transfer,
        });
        Ok(&self.rules[self.rules.len() - 1])
    }

    /// Removes a rule, returning it if it existed.
    pub fn remove_rule(&mut self, id: TagRuleId) -> Option<TagRule> {
        let index = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(index))
    }

    /// Compiles this account's rules into a classifier.
    pub fn classifier(&self) -> Result<TagClassifier, AccountError> {
        TagClassifier::new(&self.rules)
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.users.as_slice() {
            [only] => write!(f, "{} {} {}", self.currency, only.username, self.name),
            _ => write!(f, "{} shared {}", self.currency, self.name),
        }
    }
}
