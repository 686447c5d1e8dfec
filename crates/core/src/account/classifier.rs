//! Regex tag classification.
//!
//! Evaluates an account's rules, in stored order, against the start of an
//! entry description.

use std::collections::BTreeMap;

use gemledger_shared::types::AccountId;
use regex::Regex;
use tracing::debug;

use super::error::AccountError;
use super::types::TagRule;
use crate::tags::Tag;

/// Result of a classification: tag -> transfer account, if any.
pub type Classification = BTreeMap<Tag, Option<AccountId>>;

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    tag: Tag,
    transfer: Option<AccountId>,
}

/// Compiled tag rules of one account.
///
/// Patterns match at the start of the description (a prefix match is
/// enough, the whole description does not have to match). Every matching
/// rule contributes its tag; when two rules share a tag the later rule's
/// transfer target wins.
#[derive(Debug, Clone, Default)]
pub struct TagClassifier {
    rules: Vec<CompiledRule>,
}

impl TagClassifier {
    /// Compiles rules, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidPattern` for the first pattern that does
    /// not compile.
    pub fn new(rules: &[TagRule]) -> Result<Self, AccountError> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    regex: Self::compile(&rule.regex)?,
                    tag: rule.tag.clone(),
                    transfer: rule.transfer,
                })
            })
            .collect::<Result<Vec<_>, AccountError>>()?;

        Ok(Self { rules })
    }

    /// Compiles a rule pattern anchored at the start of the input.
    pub(crate) fn compile(pattern: &str) -> Result<Regex, AccountError> {
        let invalid = |err: regex::Error| AccountError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        };

        // Validate the pattern on its own so that the anchoring group cannot
        // turn an unbalanced pattern into a valid one.
        Regex::new(pattern).map_err(invalid)?;
        Regex::new(&format!("^(?:{pattern})")).map_err(invalid)
    }

    /// Classifies a description.
    ///
    /// Returns an empty mapping when no rule matches.
    #[must_use]
    pub fn classify(&self, description: &str) -> Classification {
        let mut result = Classification::new();
        for rule in &self.rules {
            if rule.regex.is_match(description) {
                result.insert(rule.tag.clone(), rule.transfer);
            }
        }

        debug!(
            description,
            rules = self.rules.len(),
            matched = result.len(),
            "Classified description"
        );
        result
    }

    /// Number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::tags::TagVocabulary;
    use gemledger_shared::types::Currency;
    use rstest::rstest;

    fn tag(label: &str) -> Tag {
        Tag::parse(label).unwrap()
    }

    fn account_with(rules: &[(&str, &str, Option<AccountId>)]) -> Account {
        let vocabulary = TagVocabulary::default();
        let mut account = Account::new("Checking", None, Currency::Ars).unwrap();
        for (regex, tag, transfer) in rules {
            account.add_rule(&vocabulary, regex, tag, *transfer).unwrap();
        }
        account
    }

    #[test]
    fn test_independent_tags_are_both_kept() {
        let other = AccountId::new();
        let account = account_with(&[("^SUPER.*", "food", None), ("^SUPER.*", "rent", Some(other))]);

        let result = account.classifier().unwrap().classify("SUPERMARKET");

        let expected: Classification = [(tag("food"), None), (tag("rent"), Some(other))]
            .into_iter()
            .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_later_rule_with_same_tag_wins() {
        let first = AccountId::new();
        let second = AccountId::new();
        let account = account_with(&[
            ("^ATM", "withdraw", Some(first)),
            ("^ATM BANK", "withdraw", Some(second)),
        ]);

        let result = account.classifier().unwrap().classify("ATM BANK 123");
        assert_eq!(result.len(), 1);
        assert_eq!(result[&tag("withdraw")], Some(second));

        // Only the first rule matches here.
        let result = account.classifier().unwrap().classify("ATM OTHER");
        assert_eq!(result[&tag("withdraw")], Some(first));
    }

    #[rstest]
    #[case("SUPERMARKET", true)]
    #[case("SUPER", true)]
    #[case("THE SUPERMARKET", false)]
    #[case("super", false)]
    #[case("", false)]
    fn test_match_is_anchored_at_start(#[case] description: &str, #[case] matches: bool) {
        let account = account_with(&[("SUPER", "food", None)]);
        let result = account.classifier().unwrap().classify(description);
        assert_eq!(result.contains_key(&tag("food")), matches);
    }

    #[test]
    fn test_prefix_match_is_enough() {
        let account = account_with(&[("UBER", "car", None)]);
        let result = account.classifier().unwrap().classify("UBER TRIP 23/11 HELP.UBER.COM");
        assert!(result.contains_key(&tag("car")));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let account = account_with(&[("GAS|POWER", "utilities", None)]);
        let classifier = account.classifier().unwrap();
        assert!(!classifier.classify("POWER CO").is_empty());
        assert!(classifier.classify("MY POWER CO").is_empty());
    }

    #[test]
    fn test_inline_flags_are_honoured() {
        let account = account_with(&[("(?i)farmacia", "health", None)]);
        let result = account.classifier().unwrap().classify("FARMACIA CENTRAL");
        assert!(result.contains_key(&tag("health")));
    }

    #[test]
    fn test_no_rules_gives_empty_mapping() {
        let account = account_with(&[]);
        let classifier = account.classifier().unwrap();
        assert!(classifier.is_empty());
        assert!(classifier.classify("ANYTHING").is_empty());
    }

    #[test]
    fn test_no_match_gives_empty_mapping() {
        let account = account_with(&[("^RENT", "rent", None)]);
        assert!(account.classifier().unwrap().classify("SUPERMARKET").is_empty());
    }

    #[test]
    fn test_unbalanced_pattern_is_rejected() {
        assert!(matches!(
            TagClassifier::compile("a)(b"),
            Err(AccountError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let account = account_with(&[
            ("^SUPER", "food", None),
            ("^SUPER", "fun", None),
            ("^SUPERM", "house", None),
        ]);
        let classifier = account.classifier().unwrap();
        let first = classifier.classify("SUPERMARKET");
        for _ in 0..10 {
            assert_eq!(classifier.classify("SUPERMARKET"), first);
        }
        assert_eq!(first.len(), 3);
    }
}
