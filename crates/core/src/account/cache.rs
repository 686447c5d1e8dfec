//! Compiled classifier caching using Moka.
//!
//! Importers classify every row of a statement against the same account;
//! compiling the account's regexes once per import instead of once per row
//! matters for large files.

use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use gemledger_shared::types::AccountId;

use super::classifier::TagClassifier;
use super::error::AccountError;
use super::types::{Account, TagRule};

/// Default cache capacity (number of accounts).
const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Default time-to-live for cache entries (10 minutes).
const DEFAULT_TTL_SECS: u64 = 600;

struct CachedClassifier {
    rules: Vec<TagRule>,
    classifier: Arc<TagClassifier>,
}

/// Cache of compiled classifiers keyed by account.
///
/// An entry is reused only while the account's rules (id, regex, tag and
/// transfer target, in order) are unchanged.
#[derive(Clone)]
pub struct ClassifierCache {
    cache: Cache<AccountId, Arc<CachedClassifier>>,
}

impl ClassifierCache {
    /// Creates a cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and time-to-live.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Returns the classifier for `account`, compiling it on a miss.
    pub fn classifier(&self, account: &Account) -> Result<Arc<TagClassifier>, AccountError> {
        if let Some(cached) = self.cache.get(&account.id) {
            if cached.rules == account.rules() {
                return Ok(Arc::clone(&cached.classifier));
            }
        }

        let classifier = Arc::new(account.classifier()?);
        self.cache.insert(
            account.id,
            Arc::new(CachedClassifier {
                rules: account.rules().to_vec(),
                classifier: Arc::clone(&classifier),
            }),
        );
        Ok(classifier)
    }

    /// Drops the cached classifier of an account.
    pub fn invalidate(&self, account_id: AccountId) {
        self.cache.invalidate(&account_id);
    }

    /// Returns true if a classifier is cached for the account.
    #[must_use]
    pub fn contains(&self, account_id: AccountId) -> bool {
        self.cache.contains_key(&account_id)
    }
}

impl Default for ClassifierCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{Tag, TagVocabulary};
    use gemledger_shared::types::Currency;

    fn account() -> Account {
        let mut account = Account::new("Cash", None, Currency::Uyu).unwrap();
        account
            .add_rule(&TagVocabulary::default(), "^SUPER", "food", None)
            .unwrap();
        account
    }

    #[test]
    fn test_hit_returns_same_classifier() {
        let cache = ClassifierCache::new();
        let account = account();

        let first = cache.classifier(&account).unwrap();
        let second = cache.classifier(&account).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains(account.id));
    }

    #[test]
    fn test_rule_change_recompiles() {
        let cache = ClassifierCache::new();
        let mut account = account();
        let before = cache.classifier(&account).unwrap();

        account
            .add_rule(&TagVocabulary::default(), "^RENT", "rent", None)
            .unwrap();
        let after = cache.classifier(&account).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 2);
        assert!(after
            .classify("RENT MAY")
            .contains_key(&Tag::parse("rent").unwrap()));
    }

    #[test]
    fn test_edited_rule_with_same_id_recompiles() {
        let cache = ClassifierCache::new();
        let account = account();
        let before = cache.classifier(&account).unwrap();

        let mut rules = account.rules().to_vec();
        rules[0].regex = "^FARMACIA".to_string();
        rules[0].tag = Tag::parse("health").unwrap();
        let edited = Account::from_parts(
            account.id,
            account.slug.clone(),
            account.name.clone(),
            account.currency(),
            rules,
        );
        let after = cache.classifier(&edited).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert!(after.classify("SUPERMARKET").is_empty());
        assert!(after
            .classify("FARMACIA CENTRAL")
            .contains_key(&Tag::parse("health").unwrap()));
    }

    #[test]
    fn test_invalidate() {
        let cache = ClassifierCache::new();
        let account = account();
        let first = cache.classifier(&account).unwrap();

        cache.invalidate(account.id);
        let second = cache.classifier(&account).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
