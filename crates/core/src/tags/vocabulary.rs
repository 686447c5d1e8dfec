//! The set of tag labels a deployment allows.

use std::collections::BTreeSet;

use gemledger_shared::config::TagConfig;

use super::{Tag, TagError, TagSet};

/// Allowed tag labels, built from configuration.
///
/// Entries and tag rules are validated against a vocabulary before they are
/// stored. Two deployments may use different vocabularies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: BTreeSet<Tag>,
}

impl TagVocabulary {
    /// Builds a vocabulary from labels.
    ///
    /// # Errors
    ///
    /// Returns `TagError::InvalidLabel` for any malformed label.
    pub fn new<I, S>(labels: I) -> Result<Self, TagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = labels
            .into_iter()
            .map(|label| Tag::parse(label.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { tags })
    }

    /// Builds the vocabulary from the `[tags]` configuration section.
    pub fn from_config(config: &TagConfig) -> Result<Self, TagError> {
        Self::new(&config.vocabulary)
    }

    /// Returns the vocabulary tag for `label`.
    ///
    /// # Errors
    ///
    /// `InvalidLabel` for malformed input, `UnknownTag` if the label is not
    /// part of this vocabulary.
    pub fn tag(&self, label: &str) -> Result<Tag, TagError> {
        let tag = Tag::parse(label)?;
        if self.tags.contains(&tag) {
            Ok(tag)
        } else {
            Err(TagError::UnknownTag(tag.0))
        }
    }

    /// Parses several labels into a tag set.
    pub fn tag_set<I, S>(&self, labels: I) -> Result<TagSet, TagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels.into_iter().map(|l| self.tag(l.as_ref())).collect()
    }

    /// Checks that every tag in `tags` belongs to this vocabulary.
    pub fn validate(&self, tags: &TagSet) -> Result<(), TagError> {
        match tags.iter().find(|t| !self.tags.contains(*t)) {
            Some(unknown) => Err(TagError::UnknownTag(unknown.to_string())),
            None => Ok(()),
        }
    }

    /// Returns true if the tag is allowed.
    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Iterates allowed tags in label order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Number of allowed tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if no tag is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagVocabulary {
    fn default() -> Self {
        // Configuration defaults are well-formed labels.
        Self::from_config(&TagConfig::default()).unwrap_or(Self {
            tags: BTreeSet::new(),
        })
    }
}
