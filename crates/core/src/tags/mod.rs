//! Tag labels, tag sets and the configured tag vocabulary.
//!
//! An entry carries an unordered set of tags. Which labels exist is decided
//! by deployment configuration and handed around as a [`TagVocabulary`].

pub mod vocabulary;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use vocabulary::TagVocabulary;

/// Errors for tag parsing and vocabulary checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The label is empty or contains whitespace/commas.
    #[error("Invalid tag label: {0:?}")]
    InvalidLabel(String),

    /// The label is well-formed but not part of the configured vocabulary.
    #[error("Unknown tag: {0}")]
    UnknownTag(String),
}

/// A normalized tag label (lower-case, no whitespace or commas).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Parses and normalizes a label.
    ///
    /// This only checks the shape of the label; membership in a vocabulary is
    /// checked by [`TagVocabulary::tag`].
    pub fn parse(label: &str) -> Result<Self, TagError> {
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() || normalized.chars().any(|c| c.is_whitespace() || c == ',') {
            return Err(TagError::InvalidLabel(label.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Returns the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Tag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

/// An unordered set of tags, iterated in label order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag, returning false if it was already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    /// Returns true if the tag is present.
    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Adds every tag of `other`.
    pub fn extend_from(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Returns the union of two sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Iterates tags in label order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set has no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels in order, for denormalized snapshots.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::collections::btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
