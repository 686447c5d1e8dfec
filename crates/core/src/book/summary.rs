//! Per-book counts used by the book overview.

use std::collections::BTreeMap;

use chrono::Datelike;
use gemledger_shared::types::CountryCode;
use serde::Serialize;

use crate::ledger::Entry;
use crate::tags::Tag;

/// Entry counts of a book, grouped several ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    /// Entries per tag. An entry with several tags counts once for each.
    pub tags: BTreeMap<Tag, usize>,
    /// Entries per calendar year.
    pub years: BTreeMap<i32, usize>,
    /// Entries per country.
    pub countries: BTreeMap<CountryCode, usize>,
    /// Entries per recorder username.
    pub who: BTreeMap<String, usize>,
}

impl BookSummary {
    /// Counts `entries`.
    #[must_use]
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            for tag in &entry.tags {
                *summary.tags.entry(tag.clone()).or_default() += 1;
            }
            *summary.years.entry(entry.when.year()).or_default() += 1;
            *summary.countries.entry(entry.country).or_default() += 1;
            *summary.who.entry(entry.who.username.clone()).or_default() += 1;
        }
        summary
    }

    /// The `n` most recent entries, newest first.
    #[must_use]
    pub fn latest(entries: &[Entry], n: usize) -> Vec<&Entry> {
        let mut sorted: Vec<&Entry> = entries.iter().collect();
        sorted.sort_by(|a, b| b.when.cmp(&a.when).then(b.id.cmp(&a.id)));
        sorted.truncate(n);
        sorted
    }
}
