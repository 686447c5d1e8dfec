//! Accounts and their tag rules.
//!
//! - Account and tag rule types
//! - The regex tag classifier
//! - A cache of compiled classifiers
//! - Error types for account configuration

pub mod cache;
pub mod classifier;
pub mod error;
pub mod types;

pub use cache::ClassifierCache;
pub use classifier::{Classification, TagClassifier};
pub use error::AccountError;
pub use types::{Account, AccountRef, TagRule};
