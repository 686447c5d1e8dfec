//! Account and tag-rule error types.

use thiserror::Error;

use crate::tags::TagError;

/// Errors that can occur while configuring accounts or their tag rules.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The rule pattern is not a valid regular expression.
    #[error("Invalid tag rule pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// The account already has a rule with the same pattern and tag.
    #[error("Account {account} already has rule {regex:?} -> {tag}")]
    DuplicateRule {
        /// Account slug.
        account: String,
        /// Rule pattern.
        regex: String,
        /// Rule tag.
        tag: String,
    },

    /// An account cannot transfer to itself.
    #[error("Tag rule on account {0} cannot transfer to the same account")]
    SelfTransfer(String),

    /// Account name produced an empty slug.
    #[error("Account name {0:?} does not produce a usable slug")]
    EmptySlug(String),

    /// The rule tag is malformed or outside the vocabulary.
    #[error(transparent)]
    Tag(#[from] TagError),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::DuplicateRule { .. } => "DUPLICATE_RULE",
            Self::SelfTransfer(_) => "SELF_TRANSFER",
            Self::EmptySlug(_) => "EMPTY_SLUG",
            Self::Tag(TagError::InvalidLabel(_)) => "INVALID_TAG",
            Self::Tag(TagError::UnknownTag(_)) => "UNKNOWN_TAG",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateRule { .. } => 409,
            _ => 400,
        }
    }
}

impl From<AccountError> for gemledger_shared::AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateRule { .. } => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
