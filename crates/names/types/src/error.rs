//! Type construction errors

use thiserror::Error;

/// Errors raised while constructing or parsing registry value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("amount overflow")]
    AmountOverflow,

    #[error("invalid namespace '{0}'")]
    InvalidNamespace(String),

    #[error("invalid price schedule: {0}")]
    InvalidPriceSchedule(String),
}
