//! Registry error types

use names_types::{Amount, Identity, TypeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry errors
///
/// Every variant except `Corrupt` is an ordinary, user-facing outcome: the
/// call failed and registry state is exactly what it was before the call.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("name '{name}' is too short: minimum length is {min_length}")]
    NameTooShort { name: String, min_length: usize },

    #[error("name '{0}' is already taken")]
    NameAlreadyTaken(String),

    #[error("insufficient payment: {required} required, {attached} attached")]
    InsufficientPayment { required: Amount, attached: Amount },

    #[error("name '{0}' not found")]
    NameNotFound(String),

    #[error("{caller} is not the owner of '{name}'")]
    NotOwner { name: String, caller: Identity },

    #[error("{0} is not authorized to withdraw")]
    NotAuthorized(Identity),

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("amount overflow")]
    AmountOverflow,

    #[error("value transfer failed: {0}")]
    TransferFailed(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("persisted registry state is corrupt: {0}")]
    Corrupt(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Distinguishable error kind, for callers that branch on the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryErrorKind {
    NameTooShort,
    NameAlreadyTaken,
    InsufficientPayment,
    NameNotFound,
    NotOwner,
    NotAuthorized,
    NothingToWithdraw,
    InvalidIdentity,
    AmountOverflow,
    TransferFailed,
    Storage,
    Corrupt,
    Config,
}

impl RegistryError {
    pub fn kind(&self) -> RegistryErrorKind {
        match self {
            RegistryError::NameTooShort { .. } => RegistryErrorKind::NameTooShort,
            RegistryError::NameAlreadyTaken(_) => RegistryErrorKind::NameAlreadyTaken,
            RegistryError::InsufficientPayment { .. } => RegistryErrorKind::InsufficientPayment,
            RegistryError::NameNotFound(_) => RegistryErrorKind::NameNotFound,
            RegistryError::NotOwner { .. } => RegistryErrorKind::NotOwner,
            RegistryError::NotAuthorized(_) => RegistryErrorKind::NotAuthorized,
            RegistryError::NothingToWithdraw => RegistryErrorKind::NothingToWithdraw,
            RegistryError::InvalidIdentity(_) => RegistryErrorKind::InvalidIdentity,
            RegistryError::AmountOverflow => RegistryErrorKind::AmountOverflow,
            RegistryError::TransferFailed(_) => RegistryErrorKind::TransferFailed,
            RegistryError::Storage(_) => RegistryErrorKind::Storage,
            RegistryError::Corrupt(_) => RegistryErrorKind::Corrupt,
            RegistryError::Config(_) => RegistryErrorKind::Config,
        }
    }

    /// Only a corrupt durable store is fatal to the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RegistryError::Corrupt(_))
    }
}

impl std::fmt::Display for RegistryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RegistryErrorKind::NameTooShort => "NameTooShort",
            RegistryErrorKind::NameAlreadyTaken => "NameAlreadyTaken",
            RegistryErrorKind::InsufficientPayment => "InsufficientPayment",
            RegistryErrorKind::NameNotFound => "NameNotFound",
            RegistryErrorKind::NotOwner => "NotOwner",
            RegistryErrorKind::NotAuthorized => "NotAuthorized",
            RegistryErrorKind::NothingToWithdraw => "NothingToWithdraw",
            RegistryErrorKind::InvalidIdentity => "InvalidIdentity",
            RegistryErrorKind::AmountOverflow => "AmountOverflow",
            RegistryErrorKind::TransferFailed => "TransferFailed",
            RegistryErrorKind::Storage => "Storage",
            RegistryErrorKind::Corrupt => "Corrupt",
            RegistryErrorKind::Config => "Config",
        };
        f.write_str(label)
    }
}

impl From<TypeError> for RegistryError {
    fn from(value: TypeError) -> Self {
        match value {
            TypeError::InvalidIdentity(msg) => Self::InvalidIdentity(msg),
            TypeError::AmountOverflow => Self::AmountOverflow,
            other => Self::Config(other.to_string()),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_corruption_is_fatal() {
        assert!(RegistryError::Corrupt("bad json".into()).is_fatal());
        assert!(!RegistryError::NothingToWithdraw.is_fatal());
        assert!(!RegistryError::Storage("disk full".into()).is_fatal());
    }

    #[test]
    fn error_display_carries_amounts() {
        let err = RegistryError::InsufficientPayment {
            required: Amount::parse("0.05").unwrap(),
            attached: Amount::parse("0.049").unwrap(),
        };
        let s = err.to_string();
        assert!(s.contains("0.05"));
        assert!(s.contains("0.049"));
        assert_eq!(err.kind(), RegistryErrorKind::InsufficientPayment);
    }

    #[test]
    fn type_errors_map_to_kinds() {
        let err: RegistryError = TypeError::InvalidIdentity("empty".into()).into();
        assert_eq!(err.kind(), RegistryErrorKind::InvalidIdentity);
        let err: RegistryError = TypeError::AmountOverflow.into();
        assert_eq!(err.kind(), RegistryErrorKind::AmountOverflow);
    }
}
