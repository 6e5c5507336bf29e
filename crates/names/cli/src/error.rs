//! CLI error types

use names_registry::RegistryError;
use names_types::TypeError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected or failed registry operation
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// Malformed identity, amount or namespace
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] TypeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Short machine-readable label printed ahead of the message.
    pub fn kind(&self) -> String {
        match self {
            CliError::Registry(err) => err.kind().to_string(),
            CliError::InvalidInput(_) => "InvalidInput".to_string(),
            CliError::Config(_) => "Config".to_string(),
            CliError::Io(_) => "Io".to_string(),
            CliError::Json(_) => "Json".to_string(),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
