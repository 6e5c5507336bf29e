use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::Identity;

/// Shared suffix under which names are claimed (e.g. `dance` in `readyto.dance`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    pub fn new(namespace: impl Into<String>) -> Result<Self, TypeError> {
        let namespace = namespace.into();
        let label = namespace.trim_start_matches('.');
        if label.is_empty() || label.contains('.') || label.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidNamespace(namespace));
        }
        Ok(Self(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified form of `name`, e.g. `readyto.dance`.
    pub fn qualified(&self, name: &str) -> String {
        format!("{}.{}", name, self.0)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self("dance".to_string())
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Namespace {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Namespace {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

/// A claimed name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Registration ordinal, 0-based and stable for the registry's lifetime
    pub id: u64,
    pub name: String,
    pub owner: Identity,
    pub record: String,
    pub avatar: String,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
