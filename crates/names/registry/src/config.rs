//! Registry configuration

use std::path::{Path, PathBuf};

use names_types::{Identity, Namespace, PriceSchedule};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

fn default_event_buffer() -> usize {
    256
}

/// Registry configuration
///
/// ```toml
/// administrator = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
/// namespace = "dance"
/// state_path = "/var/lib/names/state.json"
///
/// [[pricing]]
/// from_length = 3
/// price = "0.05"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Identity allowed to withdraw custodied value; fixed for the registry's lifetime
    pub administrator: Identity,

    /// Suffix names are claimed under
    #[serde(default)]
    pub namespace: Namespace,

    /// Snapshot file; in-memory only when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,

    /// Capacity of the live notification channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Price schedule override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceSchedule>,
}

impl RegistryConfig {
    pub fn new(administrator: Identity) -> Self {
        Self {
            administrator,
            namespace: Namespace::default(),
            state_path: None,
            event_buffer: default_event_buffer(),
            pricing: None,
        }
    }

    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    pub fn with_pricing(mut self, pricing: PriceSchedule) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: RegistryConfig =
            toml::from_str(contents).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RegistryError::Config(e.to_string()))
    }

    /// Write configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| RegistryError::Config(e.to_string()))?;
        }
        std::fs::write(path, self.to_toml_string()?)
            .map_err(|e| RegistryError::Config(format!("cannot write {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_buffer == 0 {
            return Err(RegistryError::Config(
                "event_buffer must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective price schedule.
    pub fn price_schedule(&self) -> PriceSchedule {
        self.pricing.clone().unwrap_or_default()
    }
}
