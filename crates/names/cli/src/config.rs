//! CLI configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use names_registry::{LedgerCarrier, NameRegistry, RegistryConfig};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Registry configuration together with the file it was read from.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub path: PathBuf,
    pub registry: RegistryConfig,
}

impl CliConfig {
    /// Resolve the configuration file path.
    ///
    /// An explicit path (from `--config` or `NAMES_CONFIG`) wins over the
    /// per-user default.
    pub fn resolve_path(path: Option<&str>) -> CliResult<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_config_path(),
        }
    }

    /// Load configuration from file
    ///
    /// Unlike most tools there is no usable default: the administrator must
    /// come from `names init`.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            return Err(CliError::Config(format!(
                "no configuration at {}; run `names init` first",
                path.display()
            )));
        }

        let mut registry = RegistryConfig::load(&path)?;
        let state_path = match registry.state_path.take() {
            Some(state) if state.is_relative() => config_dir(&path).join(state),
            Some(state) => state,
            None => default_state_path(&path),
        };
        registry.state_path = Some(state_path);

        debug!(config = %path.display(), "Loaded configuration");
        Ok(Self { path, registry })
    }

    /// Open the registry described by this configuration.
    pub async fn open_registry(&self) -> CliResult<NameRegistry> {
        let registry =
            NameRegistry::from_config(&self.registry, Arc::new(LedgerCarrier::new())).await?;
        Ok(registry)
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("names").join("config.toml"))
    }
}

/// Snapshot location used when the configuration names none.
pub fn default_state_path(config_path: &Path) -> PathBuf {
    config_dir(config_path).join("state.json")
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use names_registry::Identity;

    #[test]
    fn explicit_path_wins() {
        let path = CliConfig::resolve_path(Some("/tmp/names.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/names.toml"));
    }

    #[test]
    fn missing_config_is_an_error() {
        let err = CliConfig::load(Some("/nonexistent/names/config.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn state_path_defaults_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        RegistryConfig::new(Identity::new("admin").unwrap())
            .save(&path)
            .unwrap();

        let config = CliConfig::load(path.to_str()).unwrap();
        assert_eq!(
            config.registry.state_path,
            Some(dir.path().join("state.json"))
        );
    }

    #[test]
    fn relative_state_path_is_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        RegistryConfig::new(Identity::new("admin").unwrap())
            .with_state_path("data/registry.json")
            .save(&path)
            .unwrap();

        let config = CliConfig::load(path.to_str()).unwrap();
        assert_eq!(
            config.registry.state_path,
            Some(dir.path().join("data").join("registry.json"))
        );
    }
}
