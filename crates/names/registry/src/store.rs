//! Registry persistence backends.
//!
//! The engine persists a full `RegistrySnapshot` after building each new state
//! and before committing it in memory. A backend either stores the snapshot
//! completely or reports an error; the engine then discards the new state.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::state::RegistrySnapshot;

/// Durable storage for registry snapshots.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Load the last saved snapshot, `None` if nothing was ever saved.
    ///
    /// Unreadable or malformed data is `RegistryError::Corrupt`.
    async fn load(&self) -> Result<Option<RegistrySnapshot>>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<()>;

    /// Backend label for logs.
    fn label(&self) -> &'static str;
}

/// Keeps the last snapshot in process memory.
#[derive(Default)]
pub struct InMemoryRegistryStore {
    snapshot: Mutex<Option<RegistrySnapshot>>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn load(&self) -> Result<Option<RegistrySnapshot>> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        *self.snapshot.lock().await = Some(snapshot.clone());
        Ok(())
    }

    fn label(&self) -> &'static str {
        "memory"
    }
}

/// Stores the snapshot as a pretty-printed JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// a crash mid-write leaves the previous snapshot intact.
///
/// An open store holds an exclusive advisory lock on a sibling `.lock` file
/// until it is dropped. Only one store per state file can be open at a time,
/// in this process or any other.
pub struct JsonFileRegistryStore {
    path: PathBuf,
    lock: File,
}

impl JsonFileRegistryStore {
    /// Open the store at `path` and take its lock.
    ///
    /// Fails with `RegistryError::Storage` if another store holds the lock.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| RegistryError::Storage(err.to_string()))?;
        }

        let lock_path = sibling_path(&path, ".lock");
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|err| {
                RegistryError::Storage(format!("open {}: {}", lock_path.display(), err))
            })?;
        lock.try_lock_exclusive().map_err(|err| {
            RegistryError::Storage(format!(
                "{} is in use by another registry: {}",
                path.display(),
                err
            ))
        })?;

        debug!(path = %path.display(), "Locked registry state file");
        Ok(Self { path, lock })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        sibling_path(&self.path, ".tmp")
    }
}

impl Drop for JsonFileRegistryStore {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "registry.json".into());
    name.push(suffix);
    path.with_file_name(name)
}

#[async_trait]
impl RegistryStore for JsonFileRegistryStore {
    async fn load(&self) -> Result<Option<RegistrySnapshot>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(RegistryError::Corrupt(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        let snapshot = serde_json::from_str(&contents).map_err(|err| {
            RegistryError::Corrupt(format!("cannot parse {}: {}", self.path.display(), err))
        })?;
        debug!(path = %self.path.display(), "Loaded registry snapshot");
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|err| RegistryError::Storage(err.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| RegistryError::Storage(err.to_string()))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|err| RegistryError::Storage(format!("write {}: {}", temp.display(), err)))?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|err| {
            RegistryError::Storage(format!("rename to {}: {}", self.path.display(), err))
        })?;

        debug!(
            path = %self.path.display(),
            records = snapshot.records.len(),
            "Persisted registry snapshot"
        );
        Ok(())
    }

    fn label(&self) -> &'static str {
        "json-file"
    }
}
