use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

/// A single named durable slot holding the serialized liked set
///
/// Reads happen once per session; every write replaces the whole slot.
#[async_trait::async_trait]
pub trait LikedStorage: Send + Sync {
    /// Returns `None` when nothing has been stored yet
    async fn read(&self) -> AppResult<Option<String>>;

    async fn write(&self, snapshot: &str) -> AppResult<()>;
}

/// Slot backed by a JSON file on local disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

#[async_trait::async_trait]
impl LikedStorage for FileStorage {
    async fn read(&self) -> AppResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    async fn write(&self, snapshot: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a reader never sees a half-written set
        let staging = self.staging_path();
        tokio::fs::write(&staging, snapshot).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        tracing::debug!(path = %self.path.display(), bytes = snapshot.len(), "Liked set written");
        Ok(())
    }
}

/// In-process slot, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

#[async_trait::async_trait]
impl LikedStorage for MemoryStorage {
    async fn read(&self) -> AppResult<Option<String>> {
        Ok(self.contents())
    }

    async fn write(&self, snapshot: &str) -> AppResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| AppError::Internal(format!("Liked slot lock poisoned: {}", e)))?;
        *slot = Some(snapshot.to_string());
        Ok(())
    }
}
