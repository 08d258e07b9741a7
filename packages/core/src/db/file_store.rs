//! File-Backed Workspace Store
//!
//! Persists the workspace snapshot as one JSON file inside a storage
//! directory. Saves use the atomic write pattern (write-to-temp, then
//! rename) to prevent corruption on crash or power loss.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;

use super::error::StoreError;
use super::workspace_store::{WorkspaceSnapshot, WorkspaceStore, WORKSPACE_SLOT};

/// Workspace store backed by a JSON slot file.
///
/// The slot lives at `<root>/notia_pages_v1.json`. The directory is created
/// on first save, so pointing at a not-yet-existing location is fine.
pub struct FileStore {
    root: PathBuf,
    slot_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let slot_path = root.join(format!("{}.json", WORKSPACE_SLOT));
        Self { root, slot_path }
    }

    /// Path of the slot file this store reads and writes
    pub fn slot_path(&self) -> &Path {
        &self.slot_path
    }
}

#[async_trait]
impl WorkspaceStore for FileStore {
    async fn load(&self) -> Result<Option<WorkspaceSnapshot>> {
        if !self.slot_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.slot_path)
            .await
            .map_err(|e| StoreError::io(&self.slot_path, e))?;

        let snapshot = serde_json::from_str(&contents).map_err(StoreError::from)?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))?;

        let serialized = serde_json::to_string_pretty(snapshot).map_err(StoreError::from)?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.root.join(format!("{}.json.tmp", WORKSPACE_SLOT));
        fs::write(&temp_path, serialized)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;

        fs::rename(&temp_path, &self.slot_path)
            .await
            .map_err(|e| StoreError::io(&self.slot_path, e))?;

        Ok(())
    }
}
