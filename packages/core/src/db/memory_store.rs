//! In-Memory Workspace Store
//!
//! Keeps the serialized snapshot in a mutex-guarded slot. Used by tests and
//! by embedders that manage durability themselves. Storing the encoded JSON
//! rather than the decoded value keeps the load path identical to the file
//! store, including its failure modes.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::error::StoreError;
use super::workspace_store::{WorkspaceSnapshot, WorkspaceStore};

/// Workspace store holding the encoded slot in memory
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with a raw payload, bypassing encoding.
    ///
    /// Lets tests exercise the corrupt-slot and legacy-payload paths.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw slot contents, if any
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    async fn load(&self) -> Result<Option<WorkspaceSnapshot>> {
        let raw = self.raw();
        match raw {
            None => Ok(None),
            Some(contents) => {
                let snapshot = serde_json::from_str(&contents).map_err(StoreError::from)?;
                Ok(Some(snapshot))
            }
        }
    }

    async fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<()> {
        let serialized = serde_json::to_string(snapshot).map_err(StoreError::from)?;
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(serialized);
        Ok(())
    }
}
