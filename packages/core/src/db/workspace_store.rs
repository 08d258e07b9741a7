//! WorkspaceStore Trait - Persistence Abstraction Layer
//!
//! This module defines the `WorkspaceStore` trait that abstracts how the
//! workspace snapshot is persisted. The trait enables multiple backend
//! implementations (file slot, in-memory) without changing business logic
//! in PageService.
//!
//! # Architecture
//!
//! - **Abstraction Point**: Between PageService (business logic) and storage
//! - **Whole-Snapshot Writes**: The workspace is one document; every save
//!   replaces the slot in full rather than patching individual pages
//! - **Async-First**: All methods are async so file-backed and networked
//!   backends share one signature
//!
//! # Examples
//!
//! ```rust,no_run
//! use notia_core::db::{MemoryStore, WorkspaceSnapshot, WorkspaceStore};
//! use notia_core::models::Page;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn WorkspaceStore> = Arc::new(MemoryStore::new());
//!
//!     let page = Page::new();
//!     let snapshot = WorkspaceSnapshot {
//!         current_page_id: page.id.clone(),
//!         pages: vec![page],
//!     };
//!
//!     store.save(&snapshot).await?;
//!     let loaded = store.load().await?;
//!     assert!(loaded.is_some());
//!
//!     Ok(())
//! }
//! ```

use crate::models::Page;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Name of the single slot holding the whole workspace.
///
/// The `v1` suffix is the payload version; a future layout change writes a
/// new slot and migrates on load.
pub const WORKSPACE_SLOT: &str = "notia_pages_v1";

/// The persisted form of the whole workspace.
///
/// Field names and timestamp encoding follow the stored `notia_pages_v1`
/// payload, so snapshots written by earlier builds keep loading. An empty
/// `current_page_id` means no page was active when the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub pages: Vec<Page>,

    #[serde(default)]
    pub current_page_id: String,
}

impl WorkspaceSnapshot {
    /// True when there is nothing worth persisting
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Abstraction layer for workspace persistence
///
/// Implementations must be `Send + Sync` so the service can share them
/// across spawned save tasks.
///
/// # Error Semantics
///
/// `load` distinguishes an absent slot (`Ok(None)`) from a slot that exists
/// but cannot be read or decoded (`Err`). PageService treats both the same
/// way, falling back to a fresh workspace, but implementations must not
/// hide corruption behind `None`.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Read the persisted snapshot
    ///
    /// # Returns
    ///
    /// `Ok(Some(snapshot))` when the slot exists and decodes, `Ok(None)`
    /// when no snapshot has ever been saved.
    ///
    /// # Errors
    ///
    /// Returns error if the slot exists but cannot be read or parsed.
    async fn load(&self) -> Result<Option<WorkspaceSnapshot>>;

    /// Replace the persisted snapshot
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Full workspace state to persist
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be encoded or written. The
    /// previous slot contents must survive a failed save.
    async fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<()>;
}
