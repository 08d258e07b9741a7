//! Persistence Layer
//!
//! This module handles durable storage of the workspace:
//!
//! - Whole-snapshot persistence into a single named slot
//! - Pluggable backends behind the `WorkspaceStore` trait
//! - Change notification via workspace events
//!
//! # Architecture
//!
//! The workspace is small enough to persist as one document, so the store
//! API is deliberately two methods: load the snapshot, replace the
//! snapshot. This keeps every backend trivially consistent and makes the
//! fresh-workspace fallback a pure service-layer decision.

mod error;
pub mod events;
mod file_store;
mod memory_store;
mod workspace_store;

pub use error::StoreError;
pub use events::{PageField, WorkspaceEvent};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use workspace_store::{WorkspaceSnapshot, WorkspaceStore, WORKSPACE_SLOT};
