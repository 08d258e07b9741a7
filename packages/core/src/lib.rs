//! Notia Core Editing Layer
//!
//! This crate provides the page forest, block document engine, and
//! completion pipeline behind the Notia notes application.
//!
//! # Architecture
//!
//! - **Block tree as source of truth**: a page's content is a typed block
//!   tree; the stored content string is just its JSON serialization
//! - **Injected workspace state**: one explicitly constructed `PageService`
//!   owns the page forest, loaded from a pluggable `WorkspaceStore`
//! - **Fire-and-forget persistence**: every mutation snapshots the
//!   workspace onto the runtime; the editing surface never blocks on disk
//! - **Debounced suggestions**: completion lookups are debounced,
//!   single-flight, and fenced by a generation counter so stale responses
//!   never surface
//!
//! # Modules
//!
//! - [`models`] - Data structures (Page, Block, RichText, etc.)
//! - [`editor`] - Block document engine, view metrics, block palette
//! - [`services`] - PageService and the completion assistant
//! - [`session`] - Wiring for one open page
//! - [`db`] - Workspace persistence layer

pub mod db;
pub mod editor;
pub mod models;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use editor::*;
pub use models::*;
pub use services::*;
pub use session::EditorSession;
