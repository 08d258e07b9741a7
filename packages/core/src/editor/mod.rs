//! Block Document Engine
//!
//! Structural and inline editing of the open page's block tree. The tree is
//! the authoritative model; geometry questions (caret anchoring, drag-drop
//! hit-testing) go through the deterministic view-metrics projection in
//! [`layout`], and the insertable catalog lives in [`palette`].

pub mod document_editor;
pub mod layout;
pub mod palette;

// Re-export main types
pub use document_editor::{Caret, CaretContext, CellAddress, DocumentEditor, TextRange};
pub use layout::{BlockExtent, DropEdge, Point, ViewMetrics};
pub use palette::{PaletteAction, PaletteEntry, CATALOG};
