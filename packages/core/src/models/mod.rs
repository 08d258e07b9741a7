//! Data Models
//!
//! This module contains the core data structures used throughout Notia:
//!
//! - `Page` - A note in the workspace forest (hierarchy via parent back-references)
//! - `Block` / `BlockDocument` - The typed block tree behind a page's content
//!
//! Pages serialize with camelCase fields and millisecond timestamps so stored
//! workspaces from earlier builds keep loading unchanged.

mod block;
mod page;

pub use block::{
    Block, BlockBody, BlockDocument, BlockKind, CalloutBlock, LinkBlock, Mark, Marks, MediaBlock,
    MediaSource, PageRefBlock, RichText, Span, TableBlock, TableCell, TableRow, TextBlock,
    TodoBlock, ToggleBlock,
};
pub use page::{Page, ValidationError};
