//! Block Palette
//!
//! The catalog behind the insert menu: every insertable block kind plus the
//! table commands, with the filter the menu applies as the user types.
//! The palette is stateless; selection handling lives with the caller.

use crate::models::{
    BlockBody, BlockKind, CalloutBlock, RichText, TableBlock, TextBlock, TodoBlock, ToggleBlock,
};

/// What selecting a palette entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteAction {
    /// Insert a block of this kind after the caret
    Insert(BlockKind),

    /// Open the glyph picker; the chosen glyph is typed at the caret
    InlineGlyph,

    AddTableRow,
    AddTableColumn,
    DeleteTableRow,
    DeleteTableColumn,
    MergeTableCells,
}

/// One row of the insert menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Stable key, also what the host UI reports back on selection
    pub key: &'static str,
    pub label: &'static str,
    /// Icon name hint for the host UI
    pub icon: &'static str,
    pub action: PaletteAction,
}

impl PaletteEntry {
    /// Table commands only appear while the caret is inside a table
    pub fn is_table_command(&self) -> bool {
        matches!(
            self.action,
            PaletteAction::AddTableRow
                | PaletteAction::AddTableColumn
                | PaletteAction::DeleteTableRow
                | PaletteAction::DeleteTableColumn
                | PaletteAction::MergeTableCells
        )
    }
}

/// The full insert menu, in display order
pub const CATALOG: [PaletteEntry; 23] = [
    PaletteEntry {
        key: "text",
        label: "Text",
        icon: "type",
        action: PaletteAction::Insert(BlockKind::Text),
    },
    PaletteEntry {
        key: "h1",
        label: "Heading 1",
        icon: "heading-1",
        action: PaletteAction::Insert(BlockKind::Heading1),
    },
    PaletteEntry {
        key: "h2",
        label: "Heading 2",
        icon: "heading-2",
        action: PaletteAction::Insert(BlockKind::Heading2),
    },
    PaletteEntry {
        key: "h3",
        label: "Heading 3",
        icon: "heading-3",
        action: PaletteAction::Insert(BlockKind::Heading3),
    },
    PaletteEntry {
        key: "bulleted",
        label: "Bulleted list",
        icon: "list",
        action: PaletteAction::Insert(BlockKind::BulletedItem),
    },
    PaletteEntry {
        key: "numbered",
        label: "Numbered list",
        icon: "list-ordered",
        action: PaletteAction::Insert(BlockKind::NumberedItem),
    },
    PaletteEntry {
        key: "todo",
        label: "To-do",
        icon: "list-todo",
        action: PaletteAction::Insert(BlockKind::Todo),
    },
    PaletteEntry {
        key: "toggle",
        label: "Toggle list",
        icon: "chevron-down",
        action: PaletteAction::Insert(BlockKind::Toggle),
    },
    PaletteEntry {
        key: "page",
        label: "Page",
        icon: "file-text",
        action: PaletteAction::Insert(BlockKind::PageReference),
    },
    PaletteEntry {
        key: "callout",
        label: "Callout",
        icon: "plus",
        action: PaletteAction::Insert(BlockKind::Callout),
    },
    PaletteEntry {
        key: "quote",
        label: "Quote",
        icon: "quote",
        action: PaletteAction::Insert(BlockKind::Quote),
    },
    PaletteEntry {
        key: "table",
        label: "Table",
        icon: "table",
        action: PaletteAction::Insert(BlockKind::Table),
    },
    PaletteEntry {
        key: "divider",
        label: "Divider",
        icon: "minus",
        action: PaletteAction::Insert(BlockKind::Divider),
    },
    PaletteEntry {
        key: "image",
        label: "Image",
        icon: "image",
        action: PaletteAction::Insert(BlockKind::Image),
    },
    PaletteEntry {
        key: "icon",
        label: "Icon",
        icon: "plus",
        action: PaletteAction::InlineGlyph,
    },
    PaletteEntry {
        key: "music",
        label: "Music",
        icon: "music-2",
        action: PaletteAction::Insert(BlockKind::Audio),
    },
    PaletteEntry {
        key: "link",
        label: "Link",
        icon: "link",
        action: PaletteAction::Insert(BlockKind::Link),
    },
    PaletteEntry {
        key: "video",
        label: "Video",
        icon: "video",
        action: PaletteAction::Insert(BlockKind::Video),
    },
    PaletteEntry {
        key: "table-row",
        label: "Add row",
        icon: "plus",
        action: PaletteAction::AddTableRow,
    },
    PaletteEntry {
        key: "table-col",
        label: "Add column",
        icon: "plus",
        action: PaletteAction::AddTableColumn,
    },
    PaletteEntry {
        key: "delete-row",
        label: "Delete row",
        icon: "trash-2",
        action: PaletteAction::DeleteTableRow,
    },
    PaletteEntry {
        key: "delete-col",
        label: "Delete column",
        icon: "trash-2",
        action: PaletteAction::DeleteTableColumn,
    },
    PaletteEntry {
        key: "merge-cells",
        label: "Merge cells",
        icon: "square-stack",
        action: PaletteAction::MergeTableCells,
    },
];

/// Entries matching a filter string.
///
/// Matches are case-insensitive substrings of the label. Table commands
/// are dropped entirely while the caret is outside a table, whatever the
/// filter says.
pub fn entries(filter: &str, in_table: bool) -> Vec<&'static PaletteEntry> {
    let needle = filter.to_lowercase();
    CATALOG
        .iter()
        .filter(|e| e.label.to_lowercase().contains(&needle))
        .filter(|e| in_table || !e.is_table_command())
        .collect()
}

/// Look up one entry by its stable key
pub fn entry(key: &str) -> Option<&'static PaletteEntry> {
    CATALOG.iter().find(|e| e.key == key)
}

/// Default content for a freshly inserted block.
///
/// Returns `None` for kinds whose payload needs caller-provided context
/// (page references, media sources, link targets).
pub fn default_body(kind: BlockKind) -> Option<BlockBody> {
    let body = match kind {
        BlockKind::Text => BlockBody::Text(TextBlock::default()),
        BlockKind::Heading1 => BlockBody::Heading1(TextBlock::default()),
        BlockKind::Heading2 => BlockBody::Heading2(TextBlock::default()),
        BlockKind::Heading3 => BlockBody::Heading3(TextBlock::default()),
        BlockKind::BulletedItem => BlockBody::BulletedItem(TextBlock::default()),
        BlockKind::NumberedItem => BlockBody::NumberedItem(TextBlock::default()),
        BlockKind::Quote => BlockBody::Quote(TextBlock::default()),
        BlockKind::Todo => BlockBody::Todo(TodoBlock {
            checked: false,
            text: RichText::plain("To-do"),
        }),
        BlockKind::Toggle => BlockBody::Toggle(ToggleBlock {
            summary: RichText::plain("Toggle"),
            children: Vec::new(),
        }),
        BlockKind::Callout => BlockBody::Callout(CalloutBlock {
            icon: "💡".to_string(),
            text: RichText::default(),
        }),
        BlockKind::Table => BlockBody::Table(TableBlock::with_size(2, 2)),
        BlockKind::Divider => BlockBody::Divider,
        BlockKind::PageReference
        | BlockKind::Image
        | BlockKind::Audio
        | BlockKind::Link
        | BlockKind::Video => return None,
    };
    Some(body)
}
