//! Document Editor - Structural and Inline Editing of One Open Page
//!
//! [`DocumentEditor`] owns the block tree of the page being edited, plus the
//! live caret and the saved selection that focus-stealing controls (the
//! block palette) restore before acting. All structural edits are tree
//! operations; geometry is answered by the view-metrics projection.
//!
//! # Contract
//!
//! No operation here ever raises to the caller. Unknown block ids,
//! out-of-range cell addresses, and table commands without a table under
//! the selection all leave the document untouched and report `false`.

use crate::editor::layout::{DropEdge, Point, ViewMetrics, LINE_HEIGHT};
use crate::models::{Block, BlockBody, BlockDocument, Mark, RichText, TableBlock};

/// Address of one cell inside a table block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

/// Caret location: a block's inline run, narrowed to a table cell when the
/// block is a table, plus a character offset within that run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    pub block_id: String,
    pub cell: Option<CellAddress>,
    pub offset: usize,
}

/// A character range within the caret's inline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// What one interaction reports to the completion assistant and the
/// insertion affordance
#[derive(Debug, Clone, PartialEq)]
pub struct CaretContext {
    /// Plain text from the start of the caret's run up to the caret
    pub text_before_caret: String,

    /// Whether table-editing commands apply right now
    pub in_table: bool,

    /// Where the affordance floats, one line below the caret
    pub position: Point,
}

/// Editor over one page's block tree.
///
/// The tree is the authoritative document model; the page's stored content
/// string is just its serialization, produced by [`to_content`](Self::to_content)
/// after every change. Callers are expected to persist it through the page
/// store on each content-changing call.
pub struct DocumentEditor {
    doc: BlockDocument,
    caret: Option<Caret>,
    saved_selection: Option<Caret>,
}

impl DocumentEditor {
    /// Open a document for editing.
    ///
    /// An empty document is seeded with one empty paragraph so there is
    /// always somewhere to type. The caret starts at the top of the first
    /// block when that block has an editable run.
    pub fn new(mut doc: BlockDocument) -> Self {
        if doc.blocks.is_empty() {
            doc.blocks.push(Block::paragraph());
        }
        let caret = doc.blocks.first().and_then(caret_at_start);

        Self {
            doc,
            caret,
            saved_selection: None,
        }
    }

    pub fn document(&self) -> &BlockDocument {
        &self.doc
    }

    /// Serialize the current document for the page's content field
    pub fn to_content(&self) -> String {
        self.doc.to_content()
    }

    /// Top-level block lookup
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.doc.blocks.iter().find(|b| b.id == id)
    }

    pub fn caret(&self) -> Option<&Caret> {
        self.caret.as_ref()
    }

    pub fn saved_selection(&self) -> Option<&Caret> {
        self.saved_selection.as_ref()
    }

    /// Lay out the current document
    pub fn view_metrics(&self) -> ViewMetrics {
        ViewMetrics::measure(&self.doc)
    }

    // === Caret and selection ===

    /// Place the caret.
    ///
    /// The target must address an existing inline run: a run-bearing block
    /// with no cell, or a table block with a valid cell address. Offsets
    /// past the end of the run clamp to it. Returns false, leaving the
    /// caret unchanged, when the target does not resolve.
    pub fn set_caret(&mut self, block_id: &str, cell: Option<CellAddress>, offset: usize) -> bool {
        let candidate = Caret {
            block_id: block_id.to_string(),
            cell,
            offset,
        };
        let Some(run) = run_of(&self.doc, &candidate) else {
            return false;
        };
        let offset = candidate.offset.min(run.char_len());

        self.caret = Some(Caret {
            offset,
            ..candidate
        });
        true
    }

    /// Capture the live caret so a focus-stealing control can put it back
    /// before acting on the document
    pub fn save_selection(&mut self) {
        self.saved_selection = self.caret.clone();
    }

    /// Restore the last saved selection into the live caret; false when
    /// nothing was saved
    pub fn restore_selection(&mut self) -> bool {
        match &self.saved_selection {
            Some(saved) => {
                self.caret = Some(saved.clone());
                true
            }
            None => false,
        }
    }

    /// Context for the interaction stream: the caret's preceding text,
    /// whether it sits in a table, and the affordance anchor. None when no
    /// caret is placed.
    pub fn caret_context(&self) -> Option<CaretContext> {
        let caret = self.caret.as_ref()?;
        let run = run_of(&self.doc, caret)?;
        let text_before_caret: String = run.text().chars().take(caret.offset).collect();

        let point = self.view_metrics().caret_point(
            &self.doc,
            &caret.block_id,
            caret.cell.map(|c| (c.row, c.col)),
            caret.offset,
        )?;

        Some(CaretContext {
            text_before_caret,
            in_table: caret.cell.is_some(),
            position: Point {
                x: point.x,
                y: point.y + LINE_HEIGHT,
            },
        })
    }

    // === Inline editing ===

    /// Insert plain text at the caret and advance it past the insertion.
    ///
    /// Typing, the glyph picker, and suggestion acceptance all land here.
    /// False when no caret is placed or `text` is empty.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let Some(caret) = self.caret.clone() else {
            return false;
        };
        let Some(run) = run_of_mut(&mut self.doc, &caret) else {
            return false;
        };

        let offset = caret.offset.min(run.char_len());
        run.insert(offset, text);

        let advanced = offset + text.chars().count();
        if let Some(c) = &mut self.caret {
            c.offset = advanced;
        }
        true
    }

    /// Toggle an inline mark over a character range in the caret's run.
    ///
    /// If every character in the range already carries the mark it is
    /// removed, otherwise applied throughout. False when no caret is
    /// placed or the range selects nothing.
    pub fn toggle_mark_at_caret(&mut self, mark: Mark, range: TextRange) -> bool {
        let Some(caret) = self.caret.clone() else {
            return false;
        };
        let Some(run) = run_of_mut(&mut self.doc, &caret) else {
            return false;
        };
        if range.start >= range.end || range.start >= run.char_len() {
            return false;
        }

        run.toggle_mark(range.start, range.end, mark);
        true
    }

    /// Set a to-do item's checked state, searching toggle children too;
    /// false when `id` is not a to-do block
    pub fn set_todo_checked(&mut self, id: &str, checked: bool) -> bool {
        let Some(block) = find_block_mut(&mut self.doc.blocks, id) else {
            return false;
        };
        match &mut block.body {
            BlockBody::Todo(todo) => {
                todo.checked = checked;
                true
            }
            _ => false,
        }
    }

    // === Structural editing ===

    /// Insert a block at the end of the document.
    ///
    /// A fresh empty paragraph follows the inserted block so typing
    /// continues below it. The caret moves to the start of the new block's
    /// run (a table's first cell for tables); blocks without a run leave
    /// it on the trailing paragraph. Returns the new block's id.
    pub fn insert_block(&mut self, body: BlockBody) -> String {
        let block = Block::new(body);
        let block_id = block.id.clone();
        let trailing = Block::paragraph();

        let caret = caret_at_start(&block).or_else(|| caret_at_start(&trailing));

        self.doc.blocks.push(block);
        self.doc.blocks.push(trailing);
        self.caret = caret;
        block_id
    }

    /// Remove a top-level block. The caret and saved selection are dropped
    /// when they pointed into it. False when `id` is not top-level.
    pub fn remove_block(&mut self, id: &str) -> bool {
        let before = self.doc.blocks.len();
        self.doc.blocks.retain(|b| b.id != id);
        if self.doc.blocks.len() == before {
            return false;
        }

        self.drop_dangling_selections();
        true
    }

    /// Move a dragged top-level block to one side of a target top-level
    /// block. False when either id is unknown at the top level or both
    /// name the same block.
    pub fn reorder_block(&mut self, dragged_id: &str, target_id: &str, edge: DropEdge) -> bool {
        if dragged_id == target_id {
            return false;
        }
        let Some(from) = self.doc.blocks.iter().position(|b| b.id == dragged_id) else {
            return false;
        };
        let Some(to) = self.doc.blocks.iter().position(|b| b.id == target_id) else {
            return false;
        };

        let block = self.doc.blocks.remove(from);
        let mut at = if from < to { to - 1 } else { to };
        if edge == DropEdge::Below {
            at += 1;
        }
        self.doc.blocks.insert(at, block);
        true
    }

    // === Table commands ===
    //
    // Each command restores the saved selection first: the palette that
    // issues these has already moved focus away from the document, so the
    // live caret is not where the user was editing.

    /// Append a row matching the first row's column count
    pub fn add_table_row(&mut self) -> bool {
        self.with_selected_table(|table, _| {
            table.add_row();
            true
        })
    }

    /// Append one blank cell to every row
    pub fn add_table_column(&mut self) -> bool {
        self.with_selected_table(|table, _| {
            table.add_column();
            true
        })
    }

    /// Delete the row containing the saved caret
    pub fn delete_table_row(&mut self) -> bool {
        let changed = self.with_selected_table(|table, cell| table.delete_row(cell.row));
        if changed {
            self.drop_dangling_selections();
        }
        changed
    }

    /// Delete the column containing the saved caret from every row
    pub fn delete_table_column(&mut self) -> bool {
        let changed = self.with_selected_table(|table, cell| table.delete_column(cell.col));
        if changed {
            self.drop_dangling_selections();
        }
        changed
    }

    /// Merge the saved caret's cell with its next sibling, falling back to
    /// its previous sibling; a single-cell row is left alone
    pub fn merge_table_cells(&mut self) -> bool {
        let changed = self.with_selected_table(|table, cell| table.merge_cells(cell.row, cell.col));
        if changed {
            self.drop_dangling_selections();
        }
        changed
    }

    /// Restore the saved selection, then run `op` against the table block
    /// and cell it addresses
    fn with_selected_table<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&mut TableBlock, CellAddress) -> bool,
    {
        self.restore_selection();

        let Some(caret) = self.caret.clone() else {
            tracing::debug!("Ignoring table command without a selection");
            return false;
        };
        let Some(cell) = caret.cell else {
            tracing::debug!("Ignoring table command outside a table");
            return false;
        };
        let Some(block) = find_block_mut(&mut self.doc.blocks, &caret.block_id) else {
            tracing::debug!("Ignoring table command for unknown block {}", caret.block_id);
            return false;
        };

        match &mut block.body {
            BlockBody::Table(table) => op(table, cell),
            _ => {
                tracing::debug!("Ignoring table command on non-table block {}", caret.block_id);
                false
            }
        }
    }

    /// Clear the caret and saved selection when the runs they address no
    /// longer exist
    fn drop_dangling_selections(&mut self) {
        if self
            .caret
            .as_ref()
            .map_or(false, |c| run_of(&self.doc, c).is_none())
        {
            self.caret = None;
        }
        if self
            .saved_selection
            .as_ref()
            .map_or(false, |c| run_of(&self.doc, c).is_none())
        {
            self.saved_selection = None;
        }
    }
}

/// Caret at the start of a block's run: a table's first cell, or offset
/// zero of the inline run. None for blocks with neither.
fn caret_at_start(block: &Block) -> Option<Caret> {
    match &block.body {
        BlockBody::Table(table) if table.cell(0, 0).is_some() => Some(Caret {
            block_id: block.id.clone(),
            cell: Some(CellAddress { row: 0, col: 0 }),
            offset: 0,
        }),
        body if body.rich_text().is_some() => Some(Caret {
            block_id: block.id.clone(),
            cell: None,
            offset: 0,
        }),
        _ => None,
    }
}

/// Find a block by id, searching toggle children depth-first
fn find_block<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        if let BlockBody::Toggle(toggle) = &block.body {
            if let Some(found) = find_block(&toggle.children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_block_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        if let BlockBody::Toggle(toggle) = &mut block.body {
            if let Some(found) = find_block_mut(&mut toggle.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// The inline run a caret addresses: the cell's content for a table caret,
/// the block's run otherwise. None when the address does not resolve.
fn run_of<'a>(doc: &'a BlockDocument, caret: &Caret) -> Option<&'a RichText> {
    let block = find_block(&doc.blocks, &caret.block_id)?;
    match (&block.body, caret.cell) {
        (BlockBody::Table(table), Some(cell)) => {
            table.cell(cell.row, cell.col).map(|c| &c.content)
        }
        (body, None) => body.rich_text(),
        _ => None,
    }
}

fn run_of_mut<'a>(doc: &'a mut BlockDocument, caret: &Caret) -> Option<&'a mut RichText> {
    let block = find_block_mut(&mut doc.blocks, &caret.block_id)?;
    match (&mut block.body, caret.cell) {
        (BlockBody::Table(table), Some(cell)) => {
            table.cell_mut(cell.row, cell.col).map(|c| &mut c.content)
        }
        (body, None) => body.rich_text_mut(),
        _ => None,
    }
}
