//! View Metrics
//!
//! A deterministic layout projection of the block tree. Every top-level
//! block gets a vertical extent from fixed per-kind heights; caret
//! positions and drag-drop hit-testing are derived from those extents plus
//! a fixed character advance. The projection is pure so it can be unit
//! tested; a host UI is free to substitute real measurements.

use crate::models::{Block, BlockBody, BlockDocument};

/// Height of one line of body text
pub const LINE_HEIGHT: f64 = 24.0;

/// Horizontal advance per character
pub const CHAR_ADVANCE: f64 = 8.0;

/// Vertical gap between top-level blocks
pub const BLOCK_GAP: f64 = 8.0;

/// Height of one table row
pub const TABLE_ROW_HEIGHT: f64 = 32.0;

/// Width of one table column
pub const TABLE_CELL_WIDTH: f64 = 120.0;

const HEADING_1_HEIGHT: f64 = 40.0;
const HEADING_2_HEIGHT: f64 = 32.0;
const HEADING_3_HEIGHT: f64 = 28.0;
const CALLOUT_HEIGHT: f64 = 40.0;
const DIVIDER_HEIGHT: f64 = 16.0;
const MEDIA_HEIGHT: f64 = 180.0;
const AUDIO_HEIGHT: f64 = 48.0;

/// A position in editor-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Vertical extent of one top-level block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockExtent {
    pub block_id: String,
    pub top: f64,
    pub height: f64,
}

impl BlockExtent {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Which side of the target a dragged block lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEdge {
    Above,
    Below,
}

/// Laid-out extents for one document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewMetrics {
    pub extents: Vec<BlockExtent>,
    pub total_height: f64,
}

impl ViewMetrics {
    /// Lay out a document's top-level blocks
    pub fn measure(doc: &BlockDocument) -> Self {
        let mut extents = Vec::with_capacity(doc.blocks.len());
        let mut top = 0.0;

        for block in &doc.blocks {
            let height = block_height(block);
            extents.push(BlockExtent {
                block_id: block.id.clone(),
                top,
                height,
            });
            top += height + BLOCK_GAP;
        }

        let total_height = if extents.is_empty() {
            0.0
        } else {
            top - BLOCK_GAP
        };

        Self {
            extents,
            total_height,
        }
    }

    pub fn extent_of(&self, block_id: &str) -> Option<&BlockExtent> {
        self.extents.iter().find(|e| e.block_id == block_id)
    }

    /// Resolve a drop at vertical position `y`.
    ///
    /// The block whose extent contains `y` is the target; the upper half
    /// maps to [`DropEdge::Above`], the lower half to [`DropEdge::Below`].
    /// A position in the gap between blocks belongs to the next block's
    /// upper half, and anything past the last block drops below it.
    /// `None` only for an empty document.
    pub fn drop_target(&self, y: f64) -> Option<(&str, DropEdge)> {
        for extent in &self.extents {
            if y < extent.bottom() {
                let edge = if y < extent.top + extent.height / 2.0 {
                    DropEdge::Above
                } else {
                    DropEdge::Below
                };
                return Some((&extent.block_id, edge));
            }
        }

        self.extents
            .last()
            .map(|extent| (extent.block_id.as_str(), DropEdge::Below))
    }

    /// Visual position of a caret.
    ///
    /// `cell` addresses a `(row, column)` within a table block. Nested
    /// blocks inside toggles are located by walking the toggle's children.
    /// `None` when the block cannot be found.
    pub fn caret_point(
        &self,
        doc: &BlockDocument,
        block_id: &str,
        cell: Option<(usize, usize)>,
        offset: usize,
    ) -> Option<Point> {
        let x_in_run = offset as f64 * CHAR_ADVANCE;

        if let Some(extent) = self.extent_of(block_id) {
            if let Some((row, col)) = cell {
                return Some(Point {
                    x: col as f64 * TABLE_CELL_WIDTH + x_in_run,
                    y: extent.top + row as f64 * TABLE_ROW_HEIGHT,
                });
            }
            return Some(Point {
                x: x_in_run,
                y: extent.top,
            });
        }

        // Not a top-level block: search toggle children
        for (block, extent) in doc.blocks.iter().zip(&self.extents) {
            if let Some(y) = locate_in_toggle(block, block_id, extent.top) {
                return Some(Point { x: x_in_run, y });
            }
        }

        None
    }
}

/// Fixed height of one block, children included
fn block_height(block: &Block) -> f64 {
    match &block.body {
        BlockBody::Text(_)
        | BlockBody::BulletedItem(_)
        | BlockBody::NumberedItem(_)
        | BlockBody::Todo(_)
        | BlockBody::Quote(_)
        | BlockBody::PageReference(_)
        | BlockBody::Link(_) => LINE_HEIGHT,
        BlockBody::Heading1(_) => HEADING_1_HEIGHT,
        BlockBody::Heading2(_) => HEADING_2_HEIGHT,
        BlockBody::Heading3(_) => HEADING_3_HEIGHT,
        BlockBody::Callout(_) => CALLOUT_HEIGHT,
        BlockBody::Divider => DIVIDER_HEIGHT,
        BlockBody::Image(_) | BlockBody::Video(_) => MEDIA_HEIGHT,
        BlockBody::Audio(_) => AUDIO_HEIGHT,
        // An empty table still renders one placeholder row
        BlockBody::Table(table) => table.row_count().max(1) as f64 * TABLE_ROW_HEIGHT,
        BlockBody::Toggle(toggle) => {
            LINE_HEIGHT
                + toggle
                    .children
                    .iter()
                    .map(|child| block_height(child) + BLOCK_GAP)
                    .sum::<f64>()
        }
    }
}

/// Vertical position of `target` inside a toggle's children, if present
fn locate_in_toggle(block: &Block, target: &str, base: f64) -> Option<f64> {
    let BlockBody::Toggle(toggle) = &block.body else {
        return None;
    };

    let mut y = base + LINE_HEIGHT + BLOCK_GAP;
    for child in &toggle.children {
        if child.id == target {
            return Some(y);
        }
        if let Some(found) = locate_in_toggle(child, target, y) {
            return Some(found);
        }
        y += block_height(child) + BLOCK_GAP;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RichText, TableBlock, TextBlock, TodoBlock, ToggleBlock};

    fn doc(bodies: Vec<BlockBody>) -> BlockDocument {
        BlockDocument {
            blocks: bodies.into_iter().map(Block::new).collect(),
        }
    }

    #[test]
    fn test_blocks_stack_top_down_with_gaps() {
        let doc = doc(vec![
            BlockBody::Heading1(TextBlock::default()),
            BlockBody::Text(TextBlock::default()),
            BlockBody::Divider,
        ]);
        let metrics = ViewMetrics::measure(&doc);

        assert_eq!(metrics.extents[0].top, 0.0);
        assert_eq!(metrics.extents[0].height, 40.0);
        assert_eq!(metrics.extents[1].top, 48.0);
        assert_eq!(metrics.extents[1].height, 24.0);
        assert_eq!(metrics.extents[2].top, 80.0);
        assert_eq!(metrics.total_height, 96.0);
    }

    #[test]
    fn test_empty_document_measures_empty() {
        let metrics = ViewMetrics::measure(&BlockDocument::default());
        assert!(metrics.extents.is_empty());
        assert_eq!(metrics.total_height, 0.0);
        assert!(metrics.drop_target(10.0).is_none());
    }

    #[test]
    fn test_drop_target_splits_at_the_midline() {
        let doc = doc(vec![
            BlockBody::Text(TextBlock::default()),
            BlockBody::Text(TextBlock::default()),
        ]);
        let metrics = ViewMetrics::measure(&doc);
        let first = doc.blocks[0].id.as_str();
        let second = doc.blocks[1].id.as_str();

        // First block spans 0..24, midline at 12
        assert_eq!(metrics.drop_target(5.0), Some((first, DropEdge::Above)));
        assert_eq!(metrics.drop_target(18.0), Some((first, DropEdge::Below)));

        // Gap (24..32) belongs to the second block's upper half
        assert_eq!(metrics.drop_target(28.0), Some((second, DropEdge::Above)));

        // Past the end drops below the last block
        assert_eq!(metrics.drop_target(500.0), Some((second, DropEdge::Below)));
    }

    #[test]
    fn test_table_height_follows_row_count() {
        let doc = doc(vec![
            BlockBody::Table(TableBlock::with_size(3, 2)),
            BlockBody::Table(TableBlock::default()),
        ]);
        let metrics = ViewMetrics::measure(&doc);

        assert_eq!(metrics.extents[0].height, 96.0);
        // Zero rows still shows a placeholder row
        assert_eq!(metrics.extents[1].height, 32.0);
    }

    #[test]
    fn test_toggle_height_includes_children() {
        let child = Block::new(BlockBody::Text(TextBlock::default()));
        let toggle = BlockBody::Toggle(ToggleBlock {
            summary: RichText::plain("More"),
            children: vec![child],
        });
        let metrics = ViewMetrics::measure(&doc(vec![toggle]));

        // Summary line + one child + gap
        assert_eq!(metrics.extents[0].height, 24.0 + 24.0 + 8.0);
    }

    #[test]
    fn test_caret_point_advances_by_character() {
        let doc = doc(vec![
            BlockBody::Heading2(TextBlock {
                text: RichText::plain("Title"),
            }),
            BlockBody::Text(TextBlock {
                text: RichText::plain("Body"),
            }),
        ]);
        let metrics = ViewMetrics::measure(&doc);

        let point = metrics
            .caret_point(&doc, &doc.blocks[1].id, None, 3)
            .unwrap();
        assert_eq!(point.x, 24.0);
        assert_eq!(point.y, 40.0);
    }

    #[test]
    fn test_caret_point_inside_table_cell() {
        let doc = doc(vec![BlockBody::Table(TableBlock::with_size(2, 3))]);
        let metrics = ViewMetrics::measure(&doc);

        let point = metrics
            .caret_point(&doc, &doc.blocks[0].id, Some((1, 2)), 4)
            .unwrap();
        assert_eq!(point.x, 2.0 * 120.0 + 4.0 * 8.0);
        assert_eq!(point.y, 32.0);
    }

    #[test]
    fn test_caret_point_for_nested_toggle_child() {
        let nested = Block::new(BlockBody::Todo(TodoBlock {
            checked: false,
            text: RichText::plain("inner"),
        }));
        let nested_id = nested.id.clone();
        let doc = doc(vec![
            BlockBody::Text(TextBlock::default()),
            BlockBody::Toggle(ToggleBlock {
                summary: RichText::plain("More"),
                children: vec![nested],
            }),
        ]);
        let metrics = ViewMetrics::measure(&doc);

        let point = metrics.caret_point(&doc, &nested_id, None, 0).unwrap();
        // Toggle starts at 32; its first child sits one summary line + gap in
        assert_eq!(point.y, 32.0 + 24.0 + 8.0);
    }

    #[test]
    fn test_caret_point_for_unknown_block_is_none() {
        let doc = doc(vec![BlockBody::Text(TextBlock::default())]);
        let metrics = ViewMetrics::measure(&doc);
        assert!(metrics.caret_point(&doc, "missing", None, 0).is_none());
    }
}
