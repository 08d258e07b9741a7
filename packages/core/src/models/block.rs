//! Block Document Structures
//!
//! This module defines the block tree that backs a page's `content` field.
//! The tree is the authoritative document model: structural edits operate on
//! it directly and the persisted content string is its JSON serialization.
//!
//! # Architecture
//!
//! - **Typed blocks**: One payload struct per block family, joined under the
//!   internally-tagged [`BlockBody`] enum (`{"type": "heading-1", ...}`)
//! - **Inline runs**: [`RichText`] is an ordered list of spans carrying
//!   bold/italic/underline marks
//! - **Lossy-load tolerance**: Malformed or legacy content degrades to the
//!   empty document instead of failing the open
//!
//! # Examples
//!
//! ```rust
//! use notia_core::models::{Block, BlockBody, BlockDocument, RichText, TextBlock};
//!
//! let mut doc = BlockDocument::default();
//! doc.blocks.push(Block::new(BlockBody::Text(TextBlock {
//!     text: RichText::plain("Hello"),
//! })));
//!
//! let stored = doc.to_content();
//! let reloaded = BlockDocument::from_content(&stored);
//! assert_eq!(reloaded, doc);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn is_false(v: &bool) -> bool {
    !*v
}

fn default_col_span() -> u32 {
    1
}

fn is_default_col_span(v: &u32) -> bool {
    *v == 1
}

/// Inline formatting toggled by the editor toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

/// Mark set carried by one span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marks {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

impl Marks {
    /// True when no mark is set (the span renders as plain text)
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }

    pub fn contains(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
        }
    }
}

/// One run of identically-formatted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,

    #[serde(default, skip_serializing_if = "Marks::is_plain")]
    pub marks: Marks,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }
}

/// Ordered spans forming one inline run.
///
/// Offsets into a run are always counted in characters, matching how the
/// caret moves, so multi-byte text never lands an edit mid-glyph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText {
    pub spans: Vec<Span>,
}

impl RichText {
    /// Build a run holding one unmarked span ("" builds the empty run)
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![Span::plain(text)],
        }
    }

    /// Concatenated text of all spans, marks dropped
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Total length in characters
    pub fn char_len(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    /// Insert plain text at a character offset.
    ///
    /// The inserted text inherits the marks of the span it lands in; at a
    /// span boundary the left neighbour wins, which is what typing after
    /// formatted text does. Offsets past the end append.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }

        if self.spans.is_empty() {
            self.spans.push(Span::plain(text));
            return;
        }

        let mut acc = 0;
        for span in &mut self.spans {
            let len = span.text.chars().count();
            if offset <= acc + len {
                let local = offset - acc;
                let byte = char_to_byte(&span.text, local);
                span.text.insert_str(byte, text);
                return;
            }
            acc += len;
        }

        if let Some(last) = self.spans.last_mut() {
            last.text.push_str(text);
        }
    }

    /// Append another run, merging adjacent spans with equal marks
    pub fn append(&mut self, mut other: RichText) {
        self.spans.append(&mut other.spans);
        self.coalesce();
    }

    /// Toggle a mark over a character range.
    ///
    /// If every character in the range already carries the mark it is
    /// removed, otherwise it is applied to the whole range. Empty or
    /// out-of-range selections are left alone.
    pub fn toggle_mark(&mut self, start: usize, end: usize, mark: Mark) {
        let len = self.char_len();
        if start >= end || start >= len {
            return;
        }
        let end = end.min(len);

        self.split_at(start);
        self.split_at(end);

        let mut fully_marked = true;
        let mut acc = 0;
        for span in &self.spans {
            let span_len = span.text.chars().count();
            let overlaps = acc < end && acc + span_len > start;
            if overlaps && span_len > 0 && !span.marks.contains(mark) {
                fully_marked = false;
            }
            acc += span_len;
        }

        let enable = !fully_marked;
        let mut acc = 0;
        for span in &mut self.spans {
            let span_len = span.text.chars().count();
            if acc >= start && acc + span_len <= end {
                span.marks.set(mark, enable);
            }
            acc += span_len;
        }

        self.coalesce();
    }

    /// Split the span containing `offset` so that a span boundary falls
    /// exactly there. No-op when the offset already sits on a boundary.
    fn split_at(&mut self, offset: usize) {
        let mut acc = 0;
        for i in 0..self.spans.len() {
            let len = self.spans[i].text.chars().count();
            if offset > acc && offset < acc + len {
                let byte = char_to_byte(&self.spans[i].text, offset - acc);
                let rest = self.spans[i].text.split_off(byte);
                let marks = self.spans[i].marks;
                self.spans.insert(i + 1, Span { text: rest, marks });
                return;
            }
            acc += len;
        }
    }

    /// Drop empty spans and merge neighbours with identical marks
    fn coalesce(&mut self) {
        self.spans.retain(|s| !s.text.is_empty());

        let mut i = 0;
        while i + 1 < self.spans.len() {
            if self.spans[i].marks == self.spans[i + 1].marks {
                let next = self.spans.remove(i + 1);
                self.spans[i].text.push_str(&next.text);
            } else {
                i += 1;
            }
        }
    }
}

fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

/// Block type vocabulary (the palette's insertable kinds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletedItem,
    NumberedItem,
    Todo,
    Toggle,
    PageReference,
    Callout,
    Quote,
    Table,
    Divider,
    Image,
    Audio,
    Link,
    Video,
}

impl BlockKind {
    /// The stored type tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Heading1 => "heading-1",
            BlockKind::Heading2 => "heading-2",
            BlockKind::Heading3 => "heading-3",
            BlockKind::BulletedItem => "bulleted-item",
            BlockKind::NumberedItem => "numbered-item",
            BlockKind::Todo => "todo",
            BlockKind::Toggle => "toggle",
            BlockKind::PageReference => "page-reference",
            BlockKind::Callout => "callout",
            BlockKind::Quote => "quote",
            BlockKind::Table => "table",
            BlockKind::Divider => "divider",
            BlockKind::Image => "image",
            BlockKind::Audio => "audio",
            BlockKind::Link => "link",
            BlockKind::Video => "video",
        }
    }
}

/// Where a media block's bytes come from.
///
/// Local sources are transient handles to a file the user picked this
/// session; they do not survive a reload and the host revokes them on
/// teardown. Remote sources are plain addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MediaSource {
    Local { url: String },
    Remote { url: String },
}

impl MediaSource {
    pub fn url(&self) -> &str {
        match self {
            MediaSource::Local { url } | MediaSource::Remote { url } => url,
        }
    }
}

/// Payload for plain inline-run blocks (paragraphs, headings, list items,
/// quotes)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: RichText,
}

/// Payload for checkable to-do items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoBlock {
    #[serde(default, skip_serializing_if = "is_false")]
    pub checked: bool,
    pub text: RichText,
}

/// Payload for collapsible toggle lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBlock {
    pub summary: RichText,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// Payload for embedded page references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRefBlock {
    pub page_id: String,
    pub title: String,
}

/// Payload for callouts (glyph + inline run)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalloutBlock {
    pub icon: String,
    pub text: RichText,
}

/// Payload for media embeds (image, audio, video)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaBlock {
    pub source: MediaSource,
}

/// Payload for inline links with display text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBlock {
    pub url: String,
    pub text: String,
}

/// One table cell: an inline run plus an optional column span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub content: RichText,

    /// Horizontal span; 1 (the default) is omitted on the wire
    #[serde(
        default = "default_col_span",
        skip_serializing_if = "is_default_col_span"
    )]
    pub col_span: u32,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            content: RichText::default(),
            col_span: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Payload for table blocks: a 2-D grid of cells.
///
/// Row and column deletion intentionally carry no emptiness guard; the
/// grid may shrink to zero rows or columns and still round-trips.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    pub rows: Vec<TableRow>,
}

impl TableBlock {
    /// Build a rows x cols grid of empty cells
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows)
                .map(|_| TableRow {
                    cells: (0..cols).map(|_| TableCell::default()).collect(),
                })
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count of the first row (the reference width for new rows)
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// Append a row of blank cells matching the first row's column count
    /// (one cell when the table has no usable first row)
    pub fn add_row(&mut self) {
        let cols = self.column_count().max(1);
        self.rows.push(TableRow {
            cells: (0..cols).map(|_| TableCell::default()).collect(),
        });
    }

    /// Append one blank cell to every existing row
    pub fn add_column(&mut self) {
        for row in &mut self.rows {
            row.cells.push(TableCell::default());
        }
    }

    /// Remove the row at `index`; false when out of bounds
    pub fn delete_row(&mut self, index: usize) -> bool {
        if index < self.rows.len() {
            self.rows.remove(index);
            true
        } else {
            false
        }
    }

    /// Remove the cell at `index` from every row that has one
    pub fn delete_column(&mut self, index: usize) -> bool {
        let mut changed = false;
        for row in &mut self.rows {
            if index < row.cells.len() {
                row.cells.remove(index);
                changed = true;
            }
        }
        changed
    }

    /// Merge the cell at (row, col) with its next sibling, falling back to
    /// its previous sibling. The earlier cell in document order survives
    /// with the concatenated content and the summed span. Single-cell rows
    /// are left alone.
    pub fn merge_cells(&mut self, row: usize, col: usize) -> bool {
        let Some(cells) = self.rows.get_mut(row).map(|r| &mut r.cells) else {
            return false;
        };
        if col >= cells.len() {
            return false;
        }

        if col + 1 < cells.len() {
            let consumed = cells.remove(col + 1);
            let target = &mut cells[col];
            target.col_span += consumed.col_span;
            target.content.append(consumed.content);
            true
        } else if col > 0 {
            let consumed = cells.remove(col);
            let target = &mut cells[col - 1];
            target.col_span += consumed.col_span;
            target.content.append(consumed.content);
            true
        } else {
            false
        }
    }
}

/// Typed content of one block, tagged on the wire as `{"type": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockBody {
    Text(TextBlock),
    #[serde(rename = "heading-1")]
    Heading1(TextBlock),
    #[serde(rename = "heading-2")]
    Heading2(TextBlock),
    #[serde(rename = "heading-3")]
    Heading3(TextBlock),
    BulletedItem(TextBlock),
    NumberedItem(TextBlock),
    Todo(TodoBlock),
    Toggle(ToggleBlock),
    PageReference(PageRefBlock),
    Callout(CalloutBlock),
    Quote(TextBlock),
    Table(TableBlock),
    Divider,
    Image(MediaBlock),
    Audio(MediaBlock),
    Link(LinkBlock),
    Video(MediaBlock),
}

impl BlockBody {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBody::Text(_) => BlockKind::Text,
            BlockBody::Heading1(_) => BlockKind::Heading1,
            BlockBody::Heading2(_) => BlockKind::Heading2,
            BlockBody::Heading3(_) => BlockKind::Heading3,
            BlockBody::BulletedItem(_) => BlockKind::BulletedItem,
            BlockBody::NumberedItem(_) => BlockKind::NumberedItem,
            BlockBody::Todo(_) => BlockKind::Todo,
            BlockBody::Toggle(_) => BlockKind::Toggle,
            BlockBody::PageReference(_) => BlockKind::PageReference,
            BlockBody::Callout(_) => BlockKind::Callout,
            BlockBody::Quote(_) => BlockKind::Quote,
            BlockBody::Table(_) => BlockKind::Table,
            BlockBody::Divider => BlockKind::Divider,
            BlockBody::Image(_) => BlockKind::Image,
            BlockBody::Audio(_) => BlockKind::Audio,
            BlockBody::Link(_) => BlockKind::Link,
            BlockBody::Video(_) => BlockKind::Video,
        }
    }

    /// The editable inline run of this block, if it has one
    pub fn rich_text_mut(&mut self) -> Option<&mut RichText> {
        match self {
            BlockBody::Text(b)
            | BlockBody::Heading1(b)
            | BlockBody::Heading2(b)
            | BlockBody::Heading3(b)
            | BlockBody::BulletedItem(b)
            | BlockBody::NumberedItem(b)
            | BlockBody::Quote(b) => Some(&mut b.text),
            BlockBody::Todo(b) => Some(&mut b.text),
            BlockBody::Toggle(b) => Some(&mut b.summary),
            BlockBody::Callout(b) => Some(&mut b.text),
            _ => None,
        }
    }

    /// Immutable view of [`rich_text_mut`](Self::rich_text_mut)
    pub fn rich_text(&self) -> Option<&RichText> {
        match self {
            BlockBody::Text(b)
            | BlockBody::Heading1(b)
            | BlockBody::Heading2(b)
            | BlockBody::Heading3(b)
            | BlockBody::BulletedItem(b)
            | BlockBody::NumberedItem(b)
            | BlockBody::Quote(b) => Some(&b.text),
            BlockBody::Todo(b) => Some(&b.text),
            BlockBody::Toggle(b) => Some(&b.summary),
            BlockBody::Callout(b) => Some(&b.text),
            _ => None,
        }
    }
}

/// One block: stable identity plus typed content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,

    #[serde(flatten)]
    pub body: BlockBody,
}

impl Block {
    pub fn new(body: BlockBody) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            body,
        }
    }

    /// Fresh empty paragraph (the block every insertion is followed by)
    pub fn paragraph() -> Self {
        Self::new(BlockBody::Text(TextBlock::default()))
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }
}

/// The ordered block tree of one open page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockDocument {
    pub blocks: Vec<Block>,
}

impl BlockDocument {
    /// Deserialize a page's stored content.
    ///
    /// The empty string is the empty document; anything unparseable also
    /// degrades to the empty document so a damaged page still opens.
    pub fn from_content(content: &str) -> Self {
        Self::try_from_content(content).unwrap_or_default()
    }

    /// Deserialize a page's stored content, surfacing parse failures.
    ///
    /// Callers that want to log before degrading use this instead of
    /// [`from_content`](Self::from_content).
    pub fn try_from_content(content: &str) -> Result<Self, serde_json::Error> {
        if content.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content)
    }

    /// Serialize for the page's content field
    pub fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_block(s: &str) -> Block {
        Block::new(BlockBody::Text(TextBlock {
            text: RichText::plain(s),
        }))
    }

    #[test]
    fn test_rich_text_insert_inherits_left_marks() {
        let mut run = RichText {
            spans: vec![
                Span {
                    text: "bold".to_string(),
                    marks: Marks {
                        bold: true,
                        ..Default::default()
                    },
                },
                Span::plain(" tail"),
            ],
        };

        // Insert at the boundary right after "bold"
        run.insert(4, "er");

        assert_eq!(run.text(), "bolder tail");
        assert!(run.spans[0].marks.bold);
        assert_eq!(run.spans[0].text, "bolder");
    }

    #[test]
    fn test_rich_text_insert_past_end_appends() {
        let mut run = RichText::plain("ab");
        run.insert(99, "c");
        assert_eq!(run.text(), "abc");
    }

    #[test]
    fn test_rich_text_insert_into_empty() {
        let mut run = RichText::default();
        run.insert(0, "hi");
        assert_eq!(run.text(), "hi");
        assert!(run.spans[0].marks.is_plain());
    }

    #[test]
    fn test_toggle_mark_applies_and_splits() {
        let mut run = RichText::plain("hello world");
        run.toggle_mark(0, 5, Mark::Bold);

        assert_eq!(run.spans.len(), 2);
        assert_eq!(run.spans[0].text, "hello");
        assert!(run.spans[0].marks.bold);
        assert_eq!(run.spans[1].text, " world");
        assert!(!run.spans[1].marks.bold);
    }

    #[test]
    fn test_toggle_mark_removes_when_fully_marked() {
        let mut run = RichText::plain("hello");
        run.toggle_mark(0, 5, Mark::Italic);
        assert!(run.spans[0].marks.italic);

        run.toggle_mark(0, 5, Mark::Italic);
        assert!(run.spans[0].marks.is_plain());
        // Coalesced back into a single span
        assert_eq!(run.spans.len(), 1);
    }

    #[test]
    fn test_toggle_mark_mixed_range_marks_everything() {
        let mut run = RichText::plain("abcdef");
        run.toggle_mark(0, 3, Mark::Bold);
        // Range covers marked "abc" and plain "de": not fully marked, so apply
        run.toggle_mark(0, 5, Mark::Bold);

        assert!(run.spans[0].marks.bold);
        assert_eq!(run.spans[0].text, "abcde");
        assert_eq!(run.spans[1].text, "f");
    }

    #[test]
    fn test_toggle_mark_ignores_empty_selection() {
        let mut run = RichText::plain("abc");
        run.toggle_mark(2, 2, Mark::Bold);
        run.toggle_mark(5, 9, Mark::Bold);
        assert!(run.spans[0].marks.is_plain());
    }

    #[test]
    fn test_multibyte_offsets_stay_on_char_boundaries() {
        let mut run = RichText::plain("héllo");
        run.insert(2, "X");
        assert_eq!(run.text(), "héXllo");

        run.toggle_mark(0, 2, Mark::Bold);
        assert_eq!(run.spans[0].text, "hé");
        assert!(run.spans[0].marks.bold);
    }

    #[test]
    fn test_table_add_row_clones_first_row_width() {
        let mut table = TableBlock::with_size(2, 3);
        table.add_row();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[2].cells.len(), 3);
        assert!(table.rows[2].cells.iter().all(|c| c.content.is_empty()));
    }

    #[test]
    fn test_table_add_row_to_empty_table() {
        let mut table = TableBlock::default();
        table.add_row();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].cells.len(), 1);
    }

    #[test]
    fn test_table_add_column_extends_every_row() {
        let mut table = TableBlock::with_size(3, 3);
        table.add_column();

        assert_eq!(table.row_count(), 3);
        assert!(table.rows.iter().all(|r| r.cells.len() == 4));
    }

    #[test]
    fn test_table_delete_column_keeps_rows_consistent() {
        let mut table = TableBlock::with_size(3, 3);
        for (r, row) in table.rows.iter_mut().enumerate() {
            for (c, cell) in row.cells.iter_mut().enumerate() {
                cell.content = RichText::plain(format!("{}-{}", r, c));
            }
        }

        assert!(table.delete_column(1));

        for (r, row) in table.rows.iter().enumerate() {
            assert_eq!(row.cells.len(), 2);
            assert_eq!(row.cells[0].content.text(), format!("{}-0", r));
            assert_eq!(row.cells[1].content.text(), format!("{}-2", r));
        }
    }

    #[test]
    fn test_table_can_shrink_to_empty() {
        let mut table = TableBlock::with_size(1, 1);
        assert!(table.delete_row(0));
        assert_eq!(table.row_count(), 0);
        assert!(!table.delete_row(0));
    }

    #[test]
    fn test_merge_cells_prefers_next_sibling() {
        let mut table = TableBlock::with_size(1, 3);
        table.cell_mut(0, 0).unwrap().content = RichText::plain("a");
        table.cell_mut(0, 1).unwrap().content = RichText::plain("b");

        assert!(table.merge_cells(0, 0));

        let row = &table.rows[0];
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cells[0].content.text(), "ab");
        assert_eq!(row.cells[0].col_span, 2);
    }

    #[test]
    fn test_merge_cells_falls_back_to_previous() {
        let mut table = TableBlock::with_size(1, 2);
        table.cell_mut(0, 0).unwrap().content = RichText::plain("left");
        table.cell_mut(0, 1).unwrap().content = RichText::plain("last");

        // Last cell of the row: merges into the previous one
        assert!(table.merge_cells(0, 1));

        let row = &table.rows[0];
        assert_eq!(row.cells.len(), 1);
        assert_eq!(row.cells[0].content.text(), "leftlast");
        assert_eq!(row.cells[0].col_span, 2);
    }

    #[test]
    fn test_merge_cells_single_cell_row_is_noop() {
        let mut table = TableBlock::with_size(1, 1);
        assert!(!table.merge_cells(0, 0));
        assert_eq!(table.rows[0].cells.len(), 1);
    }

    #[test]
    fn test_merge_cells_sums_existing_spans() {
        let mut table = TableBlock::with_size(1, 3);
        table.cell_mut(0, 1).unwrap().col_span = 2;

        assert!(table.merge_cells(0, 0));
        assert_eq!(table.rows[0].cells[0].col_span, 3);
    }

    #[test]
    fn test_block_wire_format() {
        let block = Block::new(BlockBody::Heading1(TextBlock {
            text: RichText::plain("Title"),
        }));

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "heading-1");
        assert_eq!(value["text"][0]["text"], "Title");
        assert!(value["id"].is_string());

        let block = Block::new(BlockBody::PageReference(PageRefBlock {
            page_id: "p-1".to_string(),
            title: "New page".to_string(),
        }));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "page-reference");
        assert_eq!(value["pageId"], "p-1");

        let block = Block::new(BlockBody::Divider);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "divider");
    }

    #[test]
    fn test_media_source_wire_format() {
        let remote = MediaSource::Remote {
            url: "https://example.com/a.png".to_string(),
        };
        let value = serde_json::to_value(&remote).unwrap();
        assert_eq!(value["kind"], "remote");

        let local = MediaSource::Local {
            url: "blob:1234".to_string(),
        };
        let value = serde_json::to_value(&local).unwrap();
        assert_eq!(value["kind"], "local");
    }

    #[test]
    fn test_document_round_trip() {
        let mut doc = BlockDocument::default();
        doc.blocks.push(text_block("one"));
        doc.blocks.push(Block::new(BlockBody::Table(TableBlock::with_size(2, 2))));
        doc.blocks.push(Block::new(BlockBody::Todo(TodoBlock {
            checked: true,
            text: RichText::plain("done"),
        })));

        let stored = doc.to_content();
        let reloaded = BlockDocument::from_content(&stored);

        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_empty_and_malformed_content_degrade_to_empty_document() {
        assert!(BlockDocument::from_content("").is_empty());
        assert!(BlockDocument::from_content("<p>legacy html</p>").is_empty());
        assert!(BlockDocument::from_content("{not json").is_empty());
    }

    #[test]
    fn test_cell_span_defaults_off_the_wire() {
        let json = r#"[{"id":"b1","type":"table","rows":[{"cells":[{"content":[]}]}]}]"#;
        let doc = BlockDocument::from_content(json);

        match &doc.blocks[0].body {
            BlockBody::Table(table) => {
                assert_eq!(table.cell(0, 0).unwrap().col_span, 1);
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }
}
