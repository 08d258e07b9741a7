//! Editor Session - Wiring for One Open Page
//!
//! [`EditorSession`] composes the three stateful pieces of the editing
//! surface: the injected [`PageService`] (workspace state and persistence),
//! a [`DocumentEditor`] over the open page's block tree, and the
//! [`CompletionAssistant`] fed by the interaction stream.
//!
//! # Event Flow
//!
//! 1. The host forwards typing, caret moves, palette picks, and drops here.
//! 2. Every content-changing call serializes the document and writes it
//!    through the page store (synchronous autosave, no batching).
//! 3. Every interaction re-reads the caret context and hands the text
//!    before the caret to the assistant, which debounces lookups.
//! 4. Accepted suggestions come back through [`accept_suggestion`]
//!    (EditorSession::accept_suggestion) as a plain text insertion.
//!
//! Navigation tears the assistant down before the next page loads, so a
//! lookup started on one page can never surface on another.

use std::sync::Arc;

use notia_assist::SuggestionClient;

use crate::editor::palette::{self, PaletteAction, PaletteEntry};
use crate::editor::{CellAddress, DocumentEditor, TextRange};
use crate::models::{
    BlockBody, BlockDocument, BlockKind, LinkBlock, Mark, MediaBlock, MediaSource, Page,
    PageRefBlock,
};
use crate::services::{CompletionAssistant, PageService, SuggestionAnchor};

/// One open page being edited.
///
/// All mutating calls are synchronous; persistence writes and suggestion
/// lookups are spawned and never block the editing surface. Construct
/// within a tokio runtime.
pub struct EditorSession {
    pages: Arc<PageService>,
    assistant: CompletionAssistant,
    editor: DocumentEditor,
    page_id: String,
}

impl EditorSession {
    /// Open `page_id` for editing and make it the current page.
    ///
    /// The page's stored content is parsed into the block tree; unreadable
    /// content is logged and opens as an empty document rather than
    /// failing. Returns `None` when the page is unknown or trashed.
    pub fn open(
        pages: Arc<PageService>,
        client: Arc<dyn SuggestionClient>,
        page_id: &str,
    ) -> Option<Self> {
        let page = pages.page(page_id)?;
        let session = Self {
            assistant: CompletionAssistant::new(client),
            editor: DocumentEditor::new(load_document(&page)),
            page_id: page.id,
            pages,
        };
        session.pages.set_current_page(&session.page_id);

        Some(session)
    }

    /// Switch this session to another page.
    ///
    /// Pending suggestion work for the old page is cancelled first. False
    /// when the target is unknown or trashed; the session then stays on
    /// its current page.
    pub fn open_page(&mut self, page_id: &str) -> bool {
        let Some(page) = self.pages.page(page_id) else {
            tracing::debug!("Ignoring navigation to unknown page {}", page_id);
            return false;
        };

        self.assistant.shutdown();
        self.editor = DocumentEditor::new(load_document(&page));
        self.page_id = page.id;
        self.pages.set_current_page(&self.page_id);
        true
    }

    /// Tear the session down: cancel pending suggestion work and flush the
    /// workspace to storage
    pub async fn close(self) -> anyhow::Result<()> {
        self.assistant.shutdown();
        self.pages.save_now().await
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn pages(&self) -> &PageService {
        &self.pages
    }

    pub fn editor(&self) -> &DocumentEditor {
        &self.editor
    }

    pub fn assistant(&self) -> &CompletionAssistant {
        &self.assistant
    }

    // === Interaction stream ===

    /// Type text at the caret
    pub fn insert_text(&mut self, text: &str) -> bool {
        if !self.editor.insert_text(text) {
            return false;
        }
        self.after_content_change();
        true
    }

    /// Move the caret (key navigation, pointer release)
    pub fn set_caret(&mut self, block_id: &str, cell: Option<CellAddress>, offset: usize) -> bool {
        if !self.editor.set_caret(block_id, cell, offset) {
            return false;
        }
        self.notify_assistant();
        true
    }

    /// Capture the caret before a focus-stealing control opens
    pub fn save_selection(&mut self) {
        self.editor.save_selection();
    }

    /// Toggle bold/italic/underline over a selection in the caret's run
    pub fn toggle_mark(&mut self, mark: Mark, range: TextRange) -> bool {
        if !self.editor.toggle_mark_at_caret(mark, range) {
            return false;
        }
        self.after_content_change();
        true
    }

    /// Check or uncheck a to-do item
    pub fn set_todo_checked(&mut self, block_id: &str, checked: bool) -> bool {
        if !self.editor.set_todo_checked(block_id, checked) {
            return false;
        }
        self.autosave();
        true
    }

    /// Drop a dragged block at vertical position `y`.
    ///
    /// The block under `y` becomes the target; its upper half places the
    /// dragged block above it, the lower half below. Past the last block
    /// the dragged block lands at the end.
    pub fn drop_block(&mut self, dragged_id: &str, y: f64) -> bool {
        let metrics = self.editor.view_metrics();
        let Some((target_id, edge)) = metrics.drop_target(y) else {
            return false;
        };
        let target_id = target_id.to_string();

        if !self.editor.reorder_block(dragged_id, &target_id, edge) {
            return false;
        }
        self.after_content_change();
        true
    }

    // === Palette ===

    /// Palette entries matching `filter`, honoring whether the caret sits
    /// in a table
    pub fn palette_entries(&self, filter: &str) -> Vec<&'static PaletteEntry> {
        let in_table = self.editor.caret_context().map_or(false, |ctx| ctx.in_table);
        palette::entries(filter, in_table)
    }

    /// Run a palette entry by key.
    ///
    /// Self-contained block types insert immediately; table commands act
    /// on the saved selection. Entries that need host-collected input
    /// first (media, link, page reference, the glyph picker) report false
    /// here and come through the dedicated insert calls instead.
    pub fn insert_from_palette(&mut self, key: &str) -> bool {
        let Some(entry) = palette::entry(key) else {
            tracing::debug!("Ignoring unknown palette entry {}", key);
            return false;
        };

        let changed = match entry.action {
            PaletteAction::Insert(kind) => match palette::default_body(kind) {
                Some(body) => {
                    self.editor.insert_block(body);
                    true
                }
                None => false,
            },
            PaletteAction::InlineGlyph => false,
            PaletteAction::AddTableRow => self.editor.add_table_row(),
            PaletteAction::AddTableColumn => self.editor.add_table_column(),
            PaletteAction::DeleteTableRow => self.editor.delete_table_row(),
            PaletteAction::DeleteTableColumn => self.editor.delete_table_column(),
            PaletteAction::MergeTableCells => self.editor.merge_table_cells(),
        };

        if changed {
            self.after_content_change();
        }
        changed
    }

    /// Create a child page of the open page and embed a reference to it.
    ///
    /// The child becomes the workspace's current page per the page store's
    /// creation contract; this session stays on the open page until the
    /// host navigates.
    pub fn insert_page_reference(&mut self) -> Page {
        let child = self.pages.create_child_page(&self.page_id);
        self.editor.insert_block(BlockBody::PageReference(PageRefBlock {
            page_id: child.id.clone(),
            title: child.title.clone(),
        }));
        self.after_content_change();
        child
    }

    /// Insert a media block once the host has resolved a source
    pub fn insert_media(&mut self, kind: BlockKind, source: MediaSource) -> bool {
        let body = match kind {
            BlockKind::Image => BlockBody::Image(MediaBlock { source }),
            BlockKind::Audio => BlockBody::Audio(MediaBlock { source }),
            BlockKind::Video => BlockBody::Video(MediaBlock { source }),
            _ => {
                tracing::debug!("Ignoring media insert for kind {}", kind.as_str());
                return false;
            }
        };

        self.editor.insert_block(body);
        self.after_content_change();
        true
    }

    /// Insert a link block; the display text defaults to the address
    pub fn insert_link(&mut self, url: &str, text: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        let text = if text.is_empty() { url } else { text };

        self.editor.insert_block(BlockBody::Link(LinkBlock {
            url: url.to_string(),
            text: text.to_string(),
        }));
        self.after_content_change();
        true
    }

    /// Insert a picked symbol as inline text at the caret
    pub fn insert_icon_glyph(&mut self, glyph: &str) -> bool {
        self.insert_text(glyph)
    }

    // === Suggestions ===

    /// Accept the visible suggestion: insert its text at the caret,
    /// advance past it, and persist. False when nothing is showing.
    pub fn accept_suggestion(&mut self) -> bool {
        let Some(text) = self.assistant.accept() else {
            return false;
        };

        if self.editor.insert_text(&text) {
            self.autosave();
        }
        true
    }

    /// Dismiss the visible suggestion without touching the document
    pub fn dismiss_suggestion(&self) {
        self.assistant.dismiss();
    }

    // === Internal ===

    fn after_content_change(&self) {
        self.autosave();
        self.notify_assistant();
    }

    fn autosave(&self) {
        self.pages
            .update_page_content(&self.page_id, &self.editor.to_content());
    }

    fn notify_assistant(&self) {
        match self.editor.caret_context() {
            Some(ctx) => self.assistant.notify_caret(
                &ctx.text_before_caret,
                SuggestionAnchor {
                    x: ctx.position.x,
                    y: ctx.position.y,
                },
            ),
            None => self.assistant.notify_caret("", SuggestionAnchor::default()),
        }
    }
}

/// Parse a page's stored content, logging and opening the empty document
/// when it cannot be read
fn load_document(page: &Page) -> BlockDocument {
    match BlockDocument::try_from_content(&page.content) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Failed to parse content of page {}: {}", page.id, e);
            BlockDocument::default()
        }
    }
}
