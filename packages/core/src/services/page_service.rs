//! Page Service - Workspace Operations
//!
//! This module provides the main business logic layer for page operations:
//!
//! - Page lifecycle (create, create child, duplicate, trash)
//! - Hierarchy management (move with cycle rejection)
//! - Field updates (title, icon, content)
//! - Current-page tracking with trash-aware fallback
//!
//! # Failure Policy
//!
//! Workspace mutations never fail from the caller's point of view. Invalid
//! requests (unknown ids, cycle-creating moves) degrade to no-ops, and
//! persistence runs as spawned fire-and-forget saves whose errors are
//! logged, never surfaced. Callers who need durability confirmation use
//! [`PageService::save_now`].
//!
//! # Ordering
//!
//! The page list is newest-first: every created or duplicated page is
//! prepended. Hierarchy is carried entirely by parent back-references, so
//! the flat list order doubles as the sibling order within every parent.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use chrono::Utc;
use tokio::sync::broadcast;

use crate::db::{PageField, WorkspaceEvent, WorkspaceSnapshot, WorkspaceStore};
use crate::models::Page;

/// Broadcast channel capacity for workspace events.
///
/// 128 provides sufficient headroom for burst operations (a page trash
/// cascading into a current-page change, rapid typing driving content
/// updates) while limiting memory overhead. Observer lag is acceptable,
/// subscribers only mirror current state.
const WORKSPACE_EVENT_CHANNEL_CAPACITY: usize = 128;

/// In-memory workspace: the page list plus the active page id.
///
/// `current_page_id` holds the raw tracked id, which may be empty (no
/// active page) or dangling (page since trashed); [`PageService::current_page`]
/// resolves both cases on read.
struct WorkspaceState {
    pages: Vec<Page>,
    current_page_id: String,
}

/// Business logic for the page workspace
///
/// Holds the authoritative in-memory page list and funnels every change
/// through one mutation path: lock, mutate, emit event, schedule save.
/// The service is shared behind an `Arc`; all methods take `&self`.
///
/// # Examples
///
/// ```rust,no_run
/// use notia_core::db::MemoryStore;
/// use notia_core::services::PageService;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let service = PageService::load_or_default(Arc::new(MemoryStore::new())).await;
///
///     let page = service.create_page();
///     service.update_page_title(&page.id, "Reading list");
///
///     assert_eq!(service.current_page().unwrap().title, "Reading list");
/// }
/// ```
pub struct PageService {
    /// Authoritative workspace state; guarded critical sections never await
    state: RwLock<WorkspaceState>,

    /// Persistence backend for whole-snapshot saves
    store: Arc<dyn WorkspaceStore>,

    /// Broadcast channel for workspace events (128 subscriber capacity)
    event_tx: broadcast::Sender<WorkspaceEvent>,
}

impl PageService {
    /// Load the persisted workspace, falling back to a fresh one.
    ///
    /// This constructor never fails. A missing slot, an unreadable slot,
    /// or a snapshot with no pages all produce a fresh workspace holding a
    /// single untitled root page, which is persisted immediately so the
    /// slot exists from then on.
    ///
    /// A loaded snapshot with an empty `currentPageId` falls back to its
    /// first non-trashed page (or the first page outright when everything
    /// is trashed).
    pub async fn load_or_default(store: Arc<dyn WorkspaceStore>) -> Self {
        let loaded = match store.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Failed to load workspace, starting fresh: {:#}", e);
                None
            }
        };

        let (state, fresh) = match loaded {
            Some(snapshot) if !snapshot.is_empty() => {
                let current_page_id = if snapshot.current_page_id.is_empty() {
                    let first_active = snapshot
                        .pages
                        .iter()
                        .find(|p| !p.is_trashed())
                        .unwrap_or(&snapshot.pages[0]);
                    first_active.id.clone()
                } else {
                    snapshot.current_page_id.clone()
                };

                tracing::debug!("Loaded workspace with {} pages", snapshot.pages.len());
                (
                    WorkspaceState {
                        pages: snapshot.pages,
                        current_page_id,
                    },
                    false,
                )
            }
            _ => {
                let page = Page::new();
                let current_page_id = page.id.clone();
                (
                    WorkspaceState {
                        pages: vec![page],
                        current_page_id,
                    },
                    true,
                )
            }
        };

        let (event_tx, _) = broadcast::channel(WORKSPACE_EVENT_CHANNEL_CAPACITY);
        let service = Self {
            state: RwLock::new(state),
            store,
            event_tx,
        };

        if fresh {
            service.schedule_save();
        }

        service
    }

    /// Subscribe to workspace events
    ///
    /// Returns a broadcast receiver that receives all workspace events
    /// (page created, updated, moved, trashed, current page changed).
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.event_tx.subscribe()
    }

    //
    // PAGE LIFECYCLE
    //

    /// Create a new untitled root page.
    ///
    /// The page is prepended to the list and becomes the current page.
    /// Returns a clone of the created page.
    pub fn create_page(&self) -> Page {
        self.insert_page(Page::new())
    }

    /// Create a new untitled page under `parent_id`.
    ///
    /// The parent id is recorded as given; it is not checked against the
    /// page list, so a caller racing a trash operation still gets a page.
    /// The page is prepended and becomes current.
    pub fn create_child_page(&self, parent_id: &str) -> Page {
        self.insert_page(Page::new_child(parent_id))
    }

    /// Duplicate a page.
    ///
    /// The copy keeps the source's icon, content, and parent, gets a fresh
    /// id and creation time, and takes the source's title with a " (Copy)"
    /// suffix (untitled sources yield "New page (Copy)"). A trashed source
    /// can be duplicated; the copy is never trashed. The copy is prepended
    /// and becomes current.
    ///
    /// Returns `None` when no page has the given id.
    pub fn duplicate_page(&self, id: &str) -> Option<Page> {
        let copy = {
            let state = self.read_state();
            let source = state.pages.iter().find(|p| p.id == id)?;
            source.duplicated()
        };

        Some(self.insert_page(copy))
    }

    /// Move a page to the trash.
    ///
    /// Trashing stamps `trashed_at`; the page stays in the list and keeps
    /// its children, which remain visible. When the trashed page was
    /// current, the newest remaining non-trashed page becomes current (or
    /// no page, when none remain). Unknown ids are ignored.
    pub fn trash_page(&self, id: &str) {
        let (trashed, current_change) = {
            let mut state = self.write_state();
            let Some(page) = state.pages.iter_mut().find(|p| p.id == id) else {
                return;
            };
            page.trashed_at = Some(Utc::now());

            let current_change = if state.current_page_id == id {
                let next = state
                    .pages
                    .iter()
                    .find(|p| p.id != id && !p.is_trashed())
                    .map(|p| p.id.clone())
                    .unwrap_or_default();
                state.current_page_id = next.clone();
                Some(next)
            } else {
                None
            };

            (id.to_string(), current_change)
        };

        self.emit_event(WorkspaceEvent::PageTrashed { page_id: trashed });
        if let Some(next) = current_change {
            self.emit_event(WorkspaceEvent::CurrentPageChanged { page_id: next });
        }
        self.schedule_save();
    }

    //
    // HIERARCHY
    //

    /// Reparent a page.
    ///
    /// `new_parent_id` of `None` moves the page to the root level, which
    /// is always allowed. Moves that would make a page its own ancestor
    /// (onto itself or onto any of its descendants, trashed ones included)
    /// are rejected. The target parent is otherwise not validated.
    ///
    /// Returns `true` when the page was reparented, `false` when the move
    /// was rejected or the page does not exist.
    pub fn move_page(&self, id: &str, new_parent_id: Option<&str>) -> bool {
        let moved = {
            let mut state = self.write_state();

            if new_parent_id == Some(id) {
                return false;
            }

            if let Some(target) = new_parent_id {
                if descendant_ids(&state.pages, id).contains(target) {
                    return false;
                }
            }

            let Some(page) = state.pages.iter_mut().find(|p| p.id == id) else {
                return false;
            };
            page.parent_id = new_parent_id.map(String::from);

            WorkspaceEvent::PageMoved {
                page_id: id.to_string(),
                new_parent_id: new_parent_id.map(String::from),
            }
        };

        self.emit_event(moved);
        self.schedule_save();
        true
    }

    //
    // FIELD UPDATES
    //

    /// Replace a page's title. Unknown ids are ignored.
    pub fn update_page_title(&self, id: &str, title: &str) {
        self.update_field(id, PageField::Title, |page| {
            page.title = title.to_string();
        });
    }

    /// Replace or clear a page's icon. Unknown ids are ignored.
    pub fn update_page_icon(&self, id: &str, icon: Option<&str>) {
        self.update_field(id, PageField::Icon, |page| {
            page.icon = icon.map(String::from);
        });
    }

    /// Replace a page's serialized content. Unknown ids are ignored.
    pub fn update_page_content(&self, id: &str, content: &str) {
        self.update_field(id, PageField::Content, |page| {
            page.content = content.to_string();
        });
    }

    //
    // CURRENT PAGE
    //

    /// Make a page current.
    ///
    /// Only existing, non-trashed pages can become current; other ids are
    /// logged and ignored.
    pub fn set_current_page(&self, id: &str) {
        {
            let mut state = self.write_state();
            let valid = state
                .pages
                .iter()
                .any(|p| p.id == id && !p.is_trashed());
            if !valid {
                tracing::debug!("Ignoring current-page change to unknown page {}", id);
                return;
            }
            if state.current_page_id == id {
                return;
            }
            state.current_page_id = id.to_string();
        }

        self.emit_event(WorkspaceEvent::CurrentPageChanged {
            page_id: id.to_string(),
        });
        self.schedule_save();
    }

    //
    // READ ACCESSORS
    //

    /// Pages that are not in the trash, newest first
    pub fn pages(&self) -> Vec<Page> {
        self.read_state()
            .pages
            .iter()
            .filter(|p| !p.is_trashed())
            .cloned()
            .collect()
    }

    /// Pages currently in the trash, newest first
    pub fn trashed_pages(&self) -> Vec<Page> {
        self.read_state()
            .pages
            .iter()
            .filter(|p| p.is_trashed())
            .cloned()
            .collect()
    }

    /// Non-trashed root pages by descending creation time (the sidebar's
    /// top level)
    pub fn root_pages(&self) -> Vec<Page> {
        let mut roots: Vec<Page> = self
            .read_state()
            .pages
            .iter()
            .filter(|p| !p.is_trashed() && p.is_root())
            .cloned()
            .collect();
        roots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        roots
    }

    /// Non-trashed children of a page by descending creation time
    pub fn child_pages(&self, parent_id: &str) -> Vec<Page> {
        let mut children: Vec<Page> = self
            .read_state()
            .pages
            .iter()
            .filter(|p| !p.is_trashed() && p.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        children
    }

    /// Look up one non-trashed page by id
    pub fn page(&self, id: &str) -> Option<Page> {
        self.read_state()
            .pages
            .iter()
            .find(|p| p.id == id && !p.is_trashed())
            .cloned()
    }

    /// The page the workspace considers open.
    ///
    /// Resolves the tracked id against the non-trashed pages; a dangling
    /// or empty tracked id falls back to the newest non-trashed page.
    /// `None` only when every page is trashed.
    pub fn current_page(&self) -> Option<Page> {
        let state = self.read_state();
        let active: Vec<&Page> = state.pages.iter().filter(|p| !p.is_trashed()).collect();

        active
            .iter()
            .find(|p| p.id == state.current_page_id)
            .or_else(|| active.first())
            .map(|p| (*p).clone())
    }

    /// The raw tracked current-page id; empty when no page is active
    pub fn current_page_id(&self) -> String {
        self.read_state().current_page_id.clone()
    }

    //
    // PERSISTENCE
    //

    /// Persist the workspace and wait for the result.
    ///
    /// Mutations already schedule their own saves; this exists for
    /// shutdown paths and tests that need to observe the slot.
    pub async fn save_now(&self) -> Result<()> {
        let Some(snapshot) = self.snapshot() else {
            return Ok(());
        };
        self.store.save(&snapshot).await
    }

    /// Prepend a page, make it current, emit, and save
    fn insert_page(&self, page: Page) -> Page {
        {
            let mut state = self.write_state();
            state.pages.insert(0, page.clone());
            state.current_page_id = page.id.clone();
        }

        self.emit_event(WorkspaceEvent::PageCreated(page.clone()));
        self.emit_event(WorkspaceEvent::CurrentPageChanged {
            page_id: page.id.clone(),
        });
        self.schedule_save();

        page
    }

    /// Shared body of the three field updates
    fn update_field(&self, id: &str, field: PageField, apply: impl FnOnce(&mut Page)) {
        {
            let mut state = self.write_state();
            let Some(page) = state.pages.iter_mut().find(|p| p.id == id) else {
                return;
            };
            apply(page);
        }

        self.emit_event(WorkspaceEvent::PageUpdated {
            page_id: id.to_string(),
            field,
        });
        self.schedule_save();
    }

    /// Current state as a snapshot; `None` when there is nothing to save
    fn snapshot(&self) -> Option<WorkspaceSnapshot> {
        let state = self.read_state();
        if state.pages.is_empty() {
            return None;
        }
        Some(WorkspaceSnapshot {
            pages: state.pages.clone(),
            current_page_id: state.current_page_id.clone(),
        })
    }

    /// Spawn a fire-and-forget save of the current state.
    ///
    /// Failures are logged, never surfaced; the in-memory workspace stays
    /// authoritative regardless.
    fn schedule_save(&self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.save(&snapshot).await {
                tracing::warn!("Failed to persist workspace: {:#}", e);
            }
        });
    }

    /// Emit a workspace event to all subscribers
    ///
    /// Ignores errors if no subscribers (expected in some tests).
    fn emit_event(&self, event: WorkspaceEvent) {
        tracing::debug!("Emitting {}", event.event_type());
        let _ = self.event_tx.send(event);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, WorkspaceState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, WorkspaceState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Collect the ids of every page in `id`'s subtree, trashed pages
/// included. Walks child links iteratively with a visited set, so cyclic
/// parent data (possible after a bad import) cannot hang the service.
fn descendant_ids(pages: &[Page], id: &str) -> std::collections::HashSet<String> {
    use std::collections::HashSet;

    let mut descendants = HashSet::new();
    let mut stack = vec![id.to_string()];

    while let Some(parent) = stack.pop() {
        for page in pages {
            if page.parent_id.as_deref() == Some(parent.as_str())
                && descendants.insert(page.id.clone())
            {
                stack.push(page.id.clone());
            }
        }
    }

    descendants
}
