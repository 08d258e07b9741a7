//! Integration tests for the page forest
//!
//! Tests cover:
//! - Sidebar projections (roots and children) across mixed mutations
//! - Duplication of live and trashed pages
//! - Subtree moves and cycle rejection
//! - The workspace event transcript for a mutation burst
//! - Degraded handling of unknown page ids

use anyhow::Result;
use notia_core::db::{MemoryStore, PageField, WorkspaceEvent};
use notia_core::models::{Block, BlockBody, BlockDocument, Page, RichText, TextBlock};
use notia_core::services::PageService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::timeout;

/// Test helper: Workspace service over an empty in-memory store
async fn fresh_service() -> PageService {
    PageService::load_or_default(Arc::new(MemoryStore::new())).await
}

/// Test helper: Create a root page and name it
fn create_titled(service: &PageService, title: &str) -> Page {
    let page = service.create_page();
    service.update_page_title(&page.id, title);
    service.page(&page.id).unwrap()
}

/// Test helper: Create a child page and name it
fn create_titled_child(service: &PageService, parent_id: &str, title: &str) -> Page {
    let page = service.create_child_page(parent_id);
    service.update_page_title(&page.id, title);
    service.page(&page.id).unwrap()
}

/// Test helper: Serialized one-paragraph document
fn paragraph_content(text: &str) -> String {
    let mut doc = BlockDocument::default();
    doc.blocks.push(Block::new(BlockBody::Text(TextBlock {
        text: RichText::plain(text),
    })));
    doc.to_content()
}

/// Test helper: Wait for the next workspace event
async fn next_event(rx: &mut broadcast::Receiver<WorkspaceEvent>) -> Result<WorkspaceEvent> {
    Ok(timeout(Duration::from_secs(1), rx.recv()).await??)
}

// =========================================================================
// Sidebar Projection Tests
// =========================================================================

#[tokio::test]
async fn test_sidebar_projection_tracks_the_forest() {
    let service = fresh_service().await;
    let seeded = service.current_page().unwrap();

    let notes = create_titled(&service, "Notes");
    let journal = create_titled(&service, "Journal");
    let shopping = create_titled_child(&service, &notes.id, "Shopping");
    let travel = create_titled_child(&service, &notes.id, "Travel");

    // Roots newest-first, children kept off the top level
    let roots: Vec<String> = service.root_pages().into_iter().map(|p| p.id).collect();
    assert_eq!(
        roots,
        vec![journal.id.clone(), notes.id.clone(), seeded.id.clone()]
    );

    let children: Vec<String> = service
        .child_pages(&notes.id)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(children, vec![travel.id.clone(), shopping.id.clone()]);

    // Promoting a child to the top level rewires both projections
    assert!(service.move_page(&travel.id, None));
    let roots: Vec<String> = service.root_pages().into_iter().map(|p| p.id).collect();
    assert_eq!(
        roots,
        vec![
            travel.id.clone(),
            journal.id.clone(),
            notes.id.clone(),
            seeded.id.clone()
        ]
    );
    assert_eq!(service.child_pages(&notes.id).len(), 1);

    // Trashing drops a page from the projections without touching siblings
    service.trash_page(&shopping.id);
    assert!(service.child_pages(&notes.id).is_empty());
    assert_eq!(service.trashed_pages()[0].id, shopping.id);
}

#[tokio::test]
async fn test_trashed_parent_leaves_children_reachable() {
    let service = fresh_service().await;
    let parent = create_titled(&service, "Projects");
    let child = create_titled_child(&service, &parent.id, "Kitchen");

    service.trash_page(&parent.id);

    // The parent vanished from the top level
    assert!(service.root_pages().iter().all(|p| p.id != parent.id));

    // Its child is still listed under it and still opens
    let children = service.child_pages(&parent.id);
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, child.id);
    assert!(service.page(&child.id).is_some());
}

// =========================================================================
// Duplication Tests
// =========================================================================

#[tokio::test]
async fn test_duplicating_a_trashed_page_restores_its_content() {
    let service = fresh_service().await;

    let drafts = create_titled(&service, "Drafts");
    service.update_page_icon(&drafts.id, Some("✏️"));
    service.update_page_content(&drafts.id, &paragraph_content("Half-finished thought"));
    service.trash_page(&drafts.id);
    assert!(service.page(&drafts.id).is_none());

    let copy = service.duplicate_page(&drafts.id).unwrap();

    assert_eq!(copy.title, "Drafts (Copy)");
    assert_eq!(copy.icon.as_deref(), Some("✏️"));
    assert!(!copy.is_trashed());
    assert_eq!(service.current_page_id(), copy.id);

    // The copy carries the full block document
    let restored = BlockDocument::from_content(&copy.content);
    assert_eq!(restored.blocks.len(), 1);
    assert_eq!(
        restored.blocks[0].body.rich_text().unwrap().text(),
        "Half-finished thought"
    );

    // The source stays in the trash
    assert_eq!(service.trashed_pages().len(), 1);
    assert_eq!(service.trashed_pages()[0].id, drafts.id);
}

#[tokio::test]
async fn test_duplicate_of_a_child_stays_under_the_same_parent() {
    let service = fresh_service().await;
    let parent = create_titled(&service, "Recipes");
    let child = create_titled_child(&service, &parent.id, "Soup");

    let copy = service.duplicate_page(&child.id).unwrap();

    assert_eq!(copy.parent_id.as_deref(), Some(parent.id.as_str()));
    let siblings = service.child_pages(&parent.id);
    assert_eq!(siblings.len(), 2);
    assert_eq!(siblings[0].id, copy.id);
}

// =========================================================================
// Subtree Move Tests
// =========================================================================

#[tokio::test]
async fn test_reorganizing_a_subtree() {
    let service = fresh_service().await;
    let a = create_titled(&service, "A");
    let b = create_titled_child(&service, &a.id, "B");
    let c = create_titled_child(&service, &a.id, "C");
    let d = create_titled_child(&service, &b.id, "D");

    // A sideways move between siblings' subtrees is allowed
    assert!(service.move_page(&d.id, Some(&c.id)));

    // The root still cannot be folded into its own subtree
    assert!(!service.move_page(&a.id, Some(&d.id)));
    assert!(service.page(&a.id).unwrap().is_root());

    // Lifting a branch out to the top level is always allowed
    assert!(service.move_page(&b.id, None));

    let a_children: Vec<String> = service
        .child_pages(&a.id)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(a_children, vec![c.id.clone()]);
    assert_eq!(service.child_pages(&c.id)[0].id, d.id);
    assert!(service.page(&b.id).unwrap().is_root());
}

// =========================================================================
// Event Transcript Tests
// =========================================================================

#[tokio::test]
async fn test_mutation_burst_emits_ordered_transcript() -> Result<()> {
    let service = fresh_service().await;
    let seeded = service.current_page().unwrap();
    let mut rx = service.subscribe_to_events();

    let page = service.create_page();
    service.update_page_title(&page.id, "Log");
    service.update_page_icon(&page.id, Some("📝"));
    assert!(service.move_page(&page.id, Some(&seeded.id)));
    service.trash_page(&page.id);

    match next_event(&mut rx).await? {
        WorkspaceEvent::PageCreated(created) => assert_eq!(created.id, page.id),
        other => panic!("Expected PageCreated, got {:?}", other),
    }
    assert_eq!(
        next_event(&mut rx).await?,
        WorkspaceEvent::CurrentPageChanged {
            page_id: page.id.clone()
        }
    );
    assert_eq!(
        next_event(&mut rx).await?,
        WorkspaceEvent::PageUpdated {
            page_id: page.id.clone(),
            field: PageField::Title
        }
    );
    assert_eq!(
        next_event(&mut rx).await?,
        WorkspaceEvent::PageUpdated {
            page_id: page.id.clone(),
            field: PageField::Icon
        }
    );
    assert_eq!(
        next_event(&mut rx).await?,
        WorkspaceEvent::PageMoved {
            page_id: page.id.clone(),
            new_parent_id: Some(seeded.id.clone())
        }
    );
    assert_eq!(
        next_event(&mut rx).await?,
        WorkspaceEvent::PageTrashed {
            page_id: page.id.clone()
        }
    );

    // Trashing the current page hands the selection back
    assert_eq!(
        next_event(&mut rx).await?,
        WorkspaceEvent::CurrentPageChanged {
            page_id: seeded.id.clone()
        }
    );
    Ok(())
}

// =========================================================================
// Degraded Input Tests
// =========================================================================

#[tokio::test]
async fn test_unknown_ids_leave_the_workspace_untouched() {
    let service = fresh_service().await;
    let mut rx = service.subscribe_to_events();
    let before = service.pages();
    let current = service.current_page_id();

    service.update_page_title("missing", "Ghost");
    service.update_page_icon("missing", Some("👻"));
    service.update_page_content("missing", "[]");
    service.trash_page("missing");
    service.set_current_page("missing");
    assert!(!service.move_page("missing", None));
    assert!(service.duplicate_page("missing").is_none());

    assert_eq!(service.pages(), before);
    assert_eq!(service.current_page_id(), current);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}
