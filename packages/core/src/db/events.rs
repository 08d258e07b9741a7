//! Workspace Events
//!
//! This module defines the events emitted by PageService when workspace data
//! changes. These events follow the observer pattern, allowing other parts
//! of the system (like a UI shell) to subscribe to data changes without
//! coupling to the service implementation.
//!
//! # Architecture
//!
//! Events are emitted using tokio's broadcast channel, allowing multiple
//! subscribers to receive notifications asynchronously.
//!
//! # Event Flow
//!
//! 1. PageService performs a workspace mutation (create, move, trash, ...)
//! 2. Workspace event is emitted via broadcast channel
//! 3. All subscribers receive the event asynchronously
//! 4. The embedding shell listens to events and refreshes its page list

use crate::models::Page;
use serde::{Deserialize, Serialize};

/// Which page field an update touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageField {
    Title,
    Icon,
    Content,
}

/// Events emitted whenever the workspace changes.
///
/// Serialized with an internally-tagged format so subscribers outside the
/// crate boundary get `{"type": "pageCreated", ...}` with the payload
/// fields flat beside the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkspaceEvent {
    /// A new page entered the workspace (created, child-created, or duplicated)
    PageCreated(Page),

    /// A page's title, icon, or content was replaced
    PageUpdated {
        #[serde(rename = "pageId")]
        page_id: String,
        field: PageField,
    },

    /// A page was reparented
    PageMoved {
        #[serde(rename = "pageId")]
        page_id: String,
        #[serde(rename = "newParentId")]
        new_parent_id: Option<String>,
    },

    /// A page was moved to the trash
    PageTrashed {
        #[serde(rename = "pageId")]
        page_id: String,
    },

    /// The active page changed; an empty id means no page is active
    CurrentPageChanged {
        #[serde(rename = "pageId")]
        page_id: String,
    },
}

impl WorkspaceEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            WorkspaceEvent::PageCreated(_) => "page:created",
            WorkspaceEvent::PageUpdated { .. } => "page:updated",
            WorkspaceEvent::PageMoved { .. } => "page:moved",
            WorkspaceEvent::PageTrashed { .. } => "page:trashed",
            WorkspaceEvent::CurrentPageChanged { .. } => "current:changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Contract test: Documents and enforces the exact JSON format for
    /// WorkspaceEvent as seen by out-of-crate subscribers.
    ///
    /// Serde's `#[serde(tag = "type")]` produces an INTERNALLY-TAGGED format
    /// where the discriminator field is merged with the payload fields
    /// (NOT nested).
    #[test]
    fn test_workspace_event_serialization_contract() {
        let page = Page::new();
        let created = WorkspaceEvent::PageCreated(page.clone());

        let json = serde_json::to_string(&created).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        // Expected: {"type":"pageCreated","id":"...","title":"New page",...}
        // NOT: {"type":"pageCreated","pageCreated":{...}}
        assert_eq!(parsed.get("type").unwrap(), "pageCreated");
        assert_eq!(parsed.get("id").unwrap(), page.id.as_str());
        assert_eq!(parsed.get("title").unwrap(), "New page");
        assert!(
            parsed.get("pageCreated").is_none(),
            "Should NOT be nested under 'pageCreated' key"
        );

        let moved = WorkspaceEvent::PageMoved {
            page_id: "p-1".to_string(),
            new_parent_id: Some("p-2".to_string()),
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&moved).unwrap()).unwrap();

        assert_eq!(parsed.get("type").unwrap(), "pageMoved");
        assert_eq!(parsed.get("pageId").unwrap(), "p-1");
        assert_eq!(parsed.get("newParentId").unwrap(), "p-2");

        let updated = WorkspaceEvent::PageUpdated {
            page_id: "p-1".to_string(),
            field: PageField::Icon,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&updated).unwrap()).unwrap();

        assert_eq!(parsed.get("type").unwrap(), "pageUpdated");
        assert_eq!(parsed.get("field").unwrap(), "icon");
    }

    #[test]
    fn test_workspace_event_round_trip() {
        let original = WorkspaceEvent::PageMoved {
            page_id: "child".to_string(),
            new_parent_id: None,
        };
        let json = serde_json::to_string(&original).unwrap();
        let deserialized: WorkspaceEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, original);
    }

    #[test]
    fn test_event_type_labels() {
        let trashed = WorkspaceEvent::PageTrashed {
            page_id: "p-1".to_string(),
        };
        assert_eq!(trashed.event_type(), "page:trashed");

        let current = WorkspaceEvent::CurrentPageChanged {
            page_id: String::new(),
        };
        assert_eq!(current.event_type(), "current:changed");
    }
}
