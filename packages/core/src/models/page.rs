//! Page Data Structures
//!
//! This module defines the core `Page` struct for Notia's document forest.
//!
//! # Architecture
//!
//! - **Forest, not tree**: Multiple root pages; `parent_id` is a back-reference
//!   to another page, not containment
//! - **Soft delete**: Trashing stamps `trashed_at`; the record stays in storage
//!   and is filtered out of every listing
//! - **Wire compatibility**: Serializes to the camelCase record persisted under
//!   the workspace storage slot, timestamps as epoch milliseconds
//!
//! # Examples
//!
//! ```rust
//! use notia_core::models::Page;
//!
//! // Create a root page
//! let root = Page::new();
//! assert_eq!(root.title, "New page");
//! assert!(root.is_root());
//!
//! // Create a child attached to it
//! let child = Page::new_child(root.id.clone());
//! assert_eq!(child.parent_id, Some(root.id.clone()));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Title given to freshly created pages and to stored records missing one
fn default_title() -> String {
    "New page".to_string()
}

/// Validation errors for Page records
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),
}

/// A single page in the document forest.
///
/// # Fields
///
/// - `id`: Unique identifier (UUID), immutable after creation
/// - `title`: Display title; may be empty while the user is still typing it
/// - `icon`: Optional single glyph shown next to the title
/// - `content`: Serialized block document; empty string means the empty
///   document
/// - `created_at`: Creation timestamp, immutable; also the child sort key
/// - `parent_id`: Optional back-reference to the owning page (`None` = root)
/// - `trashed_at`: Set when the page is soft-deleted
///
/// # Stored record migration
///
/// Records written by earlier versions may lack `title`, `content`, or
/// `parentId`; deserialization fills the same defaults the application has
/// always used, so old workspaces load unchanged.
///
/// # Examples
///
/// ```rust
/// # use notia_core::models::Page;
/// let page = Page::new();
/// assert!(page.validate().is_ok());
/// assert!(!page.is_trashed());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Unique identifier (UUID)
    pub id: String,

    /// Display title
    #[serde(default = "default_title")]
    pub title: String,

    /// Optional glyph shown next to the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Serialized block document ("" = empty document)
    #[serde(default)]
    pub content: String,

    /// Creation timestamp (epoch milliseconds on the wire)
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    /// Owning page reference (None = root page)
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Soft-delete timestamp; None while the page is live
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub trashed_at: Option<DateTime<Utc>>,
}

impl Page {
    /// Create a new root page with the standard fresh-page defaults
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use notia_core::models::Page;
    /// let page = Page::new();
    /// assert_eq!(page.title, "New page");
    /// assert_eq!(page.content, "");
    /// assert!(page.parent_id.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: default_title(),
            icon: None,
            content: String::new(),
            created_at: Utc::now(),
            parent_id: None,
            trashed_at: None,
        }
    }

    /// Create a new page attached under `parent_id`.
    ///
    /// The parent is a creation-context reference; whether it refers to a
    /// live page is not checked here or by the service layer.
    pub fn new_child(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::new()
        }
    }

    /// Produce the duplicate of this page: fresh identity, same content,
    /// icon, and parent linkage.
    ///
    /// The copy is always live even when the source is trashed, and its
    /// title is suffixed so the pair can be told apart in listings.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use notia_core::models::Page;
    /// let mut page = Page::new();
    /// page.title = "Notes".to_string();
    ///
    /// let copy = page.duplicated();
    /// assert_eq!(copy.title, "Notes (Copy)");
    /// assert_ne!(copy.id, page.id);
    /// assert!(copy.trashed_at.is_none());
    /// ```
    pub fn duplicated(&self) -> Self {
        let title = if self.title.is_empty() {
            "New page (Copy)".to_string()
        } else {
            format!("{} (Copy)", self.title)
        };

        Self {
            id: Uuid::new_v4().to_string(),
            title,
            icon: self.icon.clone(),
            content: self.content.clone(),
            created_at: Utc::now(),
            parent_id: self.parent_id.clone(),
            trashed_at: None,
        }
    }

    /// Validate page structure
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `id` is empty
    /// - the page references itself as parent
    ///
    /// Titles are allowed to be empty; the user clears the field while
    /// renaming and listings render a placeholder instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if let Some(parent_id) = &self.parent_id {
            if parent_id == &self.id {
                return Err(ValidationError::InvalidParent(
                    "Page cannot be its own parent".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Check if this page is a root page (no parent reference)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this page has been soft-deleted
    pub fn is_trashed(&self) -> bool {
        self.trashed_at.is_some()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_creation() {
        let page = Page::new();

        assert!(!page.id.is_empty());
        assert_eq!(page.title, "New page");
        assert_eq!(page.content, "");
        assert!(page.icon.is_none());
        assert!(page.is_root());
        assert!(!page.is_trashed());
    }

    #[test]
    fn test_child_creation() {
        let root = Page::new();
        let child = Page::new_child(root.id.clone());

        assert_eq!(child.parent_id, Some(root.id.clone()));
        assert!(!child.is_root());
        assert_ne!(child.id, root.id);
    }

    #[test]
    fn test_duplicate_suffixes_title() {
        let mut page = Page::new();
        page.title = "Notes".to_string();
        page.icon = Some("📚".to_string());
        page.content = "serialized".to_string();

        let copy = page.duplicated();

        assert_eq!(copy.title, "Notes (Copy)");
        assert_eq!(copy.icon, page.icon);
        assert_eq!(copy.content, page.content);
        assert_eq!(copy.parent_id, page.parent_id);
        assert_ne!(copy.id, page.id);
    }

    #[test]
    fn test_duplicate_of_untitled_page() {
        let mut page = Page::new();
        page.title = String::new();

        let copy = page.duplicated();

        assert_eq!(copy.title, "New page (Copy)");
    }

    #[test]
    fn test_duplicate_of_trashed_page_is_live() {
        let mut page = Page::new();
        page.trashed_at = Some(Utc::now());

        let copy = page.duplicated();

        assert!(copy.trashed_at.is_none());
    }

    #[test]
    fn test_validation_rejects_self_parent() {
        let mut page = Page::new();
        page.parent_id = Some(page.id.clone());

        assert!(matches!(
            page.validate(),
            Err(ValidationError::InvalidParent(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_id() {
        let mut page = Page::new();
        page.id = String::new();

        assert!(matches!(
            page.validate(),
            Err(ValidationError::MissingField(_))
        ));
    }

    #[test]
    fn test_validation_accepts_empty_title() {
        let mut page = Page::new();
        page.title = String::new();

        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_wire_format_is_camel_case_epoch_millis() {
        let mut page = Page::new();
        page.title = "Journal".to_string();
        page.parent_id = Some("parent-1".to_string());

        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["title"], "Journal");
        assert_eq!(value["parentId"], "parent-1");
        assert!(value["createdAt"].is_i64());
        // Live pages carry no trashedAt key at all
        assert!(value.get("trashedAt").is_none());
        assert!(value.get("icon").is_none());
    }

    #[test]
    fn test_legacy_record_migration_defaults() {
        // Records from early versions may lack title/content/parentId
        let page: Page = serde_json::from_str(
            r#"{ "id": "legacy-1", "createdAt": 1700000000000 }"#,
        )
        .unwrap();

        assert_eq!(page.id, "legacy-1");
        assert_eq!(page.title, "New page");
        assert_eq!(page.content, "");
        assert!(page.parent_id.is_none());
        assert!(page.trashed_at.is_none());
    }

    #[test]
    fn test_round_trip_preserves_trashed_at() {
        let mut page = Page::new();
        page.trashed_at = Some(Utc::now());

        let json = serde_json::to_string(&page).unwrap();
        let back: Page = serde_json::from_str(&json).unwrap();

        assert!(back.is_trashed());
        // Millisecond precision survives the wire
        assert_eq!(
            back.trashed_at.unwrap().timestamp_millis(),
            page.trashed_at.unwrap().timestamp_millis()
        );
    }
}
