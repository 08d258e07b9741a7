//! Storage Error Types
//!
//! This module defines error types for workspace persistence, providing
//! clear error handling for slot access, encoding, and filesystem failures.

use std::path::PathBuf;
use thiserror::Error;

/// Workspace storage errors
///
/// Covers all error cases for reading and writing the persisted workspace
/// slot. Callers treat these as recoverable: a failed load falls back to a
/// fresh workspace and a failed save leaves the in-memory state untouched.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write the slot file
    #[error("Failed to access workspace slot at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to encode or decode the workspace snapshot
    #[error("Failed to encode workspace snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage root is not a usable directory
    #[error("Invalid storage path: {path}")]
    InvalidPath { path: PathBuf },
}

impl StoreError {
    /// Create an I/O error with the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::InvalidPath { path: path.into() }
    }
}
