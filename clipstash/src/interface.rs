//! Boundary contract consumed by the presentation shell.
//!
//! The shell (window, list rendering, client-side search and filtering) is an
//! external collaborator; everything it sees is defined here: the three
//! request/response calls on [`HistoryApi`], the [`NewEntryEvent`] push
//! payload, and the serializable record types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a stored snippet, used by the shell to pick a
/// rendering (plain text, highlighted code block, or link).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Code,
    Link,
}

/// One history record as the shell sees it, newest-first in every listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub text: String,
    /// Normalized single-line preview for list display.
    pub preview: String,
    pub kind: ContentKind,
    pub created_at_unix: i64,
}

/// Push notification delivered whenever the watcher records a new entry.
/// Suppressed and rejected clipboard changes produce no event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntryEvent {
    pub text: String,
    pub created_at_unix: i64,
}

/// Result envelope for shell-initiated actions. Failures cross the boundary
/// as data, never as panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl ActionOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
        }
    }
}

/// Error taxonomy surfaced at the boundary.
#[derive(Debug, Error)]
pub enum ClipStashError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("history storage is unavailable")]
    StorageUnavailable,
    #[error("clipboard error: {0}")]
    Clipboard(String),
}

impl From<crate::database::DatabaseError> for ClipStashError {
    fn from(err: crate::database::DatabaseError) -> Self {
        ClipStashError::Storage(err.to_string())
    }
}

impl From<crate::clipboard::ClipboardError> for ClipStashError {
    fn from(err: crate::clipboard::ClipboardError) -> Self {
        ClipStashError::Clipboard(err.to_string())
    }
}

/// Request/response surface the presentation shell calls into.
pub trait HistoryApi {
    /// Full current snapshot, newest first.
    fn get_history(&self) -> Result<Vec<HistoryEntry>, ClipStashError>;

    /// Remove all records. Idempotent.
    fn clear_history(&self) -> ActionOutcome;

    /// Write `text` back to the OS clipboard on the user's behalf without
    /// re-recording it as new history.
    fn copy_to_clipboard(&self, text: &str) -> ActionOutcome;
}
