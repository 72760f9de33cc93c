//! Internal entry representation and preview normalization.

use chrono::{DateTime, Utc};

use crate::content_detection::detect_kind;
use crate::interface::{ContentKind, HistoryEntry, NewEntryEvent};

/// Preview length for list display, in characters.
pub const PREVIEW_MAX_CHARS: usize = 200;

/// Internal history record. `id` stays `None` until the database assigns one;
/// records are immutable after insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub id: Option<i64>,
    pub text: String,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
}

impl StoredEntry {
    /// Create a new entry from clipboard text, classifying it and stamping
    /// the creation time. Input validation happens in the store.
    pub fn new_text(text: String) -> Self {
        let kind = detect_kind(&text);
        Self {
            id: None,
            text,
            kind,
            created_at: Utc::now(),
        }
    }

    /// Convert to the boundary record type.
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id.unwrap_or(0),
            preview: normalize_preview(&self.text, PREVIEW_MAX_CHARS),
            text: self.text.clone(),
            kind: self.kind,
            created_at_unix: self.created_at.timestamp(),
        }
    }

    /// Convert to the push-notification payload.
    pub fn to_event(&self) -> NewEntryEvent {
        NewEntryEvent {
            text: self.text.clone(),
            created_at_unix: self.created_at.timestamp(),
        }
    }
}

/// Normalize text for list preview: drop leading whitespace, collapse
/// whitespace runs (including newlines and tabs) to a single space, truncate
/// at `max_chars` with an ellipsis, and trim trailing spaces.
pub fn normalize_preview(text: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(max_chars.min(text.len()) + 4);
    let mut count = 0usize;
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            // Leading whitespace is dropped entirely; interior runs collapse.
            pending_space = count > 0;
            continue;
        }
        if pending_space {
            if count >= max_chars {
                out.push('…');
                return out;
            }
            out.push(' ');
            count += 1;
            pending_space = false;
        }
        if count >= max_chars {
            out.push('…');
            return out;
        }
        out.push(ch);
        count += 1;
    }

    out
}
