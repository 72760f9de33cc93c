//! Bounded, ordered history store.
//!
//! Wraps the database with input validation, the retention cap, and a
//! degraded mode: if the database cannot be opened the store stays alive but
//! disabled, so the host process (and its window) keeps running while every
//! history operation reports `StorageUnavailable`.

use std::path::Path;
use std::sync::Arc;

use crate::database::Database;
use crate::interface::{ClipStashError, HistoryEntry};
use crate::models::StoredEntry;

/// Default retention cap.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

pub struct HistoryStore {
    db: Option<Arc<Database>>,
    max_entries: usize,
}

impl HistoryStore {
    /// Open the store at `path`. An open failure is logged and leaves the
    /// store disabled rather than failing the host.
    pub fn open<P: AsRef<Path>>(path: P, max_entries: usize) -> Self {
        match Database::open(&path) {
            Ok(db) => Self {
                db: Some(Arc::new(db)),
                max_entries,
            },
            Err(err) => {
                tracing::error!(
                    path = %path.as_ref().display(),
                    %err,
                    "failed to open history database; history is disabled"
                );
                Self {
                    db: None,
                    max_entries,
                }
            }
        }
    }

    /// In-memory store for tests and `--in-memory` runs.
    pub fn open_in_memory(max_entries: usize) -> Result<Self, ClipStashError> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Some(Arc::new(db)),
            max_entries,
        })
    }

    pub fn is_available(&self) -> bool {
        self.db.is_some()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn db(&self) -> Result<&Database, ClipStashError> {
        self.db
            .as_deref()
            .ok_or(ClipStashError::StorageUnavailable)
    }

    /// Insert clipboard text as a new record. Empty or whitespace-only input
    /// is rejected locally as a no-op (`Ok(None)`), not surfaced as a
    /// failure. Eviction past the cap happens inside the same database
    /// transaction as the insert.
    pub fn insert(&self, text: &str) -> Result<Option<HistoryEntry>, ClipStashError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let db = self.db()?;
        let mut entry = StoredEntry::new_text(text.to_string());
        let id = db.insert_entry(&entry, self.max_entries)?;
        entry.id = Some(id);
        tracing::debug!(id, kind = ?entry.kind, "recorded clipboard entry");
        Ok(Some(entry.to_history_entry()))
    }

    /// Full snapshot, newest first. An empty store is an empty vec.
    pub fn list(&self) -> Result<Vec<HistoryEntry>, ClipStashError> {
        let entries = self.db()?.fetch_all()?;
        Ok(entries.iter().map(StoredEntry::to_history_entry).collect())
    }

    /// Remove all records. Idempotent.
    pub fn clear(&self) -> Result<(), ClipStashError> {
        self.db()?.clear_all()?;
        tracing::info!("cleared clipboard history");
        Ok(())
    }

    pub fn count(&self) -> Result<u64, ClipStashError> {
        self.db()?.count_entries().map_err(Into::into)
    }
}
