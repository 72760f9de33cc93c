//! ClipStash core - clipboard history for a desktop shell.
//!
//! Watches the OS clipboard at a fixed interval, persists a bounded history
//! of copied text snippets to a local SQLite database, and exposes the small
//! request/response + push boundary a presentation window consumes. Window
//! chrome, hotkeys and rendering live entirely on the other side of that
//! boundary.
//!
//! # Architecture
//! - `models`: internal entry representation and preview normalization
//! - `database`: SQLite layer with transactional retention capping
//! - `content_detection`: text / code / link classification
//! - `store`: bounded history store with a degraded (storage-unavailable) mode
//! - `clipboard`: OS clipboard access behind a trait (arboard-backed)
//! - `watcher`: poll loop with one-shot suppression of self-initiated copies
//! - `service`: boundary implementation handed to the presentation shell

pub mod clipboard;
pub mod content_detection;
pub mod database;
pub mod interface;
pub mod models;
pub mod service;
pub mod store;
pub mod watcher;

pub use interface::{
    ActionOutcome, ClipStashError, ContentKind, HistoryApi, HistoryEntry, NewEntryEvent,
};
pub use service::ClipboardService;
pub use store::{HistoryStore, DEFAULT_MAX_ENTRIES};
pub use watcher::{ClipboardWatcher, DEFAULT_POLL_INTERVAL};
