//! Boundary service: the single owned object the host constructs at startup
//! and hands to the presentation shell's request handlers. No ambient
//! singletons; the store and watcher are shared by reference.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::interface::{ActionOutcome, ClipStashError, HistoryApi, HistoryEntry, NewEntryEvent};
use crate::store::HistoryStore;
use crate::watcher::ClipboardWatcher;

pub struct ClipboardService {
    store: Arc<HistoryStore>,
    watcher: Arc<ClipboardWatcher>,
}

impl ClipboardService {
    pub fn new(store: Arc<HistoryStore>, watcher: Arc<ClipboardWatcher>) -> Self {
        Self { store, watcher }
    }

    /// Push stream of recorded entries, for the shell to refresh its list.
    pub fn subscribe(&self) -> broadcast::Receiver<NewEntryEvent> {
        self.watcher.subscribe()
    }

    pub fn watcher(&self) -> Arc<ClipboardWatcher> {
        Arc::clone(&self.watcher)
    }

    /// Spawn the poll loop on the current runtime. The caller keeps the
    /// token and the handle so shutdown can stop polling before the store
    /// is dropped.
    pub fn spawn_watch_loop(&self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(Arc::clone(&self.watcher).run(cancel))
    }
}

impl HistoryApi for ClipboardService {
    fn get_history(&self) -> Result<Vec<HistoryEntry>, ClipStashError> {
        self.store.list()
    }

    fn clear_history(&self) -> ActionOutcome {
        match self.store.clear() {
            Ok(()) => ActionOutcome::ok(),
            Err(err) => {
                tracing::warn!(%err, "clear history failed");
                ActionOutcome::failed(err)
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> ActionOutcome {
        match self.watcher.request_recopy(text) {
            Ok(()) => ActionOutcome::ok(),
            Err(err) => {
                tracing::warn!(%err, "re-copy to clipboard failed");
                ActionOutcome::failed(err)
            }
        }
    }
}
