//! Clipboard poll loop: change detection against the last observed text,
//! one-shot suppression of self-initiated writes, and new-entry broadcasts.
//!
//! A single timer-driven task drives all observation. The watcher's state is
//! mutated only through its two entry points, `tick()` and
//! `request_recopy()`; the suppression flag is armed strictly before a
//! re-copy write reaches the OS clipboard, because the poll loop may race the
//! very next tick.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::clipboard::SystemClipboard;
use crate::interface::{ClipStashError, NewEntryEvent};
use crate::store::HistoryStore;

/// Default poll interval. A tunable, not a contract.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct WatchState {
    /// Most recent text seen on the clipboard.
    last_observed: Option<String>,
    /// One-shot flag: the next observed change was caused by our own
    /// re-copy and must not be recorded as new history.
    suppress_next_change: bool,
}

pub struct ClipboardWatcher {
    clipboard: Mutex<Box<dyn SystemClipboard>>,
    state: Mutex<WatchState>,
    store: Arc<HistoryStore>,
    events: broadcast::Sender<NewEntryEvent>,
    poll_interval: Duration,
}

impl ClipboardWatcher {
    pub fn new(
        clipboard: Box<dyn SystemClipboard>,
        store: Arc<HistoryStore>,
        poll_interval: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            clipboard: Mutex::new(clipboard),
            state: Mutex::new(WatchState::default()),
            store,
            events,
            poll_interval,
        }
    }

    /// Subscribe to a notification for every successfully recorded entry.
    pub fn subscribe(&self) -> broadcast::Receiver<NewEntryEvent> {
        self.events.subscribe()
    }

    /// One poll of the clipboard. Errors are logged and swallowed: a failed
    /// read or a failed insert must never stop the loop.
    pub fn tick(&self) {
        let current = match self.clipboard.lock().read_text() {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "clipboard read failed; skipping this poll");
                return;
            }
        };

        if current.trim().is_empty() {
            return;
        }

        let mut state = self.state.lock();
        if state.last_observed.as_deref() == Some(current.as_str()) {
            return;
        }
        state.last_observed = Some(current.clone());

        if state.suppress_next_change {
            // Change was self-inflicted by a re-copy; consume the flag.
            state.suppress_next_change = false;
            return;
        }
        drop(state);

        match self.store.insert(&current) {
            Ok(Some(entry)) => {
                // A send with no live subscribers is fine.
                let _ = self.events.send(NewEntryEvent {
                    text: entry.text,
                    created_at_unix: entry.created_at_unix,
                });
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%err, "failed to record clipboard entry");
            }
        }
    }

    /// Write `text` to the OS clipboard on the user's behalf. Arms the
    /// suppression flag before the write; a failed write disarms it again.
    pub fn request_recopy(&self, text: &str) -> Result<(), ClipStashError> {
        self.state.lock().suppress_next_change = true;

        let result = self.clipboard.lock().write_text(text);
        if let Err(err) = result {
            self.state.lock().suppress_next_change = false;
            return Err(err.into());
        }
        Ok(())
    }

    /// Drive `tick()` at the poll interval until `cancel` fires.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            "clipboard watcher started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.tick(),
            }
        }

        tracing::info!("clipboard watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::store::DEFAULT_MAX_ENTRIES;

    #[derive(Default)]
    struct FakeInner {
        current: String,
        fail_reads: bool,
        fail_writes: bool,
    }

    /// Scripted clipboard: the test sets the "OS" content between ticks.
    #[derive(Clone, Default)]
    struct FakeClipboard(Arc<Mutex<FakeInner>>);

    impl FakeClipboard {
        fn set(&self, text: &str) {
            self.0.lock().current = text.to_string();
        }

        fn fail_reads(&self, fail: bool) {
            self.0.lock().fail_reads = fail;
        }

        fn fail_writes(&self, fail: bool) {
            self.0.lock().fail_writes = fail;
        }

        fn current(&self) -> String {
            self.0.lock().current.clone()
        }
    }

    impl SystemClipboard for FakeClipboard {
        fn read_text(&mut self) -> Result<String, ClipboardError> {
            let inner = self.0.lock();
            if inner.fail_reads {
                return Err(ClipboardError::Access("read unavailable".to_string()));
            }
            Ok(inner.current.clone())
        }

        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            let mut inner = self.0.lock();
            if inner.fail_writes {
                return Err(ClipboardError::Access("write unavailable".to_string()));
            }
            inner.current = text.to_string();
            Ok(())
        }
    }

    fn watcher() -> (Arc<ClipboardWatcher>, FakeClipboard, Arc<HistoryStore>) {
        let clipboard = FakeClipboard::default();
        let store = Arc::new(HistoryStore::open_in_memory(DEFAULT_MAX_ENTRIES).unwrap());
        let watcher = Arc::new(ClipboardWatcher::new(
            Box::new(clipboard.clone()),
            Arc::clone(&store),
            DEFAULT_POLL_INTERVAL,
        ));
        (watcher, clipboard, store)
    }

    fn texts(store: &HistoryStore) -> Vec<String> {
        store
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.text)
            .collect()
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        let (watcher, clipboard, store) = watcher();

        for value in ["a", "a", "b", "b", "b", "c"] {
            clipboard.set(value);
            watcher.tick();
        }

        assert_eq!(texts(&store), vec!["c", "b", "a"]);
    }

    #[test]
    fn repeat_of_older_value_is_recorded_again() {
        let (watcher, clipboard, store) = watcher();

        for value in ["x", "y", "x"] {
            clipboard.set(value);
            watcher.tick();
        }

        // "x" is only collapsed against the immediately preceding observation
        assert_eq!(texts(&store), vec!["x", "y", "x"]);
    }

    #[test]
    fn empty_and_whitespace_values_are_ignored() {
        let (watcher, clipboard, store) = watcher();

        for value in ["", "   ", "\t\n", "real"] {
            clipboard.set(value);
            watcher.tick();
        }

        assert_eq!(texts(&store), vec!["real"]);
    }

    #[test]
    fn recopy_is_not_recorded_as_new_history() {
        let (watcher, clipboard, store) = watcher();

        clipboard.set("original");
        watcher.tick();

        watcher.request_recopy("original from history").unwrap();
        assert_eq!(clipboard.current(), "original from history");

        // Next tick observes our own write: suppressed.
        watcher.tick();
        assert_eq!(texts(&store), vec!["original"]);

        // A genuine external copy afterwards is recorded normally.
        clipboard.set("external");
        watcher.tick();
        assert_eq!(texts(&store), vec!["external", "original"]);
    }

    #[test]
    fn same_text_recopied_externally_later_is_recorded() {
        let (watcher, clipboard, store) = watcher();

        watcher.request_recopy("x").unwrap();
        watcher.tick(); // suppressed
        assert!(texts(&store).is_empty());

        clipboard.set("other");
        watcher.tick();
        clipboard.set("x");
        watcher.tick();

        assert_eq!(texts(&store), vec!["x", "other"]);
    }

    #[test]
    fn read_failure_skips_tick_without_breaking_the_watcher() {
        let (watcher, clipboard, store) = watcher();

        clipboard.fail_reads(true);
        clipboard.set("missed");
        watcher.tick();
        assert!(texts(&store).is_empty());

        clipboard.fail_reads(false);
        watcher.tick();
        assert_eq!(texts(&store), vec!["missed"]);
    }

    #[test]
    fn failed_recopy_disarms_suppression() {
        let (watcher, clipboard, store) = watcher();

        clipboard.fail_writes(true);
        assert!(watcher.request_recopy("never lands").is_err());
        clipboard.fail_writes(false);

        // The next external change must not be swallowed.
        clipboard.set("external");
        watcher.tick();
        assert_eq!(texts(&store), vec!["external"]);
    }

    #[test]
    fn events_fire_on_insert_and_stay_silent_on_suppression() {
        let (watcher, clipboard, _store) = watcher();
        let mut events = watcher.subscribe();

        clipboard.set("first");
        watcher.tick();
        let event = events.try_recv().unwrap();
        assert_eq!(event.text, "first");

        watcher.request_recopy("recopied").unwrap();
        watcher.tick();
        assert!(events.try_recv().is_err());

        // Duplicate observation: no event either.
        watcher.tick();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn storage_failure_does_not_stop_the_loop() {
        let clipboard = FakeClipboard::default();
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("nope").join("history.db");
        let store = Arc::new(HistoryStore::open(&bogus, DEFAULT_MAX_ENTRIES));
        let watcher = ClipboardWatcher::new(
            Box::new(clipboard.clone()),
            Arc::clone(&store),
            DEFAULT_POLL_INTERVAL,
        );

        clipboard.set("goes nowhere");
        watcher.tick(); // must not panic
        clipboard.set("still nowhere");
        watcher.tick();
    }

    #[tokio::test]
    async fn run_loop_records_changes_and_stops_on_cancel() {
        let clipboard = FakeClipboard::default();
        let store = Arc::new(HistoryStore::open_in_memory(DEFAULT_MAX_ENTRIES).unwrap());
        let watcher = Arc::new(ClipboardWatcher::new(
            Box::new(clipboard.clone()),
            Arc::clone(&store),
            Duration::from_millis(10),
        ));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Arc::clone(&watcher).run(cancel.clone()));

        clipboard.set("from the loop");
        tokio::time::sleep(Duration::from_millis(100)).await;

        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(texts(&store), vec!["from the loop"]);
    }
}
