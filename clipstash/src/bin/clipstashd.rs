//! Host daemon: owns the store and the watcher, logs recorded entries, and
//! shuts down in order (poll loop first, storage handle last).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use clipstash::clipboard::ArboardClipboard;
use clipstash::{ClipboardService, ClipboardWatcher, HistoryApi, HistoryStore};

#[derive(Parser, Debug)]
#[command(name = "clipstashd", about = "Clipboard history daemon")]
struct Args {
    /// Database path. Defaults to the per-user application data directory.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Clipboard poll interval in milliseconds.
    #[arg(long, default_value_t = 500)]
    poll_interval_ms: u64,

    /// Maximum number of history entries to retain.
    #[arg(long, default_value_t = 100)]
    max_entries: usize,

    /// Keep history in memory only; nothing touches disk.
    #[arg(long)]
    in_memory: bool,
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "clipstash")
        .context("could not determine a per-user data directory")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    Ok(data_dir.join("clipstash.db"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let store = if args.in_memory {
        HistoryStore::open_in_memory(args.max_entries)?
    } else {
        let path = match args.db_path {
            Some(ref path) => path.clone(),
            None => default_db_path()?,
        };
        tracing::info!(path = %path.display(), "opening history database");
        // A failed open leaves the store disabled; the daemon keeps running
        // so re-copy requests from the shell still work.
        HistoryStore::open(&path, args.max_entries)
    };
    let store = Arc::new(store);

    let clipboard = ArboardClipboard::new()
        .map_err(|err| anyhow::anyhow!("cannot access the OS clipboard: {err}"))?;

    let watcher = Arc::new(ClipboardWatcher::new(
        Box::new(clipboard),
        Arc::clone(&store),
        Duration::from_millis(args.poll_interval_ms),
    ));
    let service = ClipboardService::new(Arc::clone(&store), watcher);

    let mut events = service.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(payload) => tracing::info!(%payload, "new clipboard entry"),
                Err(err) => tracing::warn!(%err, "failed to encode entry event"),
            }
        }
    });

    let existing = service.get_history().map(|h| h.len()).unwrap_or(0);
    tracing::info!(entries = existing, "clipstashd running; Ctrl-C to stop");

    let cancel = CancellationToken::new();
    let watch_loop = service.spawn_watch_loop(cancel.clone());

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutting down");

    // Stop polling before the store drops, so no insert races a closed handle.
    cancel.cancel();
    let _ = watch_loop.await;

    Ok(())
}
