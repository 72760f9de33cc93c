//! SQLite layer for the bounded clipboard history.
//!
//! One table, retention-capped at insert time. All access goes through a
//! single mutex; interleaved insert-and-evict and clear are not safe to run
//! concurrently, so callers above never see the connection directly.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use thiserror::Error;

use crate::interface::ContentKind;
use crate::models::StoredEntry;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Timestamp storage format. The fractional part keeps rapid sequential
/// inserts distinguishable; lexicographic order matches chronological order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse a stored timestamp, tolerating rows written without fractions.
fn parse_db_timestamp(raw: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or_else(|_| Utc::now())
}

fn kind_to_db(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Text => "text",
        ContentKind::Code => "code",
        ContentKind::Link => "link",
    }
}

fn kind_from_db(raw: &str) -> ContentKind {
    match raw {
        "code" => ContentKind::Code,
        "link" => ContentKind::Link,
        _ => ContentKind::Text,
    }
}

/// Thread-safe database wrapper.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        ",
        )?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.setup_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing and `--in-memory` runs).
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.setup_schema()?;
        Ok(db)
    }

    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.conn.lock();

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS clipboard_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                kind TEXT NOT NULL DEFAULT 'text',
                created_at DATETIME NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_history_created_at ON clipboard_history(created_at)",
            [],
        )?;

        Ok(())
    }

    /// Insert a new entry and enforce the retention cap in the same
    /// transaction: everything outside the newest `max_entries` rows is
    /// evicted before the commit. Returns the new row ID.
    pub fn insert_entry(&self, entry: &StoredEntry, max_entries: usize) -> DatabaseResult<i64> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let created_at = entry.created_at.format(TIMESTAMP_FORMAT).to_string();
        tx.execute(
            "INSERT INTO clipboard_history (text, kind, created_at) VALUES (?1, ?2, ?3)",
            params![entry.text, kind_to_db(entry.kind), created_at],
        )?;
        let id = tx.last_insert_rowid();

        let count: i64 =
            tx.query_row("SELECT COUNT(*) FROM clipboard_history", [], |row| {
                row.get(0)
            })?;
        if count > max_entries as i64 {
            tx.execute(
                r#"
                DELETE FROM clipboard_history WHERE id NOT IN (
                    SELECT id FROM clipboard_history
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?1
                )
                "#,
                [max_entries as i64],
            )?;
        }

        tx.commit()?;
        Ok(id)
    }

    /// Fetch every entry, newest first. The id tiebreak keeps same-timestamp
    /// rows in insertion order.
    pub fn fetch_all(&self) -> DatabaseResult<Vec<StoredEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, text, kind, created_at FROM clipboard_history
             ORDER BY created_at DESC, id DESC",
        )?;
        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn count_entries(&self) -> DatabaseResult<u64> {
        let conn = self.conn.lock();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM clipboard_history", [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }

    /// Delete all entries unconditionally.
    pub fn clear_all(&self) -> DatabaseResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM clipboard_history", [])?;
        Ok(())
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<StoredEntry> {
        let id: i64 = row.get(0)?;
        let text: String = row.get(1)?;
        let kind: String = row.get(2)?;
        let created_at: String = row.get(3)?;

        Ok(StoredEntry {
            id: Some(id),
            text,
            kind: kind_from_db(&kind),
            created_at: parse_db_timestamp(&created_at),
        })
    }
}
