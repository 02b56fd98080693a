//! SQLite lead store.
//!
//! The `leads` table is append-only: this module exposes insert and
//! newest-first listing, never update or delete.  Every call goes straight
//! to the database; nothing is cached in memory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::submission::ContactSubmission;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    LockPoisoned,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Sqlite(e) => write!(f, "sqlite error: {e}"),
            StorageError::Io(e) => write!(f, "io error: {e}"),
            StorageError::LockPoisoned => write!(f, "database handle poisoned by a panicked writer"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Sqlite(e)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A stored lead, as returned by [`LeadStore::list_recent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Nullable in the schema; rows written by this crate always carry one.
    pub source: Option<String>,
    /// ISO 8601 UTC, assigned at insert time.
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Store handle
// ---------------------------------------------------------------------------

/// Clonable handle to the lead database.
///
/// All clones share one connection; the mutex serialises writers so each
/// insert gets its own id atomically.
#[derive(Clone)]
pub struct LeadStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl LeadStore {
    /// Open or create the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory database with the schema in place.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory()?)),
            path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// On-disk location, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Create the `leads` table if it does not exist yet.  Safe to call any
    /// number of times.
    pub fn initialize(&self) -> Result<(), StorageError> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS leads (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL,
                message     TEXT NOT NULL,
                source      TEXT,
                created_at  TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Insert a validated submission. Returns the new lead id.
    ///
    /// `created_at` is stamped here, not taken from the caller.
    pub fn insert(&self, submission: &ContactSubmission) -> Result<i64, StorageError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO leads (name, email, message, source, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                submission.name,
                submission.email,
                submission.message,
                submission.source,
                created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Up to `limit` leads, newest (highest id) first.
    pub fn list_recent(&self, limit: u32) -> Result<Vec<LeadRow>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, email, message, source, created_at
             FROM leads ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(LeadRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                message: row.get(3)?,
                source: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            message: "hello".to_string(),
            source: "website".to_string(),
        }
    }

    fn temp_db_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("techline-leads-{tag}-{}-{nanos}", std::process::id()))
            .join("leads.db")
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = LeadStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();

        let id = store.insert(&submission("Ada")).unwrap();
        assert_eq!(id, 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let store = LeadStore::open_in_memory().unwrap();
        let ids: Vec<i64> = (0..10)
            .map(|i| store.insert(&submission(&format!("N{i}"))).unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
        assert_eq!(ids[0], 1);
    }

    #[test]
    fn test_list_recent_order_and_bound() {
        let store = LeadStore::open_in_memory().unwrap();
        for name in ["A", "B", "C", "D", "E"] {
            store.insert(&submission(name)).unwrap();
        }

        let top3: Vec<i64> = store.list_recent(3).unwrap().iter().map(|l| l.id).collect();
        assert_eq!(top3, vec![5, 4, 3]);

        let all = store.list_recent(100).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(
            all.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![5, 4, 3, 2, 1]
        );
        assert_eq!(all[0].name, "E");
    }

    #[test]
    fn test_insert_stamps_created_at_and_source() {
        let store = LeadStore::open_in_memory().unwrap();
        let before = Utc::now();
        store.insert(&submission("Ada")).unwrap();

        let lead = &store.list_recent(1).unwrap()[0];
        assert_eq!(lead.source.as_deref(), Some("website"));
        assert!(lead.created_at.ends_with('Z'));
        let stamped = chrono::DateTime::parse_from_rfc3339(&lead.created_at).unwrap();
        assert!(stamped >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_db_path("reopen");
        {
            let store = LeadStore::open(&path).unwrap();
            store.insert(&submission("Ada")).unwrap();
            store.insert(&submission("Bob")).unwrap();
        }
        let store = LeadStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.insert(&submission("Cy")).unwrap(), 3);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_ids_not_reused_after_external_delete() {
        let store = LeadStore::open_in_memory().unwrap();
        store.insert(&submission("Ada")).unwrap();
        let second = store.insert(&submission("Bob")).unwrap();
        store
            .conn()
            .unwrap()
            .execute("DELETE FROM leads WHERE id = ?1", params![second])
            .unwrap();
        assert_eq!(store.insert(&submission("Cy")).unwrap(), second + 1);
    }

    #[test]
    fn test_concurrent_inserts_get_unique_ids() {
        let store = LeadStore::open_in_memory().unwrap();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.insert(&submission(&format!("T{i}"))).unwrap())
            })
            .collect();
        let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }
}
