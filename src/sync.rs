//! SQLite-backed document store.
//!
//! Tasks and folders are stored as JSON documents keyed by `(owner, id)`,
//! the same shape a remote document store would hold. Every write is also
//! recorded in an append-only audit log.

use crate::error::{Error, Result};
use crate::tasks::{Folder, Task};
use crate::traits::SyncBackend;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One row of the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier for the entry.
    pub id: i64,
    /// When the operation was recorded (SQLite `datetime('now')`, UTC).
    pub timestamp: String,
    /// Operation name, e.g. `upsert_task` or `delete_folder`.
    pub operation: String,
    /// Owner the operation ran for.
    pub owner: String,
    /// Affected entity id, if any.
    pub entity_id: Option<String>,
    /// New document (JSON), for upserts.
    pub new_value: Option<String>,
}

/// SQLite document store.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db_path: PathBuf,
}

impl SqliteBackend {
    /// Open (creating if needed) the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let backend = Self { db_path: db_path.as_ref().to_path_buf() };
        backend.init_schema()?;
        Ok(backend)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS tasks (
                owner TEXT NOT NULL,
                id TEXT NOT NULL,
                folder_id TEXT,
                doc TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (owner, id)
            );

            CREATE TABLE IF NOT EXISTS folders (
                owner TEXT NOT NULL,
                id TEXT NOT NULL,
                doc TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (owner, id)
            );

            -- Immutable audit log
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL DEFAULT (datetime('now')),
                operation TEXT NOT NULL,
                owner TEXT NOT NULL,
                entity_id TEXT,
                new_value TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_owner_folder ON tasks(owner, folder_id);
            CREATE INDEX IF NOT EXISTS idx_audit_owner ON audit_log(owner);
            ",
        )?;
        Ok(())
    }

    fn log_audit(
        conn: &Connection,
        operation: &str,
        owner: &str,
        entity_id: Option<&str>,
        new_value: Option<&str>,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO audit_log (operation, owner, entity_id, new_value)
             VALUES (?1, ?2, ?3, ?4)",
            params![operation, owner, entity_id, new_value],
        )?;
        Ok(())
    }

    /// Audit entries for `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read.
    pub fn audit_log(&self, owner: &str, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        let conn = self.open()?;
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, operation, owner, entity_id, new_value
             FROM audit_log WHERE owner = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let entries = stmt
            .query_map(params![owner, limit], |row| {
                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    operation: row.get(2)?,
                    owner: row.get(3)?,
                    entity_id: row.get(4)?,
                    new_value: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn load_docs<T: serde::de::DeserializeOwned>(&self, table: &str, owner: &str) -> Result<Vec<T>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!("SELECT doc FROM {table} WHERE owner = ?1 ORDER BY rowid"))?;
        let docs = stmt
            .query_map(params![owner], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        docs.iter().map(|doc| serde_json::from_str(doc).map_err(Error::from)).collect()
    }
}

impl SyncBackend for SqliteBackend {
    fn upsert_task(&self, owner: &str, task: &Task) -> Result<()> {
        let conn = self.open()?;
        let doc = serde_json::to_string(task)?;
        conn.execute(
            "INSERT INTO tasks (owner, id, folder_id, doc) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(owner, id) DO UPDATE SET
                folder_id = excluded.folder_id,
                doc = excluded.doc,
                updated_at = datetime('now')",
            params![owner, task.id, task.folder_id, doc],
        )?;
        Self::log_audit(&conn, "upsert_task", owner, Some(&task.id), Some(&doc))?;
        Ok(())
    }

    fn delete_tasks(&self, owner: &str, ids: &[String]) -> Result<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        for id in ids {
            tx.execute("DELETE FROM tasks WHERE owner = ?1 AND id = ?2", params![owner, id])?;
            Self::log_audit(&tx, "delete_task", owner, Some(id), None)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_folder(&self, owner: &str, folder: &Folder) -> Result<()> {
        let conn = self.open()?;
        let doc = serde_json::to_string(folder)?;
        conn.execute(
            "INSERT INTO folders (owner, id, doc) VALUES (?1, ?2, ?3)
             ON CONFLICT(owner, id) DO UPDATE SET
                doc = excluded.doc,
                updated_at = datetime('now')",
            params![owner, folder.id, doc],
        )?;
        Self::log_audit(&conn, "upsert_folder", owner, Some(&folder.id), Some(&doc))?;
        Ok(())
    }

    fn delete_folder_cascade(
        &self,
        owner: &str,
        folder_id: &str,
        task_ids: &[String],
    ) -> Result<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        for id in task_ids {
            tx.execute("DELETE FROM tasks WHERE owner = ?1 AND id = ?2", params![owner, id])?;
        }
        // Catch tasks filed under the folder since the caller's snapshot.
        tx.execute(
            "DELETE FROM tasks WHERE owner = ?1 AND folder_id = ?2",
            params![owner, folder_id],
        )?;
        tx.execute("DELETE FROM folders WHERE owner = ?1 AND id = ?2", params![owner, folder_id])?;
        let details = serde_json::to_string(task_ids)?;
        Self::log_audit(&tx, "delete_folder", owner, Some(folder_id), Some(&details))?;
        tx.commit()?;
        Ok(())
    }

    fn load_tasks(&self, owner: &str) -> Result<Vec<Task>> {
        self.load_docs("tasks", owner)
    }

    fn load_folders(&self, owner: &str) -> Result<Vec<Folder>> {
        self.load_docs("folders", owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folders::FolderStore;
    use crate::tasks::{NewTask, TaskStore};
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn create_test_backend() -> (SqliteBackend, TempDir) {
        let dir = TempDir::new().unwrap();
        let backend = SqliteBackend::new(dir.path().join("data").join("todos.sqlite3")).unwrap();
        (backend, dir)
    }

    #[test]
    fn test_creates_parent_dirs() {
        let (backend, dir) = create_test_backend();
        assert!(backend.db_path().exists());
        assert!(backend.db_path().starts_with(dir.path()));
    }

    #[test]
    fn test_task_upsert_and_load() {
        let (backend, _dir) = create_test_backend();
        let mut store = TaskStore::new();
        let first = store.create_task(NewTask::new("Buy milk"), now()).unwrap();
        let second = store.create_task(NewTask::new("Call mum"), now()).unwrap();

        backend.upsert_task("alice", &first).unwrap();
        backend.upsert_task("alice", &second).unwrap();
        let done = store.toggle_completion(&first.id, now()).unwrap();
        backend.upsert_task("alice", &done).unwrap();

        let loaded = backend.load_tasks("alice").unwrap();
        assert_eq!(loaded, vec![done, second]);
        assert!(backend.load_tasks("bob").unwrap().is_empty());
    }

    #[test]
    fn test_owners_are_isolated() {
        let (backend, _dir) = create_test_backend();
        let task = TaskStore::new().prepare_create(NewTask::new("Shared id"), now()).unwrap();
        backend.upsert_task("alice", &task).unwrap();
        backend.upsert_task("bob", &task).unwrap();

        backend.delete_tasks("alice", &[task.id.clone()]).unwrap();
        assert!(backend.load_tasks("alice").unwrap().is_empty());
        assert_eq!(backend.load_tasks("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_folder_cascade() {
        let (backend, _dir) = create_test_backend();
        let mut folders = FolderStore::new();
        let mut tasks = TaskStore::new();
        let folder = folders.create_folder("Groceries", now()).unwrap();
        let milk = tasks.create_task(NewTask::new("Buy milk").in_folder(&folder.id), now()).unwrap();
        let late = tasks.create_task(NewTask::new("Buy eggs").in_folder(&folder.id), now()).unwrap();
        let loose = tasks.create_task(NewTask::new("Call mum"), now()).unwrap();
        backend.upsert_folder("alice", &folder).unwrap();
        for task in [&milk, &late, &loose] {
            backend.upsert_task("alice", task).unwrap();
        }

        backend.delete_folder_cascade("alice", &folder.id, &[milk.id.clone()]).unwrap();

        assert!(backend.load_folders("alice").unwrap().is_empty());
        let remaining = backend.load_tasks("alice").unwrap();
        assert_eq!(remaining, vec![loose]);
    }

    #[test]
    fn test_audit_log() {
        let (backend, _dir) = create_test_backend();
        let folder = FolderStore::new().prepare_create("Work", now()).unwrap();
        backend.upsert_folder("alice", &folder).unwrap();
        backend.delete_folder_cascade("alice", &folder.id, &[]).unwrap();
        backend.upsert_folder("bob", &folder).unwrap();

        let entries = backend.audit_log("alice", None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, "delete_folder");
        assert_eq!(entries[1].operation, "upsert_folder");
        assert_eq!(entries[1].entity_id.as_deref(), Some(folder.id.as_str()));

        assert_eq!(backend.audit_log("alice", Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let (backend, _dir) = create_test_backend();
        let folder = FolderStore::new().prepare_create("Work", now()).unwrap();
        backend.upsert_folder("alice", &folder).unwrap();

        let reopened = SqliteBackend::new(backend.db_path()).unwrap();
        assert_eq!(reopened.load_folders("alice").unwrap(), vec![folder]);
    }
}
