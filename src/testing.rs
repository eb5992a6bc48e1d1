//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.
//!
//! Both mocks are cheap handles over shared state: clone one, box the
//! clone into a [`crate::state::TodoState`], and keep the first handle to
//! advance time or inspect what was persisted.

#![allow(dead_code)]

use crate::error::{Error, Result};
use crate::tasks::{Folder, Task};
use crate::traits::{Clock, SyncBackend};
use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Rc<Cell<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl MockClock {
    /// A clock stopped at `now`, in UTC.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(now)), offset: Utc.fix() }
    }

    /// A clock stopped at the given UTC wall time.
    ///
    /// # Panics
    ///
    /// Panics if the components do not form a valid time.
    #[must_use]
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .expect("valid mock clock time");
        Self::new(now)
    }

    /// Report local time at `offset_secs` east of UTC.
    ///
    /// # Panics
    ///
    /// Panics if the offset is out of range.
    #[must_use]
    pub fn with_offset_secs(mut self, offset_secs: i32) -> Self {
        self.offset = FixedOffset::east_opt(offset_secs).expect("valid utc offset");
        self
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an arbitrary instant, including backwards.
    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn utc_offset(&self) -> FixedOffset {
        self.offset
    }
}

/// One call received by a [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// `upsert_task(owner, task.id)`.
    UpsertTask(String, String),
    /// `delete_tasks(owner, ids)`.
    DeleteTasks(String, Vec<String>),
    /// `upsert_folder(owner, folder.id)`.
    UpsertFolder(String, String),
    /// `delete_folder_cascade(owner, folder_id, task_ids)`.
    DeleteFolderCascade(String, String, Vec<String>),
    /// `load_tasks(owner)`.
    LoadTasks(String),
    /// `load_folders(owner)`.
    LoadFolders(String),
}

/// Something stored under an id.
trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Folder {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Replace the entry with the same id in place, or append.
fn upsert<T: Keyed>(docs: &mut Vec<T>, doc: T) {
    match docs.iter().position(|d| d.key() == doc.key()) {
        Some(index) => docs[index] = doc,
        None => docs.push(doc),
    }
}

// Per-owner documents keep insertion order, as SQLite rowids do.
#[derive(Debug, Default)]
struct MemoryInner {
    tasks: BTreeMap<String, Vec<Task>>,
    folders: BTreeMap<String, Vec<Folder>>,
    calls: Vec<BackendCall>,
    fail_next: usize,
    failing: bool,
}

impl MemoryInner {
    fn check(&mut self, call: BackendCall) -> Result<()> {
        self.calls.push(call);
        if self.failing {
            return Err(Error::Sync("backend unavailable".into()));
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(Error::Sync("write rejected".into()));
        }
        Ok(())
    }
}

/// In-memory document store, keyed by owner. Loads return documents in
/// the order they were first written.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `count` calls.
    pub fn fail_next(&self, count: usize) {
        self.inner.borrow_mut().fail_next = count;
    }

    /// Reject every call until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().failing = failing;
    }

    /// Every call received so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.borrow().calls.clone()
    }

    /// Stored task, bypassing the call log and failure switches.
    #[must_use]
    pub fn stored_task(&self, owner: &str, id: &str) -> Option<Task> {
        self.inner.borrow().tasks.get(owner).and_then(|docs| docs.iter().find(|t| t.id == id)).cloned()
    }

    /// Stored folder, bypassing the call log and failure switches.
    #[must_use]
    pub fn stored_folder(&self, owner: &str, id: &str) -> Option<Folder> {
        self.inner.borrow().folders.get(owner).and_then(|docs| docs.iter().find(|f| f.id == id)).cloned()
    }

    /// Number of tasks stored for `owner`.
    #[must_use]
    pub fn task_count(&self, owner: &str) -> usize {
        self.inner.borrow().tasks.get(owner).map_or(0, Vec::len)
    }

    /// Seed a task directly, as another device would.
    pub fn insert_task(&self, owner: &str, task: Task) {
        upsert(self.inner.borrow_mut().tasks.entry(owner.to_string()).or_default(), task);
    }

    /// Seed a folder directly, as another device would.
    pub fn insert_folder(&self, owner: &str, folder: Folder) {
        upsert(self.inner.borrow_mut().folders.entry(owner.to_string()).or_default(), folder);
    }
}

impl SyncBackend for MemoryBackend {
    fn upsert_task(&self, owner: &str, task: &Task) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check(BackendCall::UpsertTask(owner.to_string(), task.id.clone()))?;
        upsert(inner.tasks.entry(owner.to_string()).or_default(), task.clone());
        Ok(())
    }

    fn delete_tasks(&self, owner: &str, ids: &[String]) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check(BackendCall::DeleteTasks(owner.to_string(), ids.to_vec()))?;
        if let Some(tasks) = inner.tasks.get_mut(owner) {
            tasks.retain(|t| !ids.contains(&t.id));
        }
        Ok(())
    }

    fn upsert_folder(&self, owner: &str, folder: &Folder) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check(BackendCall::UpsertFolder(owner.to_string(), folder.id.clone()))?;
        upsert(inner.folders.entry(owner.to_string()).or_default(), folder.clone());
        Ok(())
    }

    fn delete_folder_cascade(
        &self,
        owner: &str,
        folder_id: &str,
        task_ids: &[String],
    ) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.check(BackendCall::DeleteFolderCascade(
            owner.to_string(),
            folder_id.to_string(),
            task_ids.to_vec(),
        ))?;
        if let Some(folders) = inner.folders.get_mut(owner) {
            folders.retain(|f| f.id != folder_id);
        }
        if let Some(tasks) = inner.tasks.get_mut(owner) {
            tasks.retain(|t| !task_ids.contains(&t.id) && !t.in_folder(folder_id));
        }
        Ok(())
    }

    fn load_tasks(&self, owner: &str) -> Result<Vec<Task>> {
        let mut inner = self.inner.borrow_mut();
        inner.check(BackendCall::LoadTasks(owner.to_string()))?;
        Ok(inner.tasks.get(owner).cloned().unwrap_or_default())
    }

    fn load_folders(&self, owner: &str) -> Result<Vec<Folder>> {
        let mut inner = self.inner.borrow_mut();
        inner.check(BackendCall::LoadFolders(owner.to_string()))?;
        Ok(inner.folders.get(owner).cloned().unwrap_or_default())
    }
}
