//! Collaborator boundaries: time source, identity and persistence.

use crate::error::Result;
use crate::tasks::{Folder, Task};
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};

/// Source of "now" for timers, timestamps and stats.
///
/// Injected so tests can simulate elapsed time deterministically.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Offset of the user's local time zone, used for hour-of-day and
    /// calendar-day bucketing.
    fn utc_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}

/// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user id; owns every task and folder this user creates.
    pub uid: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Avatar image reference.
    pub avatar_url: Option<String>,
}

impl User {
    /// A user known only by id.
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into(), display_name: None, avatar_url: None }
    }
}

/// Trait for the external document store that persists and syncs state.
///
/// Every write is keyed by entity id and owning user. Reads return the
/// owner-filtered full collection, the same shape a snapshot
/// notification delivers.
///
/// Implementations report failures; they are never retried by the caller.
pub trait SyncBackend {
    /// Insert or replace a task document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or fails to deliver the write.
    fn upsert_task(&self, owner: &str, task: &Task) -> Result<()>;

    /// Delete task documents by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or fails to deliver the delete.
    fn delete_tasks(&self, owner: &str, ids: &[String]) -> Result<()>;

    /// Insert or replace a folder document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or fails to deliver the write.
    fn upsert_folder(&self, owner: &str, folder: &Folder) -> Result<()>;

    /// Delete a folder together with the tasks filed under it, as one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or fails to deliver the delete;
    /// in that case nothing was removed.
    fn delete_folder_cascade(&self, owner: &str, folder_id: &str, task_ids: &[String])
        -> Result<()>;

    /// Load every task owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_tasks(&self, owner: &str) -> Result<Vec<Task>>;

    /// Load every folder owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_folders(&self, owner: &str) -> Result<Vec<Folder>>;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_user_new() {
        let user = User::new("u-1");
        assert_eq!(user.uid, "u-1");
        assert!(user.display_name.is_none());
    }
}
