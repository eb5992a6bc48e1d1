//! Task records and the in-memory task collection.
//!
//! This module provides:
//! - Tasks with text, due date, priority, time estimates and tracking
//! - Ordered subtasks with ids unique within their parent
//! - Per-task start/stop timers accumulating whole minutes
//! - Folders (the records; the collection lives in [`crate::folders`])
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use todo_core::tasks::{NewTask, Priority, TaskStore};
//!
//! let mut store = TaskStore::new();
//! let task = store.create_task(NewTask::new("Buy milk").with_priority(Priority::High), Utc::now()).unwrap();
//! let task = store.toggle_completion(&task.id, Utc::now()).unwrap();
//! assert!(task.completed);
//! ```

pub mod id;
pub mod models;
pub mod store;

pub use models::{
    Coordinates, Folder, InvalidPriority, Location, NewTask, Priority, SubTask, Task, TaskUpdate,
};
pub use store::{elapsed_minutes, TaskStore};
