//! # `todo_core`
//!
//! State management for a folder-organized task tracker: tasks and folders
//! with cascading deletes, per-task timers, Pomodoro settings, keyword
//! suggestions and productivity statistics, synced through a pluggable
//! document store.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod event_log;
pub mod folders;
pub mod paths;
pub mod pomodoro;
pub mod state;
pub mod stats;
pub mod suggest;
pub mod sync;
pub mod tasks;
pub mod testing;
pub mod traits;
pub mod views;

pub use error::{Error, Result};
pub use state::{StoreEvent, TodoState};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
