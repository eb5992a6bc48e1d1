//! Path utilities for determining data storage locations.
//!
//! Data lives in `~/.todo-core/` unless the config points elsewhere.

use std::path::{Path, PathBuf};

/// The base directory name for todo-core data.
const DATA_DIR_NAME: &str = ".todo-core";

/// The database filename.
pub const DATABASE_FILENAME: &str = "todos.sqlite3";

/// The event log filename.
pub const EVENT_LOG_FILENAME: &str = "events.jsonl";

/// Get the base data directory.
///
/// Returns `~/.todo-core/` or `None` if the home directory cannot be
/// determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Data directory under an explicit base (for tests and portable installs).
#[must_use]
pub fn data_dir_in(base_dir: &Path) -> PathBuf {
    base_dir.join(DATA_DIR_NAME)
}

/// Default database path, `~/.todo-core/todos.sqlite3`.
#[must_use]
pub fn default_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(DATABASE_FILENAME))
}

/// Event log path under a data directory.
#[must_use]
pub fn event_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(EVENT_LOG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_in() {
        let dir = data_dir_in(Path::new("/tmp/base"));
        assert_eq!(dir, PathBuf::from("/tmp/base/.todo-core"));
        assert_eq!(event_log_path(&dir), PathBuf::from("/tmp/base/.todo-core/events.jsonl"));
    }

    #[test]
    fn test_default_db_path_under_home() {
        if let Some(path) = default_db_path() {
            assert!(path.ends_with(".todo-core/todos.sqlite3"));
        }
    }
}
