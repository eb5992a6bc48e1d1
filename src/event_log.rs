//! Debug store event logging.
//!
//! When `debug_logging` is enabled in the config, every store event applied
//! by [`crate::state::TodoState`] is appended as a JSONL line to
//! `events.jsonl` in the data directory. This allows debugging sync
//! behavior by inspecting exactly which mutations were applied, and when.
//!
//! Errors are silently ignored: logging never fails a store operation.

use crate::config::AppConfig;
use crate::paths;
use crate::state::StoreEvent;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL sink for store events.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// A log writing to `<data_dir>/events.jsonl`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self { path: paths::event_log_path(data_dir) }
    }

    /// A log for `data_dir` if the config enables it.
    #[must_use]
    pub fn from_config(config: &AppConfig, data_dir: &Path) -> Option<Self> {
        config.debug_logging.then(|| Self::new(data_dir))
    }

    /// Where entries are written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry for `event`.
    pub fn record(&self, event: &StoreEvent, at: DateTime<Utc>) {
        if let Some(parent) = self.path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }

        let entry = serde_json::json!({
            "timestamp": at.to_rfc3339(),
            "kind": event.kind(),
            "id": event.entity_id(),
        });

        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) else {
            return;
        };

        let _ = writeln!(file, "{entry}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn read_log_lines(log: &EventLog) -> Vec<serde_json::Value> {
        if !log.path().exists() {
            return vec![];
        }
        let content = std::fs::read_to_string(log.path()).unwrap();
        content
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_from_config_respects_flag() {
        let dir = TempDir::new().unwrap();
        assert!(EventLog::from_config(&AppConfig::default(), dir.path()).is_none());

        let config = AppConfig { debug_logging: true, ..AppConfig::default() };
        let log = EventLog::from_config(&config, dir.path()).unwrap();
        assert_eq!(log.path(), dir.path().join("events.jsonl"));
    }

    #[test]
    fn test_record_appends_lines() {
        let dir = TempDir::new().unwrap();
        let log = EventLog::new(&dir.path().join("nested"));

        log.record(&StoreEvent::TaskDeleted { id: "buy-milk-0001".into() }, at());
        log.record(&StoreEvent::TasksReplaced { count: 3 }, at());

        let lines = read_log_lines(&log);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["kind"], "task_deleted");
        assert_eq!(lines[0]["id"], "buy-milk-0001");
        assert_eq!(lines[0]["timestamp"], "2024-03-04T09:00:00+00:00");
        assert_eq!(lines[1]["kind"], "tasks_replaced");
        assert!(lines[1]["id"].is_null());
    }

    #[test]
    fn test_record_ignores_unwritable_dir() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "blocking file").unwrap();

        let log = EventLog::new(&blocker);
        log.record(&StoreEvent::TasksReplaced { count: 0 }, at());
        assert!(blocker.is_file());
    }
}
