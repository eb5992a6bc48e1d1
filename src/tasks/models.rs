//! Task and folder model types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Parse a priority from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid priority.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidPriority> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid priority string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriority(pub String);

impl std::fmt::Display for InvalidPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid priority: '{}' (must be one of: low, medium, high)", self.0)
    }
}

impl std::error::Error for InvalidPriority {}

/// Geographic coordinates of a task location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Where a task takes place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Coordinates, when the place was picked on a map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Display name of the place.
    pub name: String,
}

impl Location {
    /// A location known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { coordinates: None, name: name.into() }
    }
}

/// A checklist item inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    /// Identifier, unique within the parent task only.
    pub id: String,
    /// Subtask text.
    pub text: String,
    /// Whether the subtask is done.
    pub completed: bool,
}

/// A task in the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (slug from text + 4 random hex chars).
    pub id: String,
    /// What needs doing. Never empty.
    pub text: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// When the task was created. Immutable.
    pub created_at: DateTime<Utc>,
    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Owning folder; `None` means the task is unorganized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Estimated effort in minutes (positive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    /// Tracked effort in minutes, accumulated by the timer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<u32>,
    /// Whether the task is visible to other users.
    #[serde(default)]
    pub is_public: bool,
    /// Users the task is assigned to.
    #[serde(default)]
    pub assigned_to: BTreeSet<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Optional place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Ordered checklist.
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    /// Start of the running timer session, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_started: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether a timer session is running on this task.
    #[must_use]
    pub const fn timer_running(&self) -> bool {
        self.timer_started.is_some()
    }

    /// Whether the task lives in the given folder.
    #[must_use]
    pub fn in_folder(&self, folder_id: &str) -> bool {
        self.folder_id.as_deref() == Some(folder_id)
    }

    /// Look up a subtask by id.
    #[must_use]
    pub fn subtask(&self, subtask_id: &str) -> Option<&SubTask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }
}

/// A named group of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique identifier.
    pub id: String,
    /// Display name. Never empty.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Whether the folder has been shared.
    #[serde(default)]
    pub is_shared: bool,
    /// Users the folder is shared with.
    #[serde(default)]
    pub shared_with: BTreeSet<String>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Task text (required, non-blank).
    pub text: String,
    /// Folder to file the task under.
    pub folder_id: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Priority; defaults to medium.
    pub priority: Option<Priority>,
    /// Estimated minutes; must be positive when given.
    pub estimated_time: Option<u32>,
    /// Visibility; defaults to private.
    pub is_public: Option<bool>,
    /// Place.
    pub location: Option<Location>,
}

impl NewTask {
    /// A task with only its text set.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// File the task under a folder.
    #[must_use]
    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date.
    #[must_use]
    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }
}

/// Fields that can be updated on a task.
///
/// Double options distinguish "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New text (if Some). Must not be blank.
    pub text: Option<String>,
    /// New completion flag (if Some). Does not count towards stats.
    pub completed: Option<bool>,
    /// New or cleared due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// New or cleared folder.
    pub folder_id: Option<Option<String>>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New or cleared estimate. Must be positive when set.
    pub estimated_time: Option<Option<u32>>,
    /// New visibility.
    pub is_public: Option<bool>,
    /// New assignee set.
    pub assigned_to: Option<BTreeSet<String>>,
    /// New tag set.
    pub tags: Option<BTreeSet<String>>,
    /// New or cleared location.
    pub location: Option<Option<Location>>,
}

impl TaskUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
            && self.folder_id.is_none()
            && self.priority.is_none()
            && self.estimated_time.is_none()
            && self.is_public.is_none()
            && self.assigned_to.is_none()
            && self.tags.is_none()
            && self.location.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        Task {
            id: "buy-milk-0000".to_string(),
            text: "Buy milk".to_string(),
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            due_date: None,
            folder_id: Some("groceries-0001".to_string()),
            priority: Priority::Medium,
            estimated_time: None,
            actual_time: None,
            is_public: false,
            assigned_to: BTreeSet::new(),
            tags: BTreeSet::new(),
            location: None,
            subtasks: Vec::new(),
            timer_started: None,
        }
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!(Priority::from_str("low").unwrap(), Priority::Low);
        assert_eq!(Priority::from_str("MEDIUM").unwrap(), Priority::Medium);
        assert_eq!(Priority::from_str("High").unwrap(), Priority::High);
        assert!(Priority::from_str("urgent").is_err());
    }

    #[test]
    fn test_priority_default() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_invalid_priority_display() {
        let err = InvalidPriority("urgent".to_string());
        assert!(err.to_string().contains("urgent"));
        assert!(err.to_string().contains("medium"));
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = sample_task();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["folderId"], "groceries-0001");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["isPublic"], false);
        assert!(json.get("timerStarted").is_none());
    }

    #[test]
    fn test_task_deserializes_sparse_document() {
        // Documents written by other clients may omit optional fields.
        let json = r#"{"id":"x-0001","text":"Stretch","createdAt":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.subtasks.is_empty());
        assert!(task.folder_id.is_none());
    }

    #[test]
    fn test_location_with_coordinates() {
        let location = Location {
            coordinates: Some(Coordinates { lat: 51.5, lng: -0.12 }),
            name: "Market".to_string(),
        };
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["coordinates"]["lat"], 51.5);
        assert_eq!(json["name"], "Market");
        let parsed: Location = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, location);
    }

    #[test]
    fn test_task_in_folder_and_subtask_lookup() {
        let mut task = sample_task();
        task.subtasks.push(SubTask { id: "s-1".into(), text: "Oat".into(), completed: false });
        assert!(task.in_folder("groceries-0001"));
        assert!(!task.in_folder("work-0002"));
        assert_eq!(task.subtask("s-1").unwrap().text, "Oat");
        assert!(task.subtask("s-2").is_none());
    }

    #[test]
    fn test_task_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        let update = TaskUpdate { due_date: Some(None), ..TaskUpdate::default() };
        assert!(!update.is_empty());
    }
}
