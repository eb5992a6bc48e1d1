//! Error types for `todo_core`.

/// Errors that can occur while managing tasks and folders.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input: empty text or name, non-positive numeric fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An operation referenced an id that is not in the current snapshot.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of entity ("task", "subtask", "folder").
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// An operation was called out of sequence (e.g. starting a running timer).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The persistence backend rejected or failed to deliver a mutation.
    #[error("Sync error: {0}")]
    Sync(String),

    /// An operation that requires an owner was called with nobody signed in.
    #[error("No user is signed in")]
    Unauthenticated,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] on a task.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { kind: "task", id: id.into() }
    }

    /// Shorthand for a [`Error::NotFound`] on a subtask.
    pub fn subtask_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { kind: "subtask", id: id.into() }
    }

    /// Shorthand for a [`Error::NotFound`] on a folder.
    pub fn folder_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { kind: "folder", id: id.into() }
    }

    /// Whether this error came from local validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error is a [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error is an [`Error::InvalidState`].
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::task_not_found("buy-milk-0001");
        assert_eq!(err.to_string(), "task not found: buy-milk-0001");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_classifiers() {
        assert!(Error::Validation("empty".into()).is_validation());
        assert!(Error::InvalidState("running".into()).is_invalid_state());
        assert!(!Error::Unauthenticated.is_validation());
    }
}
