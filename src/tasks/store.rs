//! In-memory task collection and its mutations.
//!
//! Every mutation comes in two halves. A `prepare_*` method validates the
//! request against the current snapshot and returns the record as it would
//! look afterwards, without touching the collection. [`TaskStore::commit`]
//! then writes that record back. The convenience methods (`create_task`,
//! `toggle_completion`, ...) do both. [`crate::state::TodoState`] calls
//! the halves separately so the persistence backend can accept the change
//! before it becomes visible locally.

use crate::error::{Error, Result};
use crate::tasks::id::generate_unique_id;
use crate::tasks::models::{NewTask, SubTask, Task, TaskUpdate};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Milliseconds per minute, for timer accounting.
const MS_PER_MINUTE: i64 = 60_000;

/// Owned, ordered collection of tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

/// Reject blank text.
fn require_text(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Reject a zero estimate.
fn require_positive_estimate(estimate: Option<u32>) -> Result<()> {
    if estimate == Some(0) {
        return Err(Error::Validation("estimated time must be a positive number of minutes".into()));
    }
    Ok(())
}

/// Whole minutes between `start` and `end`, rounded to the nearest minute
/// (halves round up). Negative spans from clock skew count as zero.
#[must_use]
pub fn elapsed_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let ms = (end - start).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    let minutes = (ms + MS_PER_MINUTE / 2) / MS_PER_MINUTE;
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Close the running timer session on `task`, if any, adding its length
/// to `actual_time`.
fn close_timer(task: &mut Task, now: DateTime<Utc>) {
    if let Some(started) = task.timer_started.take() {
        let elapsed = elapsed_minutes(started, now);
        task.actual_time = Some(task.actual_time.unwrap_or(0).saturating_add(elapsed));
    }
}

impl TaskStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Create a store holding `tasks`, as delivered by a snapshot.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.replace_all(tasks);
        store
    }

    /// All tasks, in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Whether a task with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get_task(id).is_some()
    }

    /// Tasks filed under `folder_id`.
    pub fn tasks_in_folder<'a>(&'a self, folder_id: &'a str) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |t| t.in_folder(folder_id))
    }

    /// Tasks not filed under any folder.
    pub fn unorganized(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.folder_id.is_none())
    }

    /// Replace the whole collection with a snapshot.
    ///
    /// Later duplicates of an id win over earlier ones, so the collection
    /// keeps its id-uniqueness even if the snapshot does not.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks.clear();
        for task in tasks {
            self.commit(task);
        }
    }

    /// Write a record back, replacing the task with the same id or
    /// appending a new one.
    pub fn commit(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }

    /// Remove a task by id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Remove every task whose id is in `ids`.
    pub fn remove_many(&mut self, ids: &[String]) {
        self.tasks.retain(|t| !ids.contains(&t.id));
    }

    fn existing(&self, id: &str) -> Result<&Task> {
        self.get_task(id).ok_or_else(|| Error::task_not_found(id))
    }

    // Prepare halves

    /// Validate `input` and build the new task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank text or a zero estimate.
    pub fn prepare_create(&self, input: NewTask, now: DateTime<Utc>) -> Result<Task> {
        require_text(&input.text, "task text")?;
        require_positive_estimate(input.estimated_time)?;

        let id = generate_unique_id("task", &input.text, |candidate| self.contains(candidate));
        Ok(Task {
            id,
            text: input.text,
            completed: false,
            created_at: now,
            due_date: input.due_date,
            folder_id: input.folder_id,
            priority: input.priority.unwrap_or_default(),
            estimated_time: input.estimated_time,
            actual_time: None,
            is_public: input.is_public.unwrap_or(false),
            assigned_to: BTreeSet::new(),
            tags: BTreeSet::new(),
            location: input.location,
            subtasks: Vec::new(),
            timer_started: None,
        })
    }

    /// Flip the completed flag. Completing a task closes its running
    /// timer session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist.
    pub fn prepare_toggle(&self, id: &str, now: DateTime<Utc>) -> Result<Task> {
        let mut task = self.existing(id)?.clone();
        task.completed = !task.completed;
        if task.completed {
            close_timer(&mut task, now);
        }
        Ok(task)
    }

    /// Merge the provided fields into the task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist, or
    /// [`Error::Validation`] for blank text or a zero estimate.
    pub fn prepare_update(&self, id: &str, update: TaskUpdate, now: DateTime<Utc>) -> Result<Task> {
        let current = self.existing(id)?;
        if let Some(text) = &update.text {
            require_text(text, "task text")?;
        }
        if let Some(estimate) = update.estimated_time {
            require_positive_estimate(estimate)?;
        }

        let mut task = current.clone();
        if let Some(text) = update.text {
            task.text = text;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        if let Some(folder_id) = update.folder_id {
            task.folder_id = folder_id;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(estimate) = update.estimated_time {
            task.estimated_time = estimate;
        }
        if let Some(is_public) = update.is_public {
            task.is_public = is_public;
        }
        if let Some(assigned_to) = update.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(tags) = update.tags {
            task.tags = tags;
        }
        if let Some(location) = update.location {
            task.location = location;
        }
        if task.completed {
            close_timer(&mut task, now);
        }
        Ok(task)
    }

    /// Set the task's public visibility.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist.
    pub fn prepare_set_public(&self, id: &str, is_public: bool) -> Result<Task> {
        let mut task = self.existing(id)?.clone();
        task.is_public = is_public;
        Ok(task)
    }

    /// Replace the task's assignees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist.
    pub fn prepare_assign<I, S>(&self, id: &str, user_ids: I) -> Result<Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut task = self.existing(id)?.clone();
        task.assigned_to = user_ids.into_iter().map(Into::into).collect();
        Ok(task)
    }

    /// Append a new, incomplete subtask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist, or
    /// [`Error::Validation`] for blank text.
    pub fn prepare_add_subtask(&self, task_id: &str, text: &str) -> Result<Task> {
        let current = self.existing(task_id)?;
        require_text(text, "subtask text")?;

        let mut task = current.clone();
        let id = generate_unique_id("subtask", text, |candidate| task.subtask(candidate).is_some());
        task.subtasks.push(SubTask { id, text: text.to_string(), completed: false });
        Ok(task)
    }

    /// Flip one subtask's completed flag in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task or the subtask does not exist.
    pub fn prepare_toggle_subtask(&self, task_id: &str, subtask_id: &str) -> Result<Task> {
        let mut task = self.existing(task_id)?.clone();
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| Error::subtask_not_found(subtask_id))?;
        subtask.completed = !subtask.completed;
        Ok(task)
    }

    /// Open a timer session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist, or
    /// [`Error::InvalidState`] if a session is already running or the task
    /// is completed.
    pub fn prepare_start_timer(&self, task_id: &str, now: DateTime<Utc>) -> Result<Task> {
        let current = self.existing(task_id)?;
        if current.timer_running() {
            return Err(Error::InvalidState(format!("timer already running for task {task_id}")));
        }
        if current.completed {
            return Err(Error::InvalidState(format!("task {task_id} is already completed")));
        }
        let mut task = current.clone();
        task.timer_started = Some(now);
        Ok(task)
    }

    /// Close the timer session, accumulating its rounded length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist, or
    /// [`Error::InvalidState`] if no session is running.
    pub fn prepare_stop_timer(&self, task_id: &str, now: DateTime<Utc>) -> Result<Task> {
        let current = self.existing(task_id)?;
        if !current.timer_running() {
            return Err(Error::InvalidState(format!("no timer running for task {task_id}")));
        }
        let mut task = current.clone();
        close_timer(&mut task, now);
        Ok(task)
    }

    /// Check that the task can be deleted, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist.
    pub fn prepare_delete(&self, id: &str) -> Result<Task> {
        self.existing(id).cloned()
    }

    // Prepare + commit

    fn apply(&mut self, prepared: Result<Task>) -> Result<Task> {
        let task = prepared?;
        self.commit(task.clone());
        Ok(task)
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_create`].
    pub fn create_task(&mut self, input: NewTask, now: DateTime<Utc>) -> Result<Task> {
        let prepared = self.prepare_create(input, now);
        self.apply(prepared)
    }

    /// Toggle a task's completion.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_toggle`].
    pub fn toggle_completion(&mut self, id: &str, now: DateTime<Utc>) -> Result<Task> {
        let prepared = self.prepare_toggle(id, now);
        self.apply(prepared)
    }

    /// Update a task.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_update`].
    pub fn update_task(&mut self, id: &str, update: TaskUpdate, now: DateTime<Utc>) -> Result<Task> {
        let prepared = self.prepare_update(id, update, now);
        self.apply(prepared)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the task does not exist.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        self.prepare_delete(id)?;
        self.remove(id).ok_or_else(|| Error::task_not_found(id))
    }

    /// Set a task's public visibility.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_set_public`].
    pub fn set_public(&mut self, id: &str, is_public: bool) -> Result<Task> {
        let prepared = self.prepare_set_public(id, is_public);
        self.apply(prepared)
    }

    /// Replace a task's assignees.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_assign`].
    pub fn assign<I, S>(&mut self, id: &str, user_ids: I) -> Result<Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prepared = self.prepare_assign(id, user_ids);
        self.apply(prepared)
    }

    /// Add a subtask.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_add_subtask`].
    pub fn add_subtask(&mut self, task_id: &str, text: &str) -> Result<Task> {
        let prepared = self.prepare_add_subtask(task_id, text);
        self.apply(prepared)
    }

    /// Toggle a subtask.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_toggle_subtask`].
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Task> {
        let prepared = self.prepare_toggle_subtask(task_id, subtask_id);
        self.apply(prepared)
    }

    /// Start a task's timer.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_start_timer`].
    pub fn start_timer(&mut self, task_id: &str, now: DateTime<Utc>) -> Result<Task> {
        let prepared = self.prepare_start_timer(task_id, now);
        self.apply(prepared)
    }

    /// Stop a task's timer.
    ///
    /// # Errors
    ///
    /// See [`TaskStore::prepare_stop_timer`].
    pub fn stop_timer(&mut self, task_id: &str, now: DateTime<Utc>) -> Result<Task> {
        let prepared = self.prepare_stop_timer(task_id, now);
        self.apply(prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::models::{Location, Priority};
    use chrono::{Duration, NaiveDate, TimeZone};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn store_with(texts: &[&str]) -> (TaskStore, Vec<String>) {
        let mut store = TaskStore::new();
        let ids = texts
            .iter()
            .map(|text| store.create_task(NewTask::new(*text), t0()).unwrap().id)
            .collect();
        (store, ids)
    }

    #[test]
    fn test_create_task_defaults() {
        let mut store = TaskStore::new();
        let task = store.create_task(NewTask::new("Buy milk"), t0()).unwrap();

        assert!(task.id.starts_with("buy-milk-"));
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.created_at, t0());
        assert!(!task.is_public);
        assert!(task.folder_id.is_none());
        assert!(task.subtasks.is_empty());
        assert!(task.timer_started.is_none());
        assert_eq!(store.get_task(&task.id), Some(&task));
    }

    #[test]
    fn test_create_task_with_options() {
        let mut store = TaskStore::new();
        let due = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let input = NewTask {
            estimated_time: Some(30),
            is_public: Some(true),
            location: Some(Location::named("Gym")),
            ..NewTask::new("Lift weights").in_folder("workout-0001").with_priority(Priority::High).due(due)
        };
        let task = store.create_task(input, t0()).unwrap();

        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.folder_id.as_deref(), Some("workout-0001"));
        assert_eq!(task.estimated_time, Some(30));
        assert!(task.is_public);
        assert_eq!(task.location.unwrap().name, "Gym");
    }

    #[test]
    fn test_create_task_rejects_blank_text() {
        let (mut store, _) = store_with(&["Existing"]);
        for text in ["", "   ", "\t\n"] {
            let err = store.create_task(NewTask::new(text), t0()).unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_task_rejects_zero_estimate() {
        let mut store = TaskStore::new();
        let input = NewTask { estimated_time: Some(0), ..NewTask::new("Stretch") };
        assert!(store.create_task(input, t0()).unwrap_err().is_validation());
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_completion_round_trip() {
        let (mut store, ids) = store_with(&["Yoga"]);
        let done = store.toggle_completion(&ids[0], t0()).unwrap();
        assert!(done.completed);
        let undone = store.toggle_completion(&ids[0], t0()).unwrap();
        assert!(!undone.completed);
    }

    #[test]
    fn test_toggle_unknown_task() {
        let mut store = TaskStore::new();
        assert!(store.toggle_completion("missing", t0()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_completing_closes_running_timer() {
        let (mut store, ids) = store_with(&["Update reports"]);
        store.start_timer(&ids[0], t0()).unwrap();
        let done = store.toggle_completion(&ids[0], t0() + Duration::minutes(10)).unwrap();
        assert!(done.timer_started.is_none());
        assert_eq!(done.actual_time, Some(10));
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let (mut store, ids) = store_with(&["Client call"]);
        let update = TaskUpdate {
            priority: Some(Priority::High),
            tags: Some(["work".to_string()].into_iter().collect()),
            ..TaskUpdate::default()
        };
        let task = store.update_task(&ids[0], update, t0()).unwrap();
        assert_eq!(task.text, "Client call");
        assert_eq!(task.priority, Priority::High);
        assert!(task.tags.contains("work"));
    }

    #[test]
    fn test_update_clears_optional_fields() {
        let mut store = TaskStore::new();
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let id = store.create_task(NewTask::new("Pay rent").due(due), t0()).unwrap().id;

        let update = TaskUpdate { due_date: Some(None), ..TaskUpdate::default() };
        let task = store.update_task(&id, update, t0()).unwrap();
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_update_rejects_blank_text_without_change() {
        let (mut store, ids) = store_with(&["Check emails"]);
        let update = TaskUpdate {
            text: Some("  ".into()),
            priority: Some(Priority::Low),
            ..TaskUpdate::default()
        };
        assert!(store.update_task(&ids[0], update, t0()).unwrap_err().is_validation());
        let task = store.get_task(&ids[0]).unwrap();
        assert_eq!(task.text, "Check emails");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_update_unknown_task() {
        let mut store = TaskStore::new();
        let err = store.update_task("missing", TaskUpdate::default(), t0()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_task() {
        let (mut store, ids) = store_with(&["A", "B"]);
        let removed = store.delete_task(&ids[0]).unwrap();
        assert_eq!(removed.text, "A");
        assert_eq!(store.len(), 1);
        assert!(store.delete_task(&ids[0]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_public_and_assign() {
        let (mut store, ids) = store_with(&["Team meeting"]);
        let task = store.prepare_set_public(&ids[0], true).unwrap();
        assert!(task.is_public);
        let task = store.prepare_assign(&ids[0], ["ana", "bo"]).unwrap();
        assert_eq!(task.assigned_to.len(), 2);
        // prepare does not commit
        assert!(!store.get_task(&ids[0]).unwrap().is_public);
        store.commit(task);
        assert!(store.get_task(&ids[0]).unwrap().assigned_to.contains("bo"));

        assert!(store.set_public(&ids[0], true).unwrap().is_public);
        let task = store.assign(&ids[0], ["cy"]).unwrap();
        assert_eq!(task.assigned_to.iter().collect::<Vec<_>>(), ["cy"]);
        assert!(store.assign("missing", ["cy"]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_subtasks_toggle_in_place() {
        let (mut store, ids) = store_with(&["Plan trip"]);
        store.add_subtask(&ids[0], "Book train").unwrap();
        store.add_subtask(&ids[0], "Book hotel").unwrap();
        let task = store.add_subtask(&ids[0], "Pack").unwrap();
        let before: Vec<String> = task.subtasks.iter().map(|s| s.id.clone()).collect();

        let task = store.toggle_subtask(&ids[0], &before[1]).unwrap();
        let after: Vec<String> = task.subtasks.iter().map(|s| s.id.clone()).collect();
        assert_eq!(before, after);
        assert!(!task.subtasks[0].completed);
        assert!(task.subtasks[1].completed);
        assert!(!task.subtasks[2].completed);
    }

    #[test]
    fn test_subtask_errors() {
        let (mut store, ids) = store_with(&["Plan trip"]);
        assert!(store.add_subtask("missing", "x").unwrap_err().is_not_found());
        assert!(store.add_subtask(&ids[0], " ").unwrap_err().is_validation());
        assert!(store.toggle_subtask(&ids[0], "missing").unwrap_err().is_not_found());
        assert!(store.toggle_subtask("missing", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_timer_accumulates_rounded_minutes() {
        let (mut store, ids) = store_with(&["Deep work"]);
        store.start_timer(&ids[0], t0()).unwrap();
        let task = store.stop_timer(&ids[0], t0() + Duration::seconds(125)).unwrap();
        assert_eq!(task.actual_time, Some(2));
        assert!(task.timer_started.is_none());

        store.start_timer(&ids[0], t0()).unwrap();
        let task = store.stop_timer(&ids[0], t0() + Duration::seconds(90)).unwrap();
        assert_eq!(task.actual_time, Some(4));
    }

    #[test]
    fn test_timer_out_of_sequence() {
        let (mut store, ids) = store_with(&["Deep work"]);
        assert!(store.stop_timer(&ids[0], t0()).unwrap_err().is_invalid_state());
        store.start_timer(&ids[0], t0()).unwrap();
        assert!(store.start_timer(&ids[0], t0()).unwrap_err().is_invalid_state());
        assert!(store.start_timer("missing", t0()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_timer_refuses_completed_task() {
        let (mut store, ids) = store_with(&["Done already"]);
        store.toggle_completion(&ids[0], t0()).unwrap();
        assert!(store.start_timer(&ids[0], t0()).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_elapsed_minutes_rounding() {
        assert_eq!(elapsed_minutes(t0(), t0() + Duration::seconds(29)), 0);
        assert_eq!(elapsed_minutes(t0(), t0() + Duration::seconds(30)), 1);
        assert_eq!(elapsed_minutes(t0(), t0() + Duration::seconds(89)), 1);
        assert_eq!(elapsed_minutes(t0(), t0() - Duration::seconds(300)), 0);
    }

    #[test]
    fn test_folder_and_unorganized_views() {
        let mut store = TaskStore::new();
        store.create_task(NewTask::new("Buy milk").in_folder("f1"), t0()).unwrap();
        store.create_task(NewTask::new("Buy eggs").in_folder("f1"), t0()).unwrap();
        store.create_task(NewTask::new("Call mum"), t0()).unwrap();

        assert_eq!(store.tasks_in_folder("f1").count(), 2);
        assert_eq!(store.unorganized().count(), 1);
    }

    #[test]
    fn test_replace_all_dedupes_by_id() {
        let (store, _) = store_with(&["A"]);
        let mut first = store.tasks()[0].clone();
        let mut second = first.clone();
        first.text = "old".into();
        second.text = "new".into();

        let replaced = TaskStore::from_tasks(vec![first, second]);
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced.tasks()[0].text, "new");
    }

    proptest! {
        #[test]
        fn prop_created_ids_are_unique(texts in proptest::collection::vec("[a-z ]{1,12}", 1..40)) {
            let mut store = TaskStore::new();
            for text in &texts {
                if !text.trim().is_empty() {
                    store.create_task(NewTask::new(text.as_str()), t0()).unwrap();
                }
            }
            let ids: HashSet<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
            prop_assert_eq!(ids.len(), store.len());
        }
    }
}
