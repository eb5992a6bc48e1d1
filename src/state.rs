//! The owned application state container.
//!
//! [`TodoState`] ties the task and folder stores to the signed-in user, the
//! persistence backend and the statistics. Every mutation runs in the same
//! order:
//!
//! 1. require a signed-in user ([`Error::Unauthenticated`]),
//! 2. validate against the current snapshot, with no side effects on failure,
//! 3. send the upsert or delete to the backend ([`Error::Sync`] on failure,
//!    leaving local state untouched),
//! 4. apply the change locally and publish a [`StoreEvent`].
//!
//! Snapshots pushed by the backend replace a whole collection; the last one
//! applied wins. Tasks left filed under a folder that is no longer in the
//! folder collection are dropped, as a cascade delete would have done.

use crate::error::{Error, Result};
use crate::event_log::EventLog;
use crate::folders::{FolderCascade, FolderStore};
use crate::pomodoro::{Phase, PomodoroCycle, PomodoroSettings, PomodoroUpdate};
use crate::stats::{completion_rate, Achievement, Progress, StatsAggregator, UserStats};
use crate::suggest::SuggestionIndex;
use crate::tasks::{Folder, NewTask, Task, TaskStore, TaskUpdate};
use crate::traits::{Clock, SyncBackend, User};
use crate::views::{self, Board, BoardColumn, CalendarEntry, ViewMode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

/// A change applied to the local state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A task was created.
    TaskCreated(Task),
    /// A task was modified.
    TaskUpdated(Task),
    /// A task was deleted.
    TaskDeleted {
        /// The deleted task's id.
        id: String,
    },
    /// The task collection was replaced by a snapshot.
    TasksReplaced {
        /// Tasks in the new snapshot.
        count: usize,
    },
    /// A folder was created.
    FolderCreated(Folder),
    /// A folder was renamed or shared.
    FolderUpdated(Folder),
    /// A folder was deleted along with its tasks.
    FolderDeleted {
        /// The deleted folder's id.
        id: String,
        /// Ids of the tasks removed with it.
        cascaded: Vec<String>,
    },
    /// The folder collection was replaced by a snapshot.
    FoldersReplaced {
        /// Folders in the new snapshot.
        count: usize,
    },
    /// A completion unlocked an achievement.
    AchievementUnlocked(Achievement),
}

impl StoreEvent {
    /// Snake-case event name, as serialized.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TaskCreated(_) => "task_created",
            Self::TaskUpdated(_) => "task_updated",
            Self::TaskDeleted { .. } => "task_deleted",
            Self::TasksReplaced { .. } => "tasks_replaced",
            Self::FolderCreated(_) => "folder_created",
            Self::FolderUpdated(_) => "folder_updated",
            Self::FolderDeleted { .. } => "folder_deleted",
            Self::FoldersReplaced { .. } => "folders_replaced",
            Self::AchievementUnlocked(_) => "achievement_unlocked",
        }
    }

    /// Id of the entity the event is about, if it is about one.
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Self::TaskCreated(task) | Self::TaskUpdated(task) => Some(&task.id),
            Self::FolderCreated(folder) | Self::FolderUpdated(folder) => Some(&folder.id),
            Self::TaskDeleted { id } | Self::FolderDeleted { id, .. } => Some(id),
            Self::AchievementUnlocked(achievement) => Some(&achievement.id),
            Self::TasksReplaced { .. } | Self::FoldersReplaced { .. } => None,
        }
    }
}

/// Report any backend failure as [`Error::Sync`].
fn remote<T>(result: Result<T>) -> Result<T> {
    result.map_err(|err| match err {
        Error::Sync(_) => err,
        other => Error::Sync(other.to_string()),
    })
}

/// Tasks, folders and statistics for the signed-in user.
pub struct TodoState {
    tasks: TaskStore,
    folders: FolderStore,
    stats: StatsAggregator,
    pomodoro: PomodoroSettings,
    cycle: PomodoroCycle,
    view_mode: ViewMode,
    suggestions: SuggestionIndex,
    user: Option<User>,
    clock: Box<dyn Clock>,
    backend: Box<dyn SyncBackend>,
    subscribers: Vec<Sender<StoreEvent>>,
    event_log: Option<EventLog>,
}

impl std::fmt::Debug for TodoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoState")
            .field("user", &self.user)
            .field("tasks", &self.tasks.len())
            .field("folders", &self.folders.folders().len())
            .field("view_mode", &self.view_mode)
            .finish_non_exhaustive()
    }
}

impl TodoState {
    /// An empty, signed-out state.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>, backend: Box<dyn SyncBackend>) -> Self {
        Self {
            tasks: TaskStore::new(),
            folders: FolderStore::new(),
            stats: StatsAggregator::new(),
            pomodoro: PomodoroSettings::default(),
            cycle: PomodoroCycle::new(PomodoroSettings::default()),
            view_mode: ViewMode::default(),
            suggestions: SuggestionIndex::new(),
            user: None,
            clock,
            backend,
            subscribers: Vec::new(),
            event_log: None,
        }
    }

    /// Append applied events to `log`.
    #[must_use]
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.event_log = Some(log);
        self
    }

    /// Start from `settings` instead of the default Pomodoro settings.
    #[must_use]
    pub fn with_pomodoro(mut self, settings: PomodoroSettings) -> Self {
        self.pomodoro = settings;
        self.cycle = PomodoroCycle::new(settings);
        self
    }

    /// Receive every event applied from now on.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    // Identity

    /// Switch to `user`. Collections are left as they are until the next
    /// [`TodoState::sync`] or snapshot.
    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Forget the current user and everything loaded for them.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.stats = StatsAggregator::new();
        self.apply_task_snapshot(Vec::new());
        self.apply_folder_snapshot(Vec::new());
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    fn owner(&self) -> Result<String> {
        self.user.as_ref().map(|u| u.uid.clone()).ok_or(Error::Unauthenticated)
    }

    // Read access

    /// All tasks, in collection order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    /// All folders, in collection order.
    #[must_use]
    pub fn folders(&self) -> &[Folder] {
        self.folders.folders()
    }

    /// Look up a task.
    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get_task(id)
    }

    /// Look up a folder.
    #[must_use]
    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.get_folder(id)
    }

    /// Tasks filed under no folder.
    pub fn unorganized(&self) -> impl Iterator<Item = &Task> {
        self.tasks.unorganized()
    }

    /// Current statistics.
    #[must_use]
    pub const fn stats(&self) -> &UserStats {
        self.stats.stats()
    }

    /// Completions per local hour, as a 24-slot series.
    #[must_use]
    pub fn hourly_series(&self) -> [u32; 24] {
        self.stats.hourly_series()
    }

    /// Fraction of all tasks that are completed.
    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        completion_rate(self.tasks.tasks())
    }

    /// Completion progress for one folder.
    #[must_use]
    pub fn folder_progress(&self, folder_id: &str) -> Progress {
        Progress::of(self.tasks.tasks_in_folder(folder_id))
    }

    /// Suggestions for partially typed task text.
    #[must_use]
    pub fn suggest(&self, input: &str) -> &'static [&'static str] {
        self.suggestions.suggest(input)
    }

    /// Tasks grouped into board columns.
    #[must_use]
    pub fn board(&self) -> Board<'_> {
        views::board(self.tasks.tasks())
    }

    /// Dated tasks for the calendar.
    #[must_use]
    pub fn calendar(&self) -> Vec<CalendarEntry> {
        views::calendar_entries(self.tasks.tasks())
    }

    /// Current Pomodoro settings.
    #[must_use]
    pub const fn pomodoro_settings(&self) -> &PomodoroSettings {
        &self.pomodoro
    }

    /// The Pomodoro countdown.
    #[must_use]
    pub const fn pomodoro(&self) -> &PomodoroCycle {
        &self.cycle
    }

    /// Current presentation mode.
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.clock.utc_offset()).date_naive()
    }

    // Local-only settings

    /// Merge a partial Pomodoro settings change. The countdown picks the
    /// new durations up from its next phase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if any resulting field is zero.
    pub fn update_pomodoro_settings(&mut self, update: PomodoroUpdate) -> Result<PomodoroSettings> {
        self.pomodoro.apply(update)?;
        self.cycle.set_settings(self.pomodoro);
        Ok(self.pomodoro)
    }

    /// Start or pause the Pomodoro countdown. Returns whether it is now
    /// running.
    pub fn toggle_pomodoro(&mut self) -> bool {
        self.cycle.toggle()
    }

    /// Advance the Pomodoro countdown by `seconds`, returning the next
    /// phase if the current one ran out.
    pub fn tick_pomodoro(&mut self, seconds: u32) -> Option<Phase> {
        self.cycle.tick(seconds)
    }

    /// Back to a paused first work session.
    pub fn reset_pomodoro(&mut self) {
        self.cycle.reset();
    }

    /// Switch presentation mode.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Re-evaluate the streak against today's date, dropping it if a whole
    /// day has passed without a completion.
    pub fn refresh_streak(&mut self) {
        let today = self.today();
        self.stats.refresh_streak(today);
    }

    // Task mutations

    fn require_folder(&self, folder_id: Option<&str>) -> Result<()> {
        match folder_id {
            Some(id) if !self.folders.contains(id) => Err(Error::folder_not_found(id)),
            _ => Ok(()),
        }
    }

    fn write_task(&mut self, owner: &str, task: Task, created: bool) -> Result<Task> {
        remote(self.backend.upsert_task(owner, &task))?;
        self.tasks.commit(task.clone());
        let event =
            if created { StoreEvent::TaskCreated(task.clone()) } else { StoreEvent::TaskUpdated(task.clone()) };
        self.emit(event);
        Ok(task)
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank text or a zero estimate,
    /// [`Error::NotFound`] if the folder does not exist, or
    /// [`Error::Sync`] if the backend rejects the write.
    pub fn create_task(&mut self, input: NewTask) -> Result<Task> {
        let owner = self.owner()?;
        self.require_folder(input.folder_id.as_deref())?;
        let task = self.tasks.prepare_create(input, self.clock.now())?;
        self.write_task(&owner, task, true)
    }

    /// Flip a task's completed flag. The first off→on transition of a task
    /// counts towards the statistics and may unlock achievements; completing
    /// it again after reopening does not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown task or [`Error::Sync`]
    /// if the backend rejects the write.
    pub fn toggle_completion(&mut self, id: &str) -> Result<Task> {
        let owner = self.owner()?;
        let now = self.clock.now();
        let task = self.tasks.prepare_toggle(id, now)?;
        let task = self.write_task(&owner, task, false)?;

        if task.completed {
            let unlocked =
                self.stats.record_completion(&task.id, task.priority, now, self.clock.utc_offset());
            for achievement in unlocked {
                self.emit(StoreEvent::AchievementUnlocked(achievement));
            }
        }
        Ok(task)
    }

    /// Merge fields into a task. Setting `completed` here does not count
    /// towards the statistics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown task or folder,
    /// [`Error::Validation`] for invalid fields, or [`Error::Sync`].
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Result<Task> {
        let owner = self.owner()?;
        if let Some(Some(folder_id)) = &update.folder_id {
            self.require_folder(Some(folder_id))?;
        }
        let task = self.tasks.prepare_update(id, update, self.clock.now())?;
        self.write_task(&owner, task, false)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown task or [`Error::Sync`].
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let owner = self.owner()?;
        let task = self.tasks.prepare_delete(id)?;
        remote(self.backend.delete_tasks(&owner, std::slice::from_ref(&task.id)))?;
        self.tasks.remove(&task.id);
        self.emit(StoreEvent::TaskDeleted { id: task.id.clone() });
        Ok(task)
    }

    /// Make a task public or private.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown task or [`Error::Sync`].
    pub fn set_public(&mut self, id: &str, is_public: bool) -> Result<Task> {
        let owner = self.owner()?;
        let task = self.tasks.prepare_set_public(id, is_public)?;
        self.write_task(&owner, task, false)
    }

    /// Replace a task's assignees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown task or [`Error::Sync`].
    pub fn assign<I, S>(&mut self, id: &str, user_ids: I) -> Result<Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let owner = self.owner()?;
        let task = self.tasks.prepare_assign(id, user_ids)?;
        self.write_task(&owner, task, false)
    }

    /// Append a subtask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank text, [`Error::NotFound`]
    /// for an unknown task, or [`Error::Sync`].
    pub fn add_subtask(&mut self, task_id: &str, text: &str) -> Result<Task> {
        let owner = self.owner()?;
        let task = self.tasks.prepare_add_subtask(task_id, text)?;
        self.write_task(&owner, task, false)
    }

    /// Flip a subtask's completed flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown task or subtask, or
    /// [`Error::Sync`].
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Task> {
        let owner = self.owner()?;
        let task = self.tasks.prepare_toggle_subtask(task_id, subtask_id)?;
        self.write_task(&owner, task, false)
    }

    /// Start a timer session on a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if a timer is already running or the
    /// task is completed, [`Error::NotFound`], or [`Error::Sync`].
    pub fn start_timer(&mut self, task_id: &str) -> Result<Task> {
        let owner = self.owner()?;
        let task = self.tasks.prepare_start_timer(task_id, self.clock.now())?;
        self.write_task(&owner, task, false)
    }

    /// Stop the running timer session and add its minutes to `actual_time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if no timer is running,
    /// [`Error::NotFound`], or [`Error::Sync`].
    pub fn stop_timer(&mut self, task_id: &str) -> Result<Task> {
        let owner = self.owner()?;
        let task = self.tasks.prepare_stop_timer(task_id, self.clock.now())?;
        self.write_task(&owner, task, false)
    }

    /// Drop a task onto a board column.
    ///
    /// `Completed` completes the task through [`TodoState::toggle_completion`],
    /// so it counts towards the statistics. `InProgress` reopens the task if
    /// needed and starts its timer. `Todo` stops any running timer and
    /// reopens the task. A task already in the target column is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown task or [`Error::Sync`].
    pub fn move_to_column(&mut self, id: &str, column: BoardColumn) -> Result<Task> {
        self.owner()?;
        let current = self.tasks.get_task(id).ok_or_else(|| Error::task_not_found(id))?.clone();
        if BoardColumn::of(&current) == column {
            return Ok(current);
        }

        let reopen = TaskUpdate { completed: Some(false), ..TaskUpdate::default() };
        match column {
            BoardColumn::Completed => self.toggle_completion(id),
            BoardColumn::InProgress => {
                if current.completed {
                    self.update_task(id, reopen)?;
                }
                self.start_timer(id)
            }
            BoardColumn::Todo => {
                let mut task = current;
                if task.timer_running() {
                    task = self.stop_timer(id)?;
                }
                if task.completed {
                    task = self.update_task(id, reopen)?;
                }
                Ok(task)
            }
        }
    }

    // Folder mutations

    fn write_folder(&mut self, owner: &str, folder: Folder, created: bool) -> Result<Folder> {
        remote(self.backend.upsert_folder(owner, &folder))?;
        self.folders.commit(folder.clone());
        let event = if created {
            StoreEvent::FolderCreated(folder.clone())
        } else {
            StoreEvent::FolderUpdated(folder.clone())
        };
        self.emit(event);
        Ok(folder)
    }

    /// Create a folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name or [`Error::Sync`].
    pub fn create_folder(&mut self, name: &str) -> Result<Folder> {
        let owner = self.owner()?;
        let folder = self.folders.prepare_create(name, self.clock.now())?;
        self.write_folder(&owner, folder, true)
    }

    /// Rename a folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name, [`Error::NotFound`],
    /// or [`Error::Sync`].
    pub fn rename_folder(&mut self, id: &str, name: &str) -> Result<Folder> {
        let owner = self.owner()?;
        let folder = self.folders.prepare_rename(id, name)?;
        self.write_folder(&owner, folder, false)
    }

    /// Share a folder with `user_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown folder or [`Error::Sync`].
    pub fn share_folder<I, S>(&mut self, id: &str, user_ids: I) -> Result<Folder>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let owner = self.owner()?;
        let folder = self.folders.prepare_share(id, user_ids)?;
        self.write_folder(&owner, folder, false)
    }

    /// Delete a folder and every task filed under it, as one change.
    ///
    /// Statistics already counted for the removed tasks are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown folder or [`Error::Sync`];
    /// nothing is removed in either case.
    pub fn delete_folder(&mut self, id: &str) -> Result<FolderCascade> {
        let owner = self.owner()?;
        let cascade = self.folders.prepare_delete(id, &self.tasks)?;
        remote(self.backend.delete_folder_cascade(&owner, id, &cascade.task_ids))?;
        self.folders.commit_delete(&cascade, &mut self.tasks);
        self.emit(StoreEvent::FolderDeleted {
            id: cascade.folder.id.clone(),
            cascaded: cascade.task_ids.clone(),
        });
        Ok(cascade)
    }

    // Snapshots

    /// Replace the task collection with a snapshot from the backend.
    ///
    /// Tasks filed under a folder that is not in the folder collection are
    /// left out.
    pub fn apply_task_snapshot(&mut self, tasks: Vec<Task>) {
        self.tasks.replace_all(tasks);
        let dropped = self.orphaned_tasks();
        self.tasks.remove_many(&dropped);
        self.emit(StoreEvent::TasksReplaced { count: self.tasks.len() });
    }

    /// Replace the folder collection with a snapshot from the backend.
    ///
    /// Tasks filed under a folder missing from the snapshot are removed
    /// locally, each with a [`StoreEvent::TaskDeleted`].
    pub fn apply_folder_snapshot(&mut self, folders: Vec<Folder>) {
        self.folders.replace_all(folders);
        let dropped = self.orphaned_tasks();
        self.tasks.remove_many(&dropped);
        self.emit(StoreEvent::FoldersReplaced { count: self.folders.folders().len() });
        for id in dropped {
            self.emit(StoreEvent::TaskDeleted { id });
        }
    }

    fn orphaned_tasks(&self) -> Vec<String> {
        self.tasks
            .tasks()
            .iter()
            .filter(|t| t.folder_id.as_deref().is_some_and(|f| !self.folders.contains(f)))
            .map(|t| t.id.clone())
            .collect()
    }

    /// Pull the signed-in user's tasks and folders from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] or [`Error::Sync`]; on failure
    /// neither collection is replaced.
    pub fn sync(&mut self) -> Result<()> {
        let owner = self.owner()?;
        let folders = remote(self.backend.load_folders(&owner))?;
        let tasks = remote(self.backend.load_tasks(&owner))?;
        self.apply_folder_snapshot(folders);
        self.apply_task_snapshot(tasks);
        Ok(())
    }

    fn emit(&mut self, event: StoreEvent) {
        if let Some(log) = &self.event_log {
            log.record(&event, self.clock.now());
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
