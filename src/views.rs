//! Derived view state for list, board and calendar renderers.

use crate::tasks::{Priority, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the task collection is being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Folder-grouped list.
    #[default]
    List,
    /// Three-column board.
    Kanban,
    /// Month calendar keyed by due date.
    Calendar,
}

/// A board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardColumn {
    /// Not started.
    Todo,
    /// Incomplete with a running timer.
    InProgress,
    /// Done.
    Completed,
}

impl BoardColumn {
    /// Columns in display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// The column a task belongs in.
    #[must_use]
    pub const fn of(task: &Task) -> Self {
        if task.completed {
            Self::Completed
        } else if task.timer_running() {
            Self::InProgress
        } else {
            Self::Todo
        }
    }

    /// Column heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

/// Tasks grouped into board columns, each in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board<'a> {
    /// Not started.
    pub todo: Vec<&'a Task>,
    /// Running timers.
    pub in_progress: Vec<&'a Task>,
    /// Done.
    pub completed: Vec<&'a Task>,
}

impl<'a> Board<'a> {
    /// The tasks in `column`.
    #[must_use]
    pub fn column(&self, column: BoardColumn) -> &[&'a Task] {
        match column {
            BoardColumn::Todo => &self.todo,
            BoardColumn::InProgress => &self.in_progress,
            BoardColumn::Completed => &self.completed,
        }
    }
}

/// Group `tasks` by board column.
pub fn board<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Board<'a> {
    let mut board = Board::default();
    for task in tasks {
        match BoardColumn::of(task) {
            BoardColumn::Todo => board.todo.push(task),
            BoardColumn::InProgress => board.in_progress.push(task),
            BoardColumn::Completed => board.completed.push(task),
        }
    }
    board
}

/// Colour class for a calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarTone {
    /// Completed task.
    Done,
    /// Open, high priority.
    High,
    /// Open, medium priority.
    Medium,
    /// Open, low priority.
    Low,
}

/// A dated task, ready for a calendar renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Task id.
    pub id: String,
    /// Task text.
    pub title: String,
    /// Due date.
    pub date: NaiveDate,
    /// Colour class.
    pub tone: CalendarTone,
}

/// Calendar entries for every task with a due date, sorted by date.
pub fn calendar_entries<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = tasks
        .into_iter()
        .filter_map(|task| {
            let date = task.due_date?;
            let tone = if task.completed {
                CalendarTone::Done
            } else {
                match task.priority {
                    Priority::High => CalendarTone::High,
                    Priority::Medium => CalendarTone::Medium,
                    Priority::Low => CalendarTone::Low,
                }
            };
            Some(CalendarEntry { id: task.id.clone(), title: task.text.clone(), date, tone })
        })
        .collect();
    entries.sort_by_key(|entry| entry.date);
    entries
}
