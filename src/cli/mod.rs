//! Command-line front end for a local task list.
//!
//! Every invocation opens the SQLite store, signs in the configured user,
//! pulls their tasks and folders, runs one command and exits.

mod folder;
mod run;


pub use folder::FolderCommand;
pub use run::{run, CliOutput};

use crate::tasks::Priority;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folder-organized task list with timers and productivity stats.
///
/// For detailed help on any command group, use:
///   todo <command> --help
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding `.todo-core/` (defaults to the home directory)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// User to act as (overrides the config file)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a task.
    Add {
        /// Task text
        text: String,

        /// Folder id to file the task under
        #[arg(short, long)]
        folder: Option<String>,

        /// Priority: low, medium or high
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<NaiveDate>,

        /// Estimated minutes
        #[arg(short, long)]
        estimate: Option<u32>,

        /// Make the task public
        #[arg(long)]
        public: bool,
    },

    /// List tasks, grouped by folder.
    List {
        /// Only tasks in this folder
        #[arg(short, long)]
        folder: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Toggle a task's completion.
    Done {
        /// Task id
        id: String,
    },

    /// Delete a task.
    Rm {
        /// Task id
        id: String,
    },

    /// Edit a task's fields.
    Edit {
        /// Task id
        id: String,

        /// New text
        #[arg(long)]
        text: Option<String>,

        /// New priority
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New estimate in minutes
        #[arg(short, long)]
        estimate: Option<u32>,

        /// Move to this folder
        #[arg(short, long, conflicts_with = "unfile")]
        folder: Option<String>,

        /// Move out of any folder
        #[arg(long)]
        unfile: bool,

        /// Replace tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Subtask management.
    #[command(subcommand)]
    Subtask(SubtaskCommand),

    /// Per-task time tracking.
    #[command(subcommand)]
    Timer(TimerCommand),

    /// Folder management.
    #[command(subcommand)]
    Folder(FolderCommand),

    /// Suggest tasks for some text.
    Suggest {
        /// Partial task text
        text: String,
    },

    /// Show completion rate and folder progress.
    Stats,

    /// Show tasks as board columns.
    Board,

    /// Show version information.
    Version,
}

/// Subtask commands.
#[derive(Subcommand, Debug, Clone)]
pub enum SubtaskCommand {
    /// Add a subtask.
    Add {
        /// Parent task id
        task_id: String,
        /// Subtask text
        text: String,
    },
    /// Toggle a subtask's completion.
    Toggle {
        /// Parent task id
        task_id: String,
        /// Subtask id
        subtask_id: String,
    },
}

/// Timer commands.
#[derive(Subcommand, Debug, Clone)]
pub enum TimerCommand {
    /// Start timing a task.
    Start {
        /// Task id
        id: String,
    },
    /// Stop timing a task and record the minutes.
    Stop {
        /// Task id
        id: String,
    },
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::from_str(s).map_err(|e| e.to_string())
}
