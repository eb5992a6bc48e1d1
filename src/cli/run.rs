//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::cli::{Cli, Command, FolderCommand, SubtaskCommand, TimerCommand};
use crate::config::AppConfig;
use crate::error::Result;
use crate::event_log::EventLog;
use crate::paths;
use crate::state::TodoState;
use crate::stats::Progress;
use crate::sync::SqliteBackend;
use crate::tasks::{NewTask, Task, TaskUpdate};
use crate::traits::{SystemClock, User};
use crate::views::BoardColumn;
use std::path::Path;
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

impl CliOutput {
    fn success(stdout: Vec<String>) -> Self {
        Self { exit_code: ExitCode::SUCCESS, stdout, stderr: vec![] }
    }

    fn failure(message: String) -> Self {
        Self { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
    }
}

/// User id used when neither `--user` nor the config names one.
const DEFAULT_USER: &str = "local";

/// Run a parsed command line.
pub fn run(cli: Cli) -> CliOutput {
    let Some(base_dir) = cli.base_dir.or_else(dirs::home_dir) else {
        return CliOutput::failure("Error: cannot determine home directory; pass --base-dir".into());
    };
    run_in(cli.command, &base_dir, cli.user.as_deref())
}

/// Run a command against the store under `base_dir`.
pub fn run_in(command: Command, base_dir: &Path, user: Option<&str>) -> CliOutput {
    if matches!(command, Command::Version) {
        return CliOutput::success(vec![format!("todo v{}", crate::VERSION)]);
    }
    let result = open_state(base_dir, user).and_then(|mut state| execute(&mut state, command));
    match result {
        Ok(stdout) => CliOutput::success(stdout),
        Err(e) => CliOutput::failure(format!("Error: {e}")),
    }
}

fn open_state(base_dir: &Path, user: Option<&str>) -> Result<TodoState> {
    let config = AppConfig::load_or_default(base_dir)?;
    let backend = SqliteBackend::new(config.resolve_db_path(base_dir))?;

    let mut state =
        TodoState::new(Box::new(SystemClock), Box::new(backend)).with_pomodoro(config.pomodoro);
    if let Some(log) = EventLog::from_config(&config, &paths::data_dir_in(base_dir)) {
        state = state.with_event_log(log);
    }

    let uid = user
        .map(str::to_string)
        .or(config.user_id)
        .unwrap_or_else(|| DEFAULT_USER.to_string());
    state.sign_in(User::new(uid));
    state.sync()?;
    Ok(state)
}

fn execute(state: &mut TodoState, command: Command) -> Result<Vec<String>> {
    match command {
        Command::Add { text, folder, priority, due, estimate, public } => {
            let input = NewTask {
                text,
                folder_id: folder,
                due_date: due,
                priority,
                estimated_time: estimate,
                is_public: Some(public),
                location: None,
            };
            let task = state.create_task(input)?;
            Ok(vec![format!("Created {}", task.id)])
        }
        Command::List { folder, json } => list(state, folder.as_deref(), json),
        Command::Done { id } => {
            let task = state.toggle_completion(&id)?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            Ok(vec![format!("{verb} {}", task.id)])
        }
        Command::Rm { id } => {
            let task = state.delete_task(&id)?;
            Ok(vec![format!("Deleted {}", task.id)])
        }
        Command::Edit { id, text, priority, due, clear_due, estimate, folder, unfile, tags } => {
            let update = TaskUpdate {
                text,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                estimated_time: estimate.map(Some),
                folder_id: if unfile { Some(None) } else { folder.map(Some) },
                tags: tags.map(|t| t.into_iter().filter(|s| !s.is_empty()).collect()),
                ..TaskUpdate::default()
            };
            if update.is_empty() {
                return Ok(vec!["Nothing to update".to_string()]);
            }
            let task = state.update_task(&id, update)?;
            Ok(vec![format!("Updated {}", task.id)])
        }
        Command::Subtask(SubtaskCommand::Add { task_id, text }) => {
            let task = state.add_subtask(&task_id, &text)?;
            let added = task.subtasks.last().map_or("", |s| s.id.as_str());
            Ok(vec![format!("Added subtask {added} to {}", task.id)])
        }
        Command::Subtask(SubtaskCommand::Toggle { task_id, subtask_id }) => {
            let task = state.toggle_subtask(&task_id, &subtask_id)?;
            let done = task.subtask(&subtask_id).is_some_and(|s| s.completed);
            Ok(vec![format!("Subtask {subtask_id} {}", if done { "done" } else { "open" })])
        }
        Command::Timer(TimerCommand::Start { id }) => {
            let task = state.start_timer(&id)?;
            Ok(vec![format!("Timer started for {}", task.id)])
        }
        Command::Timer(TimerCommand::Stop { id }) => {
            let task = state.stop_timer(&id)?;
            Ok(vec![format!(
                "Timer stopped for {} ({} min tracked)",
                task.id,
                task.actual_time.unwrap_or(0)
            )])
        }
        Command::Folder(cmd) => folder(state, cmd),
        Command::Suggest { text } => Ok(state.suggest(&text).iter().map(ToString::to_string).collect()),
        Command::Stats => Ok(stats(state)),
        Command::Board => Ok(board(state)),
        Command::Version => Ok(vec![format!("todo v{}", crate::VERSION)]),
    }
}

fn folder(state: &mut TodoState, command: FolderCommand) -> Result<Vec<String>> {
    match command {
        FolderCommand::Add { name } => {
            let folder = state.create_folder(&name)?;
            Ok(vec![format!("Created folder {}", folder.id)])
        }
        FolderCommand::Rename { id, name } => {
            let folder = state.rename_folder(&id, &name)?;
            Ok(vec![format!("Renamed {} to {}", folder.id, folder.name)])
        }
        FolderCommand::Rm { id } => {
            let cascade = state.delete_folder(&id)?;
            Ok(vec![format!(
                "Deleted folder {} and {} task(s)",
                cascade.folder.id,
                cascade.task_ids.len()
            )])
        }
        FolderCommand::Share { id, users } => {
            let folder = state.share_folder(&id, users)?;
            let with: Vec<&str> = folder.shared_with.iter().map(String::as_str).collect();
            Ok(vec![format!("Shared {} with {}", folder.id, with.join(", "))])
        }
        FolderCommand::List => Ok(state
            .folders()
            .iter()
            .map(|f| {
                let progress = state.folder_progress(&f.id);
                format!("{}  {}  {}", f.id, f.name, progress_label(progress))
            })
            .collect()),
    }
}

fn list(state: &TodoState, folder: Option<&str>, json: bool) -> Result<Vec<String>> {
    if json {
        let tasks: Vec<&Task> = state
            .tasks()
            .iter()
            .filter(|t| folder.map_or(true, |f| t.in_folder(f)))
            .collect();
        return Ok(vec![serde_json::to_string_pretty(&tasks)?]);
    }

    let mut lines = Vec::new();
    for f in state.folders().iter().filter(|f| folder.map_or(true, |id| f.id == id)) {
        lines.push(format!("{} ({})  {}", f.name, f.id, progress_label(state.folder_progress(&f.id))));
        lines.extend(state.tasks().iter().filter(|t| t.in_folder(&f.id)).map(format_task));
    }
    if folder.is_none() {
        let unorganized: Vec<String> = state.unorganized().map(format_task).collect();
        if !unorganized.is_empty() {
            lines.push("Unorganized".to_string());
            lines.extend(unorganized);
        }
    }
    if lines.is_empty() {
        lines.push("No tasks".to_string());
    }
    Ok(lines)
}

fn stats(state: &TodoState) -> Vec<String> {
    let overall = Progress::of(state.tasks());
    let mut lines = vec![format!("Completed: {}", progress_label(overall))];
    for f in state.folders() {
        lines.push(format!("  {}: {}", f.name, progress_label(state.folder_progress(&f.id))));
    }
    lines
}

fn board(state: &TodoState) -> Vec<String> {
    let board = state.board();
    let mut lines = Vec::new();
    for column in BoardColumn::ALL {
        let tasks = board.column(column);
        lines.push(format!("{} ({})", column.title(), tasks.len()));
        lines.extend(tasks.iter().map(|t| format!("  {}  {}", t.id, t.text)));
    }
    lines
}

fn progress_label(progress: Progress) -> String {
    format!("{}/{} ({}%)", progress.completed, progress.total, progress.percent())
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else if task.timer_running() { ">" } else { " " };
    let mut line = format!("  [{mark}] {}  {}  ({})", task.id, task.text, task.priority);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {due}"));
    }
    match (task.actual_time, task.estimated_time) {
        (Some(actual), Some(estimate)) => line.push_str(&format!(" {actual}/{estimate} min")),
        (Some(actual), None) => line.push_str(&format!(" {actual} min")),
        (None, Some(estimate)) => line.push_str(&format!(" est {estimate} min")),
        (None, None) => {}
    }
    if !task.subtasks.is_empty() {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        line.push_str(&format!(" [{done}/{} subtasks]", task.subtasks.len()));
    }
    line
}
