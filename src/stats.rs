//! Productivity statistics derived from task completions.
//!
//! Counters move once per task, on its first off→on completion transition,
//! and are never rolled back: un-completing, re-completing or deleting a
//! task leaves them alone.

use crate::tasks::{Priority, Task};
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An unlocked achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Catalogue id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What it was awarded for.
    pub description: String,
    /// Icon reference for the renderer.
    pub icon: String,
    /// When it was unlocked.
    pub unlocked_at: DateTime<Utc>,
}

/// What unlocks a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Milestone {
    Completions(u64),
    StreakDays(u32),
}

struct CatalogueEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    milestone: Milestone,
}

const CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry {
        id: "first-task",
        name: "First Step",
        description: "Completed your first task",
        icon: "star",
        milestone: Milestone::Completions(1),
    },
    CatalogueEntry {
        id: "ten-tasks",
        name: "Getting Things Done",
        description: "Completed 10 tasks",
        icon: "check-circle",
        milestone: Milestone::Completions(10),
    },
    CatalogueEntry {
        id: "three-day-streak",
        name: "On a Roll",
        description: "Completed tasks 3 days in a row",
        icon: "flame",
        milestone: Milestone::StreakDays(3),
    },
    CatalogueEntry {
        id: "fifty-tasks",
        name: "Productivity Pro",
        description: "Completed 50 tasks",
        icon: "trophy",
        milestone: Milestone::Completions(50),
    },
    CatalogueEntry {
        id: "seven-day-streak",
        name: "Week Warrior",
        description: "Completed tasks 7 days in a row",
        icon: "calendar-check",
        milestone: Milestone::StreakDays(7),
    },
    CatalogueEntry {
        id: "hundred-tasks",
        name: "Centurion",
        description: "Completed 100 tasks",
        icon: "award",
        milestone: Milestone::Completions(100),
    },
];

/// Accumulated statistics for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Distinct tasks completed so far.
    pub tasks_completed: u64,
    /// Consecutive calendar days with at least one completion.
    pub streak_days: u32,
    /// Unlocked achievements, oldest first.
    pub achievements: Vec<Achievement>,
    /// Completions per local hour of day (0–23).
    pub productivity_by_hour: BTreeMap<u8, u32>,
    /// Completions per priority.
    pub tasks_by_priority: BTreeMap<Priority, u32>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            tasks_completed: 0,
            streak_days: 0,
            achievements: Vec::new(),
            productivity_by_hour: BTreeMap::new(),
            tasks_by_priority: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
        }
    }
}

/// Completed-versus-total counts for a set of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Tasks marked completed.
    pub completed: usize,
    /// All tasks.
    pub total: usize,
}

impl Progress {
    /// Count completed tasks among `tasks`.
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |acc, task| Self {
            completed: acc.completed + usize::from(task.completed),
            total: acc.total + 1,
        })
    }

    /// Completion percentage rounded to the nearest whole number; 0 when
    /// there are no tasks.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 200 + self.total) / (self.total * 2)
    }
}

/// Fraction of `tasks` that are completed, in `0.0..=1.0`; 0 for no tasks.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn completion_rate(tasks: &[Task]) -> f64 {
    let progress = Progress::of(tasks);
    if progress.total == 0 {
        0.0
    } else {
        progress.completed as f64 / progress.total as f64
    }
}

/// Owner of [`UserStats`] and the history the streak needs.
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    stats: UserStats,
    last_completion_day: Option<NaiveDate>,
    counted: BTreeSet<String>,
}

impl StatsAggregator {
    /// Start with empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current statistics.
    #[must_use]
    pub const fn stats(&self) -> &UserStats {
        &self.stats
    }

    /// Local calendar day of the most recent completion.
    #[must_use]
    pub const fn last_completion_day(&self) -> Option<NaiveDate> {
        self.last_completion_day
    }

    /// Whether the task's completion has already been counted.
    #[must_use]
    pub fn has_counted(&self, task_id: &str) -> bool {
        self.counted.contains(task_id)
    }

    /// Completions per hour as a dense 24-slot series.
    #[must_use]
    pub fn hourly_series(&self) -> [u32; 24] {
        let mut series = [0; 24];
        for (hour, count) in &self.stats.productivity_by_hour {
            if let Some(slot) = series.get_mut(usize::from(*hour)) {
                *slot = *count;
            }
        }
        series
    }

    /// Count the completion of `task_id` with `priority` at `at`.
    ///
    /// Only a task's first completion counts; later ones change nothing.
    /// Returns the achievements this completion unlocked.
    pub fn record_completion(
        &mut self,
        task_id: &str,
        priority: Priority,
        at: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Vec<Achievement> {
        if !self.counted.insert(task_id.to_string()) {
            return Vec::new();
        }
        let local = at.with_timezone(&offset);
        #[allow(clippy::cast_possible_truncation)]
        let hour = local.hour() as u8;
        let day = local.date_naive();

        self.stats.tasks_completed += 1;
        *self.stats.tasks_by_priority.entry(priority).or_insert(0) += 1;
        *self.stats.productivity_by_hour.entry(hour).or_insert(0) += 1;
        self.extend_streak(day);

        self.unlock_reached(at)
    }

    /// Apply the streak-break rule as of `today`.
    ///
    /// A streak survives the day after its last completion; once a whole
    /// calendar day passes without one, it drops to 0.
    pub fn refresh_streak(&mut self, today: NaiveDate) {
        if let Some(last) = self.last_completion_day {
            if (today - last).num_days() > 1 {
                self.stats.streak_days = 0;
            }
        }
    }

    fn extend_streak(&mut self, day: NaiveDate) {
        match self.last_completion_day {
            // Same day, or a clock that went backwards.
            Some(last) if day <= last => {}
            Some(last) if last.succ_opt() == Some(day) => self.stats.streak_days += 1,
            _ => self.stats.streak_days = 1,
        }
        self.last_completion_day = Some(self.last_completion_day.map_or(day, |last| last.max(day)));
    }

    fn unlock_reached(&mut self, at: DateTime<Utc>) -> Vec<Achievement> {
        let mut unlocked = Vec::new();
        for entry in CATALOGUE {
            let reached = match entry.milestone {
                Milestone::Completions(n) => self.stats.tasks_completed >= n,
                Milestone::StreakDays(n) => self.stats.streak_days >= n,
            };
            let already = self.stats.achievements.iter().any(|a| a.id == entry.id);
            if reached && !already {
                let achievement = Achievement {
                    id: entry.id.to_string(),
                    name: entry.name.to_string(),
                    description: entry.description.to_string(),
                    icon: entry.icon.to_string(),
                    unlocked_at: at,
                };
                self.stats.achievements.push(achievement.clone());
                unlocked.push(achievement);
            }
        }
        unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 15, 0).unwrap()
    }

    fn task(completed: bool) -> Task {
        Task {
            id: format!("t-{completed}"),
            text: "t".into(),
            completed,
            created_at: at(1, 0),
            due_date: None,
            folder_id: None,
            priority: Priority::Medium,
            estimated_time: None,
            actual_time: None,
            is_public: false,
            assigned_to: Default::default(),
            tags: Default::default(),
            location: None,
            subtasks: Vec::new(),
            timer_started: None,
        }
    }

    #[test]
    fn test_completion_rate() {
        assert!((completion_rate(&[]) - 0.0).abs() < f64::EPSILON);
        let tasks = vec![task(true), task(false), task(false), task(true)];
        assert!((completion_rate(&tasks) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(Progress { completed: 0, total: 0 }.percent(), 0);
        assert_eq!(Progress { completed: 1, total: 3 }.percent(), 33);
        assert_eq!(Progress { completed: 2, total: 3 }.percent(), 67);
        assert_eq!(Progress { completed: 1, total: 8 }.percent(), 13);
        assert_eq!(Progress::of(&[task(true), task(false)]).percent(), 50);
    }

    #[test]
    fn test_default_stats_have_priority_buckets() {
        let stats = UserStats::default();
        assert_eq!(stats.tasks_by_priority.len(), 3);
        assert!(stats.tasks_by_priority.values().all(|v| *v == 0));
    }

    #[test]
    fn test_record_completion_counts() {
        let mut agg = StatsAggregator::new();
        agg.record_completion("a", Priority::High, at(4, 9), utc());
        agg.record_completion("b", Priority::High, at(4, 9), utc());
        agg.record_completion("c", Priority::Low, at(4, 17), utc());

        let stats = agg.stats();
        assert_eq!(stats.tasks_completed, 3);
        assert_eq!(stats.tasks_by_priority[&Priority::High], 2);
        assert_eq!(stats.tasks_by_priority[&Priority::Low], 1);
        assert_eq!(stats.tasks_by_priority[&Priority::Medium], 0);
        assert_eq!(stats.productivity_by_hour[&9], 2);
        assert_eq!(agg.hourly_series()[17], 1);
        assert_eq!(agg.hourly_series()[0], 0);
    }

    #[test]
    fn test_same_task_counts_once() {
        let mut agg = StatsAggregator::new();
        assert_eq!(agg.record_completion("a", Priority::High, at(4, 9), utc()).len(), 1);
        assert!(agg.has_counted("a"));
        assert!(agg.record_completion("a", Priority::High, at(5, 10), utc()).is_empty());

        let stats = agg.stats();
        assert_eq!(stats.tasks_completed, 1);
        assert_eq!(stats.tasks_by_priority[&Priority::High], 1);
        assert_eq!(agg.hourly_series()[10], 0);
        assert_eq!(stats.streak_days, 1);
        assert_eq!(agg.last_completion_day(), NaiveDate::from_ymd_opt(2024, 3, 4));
    }

    #[test]
    fn test_hour_bucket_uses_local_offset() {
        let mut agg = StatsAggregator::new();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        agg.record_completion("a", Priority::Medium, at(4, 23), plus_two);
        assert_eq!(agg.stats().productivity_by_hour[&1], 1);
        assert_eq!(agg.last_completion_day(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_streak_extends_and_resets() {
        let mut agg = StatsAggregator::new();
        agg.record_completion("a", Priority::Medium, at(4, 9), utc());
        agg.record_completion("b", Priority::Medium, at(4, 20), utc());
        assert_eq!(agg.stats().streak_days, 1);
        agg.record_completion("c", Priority::Medium, at(5, 9), utc());
        assert_eq!(agg.stats().streak_days, 2);

        // The day after the last completion keeps the streak alive.
        agg.refresh_streak(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(agg.stats().streak_days, 2);

        agg.refresh_streak(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(agg.stats().streak_days, 0);

        agg.record_completion("d", Priority::Medium, at(8, 9), utc());
        assert_eq!(agg.stats().streak_days, 1);
    }

    #[test]
    fn test_achievements_unlock_once_in_order() {
        let mut agg = StatsAggregator::new();
        let first = agg.record_completion("d1", Priority::Medium, at(1, 9), utc());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "first-task");

        for day in 2..=3 {
            agg.record_completion(&format!("d{day}"), Priority::Medium, at(day, 9), utc());
        }
        let ids: Vec<&str> = agg.stats().achievements.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["first-task", "three-day-streak"]);

        for i in 0..7 {
            agg.record_completion(&format!("x{i}"), Priority::Medium, at(3, 10), utc());
        }
        let ids: Vec<&str> = agg.stats().achievements.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["first-task", "three-day-streak", "ten-tasks"]);
    }

    #[test]
    fn test_achievement_unlock_time() {
        let mut agg = StatsAggregator::new();
        let when = at(4, 9) + Duration::minutes(3);
        agg.record_completion("a", Priority::Medium, when, utc());
        assert_eq!(agg.stats().achievements[0].unlocked_at, when);
    }

    proptest! {
        #[test]
        fn prop_counters_agree(picks in proptest::collection::vec((0usize..8, 0usize..3, 0u32..24), 0..60)) {
            let mut agg = StatsAggregator::new();
            for (task, p, hour) in &picks {
                agg.record_completion(&format!("t{task}"), Priority::ALL[*p], at(4, *hour), utc());
            }
            let distinct: BTreeSet<usize> = picks.iter().map(|(task, _, _)| *task).collect();
            let stats = agg.stats();
            let by_priority: u32 = stats.tasks_by_priority.values().sum();
            let by_hour: u32 = stats.productivity_by_hour.values().sum();
            prop_assert_eq!(u64::from(by_priority), stats.tasks_completed);
            prop_assert_eq!(u64::from(by_hour), stats.tasks_completed);
            prop_assert_eq!(stats.tasks_completed, distinct.len() as u64);
        }
    }
}
