//! Pomodoro work/break cycle.
//!
//! [`PomodoroSettings`] is the user-editable configuration; [`PomodoroCycle`]
//! is the countdown a front end drives one tick at a time. The cycle is
//! independent of the per-task timers in [`crate::tasks`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Pomodoro durations, in minutes, and the long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    /// Length of a work session.
    pub work_duration: u32,
    /// Length of a short break.
    pub break_duration: u32,
    /// Length of a long break.
    pub long_break_duration: u32,
    /// Work sessions per long break.
    pub long_break_interval: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self { work_duration: 25, break_duration: 5, long_break_duration: 15, long_break_interval: 4 }
    }
}

/// A partial change to [`PomodoroSettings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PomodoroUpdate {
    /// New work length.
    pub work_duration: Option<u32>,
    /// New short break length.
    pub break_duration: Option<u32>,
    /// New long break length.
    pub long_break_duration: Option<u32>,
    /// New long-break cadence.
    pub long_break_interval: Option<u32>,
}

impl PomodoroSettings {
    /// Check that every field is positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first zero field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("work duration", self.work_duration),
            ("break duration", self.break_duration),
            ("long break duration", self.long_break_duration),
            ("long break interval", self.long_break_interval),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(Error::Validation(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    /// Merge `update` into these settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the merged settings are invalid; the
    /// settings are left unchanged in that case.
    pub fn apply(&mut self, update: PomodoroUpdate) -> Result<()> {
        let merged = Self {
            work_duration: update.work_duration.unwrap_or(self.work_duration),
            break_duration: update.break_duration.unwrap_or(self.break_duration),
            long_break_duration: update.long_break_duration.unwrap_or(self.long_break_duration),
            long_break_interval: update.long_break_interval.unwrap_or(self.long_break_interval),
        };
        merged.validate()?;
        *self = merged;
        Ok(())
    }

    fn seconds(minutes: u32) -> u32 {
        minutes.saturating_mul(60)
    }
}

/// Which part of the cycle is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focused work.
    Work,
    /// A short break.
    ShortBreak,
    /// A long break, every `long_break_interval` work sessions.
    LongBreak,
}

impl Phase {
    /// Whether this is a break.
    #[must_use]
    pub const fn is_break(self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }

    /// Heading shown for the phase.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "Focus Time",
            Self::ShortBreak | Self::LongBreak => "Break Time",
        }
    }
}

/// A running or paused Pomodoro countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroCycle {
    settings: PomodoroSettings,
    phase: Phase,
    remaining: u32,
    running: bool,
    sessions: u32,
}

impl PomodoroCycle {
    /// A paused cycle at the start of a work session.
    #[must_use]
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            phase: Phase::Work,
            remaining: PomodoroSettings::seconds(settings.work_duration),
            running: false,
            sessions: 0,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current phase.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the countdown is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Completed work sessions since the last reset.
    #[must_use]
    pub const fn session_count(&self) -> u32 {
        self.sessions
    }

    /// The settings the cycle uses.
    #[must_use]
    pub const fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    /// Swap in new settings. They take effect from the next phase (or the
    /// next reset).
    pub fn set_settings(&mut self, settings: PomodoroSettings) {
        self.settings = settings;
    }

    /// Start or pause. Returns whether the cycle is now running.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Count down `seconds`. When the phase runs out the cycle pauses,
    /// moves to the next phase, and returns it. Seconds left over past
    /// the end of a phase are discarded.
    pub fn tick(&mut self, seconds: u32) -> Option<Phase> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(seconds);
        if self.remaining > 0 {
            return None;
        }

        self.running = false;
        if self.phase.is_break() {
            self.phase = Phase::Work;
            self.remaining = PomodoroSettings::seconds(self.settings.work_duration);
        } else {
            self.sessions += 1;
            let long = self.sessions % self.settings.long_break_interval.max(1) == 0;
            if long {
                self.phase = Phase::LongBreak;
                self.remaining = PomodoroSettings::seconds(self.settings.long_break_duration);
            } else {
                self.phase = Phase::ShortBreak;
                self.remaining = PomodoroSettings::seconds(self.settings.break_duration);
            }
        }
        Some(self.phase)
    }

    /// Back to a paused first work session.
    pub fn reset(&mut self) {
        *self = Self::new(self.settings);
    }

    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
