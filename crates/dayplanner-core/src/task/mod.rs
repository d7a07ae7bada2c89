//! Task records as supplied by the task store.
//!
//! Scheduling state lives inline on the task: a task is "scheduled" exactly
//! when it carries a parseable `plannedStartTime`. Records are persisted as
//! JSON objects with camelCase keys, and any optional key may be missing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::timeline::time::{format_hhmm, parse_hhmm, parse_minutes};

/// Duration assumed when a task has none recorded.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Floor applied on every create, update and resize.
pub const MIN_DURATION_MINUTES: u32 = 15;

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Placement rank used by the auto-scheduler (higher goes first).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}' (expected high, medium or low)")),
        }
    }
}

/// A task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, immutable once created
    pub id: String,
    /// Task title
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Free-form category name
    #[serde(default)]
    pub category: Option<String>,
    /// Day the task is due; absent means "any day", including today
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Requested start time (`HH:MM`)
    #[serde(default)]
    pub preferred_time: Option<String>,
    /// Assigned start time (`HH:MM`); presence means scheduled
    #[serde(default)]
    pub planned_start_time: Option<String>,
    /// Planned duration in minutes
    #[serde(default)]
    pub planned_duration: Option<u32>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Fresh, unscheduled, medium-priority task with the default duration.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            category: None,
            due_date: None,
            preferred_time: None,
            planned_start_time: None,
            planned_duration: Some(DEFAULT_DURATION_MINUTES),
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.set_duration(minutes);
        self
    }

    pub fn with_preferred_time(mut self, time: impl Into<String>) -> Self {
        self.preferred_time = Some(time.into());
        self
    }

    pub fn with_planned_start(mut self, time: impl Into<String>) -> Self {
        self.planned_start_time = Some(time.into());
        self
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Effective duration: recorded value or the default, never below the floor.
    pub fn duration_minutes(&self) -> u32 {
        self.planned_duration
            .unwrap_or(DEFAULT_DURATION_MINUTES)
            .max(MIN_DURATION_MINUTES)
    }

    /// Store a duration, clamped to the 15-minute floor.
    pub fn set_duration(&mut self, minutes: u32) {
        self.planned_duration = Some(minutes.max(MIN_DURATION_MINUTES));
    }

    /// Planned start as minutes since midnight, if present and well-formed.
    pub fn planned_start(&self) -> Option<u32> {
        self.planned_start_time.as_deref().and_then(parse_minutes)
    }

    /// Preferred start as minutes since midnight, if present and well-formed.
    pub fn preferred_start(&self) -> Option<u32> {
        self.preferred_time.as_deref().and_then(parse_minutes)
    }

    pub fn is_scheduled(&self) -> bool {
        self.planned_start().is_some()
    }

    /// Relevant for `day` when due that day or undated.
    pub fn is_relevant_to(&self, day: NaiveDate) -> bool {
        self.due_date.map_or(true, |due| due == day)
    }
}

/// Partial update applied through the task store's update-by-id operation.
///
/// `None` leaves a field untouched; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub planned_start: Option<Option<String>>,
    pub planned_duration: Option<u32>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// Set `plannedStartTime` to `hour:minute`.
    pub fn schedule_at(hour: u32, minute: u32) -> Self {
        Self {
            planned_start: Some(Some(format_hhmm(hour, minute))),
            ..Self::default()
        }
    }

    /// Clear `plannedStartTime`.
    pub fn unschedule() -> Self {
        Self {
            planned_start: Some(None),
            ..Self::default()
        }
    }

    pub fn duration(minutes: u32) -> Self {
        Self {
            planned_duration: Some(minutes),
            ..Self::default()
        }
    }

    pub fn completed(done: bool) -> Self {
        Self {
            completed: Some(done),
            ..Self::default()
        }
    }

    pub fn and_duration(mut self, minutes: u32) -> Self {
        self.planned_duration = Some(minutes);
        self
    }

    pub fn and_due_date(mut self, date: Option<NaiveDate>) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Apply the patch in place. Durations go through the floor.
    pub fn apply(&self, task: &mut Task) {
        if let Some(start) = &self.planned_start {
            task.planned_start_time = start.clone();
        }
        if let Some(minutes) = self.planned_duration {
            task.set_duration(minutes);
        }
        if let Some(due) = self.due_date {
            task.due_date = due;
        }
        if let Some(done) = self.completed {
            task.completed = done;
        }
    }
}

/// Validate a user-entered `HH:MM` value, normalising it to zero-padded form.
pub fn normalize_time(value: &str) -> Option<String> {
    parse_hhmm(value).map(|(h, m)| format_hhmm(h, m))
}
