//! Day partitioning and overlap queries over scheduled tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Half-open occupancy `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Interval starting at `start` and lasting `minutes`. The end saturates,
    /// so absurd imported durations still block everything after `start`.
    pub fn from_duration(start: u32, minutes: u32) -> Self {
        Self {
            start,
            end: start.saturating_add(minutes),
        }
    }

    /// Occupancy of a scheduled task, or `None` if it has no valid start.
    pub fn of_task(task: &Task) -> Option<Self> {
        task.planned_start()
            .map(|start| Self::from_duration(start, task.duration_minutes()))
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, other: &Interval) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// Tasks relevant to one day, split by scheduling status.
///
/// Completed tasks that still carry a start time appear in both `completed`
/// and `scheduled` so they can be drawn, but [`DayPartition::active_scheduled`]
/// never yields them.
#[derive(Debug, Default)]
pub struct DayPartition<'a> {
    pub unscheduled: Vec<&'a Task>,
    pub scheduled: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> DayPartition<'a> {
    /// Scheduled tasks that may block placement.
    pub fn active_scheduled(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.scheduled.iter().copied().filter(|t| !t.completed)
    }
}

/// Partition `tasks` for `today`.
pub fn partition(tasks: &[Task], today: NaiveDate) -> DayPartition<'_> {
    let mut out = DayPartition::default();

    for task in tasks.iter().filter(|t| t.is_relevant_to(today)) {
        if task.completed {
            out.completed.push(task);
            if task.is_scheduled() {
                out.scheduled.push(task);
            }
        } else if task.is_scheduled() {
            out.scheduled.push(task);
        } else {
            out.unscheduled.push(task);
        }
    }

    out.scheduled
        .sort_by_key(|t| t.planned_start().unwrap_or(u32::MAX));
    out
}

/// A committed `(task, interval)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInterval {
    pub task_id: String,
    pub title: String,
    pub interval: Interval,
}

/// Occupied intervals for the active scheduled subset, kept ordered by start.
///
/// Overlap checks scan every entry, so the ordering only matters for
/// iteration and gap detection. Pre-existing overlaps are tolerated.
#[derive(Debug, Clone, Default)]
pub struct IntervalStore {
    entries: Vec<ScheduledInterval>,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from tasks, skipping completed ones and ones without a valid start.
    pub fn from_tasks<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut store = Self::new();
        for task in tasks.into_iter().filter(|t| !t.completed) {
            if let Some(interval) = Interval::of_task(task) {
                store.insert(task.id.clone(), task.title.clone(), interval);
            }
        }
        store
    }

    /// Commit an interval, keeping entries sorted by start.
    pub fn insert(&mut self, task_id: String, title: String, interval: Interval) {
        let idx = self
            .entries
            .partition_point(|e| e.interval.start <= interval.start);
        self.entries.insert(
            idx,
            ScheduledInterval {
                task_id,
                title,
                interval,
            },
        );
    }

    /// First committed entry (other than `exclude_task_id`) overlapping `candidate`.
    pub fn conflict(
        &self,
        candidate: &Interval,
        exclude_task_id: Option<&str>,
    ) -> Option<&ScheduledInterval> {
        self.entries
            .iter()
            .filter(|e| Some(e.task_id.as_str()) != exclude_task_id)
            .find(|e| e.interval.overlaps(candidate))
    }

    pub fn overlaps(&self, candidate: &Interval, exclude_task_id: Option<&str>) -> bool {
        self.conflict(candidate, exclude_task_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledInterval> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True iff some active scheduled task other than `exclude_task_id` overlaps
/// `[candidate_start, candidate_end)`.
pub fn overlaps(
    candidate_start: u32,
    candidate_end: u32,
    active_scheduled: &[&Task],
    exclude_task_id: Option<&str>,
) -> bool {
    let candidate = Interval::new(candidate_start, candidate_end);
    active_scheduled
        .iter()
        .filter(|t| !t.completed)
        .filter(|t| Some(t.id.as_str()) != exclude_task_id)
        .filter_map(|t| Interval::of_task(t))
        .any(|i| i.overlaps(&candidate))
}
