//! Automatic scheduler for the day planner.
//!
//! Places unscheduled tasks into free time inside the working window:
//! - Tasks with a preferred time are attempted first, at that time
//! - Remaining tasks go by priority, then by longer duration
//! - Each task takes the earliest free 15-minute-aligned slot
//! - Placements never overlap active scheduled tasks or each other
//!
//! The scheduler is pure: it reads tasks and returns placements. Writing
//! them back is up to the caller (see [`crate::planner::DayPlanner`]).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::task::Task;
use crate::timeline::time::{format_minutes, MINUTES_PER_HOUR, SNAP_MINUTES};
use crate::timeline::{partition, Interval, IntervalStore};

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// First hour auto-schedule may use (inclusive)
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,
    /// Hour by which every placed task must have ended
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,
    /// Spacing of candidate start times (minutes)
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

fn default_work_start_hour() -> u32 {
    8
}
fn default_work_end_hour() -> u32 {
    20
}
fn default_step_minutes() -> u32 {
    SNAP_MINUTES
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            work_start_hour: default_work_start_hour(),
            work_end_hour: default_work_end_hour(),
            step_minutes: default_step_minutes(),
        }
    }
}

impl SchedulerConfig {
    /// Working window as a minute interval.
    pub fn work_window(&self) -> Interval {
        Interval::new(
            self.work_start_hour * MINUTES_PER_HOUR,
            self.work_end_hour * MINUTES_PER_HOUR,
        )
    }
}

/// How a task's start time was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementReason {
    /// The task's own preferred time was free
    Preferred,
    /// Earliest free slot found by scanning the window
    FirstFit,
}

/// A task assigned a start time by one auto-schedule run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub task_id: String,
    pub title: String,
    pub start: u32,
    pub duration: u32,
    pub reason: PlacementReason,
}

impl Placement {
    pub fn interval(&self) -> Interval {
        Interval::from_duration(self.start, self.duration)
    }

    /// Start as `HH:MM`, the form written to `plannedStartTime`.
    pub fn start_time(&self) -> String {
        format_minutes(self.start)
    }
}

/// Result of one auto-schedule run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Placements in the order they were made
    pub placements: Vec<Placement>,
    /// Ids of candidates that found no slot
    pub unplaced: Vec<String>,
}

impl ScheduleOutcome {
    pub fn scheduled_count(&self) -> usize {
        self.placements.len()
    }

    pub fn attempted(&self) -> usize {
        self.placements.len() + self.unplaced.len()
    }

    /// There was something to schedule and none of it fit.
    pub fn is_no_capacity(&self) -> bool {
        self.placements.is_empty() && !self.unplaced.is_empty()
    }

    pub fn notice(&self) -> ScheduleNotice {
        if self.attempted() == 0 {
            ScheduleNotice::NothingToSchedule
        } else if self.is_no_capacity() {
            ScheduleNotice::NoCapacity {
                unplaced: self.unplaced.len(),
            }
        } else {
            ScheduleNotice::Scheduled {
                count: self.placements.len(),
                unplaced: self.unplaced.len(),
            }
        }
    }
}

/// User-facing summary of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleNotice {
    NothingToSchedule,
    Scheduled { count: usize, unplaced: usize },
    NoCapacity { unplaced: usize },
}

impl fmt::Display for ScheduleNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleNotice::NothingToSchedule => write!(f, "No unscheduled tasks for today"),
            ScheduleNotice::Scheduled { count, unplaced: 0 } => {
                write!(f, "Scheduled {count} task(s)")
            }
            ScheduleNotice::Scheduled { count, unplaced } => write!(
                f,
                "Scheduled {count} task(s); {unplaced} did not fit in the working window"
            ),
            ScheduleNotice::NoCapacity { unplaced } => write!(
                f,
                "No free time left in the working window for {unplaced} task(s)"
            ),
        }
    }
}

/// Automatic scheduler for unscheduled tasks
pub struct AutoScheduler {
    config: SchedulerConfig,
}

impl AutoScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedule every unscheduled task relevant to `today`.
    ///
    /// The committed set is seeded with the active (non-completed) tasks
    /// that already have a start time.
    pub fn schedule_day(&self, tasks: &[Task], today: NaiveDate) -> ScheduleOutcome {
        let day = partition(tasks, today);
        let committed = IntervalStore::from_tasks(day.active_scheduled());
        self.schedule(&day.unscheduled, committed)
    }

    /// Place `unscheduled` around the intervals already in `committed`.
    pub fn schedule(&self, unscheduled: &[&Task], mut committed: IntervalStore) -> ScheduleOutcome {
        let mut outcome = ScheduleOutcome::default();

        for task in self.placement_order(unscheduled) {
            match self.place(task, &committed) {
                Some(placement) => {
                    debug!(
                        task_id = %placement.task_id,
                        start = %placement.start_time(),
                        reason = ?placement.reason,
                        "placed task"
                    );
                    committed.insert(
                        placement.task_id.clone(),
                        placement.title.clone(),
                        placement.interval(),
                    );
                    outcome.placements.push(placement);
                }
                None => {
                    debug!(task_id = %task.id, duration = task.duration_minutes(), "no free slot");
                    outcome.unplaced.push(task.id.clone());
                }
            }
        }

        info!(
            scheduled = outcome.scheduled_count(),
            unplaced = outcome.unplaced.len(),
            "auto-schedule finished"
        );
        outcome
    }

    /// Tasks with a valid preferred time in their original order, then the
    /// rest by priority rank and longer duration. The sort is stable so full
    /// ties keep input order.
    pub fn placement_order<'a>(&self, unscheduled: &[&'a Task]) -> Vec<&'a Task> {
        let (mut order, mut rest): (Vec<&Task>, Vec<&Task>) = unscheduled
            .iter()
            .copied()
            .filter(|t| !t.completed)
            .partition(|t| t.preferred_start().is_some());

        rest.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then_with(|| b.duration_minutes().cmp(&a.duration_minutes()))
        });

        order.extend(rest);
        order
    }

    fn place(&self, task: &Task, committed: &IntervalStore) -> Option<Placement> {
        let duration = task.duration_minutes();
        let window = self.config.work_window();

        let preferred = task
            .preferred_start()
            .map(|start| Interval::from_duration(start, duration))
            .filter(|slot| window.contains(slot) && !committed.overlaps(slot, None));

        let (start, reason) = match preferred {
            Some(slot) => (slot.start, PlacementReason::Preferred),
            None => (self.first_fit(duration, committed)?, PlacementReason::FirstFit),
        };

        Some(Placement {
            task_id: task.id.clone(),
            title: task.title.clone(),
            start,
            duration,
            reason,
        })
    }

    /// Earliest step-aligned start in the working window where `duration`
    /// minutes fit without overlapping `committed`.
    pub fn first_fit(&self, duration: u32, committed: &IntervalStore) -> Option<u32> {
        let window = self.config.work_window();
        let last_start = window.end.checked_sub(duration)?;
        let step = self.config.step_minutes.max(1) as usize;

        (window.start..=last_start)
            .step_by(step)
            .find(|&start| !committed.overlaps(&Interval::from_duration(start, duration), None))
    }
}

impl Default for AutoScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn make_test_task(id: &str, priority: Priority, duration: u32) -> Task {
        Task::new(format!("Task {id}"))
            .with_id(id)
            .with_priority(priority)
            .with_duration(duration)
    }

    fn start_of(outcome: &ScheduleOutcome, id: &str) -> Option<String> {
        outcome
            .placements
            .iter()
            .find(|p| p.task_id == id)
            .map(|p| p.start_time())
    }

    #[test]
    fn preference_honored_when_free() {
        let tasks = vec![make_test_task("a", Priority::Low, 30).with_preferred_time("09:00")];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(outcome.scheduled_count(), 1);
        assert_eq!(outcome.placements[0].start_time(), "09:00");
        assert_eq!(outcome.placements[0].reason, PlacementReason::Preferred);
    }

    #[test]
    fn preference_skipped_when_occupied() {
        let tasks = vec![
            make_test_task("busy", Priority::Medium, 30).with_planned_start("09:00"),
            make_test_task("new", Priority::Medium, 30).with_preferred_time("09:00"),
        ];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(outcome.placements.len(), 1);
        assert_eq!(outcome.placements[0].task_id, "new");
        assert_eq!(outcome.placements[0].start_time(), "08:00");
        assert_eq!(outcome.placements[0].reason, PlacementReason::FirstFit);
    }

    #[test]
    fn preference_outside_window_falls_back() {
        let tasks = vec![
            make_test_task("early", Priority::Medium, 30).with_preferred_time("07:00"),
            make_test_task("late", Priority::Medium, 60).with_preferred_time("19:30"),
        ];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(start_of(&outcome, "early").as_deref(), Some("08:00"));
        assert_eq!(start_of(&outcome, "late").as_deref(), Some("08:30"));
    }

    #[test]
    fn task_priority_ordering() {
        let tasks = vec![
            make_test_task("low", Priority::Low, 60),
            make_test_task("high", Priority::High, 30),
        ];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(start_of(&outcome, "high").as_deref(), Some("08:00"));
        assert_eq!(start_of(&outcome, "low").as_deref(), Some("08:30"));
    }

    #[test]
    fn ties_break_on_longer_duration_then_input_order() {
        let a = make_test_task("a", Priority::Medium, 30);
        let b = make_test_task("b", Priority::Medium, 90);
        let c = make_test_task("c", Priority::Medium, 30);
        let d = make_test_task("d", Priority::High, 15).with_preferred_time("bogus");
        let e = make_test_task("e", Priority::Low, 15).with_preferred_time("12:00");

        let scheduler = AutoScheduler::new();
        let order: Vec<_> = scheduler
            .placement_order(&[&a, &b, &c, &d, &e])
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(order, vec!["e", "d", "b", "a", "c"]);
    }

    #[test]
    fn end_to_end_preference_then_first_fit() {
        let tasks = vec![
            make_test_task("1", Priority::High, 60),
            make_test_task("2", Priority::Medium, 30).with_preferred_time("08:00"),
        ];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(outcome.placements[0].task_id, "2");
        assert_eq!(outcome.placements[0].start_time(), "08:00");
        assert_eq!(outcome.placements[1].task_id, "1");
        assert_eq!(outcome.placements[1].start_time(), "08:30");
    }

    #[test]
    fn completed_and_other_day_tasks_are_ignored() {
        let tomorrow = today().succ_opt().unwrap();
        let tasks = vec![
            Task {
                completed: true,
                ..make_test_task("done", Priority::High, 60).with_planned_start("08:00")
            },
            make_test_task("later", Priority::High, 30).with_due_date(tomorrow),
            make_test_task("now", Priority::Low, 30),
        ];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(outcome.attempted(), 1);
        // the completed 08:00 block does not block placement
        assert_eq!(start_of(&outcome, "now").as_deref(), Some("08:00"));
    }

    #[test]
    fn full_window_reports_no_capacity() {
        let tasks = vec![
            make_test_task("wall", Priority::High, 720).with_planned_start("08:00"),
            make_test_task("x", Priority::High, 30),
        ];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert!(outcome.is_no_capacity());
        assert_eq!(outcome.unplaced, vec!["x".to_string()]);
        assert_eq!(outcome.notice(), ScheduleNotice::NoCapacity { unplaced: 1 });
    }

    #[test]
    fn task_longer_than_window_is_left_unscheduled() {
        let tasks = vec![
            make_test_task("huge", Priority::High, 13 * 60),
            make_test_task("small", Priority::Low, 15),
        ];
        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(outcome.unplaced, vec!["huge".to_string()]);
        assert_eq!(start_of(&outcome, "small").as_deref(), Some("08:00"));
        assert_eq!(
            outcome.notice(),
            ScheduleNotice::Scheduled { count: 1, unplaced: 1 }
        );
    }

    #[test]
    fn empty_input_is_nothing_to_schedule() {
        let outcome = AutoScheduler::new().schedule_day(&[], today());
        assert!(!outcome.is_no_capacity());
        assert_eq!(outcome.notice(), ScheduleNotice::NothingToSchedule);
    }

    #[test]
    fn first_fit_skips_to_step_after_busy_block() {
        let mut committed = IntervalStore::new();
        committed.insert("a".into(), "a".into(), Interval::new(480, 500));
        let scheduler = AutoScheduler::new();
        assert_eq!(scheduler.first_fit(30, &committed), Some(510));
    }

    #[test]
    fn last_slot_may_end_exactly_at_window_end() {
        let mut committed = IntervalStore::new();
        committed.insert("a".into(), "a".into(), Interval::new(480, 1170));
        assert_eq!(AutoScheduler::new().first_fit(30, &committed), Some(1170));
        assert_eq!(AutoScheduler::new().first_fit(45, &committed), None);
    }

    #[test]
    fn custom_window_is_respected() {
        let scheduler = AutoScheduler::with_config(SchedulerConfig {
            work_start_hour: 9,
            work_end_hour: 10,
            step_minutes: 30,
        });
        let tasks = vec![
            make_test_task("a", Priority::High, 30),
            make_test_task("b", Priority::High, 30),
            make_test_task("c", Priority::High, 30),
        ];
        let outcome = scheduler.schedule_day(&tasks, today());
        assert_eq!(start_of(&outcome, "a").as_deref(), Some("09:00"));
        assert_eq!(start_of(&outcome, "b").as_deref(), Some("09:30"));
        assert_eq!(outcome.unplaced, vec!["c".to_string()]);
    }

    #[test]
    fn notice_messages() {
        assert_eq!(
            ScheduleNotice::Scheduled { count: 2, unplaced: 0 }.to_string(),
            "Scheduled 2 task(s)"
        );
        assert_eq!(
            ScheduleNotice::NoCapacity { unplaced: 3 }.to_string(),
            "No free time left in the working window for 3 task(s)"
        );
    }

    #[test]
    fn imported_huge_duration_blocks_rest_of_day() {
        let imported: Task = serde_json::from_str(
            r#"{"id":"big","title":"Imported","plannedStartTime":"09:00","plannedDuration":4294967295}"#,
        )
        .unwrap();
        let tasks = vec![
            imported,
            make_test_task("short", Priority::High, 60),
            make_test_task("long", Priority::Low, 90),
        ];

        let outcome = AutoScheduler::new().schedule_day(&tasks, today());
        assert_eq!(start_of(&outcome, "short").as_deref(), Some("08:00"));
        assert_eq!(outcome.unplaced, vec!["long".to_string()]);
    }
}
