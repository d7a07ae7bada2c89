//! Day planner entry points.
//!
//! [`DayPlanner`] ties the timeline model and the auto-scheduler to a
//! [`TaskStore`]. Every call receives a [`PlannerContext`] naming the user
//! and the current day instead of reading ambient state, and every mutation
//! is a whole-collection read-modify-write through the store.
//!
//! Quick-schedule and auto-schedule refuse overlapping placements. Drag
//! drops and resize commits do not check for overlaps.

mod drag;
mod resize;

pub use drag::{drop_target, DropPoint};
pub use resize::{
    snap_duration, ResizeCommit, ResizeController, ResizePreview, ResizeSession, ResizeState,
};

use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, ScheduleError};
use crate::scheduler::{AutoScheduler, SchedulerConfig, ScheduleOutcome};
use crate::storage::{Config, TaskStore};
use crate::task::{Task, TaskUpdate};
use crate::timeline::time::{format_hhmm, parse_hhmm, to_minutes};
use crate::timeline::{detect_free_slots, partition, FreeSlot, Interval, IntervalStore, TimelineConfig};

/// Who is planning, and for which day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerContext {
    pub user: String,
    pub today: NaiveDate,
    /// Only used for the now marker and auto-scroll
    pub now: NaiveTime,
}

impl PlannerContext {
    pub fn new(user: impl Into<String>, today: NaiveDate, now: NaiveTime) -> Self {
        Self {
            user: user.into(),
            today,
            now,
        }
    }

    /// Context for `user` at the local wall-clock time.
    pub fn current(user: impl Into<String>) -> Self {
        let now = Local::now();
        Self::new(user, now.date_naive(), now.time())
    }
}

/// Snapshot of the planner for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub today: NaiveDate,
    pub unscheduled: Vec<Task>,
    /// Ordered by start time; includes completed tasks that keep a start
    pub scheduled: Vec<Task>,
    pub completed: Vec<Task>,
    /// Pixel placement of every scheduled block, in `scheduled` order
    pub blocks: Vec<TimelineBlock>,
    /// Full height of the rendered window
    pub height_px: f64,
    pub now_marker_px: Option<f64>,
    pub scroll_px: f64,
}

/// Where a scheduled task is drawn. `top_px` is negative for blocks that
/// start above the rendered window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBlock {
    pub task_id: String,
    pub top_px: f64,
    pub height_px: f64,
}

pub struct DayPlanner<S: TaskStore> {
    store: S,
    timeline: TimelineConfig,
    scheduler: AutoScheduler,
}

impl<S: TaskStore> DayPlanner<S> {
    pub fn new(store: S, timeline: TimelineConfig, scheduler: SchedulerConfig) -> Self {
        Self {
            store,
            timeline,
            scheduler: AutoScheduler::with_config(scheduler),
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.timeline.clone(), config.scheduler.clone())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn timeline(&self) -> &TimelineConfig {
        &self.timeline
    }

    /// Resize state machine scaled to this timeline.
    pub fn resize_controller(&self) -> ResizeController {
        ResizeController::new(self.timeline.px_per_hour)
    }

    fn find_task(&self, ctx: &PlannerContext, task_id: &str) -> Result<Task> {
        self.store
            .find(&ctx.user, task_id)?
            .ok_or_else(|| ScheduleError::TaskNotFound(task_id.to_string()).into())
    }

    pub fn day_view(&self, ctx: &PlannerContext) -> Result<DayView> {
        let tasks = self.store.load(&ctx.user)?;
        let day = partition(&tasks, ctx.today);
        let owned = |v: &[&Task]| v.iter().map(|t| (*t).clone()).collect::<Vec<_>>();
        let blocks = day
            .scheduled
            .iter()
            .filter_map(|task| {
                let geometry = self.timeline.block_geometry(task)?;
                Some(TimelineBlock {
                    task_id: task.id.clone(),
                    top_px: geometry.top_px,
                    height_px: geometry.height_px,
                })
            })
            .collect();

        Ok(DayView {
            today: ctx.today,
            unscheduled: owned(&day.unscheduled),
            scheduled: owned(&day.scheduled),
            completed: owned(&day.completed),
            blocks,
            height_px: self.timeline.height_px(),
            now_marker_px: self.timeline.now_marker(ctx.now),
            scroll_px: self.timeline.scroll_target(ctx.now),
        })
    }

    /// Place today's unscheduled tasks and persist their start times.
    pub fn auto_schedule(&mut self, ctx: &PlannerContext) -> Result<ScheduleOutcome> {
        let mut tasks = self.store.load(&ctx.user)?;
        let outcome = self.scheduler.schedule_day(&tasks, ctx.today);

        if outcome.placements.is_empty() {
            info!(user = %ctx.user, notice = %outcome.notice(), "auto-schedule made no changes");
            return Ok(outcome);
        }

        for placement in &outcome.placements {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == placement.task_id) {
                TaskUpdate {
                    planned_start: Some(Some(placement.start_time())),
                    ..TaskUpdate::default()
                }
                .apply(task);
            }
        }
        self.store.save(&ctx.user, &tasks)?;
        Ok(outcome)
    }

    /// Put one task at an explicit `HH:MM`, refusing occupied slots.
    pub fn quick_schedule(
        &mut self,
        ctx: &PlannerContext,
        task_id: &str,
        time: &str,
    ) -> Result<Task> {
        let (hour, minute) =
            parse_hhmm(time).ok_or_else(|| ScheduleError::InvalidTime(time.to_string()))?;
        let time = format_hhmm(hour, minute);

        if !self.timeline.contains_hour(hour) {
            warn!(%task_id, %time, "quick-schedule outside timeline window");
            return Err(ScheduleError::OutOfWindow {
                time,
                start_hour: self.timeline.start_hour,
                end_hour: self.timeline.end_hour,
            }
            .into());
        }

        let tasks = self.store.load(&ctx.user)?;
        let task = tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ScheduleError::TaskNotFound(task_id.to_string()))?;
        let candidate = Interval::from_duration(to_minutes(hour, minute), task.duration_minutes());

        let day = partition(&tasks, ctx.today);
        let committed = IntervalStore::from_tasks(day.active_scheduled());
        if let Some(hit) = committed.conflict(&candidate, Some(task_id)) {
            warn!(%task_id, %time, conflicting = %hit.task_id, "quick-schedule slot occupied");
            return Err(ScheduleError::SlotOccupied {
                time,
                conflicting_task: hit.title.clone(),
            }
            .into());
        }

        self.store
            .update_by_id(&ctx.user, task_id, &TaskUpdate::schedule_at(hour, minute))
    }

    /// Schedule a task where it was dropped on the timeline.
    ///
    /// Drops outside the rendered window are ignored and return `Ok(None)`.
    /// Undated tasks become due today.
    pub fn drop_on_timeline(
        &mut self,
        ctx: &PlannerContext,
        task_id: &str,
        point: DropPoint,
    ) -> Result<Option<Task>> {
        let Some((hour, minute)) = drop_target(point, &self.timeline) else {
            debug!(%task_id, ?point, "drop outside timeline window ignored");
            return Ok(None);
        };

        let task = self.find_task(ctx, task_id)?;
        let mut update = TaskUpdate::schedule_at(hour, minute).and_duration(task.duration_minutes());
        if task.due_date.is_none() {
            update = update.and_due_date(Some(ctx.today));
        }

        self.store.update_by_id(&ctx.user, task_id, &update).map(Some)
    }

    /// Persist the duration produced by [`ResizeController::end`].
    pub fn commit_resize(&mut self, ctx: &PlannerContext, commit: &ResizeCommit) -> Result<Task> {
        self.store.update_by_id(
            &ctx.user,
            &commit.task_id,
            &TaskUpdate::duration(commit.duration_minutes),
        )
    }

    /// Clear a task's start time.
    pub fn unschedule(&mut self, ctx: &PlannerContext, task_id: &str) -> Result<Task> {
        self.store
            .update_by_id(&ctx.user, task_id, &TaskUpdate::unschedule())
    }

    /// Free slots of the working window for today.
    pub fn free_slots(&self, ctx: &PlannerContext) -> Result<Vec<FreeSlot>> {
        let tasks = self.store.load(&ctx.user)?;
        let day = partition(&tasks, ctx.today);
        let committed = IntervalStore::from_tasks(day.active_scheduled());
        Ok(detect_free_slots(
            &committed,
            self.scheduler.config().work_window(),
        ))
    }
}
