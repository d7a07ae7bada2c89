//! Property tests for interval arithmetic and auto-scheduling.

use chrono::NaiveDate;
use dayplanner_core::planner::snap_duration;
use dayplanner_core::timeline::time::format_minutes;
use dayplanner_core::{AutoScheduler, Interval, Priority, Task, TaskUpdate};
use proptest::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

/// A task with an arbitrary duration, priority and optional preference,
/// possibly already placed somewhere in the day.
fn task(index: usize) -> impl Strategy<Value = Task> {
    (
        priority(),
        1u32..=240,
        prop::option::of(0u32..96),
        prop::option::of(0u32..96),
        any::<bool>(),
    )
        .prop_map(move |(priority, duration, preferred, planned, completed)| {
            let mut task = Task::new(format!("task {index}"))
                .with_id(index.to_string())
                .with_priority(priority)
                .with_duration(duration);
            task.preferred_time = preferred.map(|q| format_minutes(q * 15));
            task.planned_start_time = planned.map(|q| format_minutes(q * 15));
            task.completed = completed;
            task
        })
}

fn task_set() -> impl Strategy<Value = Vec<Task>> {
    (0usize..12).prop_flat_map(|n| (0..n).map(task).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in 0u32..1440, la in 0u32..300, b in 0u32..1440, lb in 0u32..300) {
        let x = Interval::from_duration(a, la);
        let y = Interval::from_duration(b, lb);
        prop_assert_eq!(x.overlaps(&y), y.overlaps(&x));
    }

    #[test]
    fn adjacent_intervals_never_overlap(start in 0u32..1200, len in 1u32..240, next in 1u32..240) {
        let first = Interval::from_duration(start, len);
        let second = Interval::from_duration(first.end, next);
        prop_assert!(!first.overlaps(&second));
    }

    #[test]
    fn duration_floor_holds_after_update(minutes in 0u32..600) {
        let mut task = Task::new("t");
        TaskUpdate::duration(minutes).apply(&mut task);
        prop_assert!(task.duration_minutes() >= 15);
        prop_assert!(task.planned_duration.unwrap_or_default() >= 15);
    }

    #[test]
    fn resize_snap_is_quarter_hour_and_floored(raw in -500.0f64..1500.0) {
        let minutes = snap_duration(raw);
        prop_assert!(minutes >= 15);
        prop_assert_eq!(minutes % 15, 0);
    }

    #[test]
    fn auto_schedule_is_deterministic(tasks in task_set()) {
        let scheduler = AutoScheduler::new();
        let first = scheduler.schedule_day(&tasks, today());
        let second = scheduler.schedule_day(&tasks, today());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn placements_stay_in_window_and_avoid_committed(tasks in task_set()) {
        let scheduler = AutoScheduler::new();
        let window = scheduler.config().work_window();
        let outcome = scheduler.schedule_day(&tasks, today());

        let committed: Vec<Interval> = tasks
            .iter()
            .filter(|t| !t.completed)
            .filter_map(Interval::of_task)
            .collect();

        for (i, placement) in outcome.placements.iter().enumerate() {
            let interval = placement.interval();
            prop_assert!(window.contains(&interval));
            prop_assert_eq!(placement.start % 15, 0);
            for existing in &committed {
                prop_assert!(!interval.overlaps(existing));
            }
            for other in &outcome.placements[i + 1..] {
                prop_assert!(!interval.overlaps(&other.interval()));
            }
        }
    }
}
