//! Timeline planning commands for CLI.

use clap::Subcommand;
use dayplanner_core::timeline::end_time_label;
use dayplanner_core::timeline::time::format_minutes;
use dayplanner_core::{DropPoint, TaskStore};

use super::{open_planner, CommandResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Show today's timeline
    Show {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Place today's unscheduled tasks automatically
    Auto,
    /// Schedule a task at an explicit time
    Quick {
        /// Task ID
        id: String,
        /// Start time (HH:MM)
        time: String,
    },
    /// Drop a task onto the timeline at a pixel offset
    Drop {
        /// Task ID
        id: String,
        /// Pointer offset from the top of the visible timeline
        #[arg(allow_negative_numbers = true)]
        offset_px: f64,
        /// Timeline scroll offset
        #[arg(long, default_value_t = 0.0)]
        scroll: f64,
    },
    /// Resize a task block by dragging its bottom handle
    Resize {
        /// Task ID
        id: String,
        /// Block height when the handle is grabbed
        start_height_px: f64,
        /// Pointer movement before release (negative shrinks)
        #[arg(allow_negative_numbers = true)]
        delta_px: f64,
    },
    /// Clear a task's start time
    Unschedule {
        /// Task ID
        id: String,
    },
    /// List free slots in the working window
    Gaps,
}

pub fn run(action: PlanAction, user: Option<String>) -> CommandResult {
    let (mut planner, ctx) = open_planner(user)?;

    match action {
        PlanAction::Show { json } => {
            let view = planner.day_view(&ctx)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            let timeline = planner.timeline();
            for row in timeline.hour_rows() {
                println!("{:>5} |", row.label);
                for task in view
                    .scheduled
                    .iter()
                    .filter(|t| t.planned_start().is_some_and(|s| s / 60 == row.hour))
                {
                    let done = if task.completed { " (done)" } else { "" };
                    println!(
                        "      | {} {} ({}m){done}",
                        task.planned_start_time.as_deref().unwrap_or_default(),
                        task.title,
                        task.duration_minutes()
                    );
                }
            }
            if !view.unscheduled.is_empty() {
                println!();
                println!("Unscheduled:");
                for task in &view.unscheduled {
                    println!("  {} [{}] ({}m)  {}", task.title, task.priority, task.duration_minutes(), task.id);
                }
            }
        }
        PlanAction::Auto => {
            let outcome = planner.auto_schedule(&ctx)?;
            for placement in &outcome.placements {
                println!("{} {}", placement.start_time(), placement.title);
            }
            println!("{}", outcome.notice());
        }
        PlanAction::Quick { id, time } => {
            let task = planner.quick_schedule(&ctx, &id, &time)?;
            println!(
                "Scheduled {} at {}",
                task.title,
                task.planned_start_time.as_deref().unwrap_or_default()
            );
        }
        PlanAction::Drop {
            id,
            offset_px,
            scroll,
        } => match planner.drop_on_timeline(&ctx, &id, DropPoint::new(offset_px, scroll))? {
            Some(task) => println!(
                "Scheduled {} at {}",
                task.title,
                task.planned_start_time.as_deref().unwrap_or_default()
            ),
            None => println!("Drop outside the timeline; nothing changed"),
        },
        PlanAction::Resize {
            id,
            start_height_px,
            delta_px,
        } => {
            let task = planner
                .store()
                .find(&ctx.user, &id)?
                .ok_or_else(|| format!("task not found: {id}"))?;

            let mut resize = planner.resize_controller();
            resize.start(&task, 0.0, start_height_px);
            if let Some(preview) = resize.on_move(delta_px) {
                tracing::debug!(?preview, "resize preview");
            }
            let Some(commit) = resize.end() else {
                return Ok(());
            };

            let task = planner.commit_resize(&ctx, &commit)?;
            match task.planned_start() {
                Some(start) => println!(
                    "{} now {}m, ends {}",
                    task.title,
                    task.duration_minutes(),
                    end_time_label(start, task.duration_minutes())
                ),
                None => println!("{} now {}m", task.title, task.duration_minutes()),
            }
        }
        PlanAction::Unschedule { id } => {
            let task = planner.unschedule(&ctx, &id)?;
            println!("Unscheduled {}", task.title);
        }
        PlanAction::Gaps => {
            let slots = planner.free_slots(&ctx)?;
            if slots.is_empty() {
                println!("No free time in the working window.");
            }
            for slot in slots {
                println!(
                    "{}-{} ({}m)",
                    format_minutes(slot.interval.start),
                    format_minutes(slot.interval.end),
                    slot.duration_minutes()
                );
            }
        }
    }
    Ok(())
}
