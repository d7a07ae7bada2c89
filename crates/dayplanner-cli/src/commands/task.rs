//! Task management commands for CLI.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use dayplanner_core::task::normalize_time;
use dayplanner_core::{Priority, Task, TaskStore, TaskUpdate};

use super::{open_planner, CommandResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Planned duration in minutes (at least 15)
        #[arg(long)]
        duration: Option<u32>,
        /// Preferred start time (HH:MM)
        #[arg(long)]
        preferred: Option<String>,
        /// Due date (YYYY-MM-DD or "today")
        #[arg(long)]
        due: Option<String>,
        /// Free-form category
        #[arg(long)]
        category: Option<String>,
    },
    /// List tasks
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

fn parse_due(value: &str) -> Result<NaiveDate, String> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid due date '{value}': {e}"))
}

pub fn run(action: TaskAction, user: Option<String>) -> CommandResult {
    let (mut planner, ctx) = open_planner(user)?;

    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            duration,
            preferred,
            due,
            category,
        } => {
            let mut task = Task::new(title).with_priority(priority);
            task.description = description;
            task.category = category;
            if let Some(minutes) = duration {
                task.set_duration(minutes);
            }
            if let Some(time) = preferred {
                let time = normalize_time(&time).ok_or_else(|| format!("invalid time '{time}'"))?;
                task = task.with_preferred_time(time);
            }
            if let Some(due) = due {
                task = task.with_due_date(parse_due(&due)?);
            }
            planner.store_mut().insert(&ctx.user, task.clone())?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { json } => {
            let tasks = planner.store().load(&ctx.user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in &tasks {
                    let mark = if task.completed { "x" } else { " " };
                    let start = task.planned_start_time.as_deref().unwrap_or("--:--");
                    println!(
                        "[{mark}] {start} {:>3}m {:<6} {}  {}",
                        task.duration_minutes(),
                        task.priority,
                        task.title,
                        task.id
                    );
                }
            }
        }
        TaskAction::Complete { id } => {
            let task = planner
                .store_mut()
                .update_by_id(&ctx.user, &id, &TaskUpdate::completed(true))?;
            println!("Task completed: {}", task.title);
        }
        TaskAction::Delete { id } => {
            if !planner.store_mut().delete(&ctx.user, &id)? {
                return Err(format!("task not found: {id}").into());
            }
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
