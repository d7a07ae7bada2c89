//! # Dayplanner Core Library
//!
//! This library provides the scheduling engine behind the day planner: a
//! vertical 24-hour timeline onto which tasks are placed, by hand or
//! automatically. The CLI binary is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timeline**: `HH:MM` time arithmetic, pixel mapping on a 15-minute grid,
//!   half-open intervals and free-slot detection
//! - **Scheduler**: Deterministic first-fit placement inside the working window
//! - **Planner**: Quick-schedule, drag-to-timeline and the resize state machine,
//!   applied through a task store
//! - **Storage**: SQLite-backed task collections and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`DayPlanner`]: Entry point for every planning operation
//! - [`AutoScheduler`]: Placement of unscheduled tasks
//! - [`IntervalStore`]: Committed occupancy for overlap checks
//! - [`Database`]: Task collection persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod planner;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod timeline;

pub use error::{ConfigError, CoreError, ScheduleError, StorageError};
pub use planner::{
    DayPlanner, DayView, DropPoint, PlannerContext, ResizeCommit, ResizeController, ResizePreview,
    TimelineBlock,
};
pub use scheduler::{AutoScheduler, Placement, ScheduleNotice, ScheduleOutcome, SchedulerConfig};
pub use storage::{Config, Database, MemoryTaskStore, TaskStore};
pub use task::{Priority, Task, TaskUpdate};
pub use timeline::{FreeSlot, Interval, IntervalStore, TimelineConfig};
