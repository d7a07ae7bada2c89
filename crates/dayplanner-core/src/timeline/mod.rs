//! Day timeline model.
//!
//! This module provides:
//! - Conversions between `HH:MM`, minutes since midnight and pixel offsets
//! - Interval partitioning and overlap queries for scheduled tasks
//! - Free slot detection inside a window
//! - Rendered-window geometry (hour rows, block placement, now marker)

mod gap;
mod geometry;
pub mod interval;
pub mod time;

pub use gap::{detect_free_slots, FreeSlot, FreeSlotDetector, GapSize};
pub use geometry::{end_time_label, BlockGeometry, HourRow, TimelineConfig};
pub use interval::{overlaps, partition, DayPartition, Interval, IntervalStore, ScheduledInterval};
