//! Free slot detection inside the working window.
//!
//! Finds the stretches of the day not covered by any active scheduled task.

use serde::{Deserialize, Serialize};

use super::interval::{Interval, IntervalStore};
use super::time::SNAP_MINUTES;

/// Size category of a free slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSize {
    Small,  // 15-29 minutes
    Medium, // 30-59 minutes
    Large,  // 60+ minutes
}

impl GapSize {
    /// Categorize a slot by its duration in minutes
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes < 30 {
            Self::Small
        } else if minutes < 60 {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

/// A maximal unoccupied stretch of the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub interval: Interval,
    pub size: GapSize,
}

impl FreeSlot {
    fn new(start: u32, end: u32) -> Self {
        let interval = Interval::new(start, end);
        Self {
            size: GapSize::from_minutes(interval.duration_minutes()),
            interval,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.interval.duration_minutes()
    }

    /// Check if this slot can fit a task of given duration
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Detector for free slots between committed intervals
pub struct FreeSlotDetector {
    min_minutes: u32,
}

impl FreeSlotDetector {
    /// Detector reporting slots of at least one grid step
    pub fn new() -> Self {
        Self {
            min_minutes: SNAP_MINUTES,
        }
    }

    pub fn with_min_minutes(mut self, minutes: u32) -> Self {
        self.min_minutes = minutes;
        self
    }

    /// Free slots of `window` sorted by start time.
    pub fn find(&self, committed: &IntervalStore, window: Interval) -> Vec<FreeSlot> {
        let mut slots = Vec::new();
        let mut cursor = window.start;

        for entry in committed.iter() {
            let busy = entry.interval;
            if busy.end <= cursor {
                continue;
            }
            if busy.start >= window.end {
                break;
            }
            if busy.start > cursor {
                self.push_if_large_enough(&mut slots, cursor, busy.start.min(window.end));
            }
            cursor = cursor.max(busy.end.min(window.end));
        }

        if cursor < window.end {
            self.push_if_large_enough(&mut slots, cursor, window.end);
        }

        slots
    }

    fn push_if_large_enough(&self, slots: &mut Vec<FreeSlot>, start: u32, end: u32) {
        if end > start && end - start >= self.min_minutes {
            slots.push(FreeSlot::new(start, end));
        }
    }
}

impl Default for FreeSlotDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to find slots with default settings
pub fn detect_free_slots(committed: &IntervalStore, window: Interval) -> Vec<FreeSlot> {
    FreeSlotDetector::new().find(committed, window)
}
