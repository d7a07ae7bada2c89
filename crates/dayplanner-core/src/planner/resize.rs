//! Duration editing by dragging a block's bottom handle.
//!
//! ```text
//! Idle --start--> Resizing --move*--> Resizing --end--> Idle
//! ```
//!
//! Moves only update the provisional height. Releasing the pointer always
//! commits; there is no cancel gesture.

use tracing::debug;

use crate::task::{Task, MIN_DURATION_MINUTES};
use crate::timeline::end_time_label;
use crate::timeline::time::{minutes_to_pixels, pixels_to_minutes, snap_to_grid};

/// Captured state of an in-progress resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub task_id: String,
    start_minute: Option<u32>,
    start_pointer_y: f64,
    start_height: f64,
    current_height: f64,
}

impl ResizeSession {
    pub fn current_height(&self) -> f64 {
        self.current_height
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing(ResizeSession),
}

/// Live feedback while the handle is dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizePreview {
    pub height_px: f64,
    /// Unsnapped minutes for the provisional height
    pub duration_minutes: u32,
    /// 12-hour end time, when the task has a start
    pub end_label: Option<String>,
}

/// Duration to persist once the pointer is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeCommit {
    pub task_id: String,
    pub duration_minutes: u32,
}

/// Final duration for a raw value: nearest 15-minute multiple, at least 15.
pub fn snap_duration(raw_minutes: f64) -> u32 {
    snap_to_grid(raw_minutes).max(MIN_DURATION_MINUTES as i32) as u32
}

pub struct ResizeController {
    state: ResizeState,
    px_per_hour: f64,
}

impl ResizeController {
    pub fn new(px_per_hour: f64) -> Self {
        Self {
            state: ResizeState::Idle,
            px_per_hour,
        }
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    fn min_height(&self) -> f64 {
        minutes_to_pixels(MIN_DURATION_MINUTES as f64, self.px_per_hour)
    }

    /// Grab `task`'s handle. A session still open is discarded.
    pub fn start(&mut self, task: &Task, pointer_y: f64, element_height_px: f64) {
        if let ResizeState::Resizing(previous) = &self.state {
            debug!(task_id = %previous.task_id, "resize restarted before release");
        }
        self.state = ResizeState::Resizing(ResizeSession {
            task_id: task.id.clone(),
            start_minute: task.planned_start(),
            start_pointer_y: pointer_y,
            start_height: element_height_px,
            current_height: element_height_px,
        });
    }

    /// Track the pointer. Returns `None` when idle.
    pub fn on_move(&mut self, pointer_y: f64) -> Option<ResizePreview> {
        let min_height = self.min_height();
        let px_per_hour = self.px_per_hour;
        let ResizeState::Resizing(session) = &mut self.state else {
            return None;
        };

        let delta = pointer_y - session.start_pointer_y;
        session.current_height = (session.start_height + delta).max(min_height);

        let minutes = pixels_to_minutes(session.current_height, px_per_hour).round() as u32;
        Some(ResizePreview {
            height_px: session.current_height,
            duration_minutes: minutes,
            end_label: session
                .start_minute
                .map(|start| end_time_label(start, minutes)),
        })
    }

    /// Release the pointer: snap, floor and hand back the duration to store.
    pub fn end(&mut self) -> Option<ResizeCommit> {
        let ResizeState::Resizing(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let raw = pixels_to_minutes(session.current_height, self.px_per_hour);
        Some(ResizeCommit {
            task_id: session.task_id,
            duration_minutes: snap_duration(raw),
        })
    }
}
