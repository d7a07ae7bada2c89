//! Drop position to start time.

use crate::timeline::time::{from_minutes, minutes_from_pixels};
use crate::timeline::TimelineConfig;

/// Where a dragged task was released, relative to the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DropPoint {
    /// Pointer offset from the top of the visible timeline
    pub offset_px: f64,
    /// Current scroll offset of the timeline
    pub scroll_px: f64,
}

impl DropPoint {
    pub fn new(offset_px: f64, scroll_px: f64) -> Self {
        Self {
            offset_px,
            scroll_px,
        }
    }
}

/// Snapped `(hour, minute)` for a drop, or `None` when it lands outside the
/// rendered window or the position is not a finite number.
pub fn drop_target(point: DropPoint, timeline: &TimelineConfig) -> Option<(u32, u32)> {
    let offset = point.offset_px + point.scroll_px;
    if !offset.is_finite() {
        return None;
    }
    let minutes = minutes_from_pixels(offset, timeline.start_hour, timeline.px_per_hour);
    let minutes = u32::try_from(minutes).ok()?;
    let (hour, minute) = from_minutes(minutes);
    timeline.contains_hour(hour).then_some((hour, minute))
}
