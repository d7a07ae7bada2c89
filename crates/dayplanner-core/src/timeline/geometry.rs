//! Rendered timeline window and the pixel layout derived from it.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::interval::Interval;
use super::time::{
    format_12h, from_minutes, hour_label, minutes_to_pixels, pixels_from_start, to_minutes,
    MINUTES_PER_DAY,
};
use crate::task::Task;

/// Rendered range of the day planner timeline.
///
/// This is the window drag/drop and quick-schedule validate against; the
/// auto-scheduler uses its own, narrower working window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// First rendered hour (inclusive)
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// Last rendered hour (exclusive)
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    /// Height of one hour row
    #[serde(default = "default_px_per_hour")]
    pub px_per_hour: f64,
}

fn default_start_hour() -> u32 {
    0
}
fn default_end_hour() -> u32 {
    24
}
fn default_px_per_hour() -> f64 {
    60.0
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            px_per_hour: default_px_per_hour(),
        }
    }
}

/// One hour row of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRow {
    pub hour: u32,
    pub label: String,
    pub top_px: f64,
}

/// Position of a scheduled task block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockGeometry {
    pub top_px: f64,
    pub height_px: f64,
}

impl TimelineConfig {
    pub fn new(start_hour: u32, end_hour: u32, px_per_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
            px_per_hour,
        }
    }

    /// `hour` lies in `[start_hour, end_hour)`.
    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    /// Total rendered height.
    pub fn height_px(&self) -> f64 {
        self.end_hour.saturating_sub(self.start_hour) as f64 * self.px_per_hour
    }

    pub fn offset_of(&self, minute: u32) -> f64 {
        pixels_from_start(minute, self.start_hour, self.px_per_hour)
    }

    pub fn hour_rows(&self) -> Vec<HourRow> {
        (self.start_hour..self.end_hour)
            .map(|hour| HourRow {
                hour,
                label: hour_label(hour),
                top_px: self.offset_of(to_minutes(hour, 0)),
            })
            .collect()
    }

    /// Block position for a scheduled task; `None` when it has no valid start.
    pub fn block_geometry(&self, task: &Task) -> Option<BlockGeometry> {
        let interval = Interval::of_task(task)?;
        Some(BlockGeometry {
            top_px: self.offset_of(interval.start),
            height_px: minutes_to_pixels(interval.duration_minutes() as f64, self.px_per_hour),
        })
    }

    /// Offset of the current-time line, if `now` is inside the rendered window.
    pub fn now_marker(&self, now: NaiveTime) -> Option<f64> {
        if !self.contains_hour(now.hour()) {
            return None;
        }
        Some(self.offset_of(to_minutes(now.hour(), now.minute())))
    }

    /// Scroll offset that puts the hour before `now` at the top of the viewport.
    pub fn scroll_target(&self, now: NaiveTime) -> f64 {
        let top_hour = now.hour().saturating_sub(1).max(self.start_hour);
        self.offset_of(to_minutes(top_hour, 0)).max(0.0)
    }
}

/// 12-hour label for the end of a block starting at `start_minute`.
pub fn end_time_label(start_minute: u32, duration_minutes: u32) -> String {
    let end = start_minute.saturating_add(duration_minutes) % MINUTES_PER_DAY;
    let (h, m) = from_minutes(end);
    format_12h(h, m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn hour_rows_cover_window() {
        let cfg = TimelineConfig::new(6, 9, 80.0);
        let rows = cfg.hour_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "6 AM");
        assert_eq!(rows[2].top_px, 160.0);
        assert_eq!(cfg.height_px(), 240.0);
    }

    #[test]
    fn block_geometry_for_scheduled_task() {
        let cfg = TimelineConfig::new(8, 20, 60.0);
        let task = Task::new("Review").with_planned_start("09:30").with_duration(45);
        let block = cfg.block_geometry(&task).unwrap();
        assert_eq!(block.top_px, 90.0);
        assert_eq!(block.height_px, 45.0);
        assert!(cfg.block_geometry(&Task::new("loose")).is_none());
    }

    #[test]
    fn now_marker_only_inside_window() {
        let cfg = TimelineConfig::new(8, 20, 60.0);
        assert_eq!(cfg.now_marker(at(10, 15)), Some(135.0));
        assert_eq!(cfg.now_marker(at(7, 59)), None);
        assert_eq!(cfg.now_marker(at(20, 0)), None);
    }

    #[test]
    fn scroll_target_clamps_at_top() {
        let cfg = TimelineConfig::default();
        assert_eq!(cfg.scroll_target(at(10, 40)), 540.0);
        assert_eq!(cfg.scroll_target(at(0, 10)), 0.0);

        let narrow = TimelineConfig::new(8, 20, 60.0);
        assert_eq!(narrow.scroll_target(at(6, 0)), 0.0);
    }

    #[test]
    fn end_label_wraps_past_midnight() {
        assert_eq!(end_time_label(to_minutes(9, 0), 37), "9:37 AM");
        assert_eq!(end_time_label(to_minutes(23, 30), 60), "12:30 AM");
    }

    #[test]
    fn end_label_survives_huge_duration() {
        assert_eq!(
            end_time_label(to_minutes(9, 0), u32::MAX),
            end_time_label(u32::MAX, 0)
        );
    }
}
