//! Wall-clock, minute and pixel conversions for the day timeline.
//!
//! Everything here is a total function. Range checks against the rendered
//! or working window are the caller's job.

/// Grid used for drag/drop snapping, resize snapping and slot scanning.
pub const SNAP_MINUTES: u32 = 15;

pub const MINUTES_PER_HOUR: u32 = 60;

pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// `hour * 60 + minute`.
pub fn to_minutes(hour: u32, minute: u32) -> u32 {
    hour * MINUTES_PER_HOUR + minute
}

/// Split minutes-since-midnight into `(hour, minute)`.
pub fn from_minutes(total: u32) -> (u32, u32) {
    (total / MINUTES_PER_HOUR, total % MINUTES_PER_HOUR)
}

/// Parse an `HH:MM` string into `(hour, minute)`.
///
/// Returns `None` for anything that is not a valid 24-hour clock time, so
/// malformed stored values behave as if they were absent.
pub fn parse_hhmm(value: &str) -> Option<(u32, u32)> {
    let (h, m) = value.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour >= 24 || minute >= MINUTES_PER_HOUR {
        return None;
    }
    Some((hour, minute))
}

/// Parse an `HH:MM` string straight to minutes-since-midnight.
pub fn parse_minutes(value: &str) -> Option<u32> {
    parse_hhmm(value).map(|(h, m)| to_minutes(h, m))
}

/// Zero-padded `HH:MM`, the persisted form of start times.
pub fn format_hhmm(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

/// `HH:MM` for a minute offset.
pub fn format_minutes(total: u32) -> String {
    let (h, m) = from_minutes(total);
    format_hhmm(h, m)
}

/// 12-hour clock label, e.g. `9:05 AM`. Hours 0 and 12 both render as `12`.
pub fn format_12h(hour: u32, minute: u32) -> String {
    let hour = hour % 24;
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:{minute:02} {suffix}")
}

/// Row label for a whole hour, e.g. `9 AM`.
pub fn hour_label(hour: u32) -> String {
    let hour = hour % 24;
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display} {suffix}")
}

/// Vertical offset of `start_minute` from the top of a timeline whose first
/// row is `start_hour`.
pub fn pixels_from_start(start_minute: u32, start_hour: u32, px_per_hour: f64) -> f64 {
    let relative = start_minute as f64 - (start_hour * MINUTES_PER_HOUR) as f64;
    relative / MINUTES_PER_HOUR as f64 * px_per_hour
}

/// Inverse of [`pixels_from_start`], snapped to the 15-minute grid.
///
/// The result may be negative when the offset lies above the first row;
/// callers reject it along with anything else outside their window.
pub fn minutes_from_pixels(pixel_offset: f64, start_hour: u32, px_per_hour: f64) -> i32 {
    let relative = pixels_to_minutes(pixel_offset, px_per_hour);
    snap_to_grid(relative).saturating_add((start_hour * MINUTES_PER_HOUR) as i32)
}

/// Raw (unsnapped) minutes represented by a pixel span.
pub fn pixels_to_minutes(pixels: f64, px_per_hour: f64) -> f64 {
    if px_per_hour <= 0.0 {
        return 0.0;
    }
    pixels / px_per_hour * MINUTES_PER_HOUR as f64
}

/// Pixel span covering `minutes`.
pub fn minutes_to_pixels(minutes: f64, px_per_hour: f64) -> f64 {
    minutes / MINUTES_PER_HOUR as f64 * px_per_hour
}

/// `round(minutes / 15) * 15`, clamped to the `i32` range. NaN snaps to 0.
pub fn snap_to_grid(minutes: f64) -> i32 {
    let step = SNAP_MINUTES as i32;
    let slots = (minutes / SNAP_MINUTES as f64)
        .round()
        .clamp((i32::MIN / step) as f64, (i32::MAX / step) as f64);
    slots as i32 * step
}
