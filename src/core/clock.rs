// Wall-clock labels for epoch-second timestamps

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Offset east of UTC in minutes; out-of-range values fall back to UTC.
pub fn utc_offset(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

fn to_datetime(timestamp: f64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
        .map(|dt| dt.with_timezone(&offset))
}

/// Scrub readout, e.g. `1:05:09 PM`.
pub fn format_clock(timestamp: f64, offset: FixedOffset) -> Option<String> {
    to_datetime(timestamp, offset).map(|dt| dt.format("%-I:%M:%S %p").to_string())
}

/// Hour and minute only, e.g. `1:05 PM`.
pub fn format_short_clock(timestamp: f64, offset: FixedOffset) -> Option<String> {
    to_datetime(timestamp, offset).map(|dt| dt.format("%-I:%M %p").to_string())
}
