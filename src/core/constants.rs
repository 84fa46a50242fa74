// Chart constants

/// Default lookback for the time window, in seconds.
pub const DEFAULT_LOOKBACK_SECS: f64 = 3600.0;

/// Distance deltas below this are treated as a stationary segment.
pub const HEADWAY_EPSILON: f64 = 0.001;

// Linear distance domain used when fewer than two stations are known
pub const FALLBACK_DISTANCE_MIN: f64 = 0.0;
pub const FALLBACK_DISTANCE_MAX: f64 = 200.0;

pub const DEFAULT_PADDING_TOP: f64 = 0.0;
pub const DEFAULT_PADDING_BOTTOM: f64 = 0.0;

/// Poll cadence of the live feed, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Upper bound on one upstream request, in seconds.
pub const FEED_REQUEST_TIMEOUT_SECS: u64 = 10;

// Mock feed shape: one sample every 30s over the last hour
pub const MOCK_TRIP_COUNT: usize = 10;
pub const MOCK_SAMPLE_STEP_SECS: u64 = 30;
pub const MOCK_HISTORY_SECS: u64 = 60 * 60;
pub const MOCK_SPEED_PER_MIN: f64 = 3.33;
