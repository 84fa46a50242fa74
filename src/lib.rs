// Stringline chart engine
// Main library entry point

pub mod core;

// Re-export main types
pub use crate::core::chart::{
    ChartFrame, ChartOptions, ChartStats, ScrubReadout, StationGridline, StringlineChart,
};
pub use crate::core::error::{Result, StringlineError};
pub use crate::core::headway::{analyze as analyze_headways, HeadwayLabel};
pub use crate::core::mapper::{CoordinateMapper, Padding};
pub use crate::core::model::{
    DirectionId, HeadwayGap, PositionSample, ScreenPoint, Snapshot, Station, TimeWindow, Trip,
    TripPath, ViewportSize,
};
pub use crate::core::scrub::{PointerEvent, PointerKind, PointerPhase, ScrubController, ScrubState};
pub use crate::core::viewport::{SurfaceRect, ViewportSizer};

#[cfg(test)]
mod tests {
    #[test]
    fn test_constants() {
        use crate::core::constants::*;
        assert_eq!(DEFAULT_LOOKBACK_SECS, 3600.0);
        assert_eq!(HEADWAY_EPSILON, 0.001);
        assert_eq!((FALLBACK_DISTANCE_MIN, FALLBACK_DISTANCE_MAX), (0.0, 200.0));
    }
}
