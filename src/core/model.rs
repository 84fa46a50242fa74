// Data structures shared by the chart pipeline

use crate::core::constants::DEFAULT_LOOKBACK_SECS;
use crate::core::error::StringlineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    /// Distance along the route, in route units.
    #[serde(rename = "dist")]
    pub distance: f64,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>, distance: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            distance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DirectionId {
    Northbound = 0,
    Southbound = 1,
}

impl TryFrom<u8> for DirectionId {
    type Error = StringlineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DirectionId::Northbound),
            1 => Ok(DirectionId::Southbound),
            other => Err(StringlineError::InvalidDirection(other)),
        }
    }
}

impl From<DirectionId> for u8 {
    fn from(direction: DirectionId) -> Self {
        direction as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Epoch seconds.
    pub timestamp: f64,
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<String>,
}

impl PositionSample {
    pub fn new(timestamp: f64, distance: f64) -> Self {
        Self {
            timestamp,
            distance,
            stop_id: None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.distance.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "trip_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    pub direction_id: DirectionId,
    /// Ordered by timestamp ascending; never re-sorted here.
    #[serde(default)]
    pub positions: Vec<PositionSample>,
}

impl Trip {
    pub fn new(
        id: impl Into<String>,
        direction_id: DirectionId,
        positions: Vec<PositionSample>,
    ) -> Self {
        Self {
            id: id.into(),
            route_id: None,
            direction_id,
            positions,
        }
    }
}

/// Visible time range in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window of `lookback_secs` ending at `end`.
    pub fn ending_at(end: f64, lookback_secs: f64) -> Self {
        Self {
            start: end - lookback_secs,
            end,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.end > self.start
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::ending_at(0.0, DEFAULT_LOOKBACK_SECS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPath {
    pub trip_id: String,
    pub direction_id: DirectionId,
    pub points: Vec<ScreenPoint>,
}

/// Gap between two consecutive crossings of the same station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadwayGap {
    pub station_id: String,
    pub midpoint: f64,
    pub duration: f64,
}

/// Immutable `{stations, trips}` set delivered by one feed refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bumped by the producer on every refresh.
    pub revision: u64,
    /// Epoch seconds at which the snapshot was produced.
    pub generated_at: f64,
    pub stations: Vec<Station>,
    pub trips: Vec<Trip>,
}

impl Snapshot {
    pub fn new(revision: u64, generated_at: f64, stations: Vec<Station>, trips: Vec<Trip>) -> Self {
        Self {
            revision,
            generated_at,
            stations,
            trips,
        }
    }

    /// Latest sample timestamp over every trip, regardless of direction.
    pub fn last_updated(&self) -> Option<f64> {
        self.trips
            .iter()
            .flat_map(|trip| trip.positions.iter())
            .map(|p| p.timestamp)
            .filter(|ts| ts.is_finite())
            .reduce(f64::max)
    }

    pub fn trips_for(&self, direction: Option<DirectionId>) -> impl Iterator<Item = &Trip> {
        self.trips
            .iter()
            .filter(move |trip| direction.map_or(true, |d| trip.direction_id == d))
    }
}
