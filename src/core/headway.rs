// Headway inference from interpolated station crossings

use crate::core::constants::HEADWAY_EPSILON;
use crate::core::mapper::CoordinateMapper;
use crate::core::model::{HeadwayGap, Station, Trip};
use serde::Serialize;

/// Headway gap placed on the chart at its midpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadwayLabel {
    pub station_id: String,
    pub x: f64,
    pub y: f64,
    pub duration: f64,
    pub text: String,
}

/// Time at which `trip` first passes `distance`, interpolated between the
/// first pair of samples bracketing it.
///
/// Only the first crossing counts: a trip that reverses and passes the
/// same point again contributes one time. Pairs with a non-finite value or
/// a stationary span (under `HEADWAY_EPSILON`) are skipped and scanning
/// continues with the next pair.
pub fn crossing_time(trip: &Trip, distance: f64) -> Option<f64> {
    trip.positions.windows(2).find_map(|pair| {
        let (p1, p2) = (&pair[0], &pair[1]);
        if !p1.is_finite() || !p2.is_finite() {
            return None;
        }
        let low = p1.distance.min(p2.distance);
        let high = p1.distance.max(p2.distance);
        if distance < low || distance > high {
            return None;
        }
        let delta = p2.distance - p1.distance;
        if delta.abs() < HEADWAY_EPSILON {
            return None;
        }
        let ratio = (distance - p1.distance) / delta;
        Some(p1.timestamp + ratio * (p2.timestamp - p1.timestamp))
    })
}

/// Gaps between consecutive crossings of one station, in time order,
/// keeping only those whose midpoint lands on the chart.
pub fn station_gaps(
    station: &Station,
    trips: &[&Trip],
    mapper: &CoordinateMapper,
) -> Vec<HeadwayGap> {
    if !station.distance.is_finite() {
        return Vec::new();
    }

    let mut crossings: Vec<f64> = trips
        .iter()
        .filter_map(|trip| crossing_time(trip, station.distance))
        .collect();
    crossings.sort_by(f64::total_cmp);

    crossings
        .windows(2)
        .map(|pair| HeadwayGap {
            station_id: station.id.clone(),
            midpoint: (pair[0] + pair[1]) / 2.0,
            duration: pair[1] - pair[0],
        })
        .filter(|gap| mapper.contains_x(mapper.time_to_x(gap.midpoint)))
        .collect()
}

/// Every station's gaps, stations in input order.
pub fn analyze(
    trips: &[&Trip],
    stations: &[Station],
    mapper: &CoordinateMapper,
) -> Vec<HeadwayGap> {
    stations
        .iter()
        .flat_map(|station| station_gaps(station, trips, mapper))
        .collect()
}

/// Gaps positioned at `(time_to_x(midpoint), station gridline y)`.
pub fn headway_labels(
    trips: &[&Trip],
    stations: &[Station],
    mapper: &CoordinateMapper,
) -> Vec<HeadwayLabel> {
    let mut labels = Vec::new();
    for (index, station) in stations.iter().enumerate() {
        let Some(y) = mapper.station_y(index) else {
            continue;
        };
        let gaps = station_gaps(station, trips, mapper);
        labels.extend(gaps.into_iter().map(|gap| HeadwayLabel {
            x: mapper.time_to_x(gap.midpoint),
            y,
            text: format_headway(gap.duration),
            duration: gap.duration,
            station_id: gap.station_id,
        }));
    }
    labels
}

/// Compact duration text: `45s`, `4m`, `4m 30s`.
pub fn format_headway(duration_secs: f64) -> String {
    let total = duration_secs.max(0.0).round() as u64;
    let (minutes, seconds) = (total / 60, total % 60);
    match (minutes, seconds) {
        (0, s) => format!("{s}s"),
        (m, 0) => format!("{m}m"),
        (m, s) => format!("{m}m {s}s"),
    }
}
