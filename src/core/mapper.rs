// Time -> x and distance -> y mapping for one viewport/window/station set

use crate::core::constants::{
    DEFAULT_PADDING_BOTTOM, DEFAULT_PADDING_TOP, FALLBACK_DISTANCE_MAX, FALLBACK_DISTANCE_MIN,
};
use crate::core::model::{Station, TimeWindow, ViewportSize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: DEFAULT_PADDING_TOP,
            bottom: DEFAULT_PADDING_BOTTOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        let t = (value - self.domain.0) / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, value: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return self.domain.0;
        }
        let t = (value - self.range.0) / span;
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }
}

/// Piecewise-linear map over a control-point table sorted by input.
/// Inputs outside the table clamp to the first/last output.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseScale {
    points: Vec<(f64, f64)>,
}

impl PiecewiseScale {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };
        if value <= first.0 {
            return first.1;
        }
        if value >= last.0 {
            return last.1;
        }

        // First control point at or beyond `value`; a run of coincident
        // points resolves to the first of the run.
        let hi = self.points.partition_point(|(input, _)| *input < value);
        if hi == 0 || hi >= self.points.len() {
            return if hi == 0 { first.1 } else { last.1 };
        }
        let (x1, y1) = self.points[hi];
        if x1 == value {
            return y1;
        }
        let (x0, y0) = self.points[hi - 1];
        let span = x1 - x0;
        if !(span > 0.0) {
            return y1;
        }
        y0 + (value - x0) / span * (y1 - y0)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DistanceScale {
    Stations(PiecewiseScale),
    Fallback(LinearScale),
}

/// Pure mapping functions derived from `(viewport, window, stations)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    viewport: ViewportSize,
    time: LinearScale,
    station_ys: Vec<f64>,
    distance: DistanceScale,
}

impl CoordinateMapper {
    /// Returns `None` when there is nothing sensible to draw yet: a zero
    /// sized viewport or an empty/inverted time window.
    pub fn build(
        viewport: ViewportSize,
        window: TimeWindow,
        stations: &[Station],
        padding: Padding,
    ) -> Option<Self> {
        if !viewport.is_drawable() || !window.is_valid() {
            return None;
        }

        let time = LinearScale::new((window.start, window.end), (0.0, viewport.width));

        // Padding larger than the viewport collapses the band instead of
        // inverting it.
        let count = stations.len();
        let band_bottom = (viewport.height - padding.bottom).max(padding.top);
        let index_scale = LinearScale::new(
            (0.0, count.saturating_sub(1) as f64),
            (padding.top, band_bottom),
        );
        let station_ys: Vec<f64> = (0..count)
            .map(|i| if count <= 1 { padding.top } else { index_scale.map(i as f64) })
            .collect();

        let distance = if count > 1 {
            DistanceScale::Stations(PiecewiseScale::new(
                stations
                    .iter()
                    .zip(station_ys.iter())
                    .map(|(station, y)| (station.distance, *y))
                    .collect(),
            ))
        } else {
            DistanceScale::Fallback(LinearScale::new(
                (FALLBACK_DISTANCE_MIN, FALLBACK_DISTANCE_MAX),
                (0.0, viewport.height),
            ))
        };

        Some(Self {
            viewport,
            time,
            station_ys,
            distance,
        })
    }

    pub fn time_to_x(&self, timestamp: f64) -> f64 {
        self.time.map(timestamp)
    }

    pub fn x_to_time(&self, x: f64) -> f64 {
        self.time.invert(x)
    }

    pub fn distance_to_y(&self, distance: f64) -> f64 {
        match &self.distance {
            DistanceScale::Stations(scale) => scale.map(distance),
            DistanceScale::Fallback(scale) => scale.map(distance),
        }
    }

    /// Y of the station gridline at `index`, if the station exists.
    pub fn station_y(&self, index: usize) -> Option<f64> {
        self.station_ys.get(index).copied()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn contains_x(&self, x: f64) -> bool {
        (0.0..=self.viewport.width).contains(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stations(distances: &[f64]) -> Vec<Station> {
        distances
            .iter()
            .enumerate()
            .map(|(i, d)| Station::new(format!("S{i}"), format!("Station {i}"), *d))
            .collect()
    }

    fn mapper(distances: &[f64]) -> CoordinateMapper {
        CoordinateMapper::build(
            ViewportSize::new(500.0, 300.0),
            TimeWindow::new(1_700_000_000.0, 1_700_003_600.0),
            &stations(distances),
            Padding::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_viewport_has_no_mapper() {
        let window = TimeWindow::new(0.0, 60.0);
        let build = |width, height| {
            let viewport = ViewportSize::new(width, height);
            CoordinateMapper::build(viewport, window, &[], Padding::default())
        };
        assert!(build(0.0, 300.0).is_none());
        assert!(build(500.0, 0.0).is_none());
    }

    #[test]
    fn test_time_inverse_roundtrip() {
        let m = mapper(&[0.0, 100.0]);
        for t in [1_700_000_000.0, 1_700_001_234.5, 1_700_003_600.0] {
            assert_relative_eq!(m.x_to_time(m.time_to_x(t)), t, max_relative = 1e-6);
        }
        for x in [0.0, 123.4, 500.0] {
            assert_relative_eq!(
                m.time_to_x(m.x_to_time(x)),
                x,
                max_relative = 1e-6,
                epsilon = 1e-6
            );
        }
        assert_relative_eq!(m.time_to_x(1_700_003_600.0), 500.0);
    }

    #[test]
    fn test_stations_evenly_spaced() {
        let m = mapper(&[0.0, 10.0, 150.0]);
        assert_eq!(m.station_y(0), Some(0.0));
        assert_eq!(m.station_y(1), Some(150.0));
        assert_eq!(m.station_y(2), Some(300.0));
        assert_relative_eq!(m.distance_to_y(10.0), 150.0);
        assert_relative_eq!(m.distance_to_y(5.0), 75.0);
        assert_relative_eq!(m.distance_to_y(80.0), 225.0);
    }

    #[test]
    fn test_padding_applies_to_station_band() {
        let m = CoordinateMapper::build(
            ViewportSize::new(500.0, 300.0),
            TimeWindow::new(0.0, 60.0),
            &stations(&[0.0, 100.0]),
            Padding { top: 20.0, bottom: 30.0 },
        )
        .unwrap();
        assert_eq!(m.station_y(0), Some(20.0));
        assert_eq!(m.station_y(1), Some(270.0));
    }

    #[test]
    fn test_oversized_padding_keeps_y_non_decreasing() {
        let m = CoordinateMapper::build(
            ViewportSize::new(500.0, 30.0),
            TimeWindow::new(0.0, 60.0),
            &stations(&[0.0, 100.0, 200.0]),
            Padding { top: 20.0, bottom: 20.0 },
        )
        .unwrap();
        let ys: Vec<f64> = [0.0, 50.0, 100.0, 150.0, 200.0]
            .iter()
            .map(|d| m.distance_to_y(*d))
            .collect();
        assert!(ys.windows(2).all(|pair| pair[1] >= pair[0]), "{ys:?}");
        assert_eq!(m.station_y(0), Some(20.0));
        assert_eq!(m.station_y(2), Some(20.0));
    }

    #[test]
    fn test_distance_outside_stations_clamps() {
        let m = mapper(&[10.0, 20.0]);
        assert_eq!(m.distance_to_y(-50.0), 0.0);
        assert_eq!(m.distance_to_y(1e9), 300.0);
    }

    #[test]
    fn test_coincident_stations_share_y() {
        let m = mapper(&[0.0, 100.0, 100.0, 300.0]);
        let y = m.distance_to_y(100.0);
        assert!(y.is_finite());
        assert_eq!(y, m.station_y(1).unwrap());
        assert!(m.distance_to_y(99.999) <= y);
        assert!(m.distance_to_y(100.001) >= y);
    }

    #[test]
    fn test_distance_to_y_is_monotonic() {
        let m = mapper(&[0.0, 5.0, 5.0, 40.0, 41.0, 200.0]);
        let mut last = f64::NEG_INFINITY;
        let mut d = -10.0;
        while d <= 210.0 {
            let y = m.distance_to_y(d);
            assert!(y >= last, "y dropped at distance {d}");
            last = y;
            d += 0.25;
        }
    }

    #[test]
    fn test_fallback_scale_for_zero_or_one_station() {
        for distances in [&[][..], &[42.0][..]] {
            let m = mapper(distances);
            assert_relative_eq!(m.distance_to_y(0.0), 0.0);
            assert_relative_eq!(m.distance_to_y(100.0), 150.0);
            assert_relative_eq!(m.distance_to_y(200.0), 300.0);
        }
        assert_eq!(mapper(&[42.0]).station_y(0), Some(0.0));
    }

    #[test]
    fn test_unsorted_stations_do_not_panic() {
        let m = mapper(&[50.0, 10.0, 30.0]);
        for d in [0.0, 20.0, 40.0, 60.0, f64::NAN] {
            let _ = m.distance_to_y(d);
        }
    }
}
