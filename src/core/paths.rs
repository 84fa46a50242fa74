// Trip samples -> screen-space polylines

use crate::core::mapper::CoordinateMapper;
use crate::core::model::{ScreenPoint, Trip, TripPath};

/// Maps every trip with at least two usable samples to a polyline,
/// keeping input order. Samples are connected linearly, never smoothed.
pub fn build_paths<'a, I>(trips: I, mapper: &CoordinateMapper) -> Vec<TripPath>
where
    I: IntoIterator<Item = &'a Trip>,
{
    trips
        .into_iter()
        .filter_map(|trip| build_path(trip, mapper))
        .collect()
}

pub fn build_path(trip: &Trip, mapper: &CoordinateMapper) -> Option<TripPath> {
    if trip.positions.len() < 2 {
        return None;
    }

    // Non-finite samples cannot be placed on screen
    let points: Vec<ScreenPoint> = trip
        .positions
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| ScreenPoint {
            x: mapper.time_to_x(p.timestamp),
            y: mapper.distance_to_y(p.distance),
        })
        .collect();

    if points.len() < 2 {
        return None;
    }

    Some(TripPath {
        trip_id: trip.id.clone(),
        direction_id: trip.direction_id,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapper::Padding;
    use crate::core::model::{DirectionId, PositionSample, Station, TimeWindow, ViewportSize};
    use approx::assert_relative_eq;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::build(
            ViewportSize::new(120.0, 400.0),
            TimeWindow::new(0.0, 120.0),
            &[Station::new("A", "A", 0.0), Station::new("B", "B", 100.0)],
            Padding::default(),
        )
        .unwrap()
    }

    fn trip(id: &str, samples: &[(f64, f64)]) -> Trip {
        Trip::new(
            id,
            DirectionId::Northbound,
            samples.iter().map(|(t, d)| PositionSample::new(*t, *d)).collect(),
        )
    }

    #[test]
    fn test_path_keeps_every_sample() {
        let m = mapper();
        let paths = build_paths(&[trip("t1", &[(0.0, 0.0), (60.0, 50.0), (120.0, 100.0)])], &m);
        assert_eq!(paths.len(), 1);
        let points = &paths[0].points;
        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[1].x, 60.0);
        let midpoint_y = (m.station_y(0).unwrap() + m.station_y(1).unwrap()) / 2.0;
        assert_relative_eq!(points[1].y, midpoint_y);
    }

    #[test]
    fn test_short_trips_are_omitted() {
        let m = mapper();
        let trips = [
            trip("empty", &[]),
            trip("single", &[(10.0, 10.0)]),
            trip("ok", &[(10.0, 10.0), (20.0, 20.0)]),
        ];
        let paths = build_paths(&trips, &m);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].trip_id, "ok");
    }

    #[test]
    fn test_non_finite_samples_dropped() {
        let m = mapper();
        let paths = build_paths(
            &[
                trip("a", &[(0.0, 0.0), (f64::NAN, 10.0), (30.0, 20.0)]),
                trip("b", &[(0.0, f64::INFINITY), (30.0, 20.0)]),
            ],
            &m,
        );
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].points.len(), 2);
    }

    #[test]
    fn test_order_follows_input() {
        let m = mapper();
        let trips = [trip("z", &[(0.0, 0.0), (1.0, 1.0)]), trip("a", &[(0.0, 0.0), (1.0, 1.0)])];
        let ids: Vec<_> = build_paths(&trips, &m).into_iter().map(|p| p.trip_id).collect();
        assert_eq!(ids, ["z", "a"]);
    }
}
