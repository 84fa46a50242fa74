// Synthetic Q-line feed for demos and offline runs

use crate::core::constants::{
    FALLBACK_DISTANCE_MAX, FALLBACK_DISTANCE_MIN, MOCK_HISTORY_SECS, MOCK_SAMPLE_STEP_SECS,
    MOCK_SPEED_PER_MIN, MOCK_TRIP_COUNT,
};
use crate::core::model::{DirectionId, PositionSample, Snapshot, Station, Trip};
use rand::Rng;

const MOCK_STATIONS: &[(&str, &str, f64)] = &[
    ("Q05", "96 St", 0.0),
    ("Q04", "86 St", 10.0),
    ("Q03", "72 St", 20.0),
    ("57N", "57 St-7 Av", 30.0),
    ("49N", "49 St", 35.0),
    ("42N", "Times Sq-42 St", 40.0),
    ("34N", "34 St-Herald Sq", 50.0),
    ("28N", "28 St", 55.0),
    ("23N", "23 St", 60.0),
    ("14N", "14 St-Union Sq", 70.0),
    ("CAN", "Canal St", 85.0),
    ("DEK", "DeKalb Av", 100.0),
    ("ATL", "Atlantic Av-Barclays Ctr", 110.0),
    ("7AV", "7 Av", 120.0),
    ("PRO", "Prospect Park", 130.0),
    ("CHU", "Church Av", 140.0),
    ("KIN", "Kings Hwy", 160.0),
    ("CON", "Coney Island-Stillwell Av", 200.0),
];

pub fn mock_stations() -> Vec<Station> {
    MOCK_STATIONS
        .iter()
        .map(|(id, name, dist)| Station::new(*id, *name, *dist))
        .collect()
}

/// Trips moving at constant speed, sampled backwards from `now` every
/// 30 seconds over the last hour. Samples off the line are dropped and
/// trips left with no samples are not emitted.
pub fn mock_trips<R: Rng>(now: f64, line: &str, rng: &mut R) -> Vec<Trip> {
    let mut trips = Vec::with_capacity(MOCK_TRIP_COUNT);

    for i in 0..MOCK_TRIP_COUNT {
        let direction = if rng.gen_bool(0.5) {
            DirectionId::Northbound
        } else {
            DirectionId::Southbound
        };
        let progress = rng.gen_range(FALLBACK_DISTANCE_MIN..FALLBACK_DISTANCE_MAX);
        let speed = match direction {
            DirectionId::Northbound => MOCK_SPEED_PER_MIN,
            DirectionId::Southbound => -MOCK_SPEED_PER_MIN,
        };

        let mut positions: Vec<PositionSample> = (0..MOCK_HISTORY_SECS)
            .step_by(MOCK_SAMPLE_STEP_SECS as usize)
            .filter_map(|offset| {
                let offset = offset as f64;
                let distance = progress - speed * (offset / 60.0);
                (FALLBACK_DISTANCE_MIN..=FALLBACK_DISTANCE_MAX)
                    .contains(&distance)
                    .then(|| PositionSample::new(now - offset, distance))
            })
            .collect();
        if positions.is_empty() {
            continue;
        }
        positions.reverse();

        let mut trip = Trip::new(format!("mock_trip_{i}_{}", now as i64), direction, positions);
        trip.route_id = Some(line.to_string());
        trips.push(trip);
    }

    trips
}

pub fn mock_snapshot<R: Rng>(revision: u64, now: f64, line: &str, rng: &mut R) -> Snapshot {
    Snapshot::new(revision, now, mock_stations(), mock_trips(now, line, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mock_stations_sorted() {
        let stations = mock_stations();
        assert_eq!(stations.len(), 18);
        assert!(stations.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_mock_trips_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = 1_700_000_000.0;
        let trips = mock_trips(now, "Q", &mut rng);
        assert!(!trips.is_empty());
        assert!(trips.len() <= MOCK_TRIP_COUNT);
        for trip in &trips {
            assert_eq!(trip.route_id.as_deref(), Some("Q"));
            assert!(trip.positions.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            assert!(trip.positions.iter().all(|p| (0.0..=200.0).contains(&p.distance)));
            assert!(trip
                .positions
                .iter()
                .all(|p| p.timestamp <= now && p.timestamp > now - 3600.0));
            let first = &trip.positions[0];
            let last = trip.positions.last().unwrap();
            match trip.direction_id {
                DirectionId::Northbound => assert!(last.distance >= first.distance),
                DirectionId::Southbound => assert!(last.distance <= first.distance),
            }
        }
    }
}
