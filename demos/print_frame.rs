// Builds a chart over a mock Q-line snapshot and logs what would be drawn

use rand::rngs::StdRng;
use rand::SeedableRng;
use stringline::core::mock::mock_snapshot;
use stringline::{
    ChartOptions, DirectionId, PointerEvent, PointerKind, PointerPhase, StringlineChart,
    SurfaceRect,
};
use std::sync::Arc;
use tracing::{debug, info, Level};

fn main() -> stringline::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let now = chrono::Utc::now().timestamp() as f64;
    let mut rng = StdRng::seed_from_u64(42);
    let snapshot = mock_snapshot(1, now, "Q", &mut rng);

    let mut chart = StringlineChart::new(ChartOptions {
        show_headways: true,
        direction: Some(DirectionId::Northbound),
        ..ChartOptions::default()
    });
    chart.resize(SurfaceRect { left: 0.0, width: 960.0, height: 540.0 });
    chart.set_snapshot(Arc::new(snapshot));

    let frame = chart.frame();
    info!("Stations:");
    for station in frame.stations.iter() {
        info!("  y={:>6.1}  {}", station.y, station.name);
    }

    info!("Trips shown: {}", frame.trips_shown);
    for path in frame.paths.iter() {
        debug!("  {} ({} points)", path.trip_id, path.points.len());
    }

    info!("Headway labels: {}", frame.headways.len());
    for label in frame.headways.iter().take(10) {
        info!("  {} at ({:.0}, {:.0}): {}", label.station_id, label.x, label.y, label.text);
    }

    // Scrub to the middle of the chart
    let touch = |phase| PointerEvent::new(PointerKind::Touch, phase, 480.0, false);
    let readout = chart.handle_pointer(&touch(PointerPhase::Down));
    info!("Cursor x={:?} time={:?}", readout.x, readout.label);

    chart.handle_pointer(&touch(PointerPhase::Up));
    info!("Layout builds after scrubbing: {:?}", chart.stats());

    println!("{}", serde_json::to_string_pretty(&chart.frame())?);
    Ok(())
}
