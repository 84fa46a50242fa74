// One stringline chart instance: snapshot + viewport + scrub -> frame

use crate::core::clock::{format_clock, format_short_clock};
use crate::core::constants::DEFAULT_LOOKBACK_SECS;
use crate::core::headway::{headway_labels, HeadwayLabel};
use crate::core::mapper::{CoordinateMapper, Padding};
use crate::core::memo::Memo;
use crate::core::model::{DirectionId, Snapshot, TimeWindow, Trip, TripPath, ViewportSize};
use crate::core::paths::build_paths;
use crate::core::scrub::{PointerEvent, ScrubController};
use crate::core::viewport::{SurfaceRect, ViewportSizer};
use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub lookback_secs: f64,
    pub padding: Padding,
    pub show_headways: bool,
    pub direction: Option<DirectionId>,
    pub utc_offset: FixedOffset,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            lookback_secs: DEFAULT_LOOKBACK_SECS,
            padding: Padding::default(),
            show_headways: false,
            direction: None,
            utc_offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationGridline {
    pub id: String,
    pub name: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScrubReadout {
    pub active: bool,
    pub x: Option<f64>,
    pub timestamp: Option<f64>,
    pub label: Option<String>,
}

/// Everything the rendering layer needs for one paint.
#[derive(Debug, Clone, Serialize)]
pub struct ChartFrame {
    /// False until the viewport has a size; everything else is empty then.
    pub ready: bool,
    pub revision: u64,
    pub viewport: ViewportSize,
    pub window: TimeWindow,
    pub stations: Arc<Vec<StationGridline>>,
    pub paths: Arc<Vec<TripPath>>,
    pub headways: Arc<Vec<HeadwayLabel>>,
    pub cursor: ScrubReadout,
    pub trips_shown: usize,
    pub last_updated: Option<f64>,
    pub last_updated_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartStats {
    pub layout_builds: u64,
    pub headway_builds: u64,
}

// Version token for everything derived from the snapshot
#[derive(Debug, Clone, PartialEq)]
struct LayoutKey {
    revision: u64,
    viewport: ViewportSize,
    window: TimeWindow,
    padding: Padding,
    direction: Option<DirectionId>,
}

#[derive(Debug, Default)]
struct Layout {
    mapper: Option<CoordinateMapper>,
    stations: Arc<Vec<StationGridline>>,
    paths: Arc<Vec<TripPath>>,
}

pub struct StringlineChart {
    options: ChartOptions,
    sizer: ViewportSizer,
    scrub: ScrubController,
    snapshot: Arc<Snapshot>,
    layout: Memo<LayoutKey, Layout>,
    headways: Memo<LayoutKey, Arc<Vec<HeadwayLabel>>>,
}

impl StringlineChart {
    pub fn new(options: ChartOptions) -> Self {
        Self {
            options,
            sizer: ViewportSizer::new(),
            scrub: ScrubController::new(),
            snapshot: Arc::new(Snapshot::default()),
            layout: Memo::new(),
            headways: Memo::new(),
        }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Replaces the data wholesale. Producers must bump `revision` for
    /// every new snapshot; an equal revision is treated as unchanged.
    pub fn set_snapshot(&mut self, snapshot: Arc<Snapshot>) {
        self.snapshot = snapshot;
    }

    pub fn set_direction(&mut self, direction: Option<DirectionId>) {
        self.options.direction = direction;
    }

    pub fn set_show_headways(&mut self, show: bool) {
        self.options.show_headways = show;
    }

    /// Ignores a lookback that is not a positive finite duration.
    pub fn set_lookback(&mut self, lookback_secs: f64) -> bool {
        if !(lookback_secs.is_finite() && lookback_secs > 0.0) {
            return false;
        }
        self.options.lookback_secs = lookback_secs;
        true
    }

    pub fn resize(&mut self, rect: SurfaceRect) {
        if self.sizer.observe(rect) {
            self.scrub.clamp_to(self.sizer.size().width);
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        self.sizer.size()
    }

    pub fn time_window(&self) -> TimeWindow {
        TimeWindow::ending_at(self.snapshot.generated_at, self.options.lookback_secs)
    }

    pub fn stats(&self) -> ChartStats {
        ChartStats {
            layout_builds: self.layout.computations(),
            headway_builds: self.headways.computations(),
        }
    }

    fn layout_key(&self) -> LayoutKey {
        LayoutKey {
            revision: self.snapshot.revision,
            viewport: self.sizer.size(),
            window: self.time_window(),
            padding: self.options.padding,
            direction: self.options.direction,
        }
    }

    pub fn mapper(&mut self) -> Option<&CoordinateMapper> {
        let key = self.layout_key();
        let snapshot = &self.snapshot;
        self.layout
            .get_or_compute(key.clone(), || build_layout(snapshot, &key))
            .mapper
            .as_ref()
    }

    /// Feeds one pointer/touch event to the scrubber. Never touches the
    /// derived paths or headways.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> ScrubReadout {
        let size = self.sizer.size();
        self.scrub.handle(event, self.sizer.left(), size.width);
        self.scrub_readout()
    }

    pub fn scrub_readout(&mut self) -> ScrubReadout {
        let Some(x) = self.scrub.x_position() else {
            return ScrubReadout::default();
        };
        let offset = self.options.utc_offset;
        let timestamp = self.mapper().map(|m| m.x_to_time(x));
        ScrubReadout {
            active: true,
            x: Some(x),
            timestamp,
            label: timestamp.and_then(|ts| format_clock(ts, offset)),
        }
    }

    pub fn frame(&mut self) -> ChartFrame {
        let key = self.layout_key();
        let snapshot = &self.snapshot;
        let layout = self
            .layout
            .get_or_compute(key.clone(), || build_layout(snapshot, &key));

        let headways = match (&layout.mapper, self.options.show_headways) {
            (Some(mapper), true) => self
                .headways
                .get_or_compute(key.clone(), || {
                    let trips: Vec<&Trip> = snapshot.trips_for(key.direction).collect();
                    let labels = headway_labels(&trips, &snapshot.stations, mapper);
                    debug!(
                        "Rebuilt headways for revision {}: {} labels",
                        key.revision,
                        labels.len()
                    );
                    Arc::new(labels)
                })
                .clone(),
            _ => Arc::default(),
        };

        let ready = layout.mapper.is_some();
        let stations = layout.stations.clone();
        let paths = layout.paths.clone();
        let trips_shown = snapshot.trips_for(key.direction).count();
        let last_updated = self.snapshot.last_updated();
        let offset = self.options.utc_offset;

        ChartFrame {
            ready,
            revision: key.revision,
            viewport: key.viewport,
            window: key.window,
            trips_shown,
            stations,
            paths,
            headways,
            cursor: self.scrub_readout(),
            last_updated,
            last_updated_label: last_updated.and_then(|ts| format_short_clock(ts, offset)),
        }
    }
}

fn build_layout(snapshot: &Snapshot, key: &LayoutKey) -> Layout {
    let mapper = CoordinateMapper::build(key.viewport, key.window, &snapshot.stations, key.padding);
    let Some(mapper) = mapper else {
        debug!(
            "Viewport {}x{} not drawable yet",
            key.viewport.width, key.viewport.height
        );
        return Layout::default();
    };

    let stations = snapshot
        .stations
        .iter()
        .enumerate()
        .filter_map(|(index, station)| {
            mapper.station_y(index).map(|y| StationGridline {
                id: station.id.clone(),
                name: station.name.clone(),
                y,
            })
        })
        .collect();
    let paths = build_paths(snapshot.trips_for(key.direction), &mapper);

    debug!(
        "Rebuilt layout for revision {}: {} stations, {} paths",
        key.revision,
        snapshot.stations.len(),
        paths.len()
    );

    Layout {
        mapper: Some(mapper),
        stations: Arc::new(stations),
        paths: Arc::new(paths),
    }
}
