use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stringline::{DirectionId, Trip};

use crate::routes::error_response;
use crate::state::app_state::AppState;

#[derive(Serialize)]
pub struct LineSummary {
    pub line: String,
    pub revision: u64,
    pub stations: usize,
    pub trips: usize,
    pub last_updated: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct TripQuery {
    pub direction: Option<DirectionId>,
}

pub fn line_routes(state: AppState) -> Router {
    Router::new()
        .route("/lines", get(list_lines))
        .route("/lines/{line}/stations", get(line_stations))
        .route("/lines/{line}/trips", get(line_trips))
        .with_state(state)
}

async fn list_lines(State(state): State<AppState>) -> Response {
    let snapshots = state.snapshots.read().await;

    let out: Vec<LineSummary> = state
        .config
        .feed
        .lines
        .iter()
        .map(|line| match snapshots.get(line) {
            Some(snapshot) => LineSummary {
                line: line.clone(),
                revision: snapshot.revision,
                stations: snapshot.stations.len(),
                trips: snapshot.trips.len(),
                last_updated: snapshot.last_updated(),
            },
            None => LineSummary {
                line: line.clone(),
                revision: 0,
                stations: 0,
                trips: 0,
                last_updated: None,
            },
        })
        .collect();

    Json(out).into_response()
}

async fn line_stations(State(state): State<AppState>, Path(line): Path<String>) -> Response {
    match state.snapshot_for(&line).await {
        Ok(snapshot) => Json(&snapshot.stations).into_response(),
        Err(e) => error_response(e),
    }
}

async fn line_trips(
    State(state): State<AppState>,
    Path(line): Path<String>,
    Query(query): Query<TripQuery>,
) -> Response {
    match state.snapshot_for(&line).await {
        Ok(snapshot) => {
            let trips: Vec<&Trip> = snapshot.trips_for(query.direction).collect();
            Json(trips).into_response()
        }
        Err(e) => error_response(e),
    }
}
