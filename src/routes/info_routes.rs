use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::state::app_state::AppState;

pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(info_check))
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthStatus {
    status: String,
    lines_loaded: usize,
    charts: usize,
}

async fn health_check(State(state): State<AppState>) -> Response {
    let lines_loaded = state.snapshots.read().await.len();
    let charts = state.charts.read().await.len();

    Json(HealthStatus {
        status: "ok".to_owned(),
        lines_loaded,
        charts,
    })
    .into_response()
}

async fn info_check(State(state): State<AppState>) -> Response {
    debug!("{} info requested", state.config.name);
    Json(state.config.as_ref()).into_response()
}
