use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stringline::{DirectionId, PointerEvent, StringlineChart, StringlineError, SurfaceRect};
use tracing::{debug, info};
use uuid::Uuid;

use crate::routes::error_response;
use crate::routes::scrub_socket::handle_scrub_socket;
use crate::state::app_state::AppState;

#[derive(Deserialize, Debug)]
pub struct CreateChartRequest {
    pub line: String,
    #[serde(default)]
    pub direction: Option<DirectionId>,
    #[serde(default)]
    pub left: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub show_headways: Option<bool>,
}

#[derive(Serialize, Debug)]
pub struct CreateChartResponse {
    pub id: Uuid,
    pub line: String,
}

/// Replaces direction and overlay; `direction: null` shows every
/// direction. `lookback_secs` is optional and must be positive.
#[derive(Deserialize, Debug)]
pub struct ChartSettings {
    #[serde(default)]
    pub direction: Option<DirectionId>,
    pub show_headways: bool,
    #[serde(default)]
    pub lookback_secs: Option<f64>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct AppliedSettings {
    pub direction: Option<DirectionId>,
    pub show_headways: bool,
    pub lookback_secs: f64,
}

/// Applies `settings` and reports what the chart now uses.
pub fn apply_settings(
    chart: &mut StringlineChart,
    settings: &ChartSettings,
) -> Result<AppliedSettings, StringlineError> {
    if let Some(lookback) = settings.lookback_secs {
        if !chart.set_lookback(lookback) {
            return Err(StringlineError::Config(format!(
                "lookback_secs must be positive, got {lookback}"
            )));
        }
    }
    chart.set_direction(settings.direction);
    chart.set_show_headways(settings.show_headways);

    let options = chart.options();
    Ok(AppliedSettings {
        direction: options.direction,
        show_headways: options.show_headways,
        lookback_secs: options.lookback_secs,
    })
}

/// =======================
/// ROUTER
/// =======================

pub fn chart_routes(state: AppState) -> Router {
    Router::new()
        .route("/charts", post(create_chart))
        .route("/charts/{id}", axum::routing::delete(delete_chart))
        .route("/charts/{id}/frame", get(chart_frame))
        .route("/charts/{id}/viewport", put(resize_chart))
        .route("/charts/{id}/settings", put(update_settings))
        .route("/charts/{id}/pointer", post(pointer_event))
        .route("/charts/{id}/scrub", get(scrub_socket))
        .with_state(state)
}

/// =======================
/// HANDLERS
/// =======================

async fn create_chart(
    State(state): State<AppState>,
    Json(request): Json<CreateChartRequest>,
) -> Response {
    if !state.is_known_line(&request.line) {
        return error_response(StringlineError::UnknownLine(request.line));
    }

    let options = state
        .config
        .chart
        .chart_options(request.direction, request.show_headways);
    let mut chart = StringlineChart::new(options);
    chart.resize(SurfaceRect {
        left: request.left,
        width: request.width,
        height: request.height,
    });

    let id = state.insert_chart(&request.line, chart).await;
    info!("Chart {} created for line {}", id, request.line);

    (
        StatusCode::CREATED,
        Json(CreateChartResponse {
            id,
            line: request.line,
        }),
    )
        .into_response()
}

async fn delete_chart(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.remove_chart(id).await {
        Ok(()) => {
            info!("Chart {} removed", id);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn chart_frame(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let entry = match state.chart(id).await {
        Ok(entry) => entry,
        Err(e) => return error_response(e),
    };
    let snapshot = match state.snapshot_for(&entry.line).await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(e),
    };

    let frame = {
        let mut chart = entry.chart.lock().await;
        if chart.snapshot().revision != snapshot.revision {
            debug!("Chart {} moves to revision {}", id, snapshot.revision);
            chart.set_snapshot(snapshot);
        }
        chart.frame()
    };

    Json(frame).into_response()
}

async fn resize_chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(rect): Json<SurfaceRect>,
) -> Response {
    match state.chart(id).await {
        Ok(entry) => {
            entry.chart.lock().await.resize(rect);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(settings): Json<ChartSettings>,
) -> Response {
    match state.chart(id).await {
        Ok(entry) => {
            let mut chart = entry.chart.lock().await;
            match apply_settings(&mut chart, &settings) {
                Ok(applied) => {
                    debug!("Chart {} settings: {:?}", id, applied);
                    Json(applied).into_response()
                }
                Err(e) => error_response(e),
            }
        }
        Err(e) => error_response(e),
    }
}

async fn pointer_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<PointerEvent>,
) -> Response {
    match state.chart(id).await {
        Ok(entry) => {
            let readout = entry.chart.lock().await.handle_pointer(&event);
            Json(readout).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn scrub_socket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Response {
    let entry = match state.chart(id).await {
        Ok(entry) => entry,
        Err(e) => return error_response(e),
    };

    // chart is locked per event inside the socket handler
    ws.on_upgrade(move |socket| handle_scrub_socket(socket, entry.chart, id))
}
