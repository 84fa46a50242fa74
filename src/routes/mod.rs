pub mod chart_routes;
pub mod info_routes;
pub mod line_routes;
pub mod scrub_socket;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use stringline::StringlineError;
use tracing::error;

pub fn error_response(err: StringlineError) -> Response {
    let status = match &err {
        StringlineError::UnknownLine(_) | StringlineError::ChartNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        StringlineError::InvalidDirection(_) | StringlineError::Config(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!("{}", err);
    (status, err.to_string()).into_response()
}
