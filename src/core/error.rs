// Error handling for the stringline crate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StringlineError>;

#[derive(Error, Debug)]
pub enum StringlineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Line not found: {0}")]
    UnknownLine(String),

    #[error("Chart not found: {0}")]
    ChartNotFound(uuid::Uuid),

    #[error("Invalid direction id: {0}")]
    InvalidDirection(u8),
}
