use anyhow::Context;
use axum::Router;
use std::str::FromStr;
use tracing::{info, warn, Level};

mod client;
mod models;
mod routes;
mod state;
mod utils;

use crate::state::app_state::AppState;
use crate::utils::conf_helper::{bind, load_config, ConfigSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // === CONFIG ===
    let (mut config, source) = load_config().await.context("CRITICAL INIT FAILURE")?;

    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    match &source {
        ConfigSource::File(path) => info!("Config loaded from {}", path.display()),
        ConfigSource::Defaults(path) => warn!("{} not found, using defaults", path.display()),
    }

    // === LISTENER ===
    let listener = bind(&mut config).await.context("Bind failed")?;

    info!(
        "Server initialized on {}:{}",
        config.connection.ip, config.connection.port
    );

    let state = AppState::new(config);

    if state.config.feed.enabled {
        let feed_state = state.clone();
        tokio::spawn(async move {
            crate::client::feed::start_polling(feed_state).await;
        });
    } else {
        warn!("Feed poller disabled; lines stay empty");
    }

    let app = Router::new()
        .merge(routes::info_routes::health_routes(state.clone()))
        .merge(routes::line_routes::line_routes(state.clone()))
        .merge(routes::chart_routes::chart_routes(state));

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
