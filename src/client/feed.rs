use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::Client;
use stringline::core::constants::FEED_REQUEST_TIMEOUT_SECS;
use stringline::core::mock::mock_snapshot;
use stringline::{Result, Snapshot, Station, Trip};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::models::server_config::FeedConfig;
use crate::state::app_state::AppState;

pub fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// HTTP client for the upstream station/trip endpoints.
pub struct FeedClient {
    http: Client,
    base_url: String,
}

impl FeedClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(FEED_REQUEST_TIMEOUT_SECS))
    }

    /// A stalled upstream fails the request after `timeout` instead of
    /// holding up the poll loop.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn stations_url(&self) -> String {
        format!("{}/api/stations", self.base_url)
    }

    pub fn history_url(&self) -> String {
        format!("{}/api/history", self.base_url)
    }

    pub async fn fetch_stations(&self, line: &str) -> Result<Vec<Station>> {
        let stations = self
            .http
            .get(self.stations_url())
            .query(&[("line", line)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(stations)
    }

    pub async fn fetch_trips(&self, line: &str) -> Result<Vec<Trip>> {
        let trips = self
            .http
            .get(self.history_url())
            .query(&[("line", line)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(trips)
    }
}

enum Source {
    Upstream(FeedClient),
    Mock(StdRng),
}

/// Combines one refresh with the previous snapshot: a half that failed to
/// fetch keeps its previous value. Returns `None` when nothing was fetched.
pub fn merge_refresh(
    previous: &Snapshot,
    revision: u64,
    generated_at: f64,
    stations: Option<Vec<Station>>,
    trips: Option<Vec<Trip>>,
) -> Option<Snapshot> {
    if stations.is_none() && trips.is_none() {
        return None;
    }
    Some(Snapshot::new(
        revision,
        generated_at,
        stations.unwrap_or_else(|| previous.stations.clone()),
        trips.unwrap_or_else(|| previous.trips.clone()),
    ))
}

async fn refresh_line(
    source: &mut Source,
    state: &AppState,
    line: &str,
    revision: u64,
) -> bool {
    let now = now_secs();
    let snapshot = match source {
        Source::Mock(rng) => Some(mock_snapshot(revision, now, line, rng)),
        Source::Upstream(client) => {
            let stations = client
                .fetch_stations(line)
                .await
                .map_err(|e| error!("Station fetch failed for line {}: {}", line, e))
                .ok();
            let trips = client
                .fetch_trips(line)
                .await
                .map_err(|e| error!("Trip fetch failed for line {}: {}", line, e))
                .ok();
            let previous = state.snapshot_for(line).await.unwrap_or_default();
            merge_refresh(&previous, revision, now, stations, trips)
        }
    };

    match snapshot {
        Some(snapshot) => {
            debug!(
                "Line {} revision {}: {} stations, {} trips",
                line,
                revision,
                snapshot.stations.len(),
                snapshot.trips.len()
            );
            state.publish(line, snapshot).await;
            true
        }
        None => {
            warn!("Line {} kept its previous snapshot", line);
            false
        }
    }
}

pub async fn start_polling(state: AppState) {
    let feed: FeedConfig = state.config.feed.clone();

    let mut source = if feed.use_mock_data {
        Source::Mock(StdRng::from_entropy())
    } else {
        match FeedClient::new(&feed.base_url) {
            Ok(client) => Source::Upstream(client),
            Err(e) => {
                error!("Feed client init failed, poller not started: {}", e);
                return;
            }
        }
    };

    info!(
        "Feed worker started for lines {:?} every {}s (mock: {})",
        feed.lines, feed.poll_interval_secs, feed.use_mock_data
    );

    let mut ticker = interval(Duration::from_secs(feed.poll_interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut revision: u64 = 0;

    loop {
        ticker.tick().await;
        for line in &feed.lines {
            if refresh_line(&mut source, &state, line, revision + 1).await {
                revision += 1;
            }
        }
    }
}
