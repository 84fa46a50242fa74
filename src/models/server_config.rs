use serde::{Deserialize, Serialize};
use stringline::core::clock::utc_offset;
use stringline::core::constants::{
    DEFAULT_LOOKBACK_SECS, DEFAULT_PADDING_BOTTOM, DEFAULT_PADDING_TOP, DEFAULT_POLL_INTERVAL_SECS,
};
use stringline::{ChartOptions, DirectionId, Padding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub connection: Connection,
    pub feed: FeedConfig,
    pub chart: ChartConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "stringline".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            log_level: "info".to_owned(),
            connection: Connection::default(),
            feed: FeedConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub ip: String,
    /// 0 picks a free port at bind time.
    pub port: u16,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Upstream serving `/api/stations` and `/api/history`.
    pub base_url: String,
    pub lines: Vec<String>,
    pub poll_interval_secs: u64,
    pub use_mock_data: bool,
    pub enabled: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_owned(),
            lines: ["N", "Q", "R", "W"].iter().map(|l| l.to_string()).collect(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            use_mock_data: false,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub lookback_secs: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub show_headways: bool,
    pub utc_offset_minutes: i32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            lookback_secs: DEFAULT_LOOKBACK_SECS,
            padding_top: DEFAULT_PADDING_TOP,
            padding_bottom: DEFAULT_PADDING_BOTTOM,
            show_headways: false,
            utc_offset_minutes: 0,
        }
    }
}

impl ChartConfig {
    pub fn chart_options(
        &self,
        direction: Option<DirectionId>,
        show_headways: Option<bool>,
    ) -> ChartOptions {
        ChartOptions {
            lookback_secs: self.lookback_secs,
            padding: Padding {
                top: self.padding_top,
                bottom: self.padding_bottom,
            },
            show_headways: show_headways.unwrap_or(self.show_headways),
            direction,
            utc_offset: utc_offset(self.utc_offset_minutes),
        }
    }
}
