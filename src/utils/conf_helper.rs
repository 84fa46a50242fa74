use std::path::PathBuf;
use stringline::{Result, StringlineError};
use tokio::fs;
use tokio::net::TcpListener;
use tracing::info;

use crate::models::server_config::ServerConfig;

const DEFAULT_CONFIG_PATH: &str = "stringline.json";

#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file was absent; defaults are in effect.
    Defaults(PathBuf),
}

pub fn config_path() -> PathBuf {
    std::env::var("STRINGLINE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn parse_config(data: &str) -> Result<ServerConfig> {
    let config: ServerConfig = serde_json::from_str(data)?;
    if config.feed.poll_interval_secs == 0 {
        return Err(StringlineError::Config("feed.poll_interval_secs must be positive".into()));
    }
    if !(config.chart.lookback_secs > 0.0) {
        return Err(StringlineError::Config("chart.lookback_secs must be positive".into()));
    }
    Ok(config)
}

/// `USE_MOCK_DATA=true` forces the mock feed; `DISABLE_POLLER=true` turns
/// the feed task off.
pub fn apply_env_overrides(config: &mut ServerConfig, lookup: impl Fn(&str) -> Option<String>) {
    let flag = |name: &str| lookup(name).is_some_and(|v| v.eq_ignore_ascii_case("true"));
    if flag("USE_MOCK_DATA") {
        config.feed.use_mock_data = true;
    }
    if flag("DISABLE_POLLER") {
        config.feed.enabled = false;
    }
}

pub async fn load_config() -> Result<(ServerConfig, ConfigSource)> {
    let path = config_path();

    let (mut config, source) = match fs::read_to_string(&path).await {
        Ok(data) => (parse_config(&data)?, ConfigSource::File(path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (ServerConfig::default(), ConfigSource::Defaults(path))
        }
        Err(e) => return Err(e.into()),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok((config, source))
}

/// Binds the listener and records the port actually obtained.
pub async fn bind(config: &mut ServerConfig) -> Result<TcpListener> {
    let bind_addr = format!("{}:{}", config.connection.ip, config.connection.port);

    let listener = TcpListener::bind(&bind_addr).await?;
    let actual_port = listener.local_addr()?.port();
    config.connection.port = actual_port;

    info!("Listener bound on {}:{}", config.connection.ip, actual_port);
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"connection": {"port": 0}, "feed": {"lines": ["Q"]}}"#;
        let config = parse_config(json).unwrap();
        assert_eq!(config.connection.port, 0);
        assert_eq!(config.connection.ip, "127.0.0.1");
        assert_eq!(config.feed.lines, vec!["Q".to_string()]);
        assert_eq!(config.feed.poll_interval_secs, 5);
        assert_eq!(config.chart.lookback_secs, 3600.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            parse_config(r#"{"feed": {"poll_interval_secs": 0}}"#),
            Err(StringlineError::Config(_))
        ));
        assert!(matches!(
            parse_config(r#"{"chart": {"lookback_secs": -1}}"#),
            Err(StringlineError::Config(_))
        ));
        assert!(matches!(parse_config("{not json"), Err(StringlineError::Json(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        apply_env_overrides(&mut config, |name| match name {
            "USE_MOCK_DATA" => Some("TRUE".to_string()),
            "DISABLE_POLLER" => Some("false".to_string()),
            _ => None,
        });
        assert!(config.feed.use_mock_data);
        assert!(config.feed.enabled);
    }

    #[tokio::test]
    async fn test_bind_patches_port() {
        let mut config = ServerConfig::default();
        config.connection.port = 0;
        let listener = bind(&mut config).await.unwrap();
        assert_ne!(config.connection.port, 0);
        assert_eq!(listener.local_addr().unwrap().port(), config.connection.port);
    }
}
