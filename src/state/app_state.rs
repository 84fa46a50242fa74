use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use stringline::{Result, Snapshot, StringlineChart, StringlineError};

use crate::models::server_config::ServerConfig;

#[derive(Clone)]
pub struct ChartEntry {
    pub line: String,
    pub chart: Arc<Mutex<StringlineChart>>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    // line -> latest snapshot, swapped wholesale by the feed
    pub snapshots: Arc<RwLock<HashMap<String, Arc<Snapshot>>>>,
    pub charts: Arc<RwLock<HashMap<Uuid, ChartEntry>>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            snapshots: Arc::new(RwLock::new(HashMap::new())),
            charts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn is_known_line(&self, line: &str) -> bool {
        self.config.feed.lines.iter().any(|l| l == line)
    }

    pub async fn publish(&self, line: &str, snapshot: Snapshot) {
        self.snapshots
            .write()
            .await
            .insert(line.to_owned(), Arc::new(snapshot));
    }

    /// Latest snapshot for `line`, or an empty one while the first fetch
    /// is still pending.
    pub async fn snapshot_for(&self, line: &str) -> Result<Arc<Snapshot>> {
        if !self.is_known_line(line) {
            return Err(StringlineError::UnknownLine(line.to_owned()));
        }
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(line).cloned().unwrap_or_default())
    }

    pub async fn insert_chart(&self, line: &str, chart: StringlineChart) -> Uuid {
        let id = Uuid::new_v4();
        let entry = ChartEntry {
            line: line.to_owned(),
            chart: Arc::new(Mutex::new(chart)),
        };
        self.charts.write().await.insert(id, entry);
        id
    }

    pub async fn chart(&self, id: Uuid) -> Result<ChartEntry> {
        self.charts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StringlineError::ChartNotFound(id))
    }

    pub async fn remove_chart(&self, id: Uuid) -> Result<()> {
        self.charts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StringlineError::ChartNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringline::ChartOptions;

    #[tokio::test]
    async fn test_snapshot_lookup() {
        let state = AppState::new(ServerConfig::default());
        assert!(matches!(state.snapshot_for("X").await, Err(StringlineError::UnknownLine(_))));
        assert_eq!(state.snapshot_for("Q").await.unwrap().revision, 0);

        state.publish("Q", Snapshot::new(3, 10.0, vec![], vec![])).await;
        assert_eq!(state.snapshot_for("Q").await.unwrap().revision, 3);
    }

    #[tokio::test]
    async fn test_chart_registry() {
        let state = AppState::new(ServerConfig::default());
        let id = state.insert_chart("Q", StringlineChart::new(ChartOptions::default())).await;
        assert_eq!(state.chart(id).await.unwrap().line, "Q");
        state.remove_chart(id).await.unwrap();
        assert!(matches!(state.chart(id).await, Err(StringlineError::ChartNotFound(_))));
        assert!(state.remove_chart(id).await.is_err());
    }
}
