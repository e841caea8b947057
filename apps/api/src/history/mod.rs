//! Analysis history as seen by the handlers.
//!
//! Wraps a `HistoryStore`: stamps entries, sorts newest first, and turns
//! storage failures on read into an empty list instead of an error.

pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::history::models::HistoryEntry;
use crate::history::store::HistoryStore;

#[derive(Clone)]
pub struct History {
    store: Arc<dyn HistoryStore>,
}

impl History {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// All entries, newest first. Unreadable storage yields an empty list.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let mut entries = match self.store.get_all().await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error loading history: {e:#}");
                Vec::new()
            }
        };
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub async fn get(&self, repo_url: &str) -> Option<HistoryEntry> {
        self.list().await.into_iter().find(|e| e.repo_url == repo_url)
    }

    /// Stores `analysis` for `repo_url`, replacing any previous entry.
    pub async fn record(
        &self,
        repo_url: &str,
        analysis: AnalysisResult,
    ) -> Result<HistoryEntry, AppError> {
        let entry = HistoryEntry {
            analysis,
            repo_url: repo_url.to_string(),
            timestamp: Utc::now(),
        };
        self.store
            .put(entry.clone())
            .await
            .map_err(|e| AppError::Storage(format!("{e:#}")))?;
        info!("Recorded analysis history for {repo_url}");
        Ok(entry)
    }

    pub async fn delete(&self, repo_url: &str) -> Result<bool, AppError> {
        self.store
            .delete(repo_url)
            .await
            .map_err(|e| AppError::Storage(format!("{e:#}")))
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        self.store
            .clear()
            .await
            .map_err(|e| AppError::Storage(format!("{e:#}")))?;
        info!("Cleared analysis history");
        Ok(())
    }

    pub async fn remember_last(&self, repo_url: &str) -> Result<(), AppError> {
        self.store
            .set_last_analyzed(repo_url)
            .await
            .map_err(|e| AppError::Storage(format!("{e:#}")))
    }

    /// Last submitted URL. Unreadable storage yields `None`.
    pub async fn last(&self) -> Option<String> {
        self.store.last_analyzed().await.unwrap_or_else(|e| {
            error!("Error loading last analyzed repository: {e:#}");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::store::{JsonFileHistoryStore, MemoryHistoryStore};
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn memory_history() -> History {
        History::new(Arc::new(MemoryHistoryStore::new()))
    }

    #[tokio::test]
    async fn test_list_is_sorted_newest_first() {
        let store = Arc::new(MemoryHistoryStore::new());
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for (repo, offset) in [("old", 0), ("newest", 48), ("middle", 24)] {
            store
                .put(HistoryEntry {
                    analysis: AnalysisResult::fallback(),
                    repo_url: format!("https://github.com/octo/{repo}"),
                    timestamp: base + Duration::hours(offset),
                })
                .await
                .unwrap();
        }

        let urls: Vec<String> = History::new(store)
            .list()
            .await
            .into_iter()
            .map(|e| e.repo_url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://github.com/octo/newest",
                "https://github.com/octo/middle",
                "https://github.com/octo/old",
            ]
        );
    }

    #[tokio::test]
    async fn test_record_twice_keeps_one_entry_with_latest_result() {
        let history = memory_history();
        let url = "https://github.com/octo/repo";

        let first = history.record(url, AnalysisResult::fallback()).await.unwrap();
        let mut second_result = AnalysisResult::fallback();
        second_result.summary = "Re-analyzed".to_string();
        let second = history.record(url, second_result).await.unwrap();

        let all = history.list().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].analysis.summary, "Re-analyzed");
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn test_round_trip_through_file_store() {
        let dir = TempDir::new().unwrap();
        let history = History::new(Arc::new(
            JsonFileHistoryStore::open(dir.path()).await.unwrap(),
        ));
        history
            .record("https://github.com/octo/a", AnalysisResult::fallback())
            .await
            .unwrap();
        history
            .record("https://github.com/octo/b", AnalysisResult::fallback())
            .await
            .unwrap();
        let saved = history.list().await;

        let reloaded = History::new(Arc::new(
            JsonFileHistoryStore::open(dir.path()).await.unwrap(),
        ))
        .list()
        .await;
        assert_eq!(reloaded, saved);
        assert!(reloaded[0].timestamp >= reloaded[1].timestamp);
    }

    #[tokio::test]
    async fn test_corrupt_storage_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("analysisHistory.json"), "garbage").unwrap();
        let history = History::new(Arc::new(
            JsonFileHistoryStore::open(dir.path()).await.unwrap(),
        ));
        assert!(history.list().await.is_empty());
        assert!(history.get("https://github.com/octo/a").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_and_last() {
        let history = memory_history();
        assert_eq!(history.last().await, None);

        history.remember_last("https://github.com/octo/a").await.unwrap();
        history
            .record("https://github.com/octo/a", AnalysisResult::fallback())
            .await
            .unwrap();
        assert_eq!(history.last().await.as_deref(), Some("https://github.com/octo/a"));

        assert!(history.delete("https://github.com/octo/a").await.unwrap());
        assert!(history.list().await.is_empty());
    }
}
