//! Swappable history persistence behind a small trait.
//!
//! Two keys are persisted: the entry list and the last-analyzed URL.
//! `MemoryHistoryStore` keeps them in-process; `JsonFileHistoryStore` keeps
//! them as files in a directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::history::models::HistoryEntry;

pub const HISTORY_KEY: &str = "analysisHistory";
pub const LAST_ANALYZED_KEY: &str = "lastAnalyzedRepo";

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Every stored entry, in storage order.
    async fn get_all(&self) -> Result<Vec<HistoryEntry>>;

    /// Inserts `entry`, or replaces the entry with the same `repo_url` in place.
    async fn put(&self, entry: HistoryEntry) -> Result<()>;

    /// Removes the entry for `repo_url`. Returns whether one existed.
    async fn delete(&self, repo_url: &str) -> Result<bool>;

    async fn clear(&self) -> Result<()>;

    async fn last_analyzed(&self) -> Result<Option<String>>;

    async fn set_last_analyzed(&self, repo_url: &str) -> Result<()>;
}

fn upsert(entries: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    match entries.iter_mut().find(|e| e.repo_url == entry.repo_url) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

fn remove(entries: &mut Vec<HistoryEntry>, repo_url: &str) -> bool {
    let before = entries.len();
    entries.retain(|e| e.repo_url != repo_url);
    entries.len() != before
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryState {
    entries: Vec<HistoryEntry>,
    last_analyzed: Option<String>,
}

/// Process-local history. Lost on restart.
#[derive(Default)]
pub struct MemoryHistoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn get_all(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.state.read().await.entries.clone())
    }

    async fn put(&self, entry: HistoryEntry) -> Result<()> {
        upsert(&mut self.state.write().await.entries, entry);
        Ok(())
    }

    async fn delete(&self, repo_url: &str) -> Result<bool> {
        Ok(remove(&mut self.state.write().await.entries, repo_url))
    }

    async fn clear(&self) -> Result<()> {
        self.state.write().await.entries.clear();
        Ok(())
    }

    async fn last_analyzed(&self) -> Result<Option<String>> {
        Ok(self.state.read().await.last_analyzed.clone())
    }

    async fn set_last_analyzed(&self, repo_url: &str) -> Result<()> {
        self.state.write().await.last_analyzed = Some(repo_url.to_string());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// JSON file backend
// ────────────────────────────────────────────────────────────────────────────

/// History kept as `<dir>/analysisHistory.json` (a JSON array) and
/// `<dir>/lastAnalyzedRepo` (plain text).
///
/// Read-modify-write cycles are serialized by `write_lock`; files are replaced
/// via rename so a crash never leaves a half-written list.
pub struct JsonFileHistoryStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create history directory {}", dir.display()))?;
        info!("History store opened at {}", dir.display());
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join(format!("{HISTORY_KEY}.json"))
    }

    fn last_analyzed_path(&self) -> PathBuf {
        self.dir.join(LAST_ANALYZED_KEY)
    }

    async fn read_entries(&self) -> Result<Vec<HistoryEntry>> {
        let path = self.history_path();
        let Some(raw) = read_optional(&path).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("History file {} is not a valid entry list", path.display()))
    }

    async fn write_entries(&self, entries: &[HistoryEntry]) -> Result<()> {
        let body = serde_json::to_vec(entries).context("Failed to encode history")?;
        write_atomic(&self.history_path(), &body).await?;
        debug!("Wrote {} history entries", entries.len());
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

async fn write_atomic(path: &Path, body: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, body)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))
}

async fn remove_optional(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn get_all(&self) -> Result<Vec<HistoryEntry>> {
        self.read_entries().await
    }

    async fn put(&self, entry: HistoryEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        upsert(&mut entries, entry);
        self.write_entries(&entries).await
    }

    async fn delete(&self, repo_url: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if !remove(&mut entries, repo_url) {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        remove_optional(&self.history_path()).await
    }

    async fn last_analyzed(&self) -> Result<Option<String>> {
        Ok(read_optional(&self.last_analyzed_path())
            .await?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    async fn set_last_analyzed(&self, repo_url: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        write_atomic(&self.last_analyzed_path(), repo_url.as_bytes()).await
    }
}
