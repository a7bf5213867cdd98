//! # Local Cache Tier
//!
//! One keyed slot holding the serialized current document plus a
//! history list of prior snapshot entries. Read only when the remote
//! store is unreachable; written after every publish regardless of the
//! remote outcome.
//!
//! Cache writes are best-effort: a failure here is logged by the
//! caller and never aborts an otherwise successful save.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use pageforge_content::ContentDocument;

use crate::error::StoreError;

/// One historical publish, as kept in the cache tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub version: u64,
    pub content: ContentDocument,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self) -> Result<Option<ContentDocument>, StoreError>;
    async fn store(&self, document: &ContentDocument) -> Result<(), StoreError>;
    async fn push_history(&self, entry: HistoryEntry) -> Result<(), StoreError>;
    async fn history(&self) -> Result<Vec<HistoryEntry>, StoreError>;
    /// Drop the slot and the history list (reset / import).
    async fn clear(&self) -> Result<(), StoreError>;
}

/// In-process cache, used in tests and as a session-scoped fallback.
#[derive(Default)]
pub struct MemoryCache {
    slot: Mutex<Option<ContentDocument>>,
    history: Mutex<Vec<HistoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn load(&self) -> Result<Option<ContentDocument>, StoreError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn store(&self, document: &ContentDocument) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = Some(document.clone());
        Ok(())
    }

    async fn push_history(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        self.history.lock().unwrap().push(entry);
        Ok(())
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = None;
        self.history.lock().unwrap().clear();
        Ok(())
    }
}

/// Disk-backed cache: `document.json` for the slot, `history.json` for
/// the list, under one directory.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self) -> PathBuf {
        self.dir.join("document.json")
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join("history.json")
    }

    fn read_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::CacheRead(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::CacheRead(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for FileCache {
    async fn load(&self) -> Result<Option<ContentDocument>, StoreError> {
        let path = self.slot_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::CacheRead(e.to_string()))?;
        let doc = serde_json::from_str(&raw).map_err(|e| StoreError::CacheRead(e.to_string()))?;
        Ok(Some(doc))
    }

    async fn store(&self, document: &ContentDocument) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::CacheWrite(e.to_string()))?;
        let raw = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::CacheWrite(e.to_string()))?;
        std::fs::write(self.slot_path(), raw).map_err(|e| StoreError::CacheWrite(e.to_string()))
    }

    async fn push_history(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::CacheWrite(e.to_string()))?;
        let mut entries = self.read_history()?;
        entries.push(entry);
        let raw = serde_json::to_string(&entries)
            .map_err(|e| StoreError::CacheWrite(e.to_string()))?;
        std::fs::write(self.history_path(), raw)
            .map_err(|e| StoreError::CacheWrite(e.to_string()))
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.read_history()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        for path in [self.slot_path(), self.history_path()] {
            if path.exists() {
                std::fs::remove_file(&path)
                    .map_err(|e| StoreError::CacheWrite(e.to_string()))?;
            }
        }
        Ok(())
    }
}
