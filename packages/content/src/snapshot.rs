//! Full-document snapshot: an independent persisted copy used for fast
//! reads, publish and revert, separate from the per-section records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ContentDocument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub content: ContentDocument,
    pub is_published: bool,
    /// Monotonic per-store counter. Not consulted before writes
    /// (last writer wins); kept so an optimistic-locking policy can
    /// hang off it later.
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(content: ContentDocument, is_published: bool, version: u64) -> Self {
        Self {
            id: format!("snap-{version}"),
            content,
            is_published,
            version,
            created_at: Utc::now(),
        }
    }
}
