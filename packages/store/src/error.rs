//! Error types for the persistence tiers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Remote probe failed. Silently demotes reads and writes to the
    /// cache tier; only an error when that tier fails too.
    #[error("remote store unavailable")]
    RemoteUnavailable,

    /// One remote create/update/delete failed. Logged by the caller;
    /// never halts the remaining operations of a reconciliation pass.
    #[error("remote operation failed: {0}")]
    RemoteOperation(String),

    #[error("cache write failed: {0}")]
    CacheWrite(String),

    #[error("cache read failed: {0}")]
    CacheRead(String),

    /// Both the remote and the cache tier failed for one write.
    #[error("all persistence tiers failed: {0}")]
    AllTiersFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
