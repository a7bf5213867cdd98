//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    /// Malformed document text on a whole-document edit or import.
    /// Blocks the save entirely; no partial write happens.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] pageforge_store::StoreError),

    /// The addressed section or item does not exist in the document.
    #[error("invalid edit target: {0}")]
    InvalidTarget(String),
}
