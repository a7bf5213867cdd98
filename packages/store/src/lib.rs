//! # Pageforge Store
//!
//! Tiered persistence for the content-editing engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: sessions + publish orchestration    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: tiered persistence                   │
//! │  - RemoteStore contract (async)             │
//! │  - CollectionReconciler (diff pass)         │
//! │  - CacheStore (memory / file)               │
//! │  - TieredPersistenceGateway                 │
//! │      remote → cache → compiled defaults     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Reads never fail**: the defaults tier always answers
//! 2. **Writes are layered**: remote first, cache always, success if
//!    either landed
//! 3. **Reconciliation is best-effort**: one failed operation never
//!    aborts a pass; the post-pass re-fetch self-heals

mod cache;
mod error;
mod gateway;
mod memory;
mod reconcile;
mod remote;

pub use cache::{CacheStore, FileCache, HistoryEntry, MemoryCache};
pub use error::StoreError;
pub use gateway::{
    EditMode, LoadSource, LoadedDocument, PublishReceipt, PublishTier, TieredPersistenceGateway,
};
pub use memory::{MemoryRemote, RemoteOp};
pub use reconcile::{reconcile, reconcile_tree, ReconcileReport, TreeItem};
pub use remote::{RemoteStore, SectionPatch};
