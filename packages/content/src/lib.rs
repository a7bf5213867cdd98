//! # Pageforge Content
//!
//! Data model for the content-editing engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ content: documents + normalization          │
//! │  - ContentDocument (path-addressed JSON)    │
//! │  - Section records + alias canonicalization │
//! │  - Compiled baseline defaults               │
//! │  - Migration (idempotent completion)        │
//! │  - Unification (sections → one document)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: remote contract + tiered persistence │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The document is source of truth**: sections and snapshots are
//!    alternate persisted projections of it
//! 2. **Migration is idempotent**: completing a complete document is a no-op
//! 3. **Nothing is silently dropped**: unknown section fields land in an
//!    `extra` bag, unknown section types pass through under their own key

mod child;
mod defaults;
mod document;
mod migrate;
mod section;
mod snapshot;
mod unify;

pub use child::{records_from_array, ChildCollections, ChildFamily, ChildRecord};
pub use defaults::{baseline_document, product_catalog, LABEL_FLAGS};
pub use document::{ContentDocument, SectionKind};
pub use migrate::complete;
pub use section::{canonicalize, Section};
pub use snapshot::Snapshot;
pub use unify::build_unified;
