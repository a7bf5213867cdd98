//! # Pageforge Editor
//!
//! Editing engine for the content subsystem: the in-memory document,
//! its lifecycle, and save/publish orchestration.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: session + state + publish           │
//! │  - EditSession (auth-scoped ownership)      │
//! │  - EditorStateStore (mutations, dirtiness)  │
//! │  - PublishCoordinator (save orchestration)  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: reconciliation + tiered persistence  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ content: documents, defaults, migration     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The session owns the document**: constructed at login,
//!    discarded at logout; no ambient state
//! 2. **Immutable replace**: every mutation produces a new document
//!    value; captured references stay valid snapshots
//! 3. **One outcome per action**: every save/publish/delete terminates
//!    in exactly one user-facing notification
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pageforge_editor::EditSession;
//! use pageforge_store::{MemoryCache, MemoryRemote};
//!
//! let mut session = EditSession::open(
//!     Arc::new(MemoryRemote::new()),
//!     Arc::new(MemoryCache::new()),
//! ).await;
//!
//! session.update_section("hero.title", "Hello".into());
//! let outcome = session.publish().await;
//! assert!(outcome.is_success());
//! ```

mod errors;
mod publish;
mod session;
mod state;

pub use errors::EditorError;
pub use publish::{parse_document, Outcome, OutcomeKind, PublishCoordinator};
pub use session::{AuthState, EditSession};
pub use state::{DocumentPhase, EditorStateStore};

// Re-export common types for convenience
pub use pageforge_content::{ContentDocument, SectionKind};
pub use pageforge_store::{LoadSource, PublishTier};
