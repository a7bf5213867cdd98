//! # Edit Session
//!
//! One authenticated admin's editing session. The session owns the
//! editor state store for its lifetime; logout or reset discards the
//! document. Authorization is enforced by an external guard — the
//! session consumes auth only as a yes/no capability and performs no
//! checks of its own.

use std::sync::Arc;

use serde_json::Value;

use pageforge_content::{ContentDocument, SectionKind};
use pageforge_store::{CacheStore, LoadSource, LoadedDocument, RemoteStore, TieredPersistenceGateway};

use crate::errors::EditorError;
use crate::publish::{parse_document, Outcome, OutcomeKind, PublishCoordinator};
use crate::state::EditorStateStore;

/// Auth collaborator: login/logout plus two capability booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthState {
    authenticated: bool,
    admin: bool,
}

impl AuthState {
    pub fn login(admin: bool) -> Self {
        Self {
            authenticated: true,
            admin,
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.admin = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// One editing session over a tiered gateway.
pub struct EditSession {
    store: EditorStateStore,
    coordinator: PublishCoordinator,
}

impl EditSession {
    /// Open a session: probe the tiers, load, migrate, seed the store.
    pub async fn open(remote: Arc<dyn RemoteStore>, cache: Arc<dyn CacheStore>) -> Self {
        let gateway = TieredPersistenceGateway::new(remote, cache);
        let mut store = EditorStateStore::unloaded();
        store.begin_loading();
        let loaded = gateway.read().await;
        store.finish_load(loaded);
        Self {
            store,
            coordinator: PublishCoordinator::new(gateway),
        }
    }

    pub fn document(&self) -> &ContentDocument {
        self.store.document()
    }

    pub fn store(&self) -> &EditorStateStore {
        &self.store
    }

    pub fn update_section(&mut self, path: &str, value: Value) {
        self.store.update_section(path, value);
    }

    pub fn update_nested_field(
        &mut self,
        section_path: &str,
        index: Option<usize>,
        field: &str,
        value: Value,
    ) -> Result<(), EditorError> {
        self.store
            .update_nested_field(section_path, index, field, value)
    }

    /// Publish the live document (whole-document mode).
    pub async fn publish(&mut self) -> Outcome {
        self.coordinator.publish_current(&mut self.store).await
    }

    /// Whole-document save from raw edited text.
    pub async fn save_document(&mut self, raw: &str) -> Outcome {
        self.coordinator.save_document(&mut self.store, raw).await
    }

    /// Section-scoped save for the active section.
    pub async fn save_section(&mut self, kind: SectionKind) -> Outcome {
        self.coordinator.save_section(&mut self.store, kind).await
    }

    pub async fn delete_section(&mut self, kind: SectionKind) -> Outcome {
        self.coordinator.delete_section(&mut self.store, kind).await
    }

    /// Serialize the document for download.
    pub fn export(&self) -> String {
        self.store.document().to_pretty()
    }

    /// Restore from uploaded text. Fully replaces the in-memory
    /// document and the cache tier; treated as a fresh load, not a
    /// reconciliation. A parse failure blocks the import entirely.
    pub async fn import(&mut self, raw: &str) -> Outcome {
        let document = match parse_document(raw) {
            Ok(document) => document,
            Err(e) => {
                return Outcome {
                    kind: OutcomeKind::Error,
                    message: format!("import rejected: {e}"),
                    tier: None,
                }
            }
        };

        let gateway = self.coordinator.gateway();
        gateway.clear_cache().await;
        gateway.write_cache(&document).await;
        self.store.finish_load(LoadedDocument {
            document,
            source: LoadSource::Cache,
        });

        Outcome {
            kind: OutcomeKind::Info,
            message: "document imported".to_string(),
            tier: None,
        }
    }

    /// Back to compiled defaults; the cache tier is cleared.
    pub async fn reset(&mut self) -> Outcome {
        self.coordinator.gateway().clear_cache().await;
        self.store.reset_to_defaults();
        Outcome {
            kind: OutcomeKind::Info,
            message: "content reset to defaults".to_string(),
            tier: None,
        }
    }

    /// End the session: the document is discarded with it.
    pub fn logout(self, auth: &mut AuthState) {
        auth.logout();
        // `self` drops here, taking the in-memory document with it.
    }
}
