//! # Remote Store Contract
//!
//! Abstract interface over the relational store and the snapshot
//! table. The engine never talks to a wire protocol directly; every
//! backend (SQL service, HTTP API, in-memory test double) implements
//! this trait.
//!
//! All four child-collection families go through one generic
//! create/update/delete/list contract keyed by [`ChildFamily`], so a
//! single reconciler serves all of them.

use async_trait::async_trait;
use serde_json::Value;

use pageforge_content::{ChildFamily, ChildRecord, ContentDocument, Section, Snapshot};

use crate::error::StoreError;

/// Partial update for a section record's own (scalar) state.
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub is_visible: Option<bool>,
    pub data: Option<Value>,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Reachability probe. A `false` here is not an error; it routes
    /// reads and writes to the cache tier.
    async fn is_available(&self) -> bool;

    async fn get_all_sections(&self) -> Result<Vec<Section>, StoreError>;
    async fn create_section(&self, section: Section) -> Result<String, StoreError>;
    async fn update_section(&self, id: &str, patch: SectionPatch) -> Result<(), StoreError>;
    async fn delete_section(&self, id: &str) -> Result<(), StoreError>;

    async fn get_children(&self, family: ChildFamily) -> Result<Vec<ChildRecord>, StoreError>;
    /// Persist a new item; returns the generated identity.
    async fn create_child(
        &self,
        family: ChildFamily,
        record: &ChildRecord,
    ) -> Result<String, StoreError>;
    /// Wholesale re-write of all editable fields plus `sort_order`.
    async fn update_child(
        &self,
        family: ChildFamily,
        id: &str,
        record: &ChildRecord,
    ) -> Result<(), StoreError>;
    async fn delete_child(&self, family: ChildFamily, id: &str) -> Result<(), StoreError>;

    async fn get_contact_info(&self) -> Result<Option<Value>, StoreError>;
    async fn update_contact_info(&self, data: &Value) -> Result<(), StoreError>;

    async fn get_current_snapshot(&self) -> Result<Option<Snapshot>, StoreError>;
    async fn publish_snapshot(
        &self,
        content: &ContentDocument,
        published: bool,
    ) -> Result<Snapshot, StoreError>;

    /// Push a full document back down into section records, so later
    /// section-scoped edits see consistent relational state.
    async fn sync_document_to_sections(
        &self,
        document: &ContentDocument,
    ) -> Result<(), StoreError>;
}
