//! # In-Memory Remote Store
//!
//! Backend used by tests and demos: the full [`RemoteStore`] contract
//! over in-process tables, with an availability toggle, failure
//! injection and an operation log so reconciliation passes can be
//! asserted operation by operation.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use pageforge_content::{
    records_from_array, ChildFamily, ChildRecord, ContentDocument, Section, SectionKind, Snapshot,
};

use crate::error::StoreError;
use crate::remote::{RemoteStore, SectionPatch};

/// One observed remote operation, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOp {
    CreatedSection { section_type: String, id: String },
    UpdatedSection { id: String },
    DeletedSection { id: String },
    CreatedChild { family: ChildFamily, id: String, sort_order: i64 },
    UpdatedChild { family: ChildFamily, id: String, sort_order: i64 },
    DeletedChild { family: ChildFamily, id: String },
    FetchedSections,
    PublishedSnapshot { published: bool },
    SyncedSections,
}

#[derive(Default)]
struct Inner {
    unavailable: bool,
    sections: Vec<Section>,
    children: HashMap<ChildFamily, Vec<ChildRecord>>,
    contact: Option<Value>,
    snapshots: Vec<Snapshot>,
    next_id: u64,
    ops: Vec<RemoteOp>,
    fail_ids: HashSet<String>,
    fail_creates: bool,
}

impl Inner {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[derive(Default)]
pub struct MemoryRemote {
    inner: Mutex<Inner>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.inner.lock().unwrap().unavailable = !available;
    }

    /// Make every update/delete touching `id` fail.
    pub fn fail_operations_on(&self, id: impl Into<String>) {
        self.inner.lock().unwrap().fail_ids.insert(id.into());
    }

    /// Make every child create fail.
    pub fn fail_creates(&self, fail: bool) {
        self.inner.lock().unwrap().fail_creates = fail;
    }

    pub fn seed_section(&self, mut section: Section) -> String {
        let mut inner = self.inner.lock().unwrap();
        if section.id.is_empty() {
            section.id = inner.fresh_id("sec");
        }
        let id = section.id.clone();
        inner.sections.push(section);
        id
    }

    pub fn seed_child(&self, family: ChildFamily, mut record: ChildRecord) -> String {
        let mut inner = self.inner.lock().unwrap();
        let id = record
            .id
            .clone()
            .unwrap_or_else(|| inner.fresh_id("item"));
        record.id = Some(id.clone());
        inner.children.entry(family).or_default().push(record);
        id
    }

    pub fn set_contact(&self, contact: Value) {
        self.inner.lock().unwrap().contact = Some(contact);
    }

    /// Current state of one child table, ordered by `sort_order`.
    pub fn children_of(&self, family: ChildFamily) -> Vec<ChildRecord> {
        let inner = self.inner.lock().unwrap();
        let mut records = inner.children.get(&family).cloned().unwrap_or_default();
        records.sort_by_key(|r| r.sort_order);
        records
    }

    pub fn latest_snapshot(&self) -> Option<Snapshot> {
        self.inner.lock().unwrap().snapshots.last().cloned()
    }

    /// Operation log so far, in issue order.
    pub fn ops(&self) -> Vec<RemoteOp> {
        self.inner.lock().unwrap().ops.clone()
    }

    /// Drain the operation log.
    pub fn take_ops(&self) -> Vec<RemoteOp> {
        std::mem::take(&mut self.inner.lock().unwrap().ops)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn is_available(&self) -> bool {
        !self.inner.lock().unwrap().unavailable
    }

    async fn get_all_sections(&self) -> Result<Vec<Section>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ops.push(RemoteOp::FetchedSections);
        Ok(inner.sections.clone())
    }

    async fn create_section(&self, mut section: Section) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if section.id.is_empty() {
            section.id = inner.fresh_id("sec");
        }
        let id = section.id.clone();
        inner.ops.push(RemoteOp::CreatedSection {
            section_type: section.section_type.clone(),
            id: id.clone(),
        });
        inner.sections.push(section);
        Ok(id)
    }

    async fn update_section(&self, id: &str, patch: SectionPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_ids.contains(id) {
            return Err(StoreError::RemoteOperation(format!(
                "update_section({id}) rejected"
            )));
        }
        let section = inner
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::RemoteOperation(format!("no section {id}")))?;
        if let Some(visible) = patch.is_visible {
            section.is_visible = visible;
        }
        if let Some(data) = patch.data {
            section.data = data;
        }
        section.updated_at = chrono::Utc::now();
        inner.ops.push(RemoteOp::UpdatedSection { id: id.to_string() });
        Ok(())
    }

    async fn delete_section(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_ids.contains(id) {
            return Err(StoreError::RemoteOperation(format!(
                "delete_section({id}) rejected"
            )));
        }
        inner.sections.retain(|s| s.id != id);
        inner.ops.push(RemoteOp::DeletedSection { id: id.to_string() });
        Ok(())
    }

    async fn get_children(&self, family: ChildFamily) -> Result<Vec<ChildRecord>, StoreError> {
        let mut records = self
            .inner
            .lock()
            .unwrap()
            .children
            .get(&family)
            .cloned()
            .unwrap_or_default();
        records.sort_by_key(|r| r.sort_order);
        Ok(records)
    }

    async fn create_child(
        &self,
        family: ChildFamily,
        record: &ChildRecord,
    ) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_creates {
            return Err(StoreError::RemoteOperation(format!(
                "create_child({family:?}) rejected"
            )));
        }
        let id = inner.fresh_id("item");
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        inner.ops.push(RemoteOp::CreatedChild {
            family,
            id: id.clone(),
            sort_order: stored.sort_order,
        });
        inner.children.entry(family).or_default().push(stored);
        Ok(id)
    }

    async fn update_child(
        &self,
        family: ChildFamily,
        id: &str,
        record: &ChildRecord,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_ids.contains(id) {
            return Err(StoreError::RemoteOperation(format!(
                "update_child({family:?}, {id}) rejected"
            )));
        }
        let table = inner.children.entry(family).or_default();
        let stored = table
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::RemoteOperation(format!("no {family:?} item {id}")))?;
        stored.sort_order = record.sort_order;
        stored.fields = record.fields.clone();
        inner.ops.push(RemoteOp::UpdatedChild {
            family,
            id: id.to_string(),
            sort_order: record.sort_order,
        });
        Ok(())
    }

    async fn delete_child(&self, family: ChildFamily, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_ids.contains(id) {
            return Err(StoreError::RemoteOperation(format!(
                "delete_child({family:?}, {id}) rejected"
            )));
        }
        inner
            .children
            .entry(family)
            .or_default()
            .retain(|r| r.id.as_deref() != Some(id));
        inner.ops.push(RemoteOp::DeletedChild {
            family,
            id: id.to_string(),
        });
        Ok(())
    }

    async fn get_contact_info(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.inner.lock().unwrap().contact.clone())
    }

    async fn update_contact_info(&self, data: &Value) -> Result<(), StoreError> {
        self.inner.lock().unwrap().contact = Some(data.clone());
        Ok(())
    }

    async fn get_current_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.inner.lock().unwrap().snapshots.last().cloned())
    }

    async fn publish_snapshot(
        &self,
        content: &ContentDocument,
        published: bool,
    ) -> Result<Snapshot, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let version = inner.snapshots.len() as u64 + 1;
        let snapshot = Snapshot::new(content.clone(), published, version);
        inner.snapshots.push(snapshot.clone());
        inner.ops.push(RemoteOp::PublishedSnapshot { published });
        Ok(snapshot)
    }

    async fn sync_document_to_sections(
        &self,
        document: &ContentDocument,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();

        for kind in SectionKind::ALL {
            let data = document.get(kind.key()).cloned().unwrap_or(Value::Null);
            let visible = document
                .get_path(&format!("settings.visibility.{}", kind.key()))
                .and_then(|v| v.as_bool())
                .unwrap_or_else(|| kind.default_visible());

            match inner.sections.iter().position(|s| s.section_type == kind.key()) {
                Some(index) => {
                    let section = &mut inner.sections[index];
                    section.data = data;
                    section.is_visible = visible;
                    section.updated_at = chrono::Utc::now();
                }
                None => {
                    let id = inner.fresh_id("sec");
                    let mut section = Section::new(kind.key(), data);
                    section.id = id;
                    section.is_visible = visible;
                    inner.sections.push(section);
                }
            }
        }

        // Rebuild the child tables from the document's arrays.
        for family in [ChildFamily::FeatureCard, ChildFamily::NavItem] {
            let path = format!("{}.{}", family.section().key(), family.field());
            let records = document
                .get_path(&path)
                .map(records_from_array)
                .unwrap_or_default();
            let table = assign_ids(&mut inner, records);
            inner.children.insert(family, table);
        }

        let groups = document
            .get_path("footer.groups")
            .map(records_from_array)
            .unwrap_or_default();
        let mut links = Vec::new();
        let mut group_table = assign_ids(&mut inner, groups);
        for group in &mut group_table {
            let group_id = group.id.clone().unwrap_or_default();
            let own = group
                .fields
                .remove("links")
                .map(|v| records_from_array(&v))
                .unwrap_or_default();
            for mut link in assign_ids(&mut inner, own) {
                link.set_field("group_id", Value::String(group_id.clone()));
                links.push(link);
            }
        }
        inner.children.insert(ChildFamily::FooterGroup, group_table);
        inner.children.insert(ChildFamily::FooterLink, links);

        if let Some(contact) = document.get("contact") {
            inner.contact = Some(contact.clone());
        }

        inner.ops.push(RemoteOp::SyncedSections);
        Ok(())
    }
}

fn assign_ids(inner: &mut Inner, records: Vec<ChildRecord>) -> Vec<ChildRecord> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, mut record)| {
            if record.id.is_none() {
                record.id = Some(inner.fresh_id("item"));
            }
            record.sort_order = index as i64;
            record
        })
        .collect()
}
