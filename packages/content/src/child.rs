//! # Child Collections
//!
//! Ordered sub-entities belonging to a section: feature cards under
//! `features.items`, navigation entries under `header.navigation`,
//! footer link groups under `footer.groups`, and the links nested
//! inside each group.
//!
//! All four families share one record shape so a single reconciler
//! serves them through one remote contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::SectionKind;

/// The four child-collection families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildFamily {
    FeatureCard,
    NavItem,
    FooterGroup,
    FooterLink,
}

impl ChildFamily {
    pub const ALL: [ChildFamily; 4] = [
        ChildFamily::FeatureCard,
        ChildFamily::NavItem,
        ChildFamily::FooterGroup,
        ChildFamily::FooterLink,
    ];

    /// The section this family belongs to.
    pub fn section(&self) -> SectionKind {
        match self {
            ChildFamily::FeatureCard => SectionKind::Features,
            ChildFamily::NavItem => SectionKind::Header,
            ChildFamily::FooterGroup | ChildFamily::FooterLink => SectionKind::Footer,
        }
    }

    /// Field under the section key where this family's items live.
    /// Footer links live under `links` on each group, not on the
    /// section itself.
    pub fn field(&self) -> &'static str {
        match self {
            ChildFamily::FeatureCard => "items",
            ChildFamily::NavItem => "navigation",
            ChildFamily::FooterGroup => "groups",
            ChildFamily::FooterLink => "links",
        }
    }

    /// Foreign-key field naming the parent record, for nested families.
    pub fn parent_key(&self) -> Option<&'static str> {
        match self {
            ChildFamily::FooterLink => Some("group_id"),
            _ => None,
        }
    }
}

/// One ordered item of a child collection.
///
/// `id` is `None` until the remote store has persisted the item;
/// `sort_order` is derived from array position during reconciliation
/// and forms a contiguous 0..n-1 sequence afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub id: Option<String>,
    pub sort_order: i64,
    /// Type-specific fields (title, href, icon, ...).
    pub fields: Map<String, Value>,
}

impl ChildRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            id: None,
            sort_order: 0,
            fields,
        }
    }

    /// Read a record out of a document array element. Non-object
    /// elements yield an empty-field record rather than being dropped,
    /// so array positions stay stable.
    pub fn from_value(value: &Value) -> Self {
        let mut fields = value.as_object().cloned().unwrap_or_default();
        let id = fields
            .remove("id")
            .and_then(|v| v.as_str().map(|s| s.to_string()));
        let sort_order = fields
            .remove("sort_order")
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Self {
            id,
            sort_order,
            fields,
        }
    }

    /// Project back into a document array element.
    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        map.insert("sort_order".to_string(), Value::from(self.sort_order));
        Value::Object(map)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}

/// Read an ordered collection out of a document array value.
pub fn records_from_array(value: &Value) -> Vec<ChildRecord> {
    value
        .as_array()
        .map(|items| items.iter().map(ChildRecord::from_value).collect())
        .unwrap_or_default()
}

/// Per-family fetched collections, as assembled for unification.
#[derive(Debug, Clone, Default)]
pub struct ChildCollections(HashMap<ChildFamily, Vec<ChildRecord>>);

impl ChildCollections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: ChildFamily, mut records: Vec<ChildRecord>) {
        records.sort_by_key(|r| r.sort_order);
        self.0.insert(family, records);
    }

    pub fn get(&self, family: ChildFamily) -> &[ChildRecord] {
        self.0.get(&family).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
