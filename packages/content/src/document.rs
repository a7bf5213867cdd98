//! # Content Document
//!
//! The root aggregate: one JSON object holding every named section of
//! the site plus settings and pages.
//!
//! Values are addressed by dot-separated paths ("header.navigation",
//! "settings.visibility.pricing"). Writes through [`ContentDocument::set_path`]
//! create intermediate objects as needed, so callers never have to
//! pre-build a nesting level before assigning into it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Editable content document (root aggregate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument(Map<String, Value>);

impl ContentDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse a document from raw JSON text. The text must be a JSON
    /// object; anything else is a parse error.
    pub fn from_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Resolve a dot-separated path to a value, if present.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.0.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Set the value at a dot-separated path, creating intermediate
    /// objects when absent. A non-object value sitting on an
    /// intermediate step is replaced by an object.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let parts: Vec<&str> = path.split('.').collect();
        set_in_map(&mut self.0, &parts, value);
    }

    /// Serialize to pretty JSON (export format).
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn set_in_map(map: &mut Map<String, Value>, parts: &[&str], value: Value) {
    match parts {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(inner) = slot {
                set_in_map(inner, rest, value);
            }
        }
    }
}

/// Known top-level sections of a content document.
///
/// `section_type` strings on relational records map 1:1 onto these keys;
/// unknown types pass through unification verbatim under their own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Features,
    Pricing,
    Cta,
    Waitlist,
    Header,
    Footer,
    Contact,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Hero,
        SectionKind::Features,
        SectionKind::Pricing,
        SectionKind::Cta,
        SectionKind::Waitlist,
        SectionKind::Header,
        SectionKind::Footer,
        SectionKind::Contact,
    ];

    /// Top-level document key for this section.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Features => "features",
            SectionKind::Pricing => "pricing",
            SectionKind::Cta => "cta",
            SectionKind::Waitlist => "waitlist",
            SectionKind::Header => "header",
            SectionKind::Footer => "footer",
            SectionKind::Contact => "contact",
        }
    }

    /// Resolve a relational `section_type` string.
    pub fn from_type(section_type: &str) -> Option<SectionKind> {
        Self::ALL.iter().copied().find(|k| k.key() == section_type)
    }

    /// Default visibility. Everything ships visible except pricing,
    /// which stays hidden until explicitly enabled.
    pub fn default_visible(&self) -> bool {
        !matches!(self, SectionKind::Pricing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_path_creates_intermediate_maps() {
        let mut doc = ContentDocument::new();
        doc.set_path("settings.visibility.pricing", json!(false));

        assert_eq!(
            doc.get_path("settings.visibility.pricing"),
            Some(&json!(false))
        );
        assert!(doc.get("settings").unwrap().is_object());
    }

    #[test]
    fn test_set_path_replaces_non_object_intermediate() {
        let mut doc = ContentDocument::new();
        doc.insert("header", json!("oops"));
        doc.set_path("header.navigation", json!([]));

        assert_eq!(doc.get_path("header.navigation"), Some(&json!([])));
    }

    #[test]
    fn test_get_path_missing_is_none() {
        let doc = ContentDocument::new();
        assert!(doc.get_path("hero.title").is_none());
    }

    #[test]
    fn test_section_kind_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_type(kind.key()), Some(kind));
        }
        assert_eq!(SectionKind::from_type("blog"), None);
    }

    #[test]
    fn test_pricing_hidden_by_default() {
        assert!(!SectionKind::Pricing.default_visible());
        assert!(SectionKind::Hero.default_visible());
    }

    #[test]
    fn test_from_str_rejects_non_object() {
        assert!(ContentDocument::from_str("[1, 2]").is_err());
        assert!(ContentDocument::from_str("not json").is_err());
        assert!(ContentDocument::from_str("{\"hero\": {}}").is_ok());
    }
}
