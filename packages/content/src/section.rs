//! # Section Records
//!
//! A section is one relational record: an addressable content block
//! (hero, features, ...) with an opaque data payload.
//!
//! Historical payloads carry alias field names (camelCase synonyms,
//! renamed fields from older editors). [`canonicalize`] maps each
//! section type's accepted aliases onto one canonical shape; keys that
//! match no alias are preserved under an `extra` bag rather than
//! silently dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::SectionKind;

/// Relationally persisted section record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    /// Unique among sections; maps onto a top-level document key.
    pub section_type: String,
    pub is_visible: bool,
    /// Opaque section-specific payload.
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Section {
    pub fn new(section_type: impl Into<String>, data: Value) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            section_type: section_type.into(),
            is_visible: true,
            data,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `(canonical_field, accepted aliases)` — the canonical name itself is
/// always accepted and listed first.
type AliasTable = &'static [(&'static str, &'static [&'static str])];

fn alias_table(kind: SectionKind) -> AliasTable {
    match kind {
        SectionKind::Hero => &[
            ("title", &["title", "headline", "heroTitle"]),
            ("subtitle", &["subtitle", "subheadline", "tagline"]),
            ("cta_text", &["cta_text", "ctaText", "buttonText"]),
            ("cta_link", &["cta_link", "ctaLink", "buttonLink"]),
            ("image", &["image", "imageUrl", "background"]),
        ],
        SectionKind::Features => &[
            ("title", &["title", "heading"]),
            ("subtitle", &["subtitle", "subheading"]),
            ("items", &["items", "features", "cards"]),
        ],
        SectionKind::Pricing => &[
            ("title", &["title", "heading"]),
            ("currency", &["currency"]),
            ("plans", &["plans", "tiers", "items"]),
        ],
        SectionKind::Cta => &[
            ("title", &["title", "heading"]),
            ("body", &["body", "text", "description"]),
            ("button_text", &["button_text", "buttonText", "ctaText"]),
            ("button_link", &["button_link", "buttonLink", "ctaLink"]),
        ],
        SectionKind::Waitlist => &[
            ("title", &["title", "heading"]),
            ("body", &["body", "description", "text"]),
            ("placeholder", &["placeholder", "inputPlaceholder"]),
            ("button_text", &["button_text", "buttonText"]),
        ],
        SectionKind::Header => &[
            ("logo", &["logo", "logoUrl", "brand"]),
            ("navigation", &["navigation", "nav", "links"]),
            ("sticky", &["sticky", "isSticky"]),
        ],
        SectionKind::Footer => &[
            ("copyright", &["copyright", "copyrightText"]),
            ("groups", &["groups", "linkGroups", "columns"]),
            ("social", &["social", "socialLinks"]),
        ],
        SectionKind::Contact => &[
            ("email", &["email", "contactEmail"]),
            ("phone", &["phone", "phoneNumber", "tel"]),
            ("address", &["address", "location"]),
            ("hours", &["hours", "openingHours"]),
        ],
    }
}

/// Map a raw section payload onto the canonical shape for its kind.
///
/// For each canonical field the first present, non-null alias wins.
/// Every alias key is consumed even when it loses, so a payload
/// carrying both `headline` and `title` produces one `title`. Keys
/// matching no alias are kept under `extra`.
pub fn canonicalize(kind: SectionKind, raw: &Map<String, Value>) -> Map<String, Value> {
    let table = alias_table(kind);
    let mut consumed: HashSet<&str> = HashSet::new();
    let mut out = Map::new();

    for (canonical, aliases) in table {
        for alias in *aliases {
            consumed.insert(*alias);
        }
        let winner = aliases
            .iter()
            .filter_map(|alias| raw.get(*alias))
            .find(|v| !v.is_null());
        if let Some(value) = winner {
            out.insert((*canonical).to_string(), value.clone());
        }
    }

    let mut extra = Map::new();
    for (key, value) in raw {
        if !consumed.contains(key.as_str()) {
            extra.insert(key.clone(), value.clone());
        }
    }
    if !extra.is_empty() {
        out.insert("extra".to_string(), Value::Object(extra));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_aliases_map_to_canonical_names() {
        let data = raw(json!({
            "headline": "Launch faster",
            "ctaText": "Go",
            "buttonLink": "/go"
        }));

        let canonical = canonicalize(SectionKind::Hero, &data);
        assert_eq!(canonical.get("title"), Some(&json!("Launch faster")));
        assert_eq!(canonical.get("cta_text"), Some(&json!("Go")));
        assert_eq!(canonical.get("cta_link"), Some(&json!("/go")));
        assert!(!canonical.contains_key("headline"));
    }

    #[test]
    fn test_canonical_name_beats_alias() {
        let data = raw(json!({
            "title": "Canonical",
            "headline": "Legacy"
        }));

        let canonical = canonicalize(SectionKind::Hero, &data);
        assert_eq!(canonical.get("title"), Some(&json!("Canonical")));
    }

    #[test]
    fn test_null_alias_is_skipped() {
        let data = raw(json!({
            "title": null,
            "headline": "Fallback"
        }));

        let canonical = canonicalize(SectionKind::Hero, &data);
        assert_eq!(canonical.get("title"), Some(&json!("Fallback")));
    }

    #[test]
    fn test_unknown_keys_land_in_extra() {
        let data = raw(json!({
            "title": "Hi",
            "experiment_variant": "b",
            "theme": "dark"
        }));

        let canonical = canonicalize(SectionKind::Hero, &data);
        assert_eq!(
            canonical.get("extra"),
            Some(&json!({"experiment_variant": "b", "theme": "dark"}))
        );
    }

    #[test]
    fn test_no_field_is_lost_for_any_kind() {
        // Every raw key must survive either canonically or in extra.
        for kind in SectionKind::ALL {
            let data = raw(json!({
                "title": "t",
                "mystery_key": 42
            }));
            let canonical = canonicalize(kind, &data);

            let extra = canonical
                .get("extra")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();
            let has_title = canonical.contains_key("title")
                || extra.contains_key("title");
            assert!(has_title, "title lost for {kind:?}");
            assert_eq!(extra.get("mystery_key"), Some(&json!(42)));
        }
    }
}
