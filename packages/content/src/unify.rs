//! # Unified Content Builder
//!
//! Merges relational section records, their fetched child collections
//! and optional contact data into one coherent document.
//!
//! Merge rules, in order:
//! 1. start from the compiled baseline template
//! 2. each section's payload is canonicalized and merged under its
//!    top-level key; empty incoming values never clobber present ones
//! 3. `is_visible` is mirrored into `settings.visibility`
//! 4. relationally fetched child items win over arrays embedded in a
//!    section's opaque payload
//! 5. unknown section types pass through verbatim under their own key
//! 6. contact data merges last and overrides section-level fields

use serde_json::{Map, Value};

use crate::child::{ChildCollections, ChildFamily, ChildRecord};
use crate::defaults::baseline_document;
use crate::section::canonicalize;
use crate::{ContentDocument, Section, SectionKind};

/// Build a unified document from relational state.
pub fn build_unified(
    sections: &[Section],
    collections: &ChildCollections,
    contact: Option<&Value>,
) -> ContentDocument {
    let mut doc = baseline_document();

    for section in sections {
        match SectionKind::from_type(&section.section_type) {
            Some(kind) => {
                let raw = section.data.as_object().cloned().unwrap_or_default();
                let canonical = canonicalize(kind, &raw);
                let mut target = doc
                    .get(kind.key())
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_default();
                merge_section(&mut target, canonical);
                doc.insert(kind.key(), Value::Object(target));
            }
            // Unknown section types pass through under their own key.
            None => {
                doc.insert(section.section_type.clone(), section.data.clone());
            }
        }
        doc.set_path(
            &format!("settings.visibility.{}", section.section_type),
            Value::Bool(section.is_visible),
        );
    }

    overlay_collections(&mut doc, collections);

    if let Some(Value::Object(contact)) = contact {
        let mut target = doc
            .get("contact")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        for (key, value) in contact {
            target.insert(key.clone(), value.clone());
        }
        doc.insert("contact", Value::Object(target));
    }

    doc
}

/// Merge a canonicalized payload into the unified section map. An
/// empty incoming value (null or "") only lands when the target has
/// nothing better.
fn merge_section(target: &mut Map<String, Value>, canonical: Map<String, Value>) {
    for (key, value) in canonical {
        if is_empty(&value) {
            let keep = target.get(&key).map(|v| !is_empty(v)).unwrap_or(false);
            if keep {
                continue;
            }
        }
        target.insert(key, value);
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Replace embedded arrays with relationally fetched items. Footer
/// links are nested under their group by `group_id` first.
fn overlay_collections(doc: &mut ContentDocument, collections: &ChildCollections) {
    for family in [
        ChildFamily::FeatureCard,
        ChildFamily::NavItem,
        ChildFamily::FooterGroup,
    ] {
        let records = collections.get(family);
        if records.is_empty() {
            continue;
        }

        let mut items: Vec<Value> = records.iter().map(ChildRecord::to_value).collect();

        if family == ChildFamily::FooterGroup {
            let links = collections.get(ChildFamily::FooterLink);
            for item in &mut items {
                let Some(group) = item.as_object_mut() else {
                    continue;
                };
                let group_id = group.get("id").and_then(|v| v.as_str()).map(str::to_string);
                let own: Vec<Value> = links
                    .iter()
                    .filter(|link| {
                        link.field("group_id").and_then(|v| v.as_str())
                            == group_id.as_deref()
                    })
                    .map(ChildRecord::to_value)
                    .collect();
                group.insert("links".to_string(), Value::Array(own));
            }
        }

        let path = format!("{}.{}", family.section().key(), family.field());
        doc.set_path(&path, Value::Array(items));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(section_type: &str, data: Value) -> Section {
        let mut s = Section::new(section_type, data);
        s.id = format!("sec-{section_type}");
        s
    }

    #[test]
    fn test_every_field_survives_unification() {
        for kind in SectionKind::ALL {
            let data = json!({
                "title": "T",
                "custom_field": "kept"
            });
            let doc = build_unified(
                &[section(kind.key(), data)],
                &ChildCollections::new(),
                None,
            );

            let unified = doc.get(kind.key()).and_then(|v| v.as_object()).unwrap();
            let extra = unified
                .get("extra")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();
            assert!(
                unified.get("title") == Some(&json!("T"))
                    || extra.get("title") == Some(&json!("T")),
                "title lost for {kind:?}"
            );
            assert_eq!(extra.get("custom_field"), Some(&json!("kept")));
        }
    }

    #[test]
    fn test_visibility_mirrored_from_record() {
        let mut hidden = section("pricing", json!({"title": "Plans"}));
        hidden.is_visible = false;
        let shown = section("hero", json!({}));

        let doc = build_unified(&[hidden, shown], &ChildCollections::new(), None);
        assert_eq!(
            doc.get_path("settings.visibility.pricing"),
            Some(&json!(false))
        );
        assert_eq!(doc.get_path("settings.visibility.hero"), Some(&json!(true)));
    }

    #[test]
    fn test_empty_value_never_clobbers_present_one() {
        let doc = build_unified(
            &[section("hero", json!({"title": ""}))],
            &ChildCollections::new(),
            None,
        );
        // Baseline title survives the empty incoming one.
        assert_eq!(
            doc.get_path("hero.title"),
            Some(&json!("Build your page in minutes"))
        );
    }

    #[test]
    fn test_fetched_items_win_over_embedded_array() {
        let embedded = json!({
            "title": "Features",
            "items": [{"title": "Stale"}]
        });
        let mut collections = ChildCollections::new();
        collections.insert(
            ChildFamily::FeatureCard,
            vec![ChildRecord::from_value(&json!({
                "id": "card-1", "sort_order": 0, "title": "Fresh"
            }))],
        );

        let doc = build_unified(&[section("features", embedded)], &collections, None);
        let items = doc.get_path("features.items").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], json!("Fresh"));
    }

    #[test]
    fn test_footer_links_nested_under_their_group() {
        let mut collections = ChildCollections::new();
        collections.insert(
            ChildFamily::FooterGroup,
            vec![
                ChildRecord::from_value(&json!({"id": "g1", "sort_order": 0, "title": "Product"})),
                ChildRecord::from_value(&json!({"id": "g2", "sort_order": 1, "title": "Legal"})),
            ],
        );
        collections.insert(
            ChildFamily::FooterLink,
            vec![
                ChildRecord::from_value(&json!({"id": "l1", "sort_order": 0, "group_id": "g2", "label": "Terms"})),
                ChildRecord::from_value(&json!({"id": "l2", "sort_order": 1, "group_id": "g1", "label": "Docs"})),
            ],
        );

        let doc = build_unified(&[], &collections, None);
        let groups = doc.get_path("footer.groups").unwrap().as_array().unwrap();
        assert_eq!(groups[0]["links"][0]["label"], json!("Docs"));
        assert_eq!(groups[1]["links"][0]["label"], json!("Terms"));
    }

    #[test]
    fn test_unknown_section_type_passes_through() {
        let doc = build_unified(
            &[section("testimonials", json!({"quotes": ["Great!"]}))],
            &ChildCollections::new(),
            None,
        );
        assert_eq!(
            doc.get_path("testimonials.quotes"),
            Some(&json!(["Great!"]))
        );
        assert_eq!(
            doc.get_path("settings.visibility.testimonials"),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_contact_data_overrides_section_fields() {
        let doc = build_unified(
            &[section("contact", json!({"email": "old@site.dev"}))],
            &ChildCollections::new(),
            Some(&json!({"email": "new@site.dev", "phone": "555-0100"})),
        );
        assert_eq!(doc.get_path("contact.email"), Some(&json!("new@site.dev")));
        assert_eq!(doc.get_path("contact.phone"), Some(&json!("555-0100")));
    }
}
