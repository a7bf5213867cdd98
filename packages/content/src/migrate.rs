//! # Content Migration
//!
//! Fills a document with required defaults without disturbing anything
//! already present. Every read path runs through [`complete`] before a
//! document reaches the editor, so downstream code can rely on all
//! known top-level keys existing.
//!
//! Idempotence is a hard contract: `complete(complete(d)) == complete(d)`.

use serde_json::{Map, Value};

use crate::defaults::{baseline_document, product_catalog, LABEL_FLAGS};
use crate::{ContentDocument, SectionKind};

/// Complete a document against the compiled baseline.
pub fn complete(mut doc: ContentDocument) -> ContentDocument {
    // 1. Seed the product catalog only when entirely absent. An empty
    //    or partial mapping is an editorial choice and stays untouched.
    if !doc.contains_key("products") {
        doc.insert("products", Value::Object(product_catalog()));
    }

    // 2. Fill missing top-level keys from the baseline.
    let baseline = baseline_document();
    for (key, value) in baseline.as_map() {
        if !doc.contains_key(key) {
            doc.insert(key.clone(), value.clone());
        }
    }

    // 3. Explicit visibility booleans for every known section.
    let mut visibility = object_at(&doc, "settings.visibility");
    for kind in SectionKind::ALL {
        visibility
            .entry(kind.key().to_string())
            .or_insert(Value::Bool(kind.default_visible()));
    }
    doc.set_path("settings.visibility", Value::Object(visibility));

    // 4. Label flags default true, but only when genuinely unset — an
    //    explicit false survives.
    let mut labels = object_at(&doc, "settings.labels");
    for flag in LABEL_FLAGS {
        labels.entry(flag.to_string()).or_insert(Value::Bool(true));
    }
    doc.set_path("settings.labels", Value::Object(labels));

    doc
}

fn object_at(doc: &ContentDocument, path: &str) -> Map<String, Value> {
    doc.get_path(path)
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_is_idempotent() {
        let cases = [
            ContentDocument::new(),
            baseline_document(),
            {
                let mut d = ContentDocument::new();
                d.insert("hero", json!({"title": "Custom"}));
                d.set_path("settings.labels.show_prices", json!(false));
                d
            },
        ];

        for doc in cases {
            let once = complete(doc.clone());
            let twice = complete(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_missing_keys_filled_present_keys_untouched() {
        let mut doc = ContentDocument::new();
        doc.insert("hero", json!({"title": "Mine"}));

        let completed = complete(doc);
        assert_eq!(completed.get_path("hero.title"), Some(&json!("Mine")));
        for kind in SectionKind::ALL {
            assert!(completed.contains_key(kind.key()));
        }
        assert!(completed.contains_key("pages"));
    }

    #[test]
    fn test_products_seeded_only_when_absent() {
        let completed = complete(ContentDocument::new());
        assert!(completed
            .get_path("products.starter")
            .is_some());

        let mut doc = ContentDocument::new();
        doc.insert("products", json!({}));
        let completed = complete(doc);
        assert_eq!(completed.get("products"), Some(&json!({})));
    }

    #[test]
    fn test_pricing_defaults_hidden() {
        let completed = complete(ContentDocument::new());
        assert_eq!(
            completed.get_path("settings.visibility.pricing"),
            Some(&json!(false))
        );
        assert_eq!(
            completed.get_path("settings.visibility.waitlist"),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_explicit_visibility_survives() {
        let mut doc = ContentDocument::new();
        doc.set_path("settings.visibility.hero", json!(false));
        doc.set_path("settings.visibility.pricing", json!(true));

        let completed = complete(doc);
        assert_eq!(
            completed.get_path("settings.visibility.hero"),
            Some(&json!(false))
        );
        assert_eq!(
            completed.get_path("settings.visibility.pricing"),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_explicit_false_label_survives() {
        let mut doc = ContentDocument::new();
        doc.set_path("settings.labels.show_badges", json!(false));

        let completed = complete(doc);
        assert_eq!(
            completed.get_path("settings.labels.show_badges"),
            Some(&json!(false))
        );
        assert_eq!(
            completed.get_path("settings.labels.show_prices"),
            Some(&json!(true))
        );
    }
}
