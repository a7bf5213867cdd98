//! Compiled baseline content: the last persistence tier.
//!
//! When neither the remote store nor the local cache can produce a
//! document, reads fall back to this template. The migrator also pulls
//! missing top-level keys from here.

use serde_json::{json, Map, Value};

use crate::{ContentDocument, SectionKind};

/// Label toggles carried under `settings.labels`. Each defaults to true
/// but an explicit false must survive migration.
pub const LABEL_FLAGS: [&str; 5] = [
    "show_prices",
    "show_badges",
    "show_titles",
    "show_stock",
    "show_ribbons",
];

/// Baseline product catalog, keyed by slug. Seeded into a document only
/// when the products mapping is entirely absent.
pub fn product_catalog() -> Map<String, Value> {
    let catalog = json!({
        "starter": {
            "name": "Starter",
            "price": 0,
            "description": "Everything you need to launch a single page.",
            "image": "/img/products/starter.png"
        },
        "studio": {
            "name": "Studio",
            "price": 29,
            "description": "Multiple pages, custom sections and exports.",
            "image": "/img/products/studio.png"
        },
        "agency": {
            "name": "Agency",
            "price": 99,
            "description": "White-label sites for client work.",
            "image": "/img/products/agency.png"
        }
    });
    match catalog {
        Value::Object(map) => map,
        _ => unreachable!("catalog literal is an object"),
    }
}

/// The complete baseline document. Every known top-level key is
/// present, so migrating this template is a no-op.
pub fn baseline_document() -> ContentDocument {
    let mut visibility = Map::new();
    for kind in SectionKind::ALL {
        visibility.insert(kind.key().to_string(), Value::Bool(kind.default_visible()));
    }

    let mut labels = Map::new();
    for flag in LABEL_FLAGS {
        labels.insert(flag.to_string(), Value::Bool(true));
    }

    let doc = json!({
        "hero": {
            "title": "Build your page in minutes",
            "subtitle": "Compose, preview and publish without touching code.",
            "cta_text": "Get started",
            "cta_link": "/signup",
            "image": "/img/hero.png"
        },
        "features": {
            "title": "Why Pageforge",
            "subtitle": "",
            "items": []
        },
        "pricing": {
            "title": "Plans",
            "currency": "USD",
            "plans": []
        },
        "cta": {
            "title": "Ready to publish?",
            "body": "Your first page is free.",
            "button_text": "Start now",
            "button_link": "/signup"
        },
        "waitlist": {
            "title": "Join the waitlist",
            "body": "We roll out invites every week.",
            "placeholder": "you@example.com",
            "button_text": "Notify me"
        },
        "header": {
            "logo": "/img/logo.svg",
            "navigation": [],
            "sticky": true
        },
        "footer": {
            "copyright": "© Pageforge",
            "groups": [],
            "social": []
        },
        "contact": {
            "email": "hello@pageforge.dev",
            "phone": "",
            "address": "",
            "hours": ""
        },
        "products": Value::Object(product_catalog()),
        "settings": {
            "visibility": Value::Object(visibility),
            "labels": Value::Object(labels)
        },
        "pages": []
    });

    match doc {
        Value::Object(map) => ContentDocument::from_map(map),
        _ => unreachable!("baseline literal is an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_has_every_known_key() {
        let doc = baseline_document();
        for kind in SectionKind::ALL {
            assert!(doc.contains_key(kind.key()), "missing {}", kind.key());
        }
        assert!(doc.contains_key("products"));
        assert!(doc.contains_key("settings"));
        assert!(doc.contains_key("pages"));
    }

    #[test]
    fn test_baseline_visibility_matches_defaults() {
        let doc = baseline_document();
        assert_eq!(
            doc.get_path("settings.visibility.pricing"),
            Some(&serde_json::json!(false))
        );
        assert_eq!(
            doc.get_path("settings.visibility.hero"),
            Some(&serde_json::json!(true))
        );
    }

    #[test]
    fn test_baseline_labels_all_true() {
        let doc = baseline_document();
        for flag in LABEL_FLAGS {
            assert_eq!(
                doc.get_path(&format!("settings.labels.{flag}")),
                Some(&serde_json::json!(true))
            );
        }
    }
}
