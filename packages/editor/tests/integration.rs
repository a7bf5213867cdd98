//! End-to-end flows over the full stack: session → coordinator →
//! gateway → reconciler → in-memory remote + cache.

use std::sync::Arc;

use serde_json::json;

use pageforge_content::{ChildFamily, SectionKind};
use pageforge_editor::{DocumentPhase, EditSession, LoadSource, OutcomeKind, PublishTier};
use pageforge_store::{CacheStore, MemoryCache, MemoryRemote, RemoteOp, RemoteStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn open_session() -> (EditSession, Arc<MemoryRemote>, Arc<MemoryCache>) {
    init_tracing();
    let remote = Arc::new(MemoryRemote::new());
    let cache = Arc::new(MemoryCache::new());
    let session = EditSession::open(remote.clone(), cache.clone()).await;
    (session, remote, cache)
}

#[tokio::test]
async fn publish_carries_visibility_edit_to_both_tiers() {
    // End-to-end A: flip pricing visibility, publish, check both tiers.
    let (mut session, remote, cache) = open_session().await;

    session.update_section("settings.visibility.pricing", json!(false));
    let outcome = session.publish().await;

    assert!(outcome.is_success());
    assert_eq!(outcome.tier, Some(PublishTier::Remote));

    let snapshot = remote.latest_snapshot().unwrap();
    assert!(snapshot.is_published);
    assert_eq!(
        snapshot.content.get_path("settings.visibility.pricing"),
        Some(&json!(false))
    );

    let cached = cache.load().await.unwrap().unwrap();
    assert_eq!(
        cached.get_path("settings.visibility.pricing"),
        Some(&json!(false))
    );
    assert_eq!(cached, snapshot.content);
}

#[tokio::test]
async fn section_save_removing_one_card_is_minimal() {
    // End-to-end B: drop the middle card of three; expect exactly one
    // delete, two updates (orders 0 and 1), and one document reload
    // after the child operations.
    let remote = Arc::new(MemoryRemote::new());
    let cache = Arc::new(MemoryCache::new());
    let a = remote.seed_child(
        ChildFamily::FeatureCard,
        pageforge_content::ChildRecord::from_value(&json!({"title": "A", "sort_order": 0})),
    );
    let b = remote.seed_child(
        ChildFamily::FeatureCard,
        pageforge_content::ChildRecord::from_value(&json!({"title": "B", "sort_order": 1})),
    );
    let c = remote.seed_child(
        ChildFamily::FeatureCard,
        pageforge_content::ChildRecord::from_value(&json!({"title": "C", "sort_order": 2})),
    );

    let mut session = EditSession::open(remote.clone(), cache).await;
    let items = session
        .document()
        .get_path("features.items")
        .unwrap()
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(items.len(), 3);

    // Remove the item at index 1.
    let mut edited = items.clone();
    edited.remove(1);
    session.update_section("features.items", json!(edited));

    remote.take_ops();
    let outcome = session.save_section(SectionKind::Features).await;
    assert_eq!(outcome.kind, OutcomeKind::Success);

    let ops = remote.take_ops();

    let deletes: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            RemoteOp::DeletedChild { id, .. } => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(deletes, vec![b]);

    let updates: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            RemoteOp::UpdatedChild { id, sort_order, .. } => Some((id.clone(), *sort_order)),
            _ => None,
        })
        .collect();
    assert_eq!(updates, vec![(a, 0), (c, 1)]);

    assert!(!ops
        .iter()
        .any(|op| matches!(op, RemoteOp::CreatedChild { .. })));

    // Exactly one reload after the last child operation.
    let last_child_op = ops
        .iter()
        .rposition(|op| {
            matches!(
                op,
                RemoteOp::DeletedChild { .. } | RemoteOp::UpdatedChild { .. }
            )
        })
        .unwrap();
    let reloads = ops[last_child_op..]
        .iter()
        .filter(|op| matches!(op, RemoteOp::FetchedSections))
        .count();
    assert_eq!(reloads, 1);

    // The reloaded document still carries the two surviving cards.
    let items = session
        .document()
        .get_path("features.items")
        .unwrap()
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], json!("A"));
    assert_eq!(items[1]["title"], json!("C"));
}

#[tokio::test]
async fn footer_save_creates_group_before_its_links() {
    let (mut session, remote, _) = open_session().await;

    session.update_section(
        "footer.groups",
        json!([{
            "title": "Resources",
            "links": [
                {"label": "Docs", "href": "/docs"},
                {"label": "Blog", "href": "/blog"}
            ]
        }]),
    );

    remote.take_ops();
    let outcome = session.save_section(SectionKind::Footer).await;
    assert_eq!(outcome.kind, OutcomeKind::Success);

    let groups = remote.children_of(ChildFamily::FooterGroup);
    assert_eq!(groups.len(), 1);
    let group_id = groups[0].id.clone().unwrap();

    let links = remote.children_of(ChildFamily::FooterLink);
    assert_eq!(links.len(), 2);
    for link in &links {
        assert_eq!(link.field("group_id"), Some(&json!(group_id.clone())));
    }

    // The reloaded unified document nests the links under the group.
    let doc_links = session
        .document()
        .get_path("footer.groups")
        .unwrap()
        .as_array()
        .unwrap()[0]["links"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(doc_links.len(), 2);
    assert_eq!(doc_links[0]["label"], json!("Docs"));
}

#[tokio::test]
async fn unreachable_remote_never_fails_a_read() {
    let remote = Arc::new(MemoryRemote::new());
    remote.set_available(false);
    let cache = Arc::new(MemoryCache::new());

    let mut stale = pageforge_content::baseline_document();
    stale.set_path("hero.title", json!("Cached copy"));
    cache.store(&stale).await.unwrap();

    let session = EditSession::open(remote, cache).await;
    assert_eq!(session.store().source(), LoadSource::Cache);
    assert_eq!(
        session.document().get_path("hero.title"),
        Some(&json!("Cached copy"))
    );
    // Migrated on the way through.
    assert!(session.document().contains_key("products"));
}

#[tokio::test]
async fn offline_publish_degrades_to_cache_with_an_info_outcome() {
    let (mut session, remote, cache) = open_session().await;
    remote.set_available(false);

    session.update_section("hero.title", json!("Offline edit"));
    let outcome = session.publish().await;

    assert_eq!(outcome.kind, OutcomeKind::Info);
    assert_eq!(outcome.tier, Some(PublishTier::CacheOnly));
    assert!(remote.latest_snapshot().is_none());
    assert_eq!(
        cache.load().await.unwrap().unwrap().get_path("hero.title"),
        Some(&json!("Offline edit"))
    );
    assert_eq!(
        session.store().phase(),
        DocumentPhase::Loaded(LoadSource::Sections)
    );
}

#[tokio::test]
async fn malformed_document_blocks_the_save() {
    let (mut session, remote, _) = open_session().await;
    remote.take_ops();

    let outcome = session.save_document("{\"hero\": ").await;

    assert_eq!(outcome.kind, OutcomeKind::Error);
    assert_eq!(session.store().phase(), DocumentPhase::SaveFailed);
    // No partial write of any kind.
    assert!(remote.take_ops().is_empty());
    assert!(remote.latest_snapshot().is_none());
}

#[tokio::test]
async fn whole_document_save_syncs_sections_for_later_section_edits() {
    let (mut session, remote, _) = open_session().await;

    let mut doc = session.document().clone();
    doc.set_path("hero.title", json!("Rewritten"));
    let outcome = session.save_document(&doc.to_pretty()).await;
    assert!(outcome.is_success());

    let sections = remote.get_all_sections().await.unwrap();
    let hero = sections.iter().find(|s| s.section_type == "hero").unwrap();
    assert_eq!(hero.data["title"], json!("Rewritten"));
}

#[tokio::test]
async fn partial_reconciliation_surfaces_as_info_and_self_heals() {
    let remote = Arc::new(MemoryRemote::new());
    let cache = Arc::new(MemoryCache::new());
    let doomed = remote.seed_child(
        ChildFamily::FeatureCard,
        pageforge_content::ChildRecord::from_value(&json!({"title": "Doomed", "sort_order": 0})),
    );
    remote.fail_operations_on(doomed);

    let mut session = EditSession::open(remote.clone(), cache).await;
    // Remove the only card; its delete will fail.
    session.update_section("features.items", json!([]));

    let outcome = session.save_section(SectionKind::Features).await;

    assert_eq!(outcome.kind, OutcomeKind::Info);
    // The mandatory re-fetch shows the store's true state: the card
    // survived its failed delete and is back in the document.
    let items = session
        .document()
        .get_path("features.items")
        .unwrap()
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], json!("Doomed"));
}
