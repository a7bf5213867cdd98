//! # Publish Coordination
//!
//! Top-level save/publish orchestration. Branches on edit mode:
//!
//! - **whole-document**: parse/validate, then publish through the
//!   gateway; a parse failure blocks the save entirely
//! - **section-scoped**: push the section's scalar fields, reconcile
//!   each of its child collections, reload the unified document from
//!   the remote store, then re-publish the reloaded document so the
//!   two persistence tiers cannot diverge
//!
//! Every action terminates in exactly one user-facing [`Outcome`];
//! nothing fails silently.

use serde_json::Value;

use pageforge_content::{
    complete, records_from_array, ChildFamily, ContentDocument, Section, SectionKind,
};
use pageforge_store::{
    reconcile, reconcile_tree, EditMode, LoadSource, LoadedDocument, PublishTier, ReconcileReport,
    RemoteStore, SectionPatch, TieredPersistenceGateway, TreeItem,
};

use crate::errors::EditorError;
use crate::state::EditorStateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Error,
    Info,
}

/// The one user-facing notification each action ends in.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
    /// Which tier accepted the write, when one did.
    pub tier: Option<PublishTier>,
}

impl Outcome {
    fn success(message: impl Into<String>, tier: PublishTier) -> Self {
        Self {
            kind: OutcomeKind::Success,
            message: message.into(),
            tier: Some(tier),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Error,
            message: message.into(),
            tier: None,
        }
    }

    fn info(message: impl Into<String>, tier: Option<PublishTier>) -> Self {
        Self {
            kind: OutcomeKind::Info,
            message: message.into(),
            tier,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

pub struct PublishCoordinator {
    gateway: TieredPersistenceGateway,
}

impl PublishCoordinator {
    pub fn new(gateway: TieredPersistenceGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &TieredPersistenceGateway {
        &self.gateway
    }

    /// Whole-document save from raw edited text. A parse failure
    /// blocks the save; nothing is written.
    pub async fn save_document(&self, store: &mut EditorStateStore, raw: &str) -> Outcome {
        let document = match parse_document(raw) {
            Ok(document) => document,
            Err(e) => {
                store.save_failed();
                return Outcome::error(format!("document rejected: {e}"));
            }
        };

        store.set_document(document);
        self.publish_current(store).await
    }

    /// Whole-document publish of the live in-memory document.
    pub async fn publish_current(&self, store: &mut EditorStateStore) -> Outcome {
        store.begin_save();
        match self
            .gateway
            .publish(store.document(), EditMode::WholeDocument)
            .await
        {
            Ok(receipt) => {
                store.save_succeeded();
                match receipt.tier {
                    PublishTier::Remote => Outcome::success("document published", receipt.tier),
                    PublishTier::CacheOnly => Outcome::info(
                        "remote store unreachable; document saved locally",
                        Some(receipt.tier),
                    ),
                }
            }
            Err(e) => {
                store.save_failed();
                Outcome::error(format!("publish failed: {e}"))
            }
        }
    }

    /// Section-scoped save: scalars, child reconciliation, reload,
    /// re-publish.
    pub async fn save_section(&self, store: &mut EditorStateStore, kind: SectionKind) -> Outcome {
        if !self.gateway.remote().is_available().await {
            // No relational store to reconcile against; keep the local
            // tier current so nothing is lost.
            return self.publish_current(store).await;
        }

        store.begin_save();
        match self.sync_section(store, kind).await {
            Ok((tier, report)) => {
                store.save_succeeded();
                if report.is_partial() {
                    Outcome::info(
                        format!(
                            "section '{}' saved; {} operation(s) failed and were skipped",
                            kind.key(),
                            report.failed
                        ),
                        Some(tier),
                    )
                } else {
                    Outcome::success(format!("section '{}' saved", kind.key()), tier)
                }
            }
            Err(e) => {
                store.save_failed();
                Outcome::error(format!("section save failed: {e}"))
            }
        }
    }

    /// Delete a section's relational record and its child rows, reset
    /// the document key to the baseline, re-publish.
    pub async fn delete_section(&self, store: &mut EditorStateStore, kind: SectionKind) -> Outcome {
        if !self.gateway.remote().is_available().await {
            return Outcome::error(format!(
                "cannot delete section '{}': remote store unreachable",
                kind.key()
            ));
        }

        store.begin_save();
        match self.remove_section(store, kind).await {
            Ok(tier) => {
                store.save_succeeded();
                Outcome::success(format!("section '{}' deleted", kind.key()), tier)
            }
            Err(e) => {
                store.save_failed();
                Outcome::error(format!("section delete failed: {e}"))
            }
        }
    }

    async fn sync_section(
        &self,
        store: &mut EditorStateStore,
        kind: SectionKind,
    ) -> Result<(PublishTier, ReconcileReport), EditorError> {
        self.push_section_scalars(store.document(), kind).await?;

        let report = self.reconcile_children(store.document(), kind).await;

        // Mandatory re-fetch: the store's true resulting state, not an
        // optimistic in-memory merge.
        let document = self.gateway.assemble_from_sections().await?;
        store.adopt_reloaded(LoadedDocument {
            document: document.clone(),
            source: LoadSource::Sections,
        });

        let receipt = self
            .gateway
            .publish(&document, EditMode::SectionScoped)
            .await?;
        Ok((receipt.tier, report))
    }

    /// Upsert the section record with its own scalar fields — the
    /// child-collection arrays travel separately.
    async fn push_section_scalars(
        &self,
        document: &ContentDocument,
        kind: SectionKind,
    ) -> Result<(), EditorError> {
        let remote = self.gateway.remote();

        let mut data = document
            .get(kind.key())
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        for family in ChildFamily::ALL {
            if family.section() == kind && family.parent_key().is_none() {
                data.remove(family.field());
            }
        }
        let visible = document
            .get_path(&format!("settings.visibility.{}", kind.key()))
            .and_then(|v| v.as_bool());

        if kind == SectionKind::Contact {
            remote
                .update_contact_info(&Value::Object(data.clone()))
                .await?;
        }

        let sections = remote.get_all_sections().await?;
        match sections.iter().find(|s| s.section_type == kind.key()) {
            Some(record) => {
                remote
                    .update_section(
                        &record.id,
                        SectionPatch {
                            is_visible: visible,
                            data: Some(Value::Object(data)),
                        },
                    )
                    .await?;
            }
            None => {
                let mut section = Section::new(kind.key(), Value::Object(data));
                section.is_visible = visible.unwrap_or_else(|| kind.default_visible());
                remote.create_section(section).await?;
            }
        }
        Ok(())
    }

    async fn reconcile_children(
        &self,
        document: &ContentDocument,
        kind: SectionKind,
    ) -> ReconcileReport {
        let remote = self.gateway.remote();
        let mut report = ReconcileReport::default();

        match kind {
            SectionKind::Features | SectionKind::Header => {
                let family = if kind == SectionKind::Features {
                    ChildFamily::FeatureCard
                } else {
                    ChildFamily::NavItem
                };
                let path = format!("{}.{}", kind.key(), family.field());
                let current = document
                    .get_path(&path)
                    .map(records_from_array)
                    .unwrap_or_default();
                let original = match remote.get_children(family).await {
                    Ok(records) => records,
                    Err(e) => {
                        tracing::warn!("fetching {family:?} originals failed: {e}");
                        report.failed += 1;
                        return report;
                    }
                };
                let (_, pass) = reconcile(remote.as_ref(), family, &original, current).await;
                report.absorb(pass);
            }
            SectionKind::Footer => {
                let (original, current) = match self.footer_trees(document).await {
                    Ok(trees) => trees,
                    Err(e) => {
                        tracing::warn!("fetching footer originals failed: {e}");
                        report.failed += 1;
                        return report;
                    }
                };
                let pass = reconcile_tree(
                    remote.as_ref(),
                    ChildFamily::FooterGroup,
                    ChildFamily::FooterLink,
                    "group_id",
                    &original,
                    current,
                )
                .await;
                report.absorb(pass);
            }
            // No child collections on the remaining sections.
            _ => {}
        }

        report
    }

    /// Original and current footer trees: groups with their links
    /// nested, links keyed to groups by `group_id` remotely and by the
    /// embedded `links` array locally.
    async fn footer_trees(
        &self,
        document: &ContentDocument,
    ) -> Result<(Vec<TreeItem>, Vec<TreeItem>), EditorError> {
        let remote = self.gateway.remote();

        let groups = remote.get_children(ChildFamily::FooterGroup).await?;
        let links = remote.get_children(ChildFamily::FooterLink).await?;
        let original: Vec<TreeItem> = groups
            .into_iter()
            .map(|group| {
                let group_id = group.id.clone();
                let children = links
                    .iter()
                    .filter(|link| {
                        link.field("group_id").and_then(|v| v.as_str())
                            == group_id.as_deref()
                    })
                    .cloned()
                    .collect();
                TreeItem {
                    parent: group,
                    children,
                }
            })
            .collect();

        let current: Vec<TreeItem> = document
            .get_path("footer.groups")
            .map(records_from_array)
            .unwrap_or_default()
            .into_iter()
            .map(|mut group| {
                let children = group
                    .fields
                    .remove("links")
                    .map(|v| records_from_array(&v))
                    .unwrap_or_default();
                TreeItem {
                    parent: group,
                    children,
                }
            })
            .collect();

        Ok((original, current))
    }

    async fn remove_section(
        &self,
        store: &mut EditorStateStore,
        kind: SectionKind,
    ) -> Result<PublishTier, EditorError> {
        let remote = self.gateway.remote();

        // Drop child rows first, then the record itself.
        for family in ChildFamily::ALL {
            if family.section() != kind {
                continue;
            }
            for record in remote.get_children(family).await? {
                if let Some(id) = record.id.as_deref() {
                    if let Err(e) = remote.delete_child(family, id).await {
                        tracing::warn!("deleting {family:?} {id} failed: {e}");
                    }
                }
            }
        }

        let sections = remote.get_all_sections().await?;
        if let Some(record) = sections.iter().find(|s| s.section_type == kind.key()) {
            remote.delete_section(&record.id).await?;
        }

        let mut document = store.document().clone();
        let baseline = pageforge_content::baseline_document();
        if let Some(default_section) = baseline.get(kind.key()) {
            document.insert(kind.key(), default_section.clone());
        }
        document.set_path(
            &format!("settings.visibility.{}", kind.key()),
            Value::Bool(kind.default_visible()),
        );
        let document = complete(document);
        store.adopt_reloaded(LoadedDocument {
            document: document.clone(),
            source: store.source(),
        });

        let receipt = self
            .gateway
            .publish(&document, EditMode::WholeDocument)
            .await?;
        Ok(receipt.tier)
    }
}

/// Parse raw document text. Only a JSON object is a document.
pub fn parse_document(raw: &str) -> Result<ContentDocument, EditorError> {
    let document = ContentDocument::from_str(raw)?;
    Ok(complete(document))
}
