//! # Collection Reconciliation
//!
//! Computes and applies the remote operations that bring an ordered
//! child collection in line with a locally edited one.
//!
//! ## Semantics
//!
//! - `sort_order` is assigned from array position, so ties cannot occur
//!   and output order is always reproducible
//! - items with an identity are updated wholesale, every pass — no
//!   field-level diffing, which keeps the pass idempotent
//! - items without an identity are created, capturing the returned id
//! - identities present remotely but gone locally are deleted
//! - operations run sequentially and best-effort: one failure is
//!   logged and counted, the rest of the pass continues; the caller
//!   re-fetches the document afterward to self-heal
//!
//! The nested footer case runs as an explicit two-phase pass
//! ([`reconcile_tree`]): phase 1 commits every group identity, phase 2
//! reconciles each group's links with the parent id injected, so no
//! link create is ever issued against a missing parent.

use serde_json::Value;
use std::collections::HashSet;

use pageforge_content::{ChildFamily, ChildRecord};

use crate::remote::RemoteStore;

/// Tally of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Operations that failed and were skipped over.
    pub failed: usize,
}

impl ReconcileReport {
    pub fn absorb(&mut self, other: ReconcileReport) {
        self.created += other.created;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.failed += other.failed;
    }

    /// True when at least one operation failed; the post-pass re-fetch
    /// reveals the store's actual resulting state.
    pub fn is_partial(&self) -> bool {
        self.failed > 0
    }
}

/// Reconcile one flat collection. Returns the current items with
/// freshly captured identities and contiguous `sort_order`, plus the
/// operation tally.
pub async fn reconcile(
    remote: &dyn RemoteStore,
    family: ChildFamily,
    original: &[ChildRecord],
    mut current: Vec<ChildRecord>,
) -> (Vec<ChildRecord>, ReconcileReport) {
    for (index, item) in current.iter_mut().enumerate() {
        item.sort_order = index as i64;
    }

    let current_ids: HashSet<&str> = current.iter().filter_map(|r| r.id.as_deref()).collect();

    let mut report = ReconcileReport::default();

    for id in original.iter().filter_map(|r| r.id.as_deref()) {
        if current_ids.contains(id) {
            continue;
        }
        match remote.delete_child(family, id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::warn!("delete_child({family:?}, {id}) failed: {e}");
                report.failed += 1;
            }
        }
    }

    for item in current.iter_mut() {
        match item.id.clone() {
            None => match remote.create_child(family, item).await {
                Ok(id) => {
                    item.id = Some(id);
                    report.created += 1;
                }
                Err(e) => {
                    tracing::warn!("create_child({family:?}) failed: {e}");
                    report.failed += 1;
                }
            },
            Some(id) => match remote.update_child(family, &id, item).await {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    tracing::warn!("update_child({family:?}, {id}) failed: {e}");
                    report.failed += 1;
                }
            },
        }
    }

    (current, report)
}

/// A parent record together with its own ordered children.
#[derive(Debug, Clone)]
pub struct TreeItem {
    pub parent: ChildRecord,
    pub children: Vec<ChildRecord>,
}

/// Reconcile a two-level collection in two explicit phases.
///
/// Phase 1 reconciles the parents, producing the identity table.
/// Phase 2 walks the resolved parents and reconciles each one's
/// children against the original children of the same parent identity,
/// with the parent key injected into every child. Children whose
/// parent was deleted in phase 1 are deleted along with it.
pub async fn reconcile_tree(
    remote: &dyn RemoteStore,
    parent_family: ChildFamily,
    child_family: ChildFamily,
    parent_key: &str,
    original: &[TreeItem],
    current: Vec<TreeItem>,
) -> ReconcileReport {
    let original_parents: Vec<ChildRecord> =
        original.iter().map(|t| t.parent.clone()).collect();
    let (current_parents, current_children): (Vec<ChildRecord>, Vec<Vec<ChildRecord>>) =
        current.into_iter().map(|t| (t.parent, t.children)).unzip();

    // Phase 1: every parent identity is committed before any child
    // operation is issued.
    let (resolved_parents, mut report) =
        reconcile(remote, parent_family, &original_parents, current_parents).await;

    // Children of removed parents have no current counterpart; delete
    // their remote rows outright, or the table grows forever.
    let surviving_ids: HashSet<&str> = resolved_parents
        .iter()
        .filter_map(|p| p.id.as_deref())
        .collect();
    for tree in original {
        let Some(parent_id) = tree.parent.id.as_deref() else {
            continue;
        };
        if surviving_ids.contains(parent_id) {
            continue;
        }
        let (_, child_report) =
            reconcile(remote, child_family, &tree.children, Vec::new()).await;
        report.absorb(child_report);
    }

    // Phase 2: children, keyed by the resolved parent identities.
    for (parent, children) in resolved_parents.iter().zip(current_children) {
        let Some(parent_id) = parent.id.as_deref() else {
            // Parent create failed; its children have nothing to
            // reference. Counted once per orphaned child.
            tracing::warn!(
                "skipping {} {child_family:?} items: parent {parent_family:?} has no identity",
                children.len()
            );
            report.failed += children.len();
            continue;
        };

        let original_children: Vec<ChildRecord> = original
            .iter()
            .find(|t| t.parent.id.as_deref() == Some(parent_id))
            .map(|t| t.children.clone())
            .unwrap_or_default();

        let mut keyed: Vec<ChildRecord> = children;
        for child in &mut keyed {
            child.set_field(parent_key, Value::String(parent_id.to_string()));
        }

        let (_, child_report) =
            reconcile(remote, child_family, &original_children, keyed).await;
        report.absorb(child_report);
    }

    report
}
