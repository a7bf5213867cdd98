//! # Tiered Persistence Gateway
//!
//! Routes reads and writes across the three persistence tiers:
//! remote store → local cache → compiled defaults.
//!
//! The gateway owns no document state. Reads report which tier
//! produced the document; writes land on the remote store and the
//! cache independently and report which tier(s) succeeded.

use std::sync::Arc;

use pageforge_content::{
    baseline_document, build_unified, complete, ChildCollections, ChildFamily, ContentDocument,
};

use crate::cache::{CacheStore, HistoryEntry};
use crate::error::StoreError;
use crate::remote::RemoteStore;

/// Which tier a read was satisfied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Snapshot,
    Sections,
    Cache,
    Defaults,
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: ContentDocument,
    pub source: LoadSource,
}

/// Whether the edit being persisted covered the whole document or one
/// section. Whole-document publishes additionally push the document
/// back down into section records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    WholeDocument,
    SectionScoped,
}

/// Which tier accepted a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTier {
    Remote,
    CacheOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct PublishReceipt {
    pub tier: PublishTier,
    pub cache_written: bool,
}

pub struct TieredPersistenceGateway {
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn CacheStore>,
}

impl TieredPersistenceGateway {
    pub fn new(remote: Arc<dyn RemoteStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self { remote, cache }
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Tiered read. Never errors: the defaults tier always answers.
    /// Every result is migrated before it is returned.
    pub async fn read(&self) -> LoadedDocument {
        if self.remote.is_available().await {
            match self.read_remote().await {
                Ok(loaded) => return loaded,
                Err(e) => {
                    tracing::warn!("remote read failed, demoting to cache: {e}");
                }
            }
        } else {
            tracing::debug!("remote store unavailable, reading cache tier");
        }

        match self.cache.load().await {
            Ok(Some(document)) => LoadedDocument {
                document: complete(document),
                source: LoadSource::Cache,
            },
            Ok(None) => self.defaults(),
            Err(e) => {
                tracing::warn!("cache read failed, using compiled defaults: {e}");
                self.defaults()
            }
        }
    }

    async fn read_remote(&self) -> Result<LoadedDocument, StoreError> {
        if let Some(snapshot) = self.remote.get_current_snapshot().await? {
            return Ok(LoadedDocument {
                document: complete(snapshot.content),
                source: LoadSource::Snapshot,
            });
        }
        let document = self.assemble_from_sections().await?;
        Ok(LoadedDocument {
            document,
            source: LoadSource::Sections,
        })
    }

    fn defaults(&self) -> LoadedDocument {
        LoadedDocument {
            document: complete(baseline_document()),
            source: LoadSource::Defaults,
        }
    }

    /// Rebuild the unified document from relational state: sections,
    /// all four child tables, contact. Migrated before return.
    pub async fn assemble_from_sections(&self) -> Result<ContentDocument, StoreError> {
        let sections = self.remote.get_all_sections().await?;

        let mut collections = ChildCollections::new();
        for family in ChildFamily::ALL {
            collections.insert(family, self.remote.get_children(family).await?);
        }

        let contact = self.remote.get_contact_info().await?;
        let document = build_unified(&sections, &collections, contact.as_ref());
        Ok(complete(document))
    }

    /// Publish a document: remote snapshot first, cache always after,
    /// success if either tier landed. Total failure is the only error.
    pub async fn publish(
        &self,
        document: &ContentDocument,
        mode: EditMode,
    ) -> Result<PublishReceipt, StoreError> {
        let mut remote_error: Option<StoreError> = None;

        let remote_ok = if self.remote.is_available().await {
            match self.remote.publish_snapshot(document, true).await {
                Ok(snapshot) => {
                    if mode == EditMode::WholeDocument {
                        if let Err(e) = self.remote.sync_document_to_sections(document).await {
                            // Snapshot landed; relational sync lagging
                            // behind is repaired by the next section save.
                            tracing::warn!("document → sections sync failed: {e}");
                        }
                    }
                    tracing::debug!("published snapshot v{}", snapshot.version);
                    true
                }
                Err(e) => {
                    tracing::warn!("remote publish failed, degrading to cache tier: {e}");
                    remote_error = Some(e);
                    false
                }
            }
        } else {
            remote_error = Some(StoreError::RemoteUnavailable);
            false
        };

        let cache_written = self.write_cache(document).await;

        match (remote_ok, cache_written) {
            (true, cache_written) => Ok(PublishReceipt {
                tier: PublishTier::Remote,
                cache_written,
            }),
            (false, true) => Ok(PublishReceipt {
                tier: PublishTier::CacheOnly,
                cache_written: true,
            }),
            (false, false) => Err(StoreError::AllTiersFailed(
                remote_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "remote and cache writes failed".to_string()),
            )),
        }
    }

    /// Best-effort cache write plus a history entry. Failures are
    /// logged and swallowed here; the caller only cares whether it
    /// landed.
    pub async fn write_cache(&self, document: &ContentDocument) -> bool {
        if let Err(e) = self.cache.store(document).await {
            tracing::warn!("cache write failed: {e}");
            return false;
        }
        let version = match self.cache.history().await {
            Ok(entries) => entries.len() as u64 + 1,
            Err(_) => 1,
        };
        if let Err(e) = self
            .cache
            .push_history(HistoryEntry {
                id: format!("snap-{version}"),
                version,
                content: document.clone(),
                is_published: true,
                created_at: chrono::Utc::now(),
            })
            .await
        {
            tracing::warn!("cache history write failed: {e}");
        }
        true
    }

    pub async fn clear_cache(&self) {
        if let Err(e) = self.cache.clear().await {
            tracing::warn!("cache clear failed: {e}");
        }
    }
}
