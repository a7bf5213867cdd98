//! # Editor State Store
//!
//! Holds the single in-memory document for one editing session and
//! exposes the path-addressed mutation primitives.
//!
//! ## Lifecycle
//!
//! ```text
//! Unloaded → Loading → Loaded(source) → Editing → Saving
//!                            ↑                      ↓
//!                            └──────────────────────┤
//!                                                   └→ SaveFailed
//! ```
//!
//! Every update replaces the document value wholesale — nothing is
//! mutated in place, so a previously captured document remains a
//! valid, unaffected snapshot.

use serde_json::{Map, Value};

use pageforge_content::{baseline_document, complete, ContentDocument};
use pageforge_store::{LoadSource, LoadedDocument};

use crate::errors::EditorError;

/// Where the document is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPhase {
    Unloaded,
    /// Probing the remote store.
    Loading,
    Loaded(LoadSource),
    /// Dirty; entered by any mutation.
    Editing,
    Saving,
    /// Save failed; dirty remains set.
    SaveFailed,
}

/// Single in-memory document with dirty tracking.
pub struct EditorStateStore {
    document: ContentDocument,
    phase: DocumentPhase,
    source: LoadSource,
    dirty: bool,
    /// Increments on each mutation.
    version: u64,
}

impl EditorStateStore {
    pub fn unloaded() -> Self {
        Self {
            document: ContentDocument::new(),
            phase: DocumentPhase::Unloaded,
            source: LoadSource::Defaults,
            dirty: false,
            version: 0,
        }
    }

    pub fn begin_loading(&mut self) {
        self.phase = DocumentPhase::Loading;
    }

    /// Install a freshly loaded document. Clears dirtiness; this is a
    /// load, not an edit.
    pub fn finish_load(&mut self, loaded: LoadedDocument) {
        self.document = loaded.document;
        self.source = loaded.source;
        self.phase = DocumentPhase::Loaded(loaded.source);
        self.dirty = false;
    }

    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    pub fn phase(&self) -> DocumentPhase {
        self.phase
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the value at a dot-separated path. Intermediate maps
    /// are created when absent. Single point of truth for dirty
    /// tracking: every mutation primitive funnels through here.
    pub fn update_section(&mut self, path: &str, value: Value) {
        let mut next = self.document.clone();
        next.set_path(path, value);
        self.document = next;
        self.dirty = true;
        self.version += 1;
        self.phase = DocumentPhase::Editing;
    }

    /// Field-level update inside a section.
    ///
    /// With `index`, replaces `field` on the item at that position of
    /// the section's ordered collection, via an immutable copy of the
    /// collection. Without `index`, shallow-merges `{field: value}`
    /// into the section map.
    pub fn update_nested_field(
        &mut self,
        section_path: &str,
        index: Option<usize>,
        field: &str,
        value: Value,
    ) -> Result<(), EditorError> {
        match index {
            Some(index) => {
                let items = self
                    .document
                    .get_path(section_path)
                    .and_then(|v| v.as_array())
                    .ok_or_else(|| {
                        EditorError::InvalidTarget(format!("{section_path} is not a collection"))
                    })?;
                if index >= items.len() {
                    return Err(EditorError::InvalidTarget(format!(
                        "{section_path}[{index}] is out of bounds"
                    )));
                }
                let mut items = items.clone();
                let mut item = items[index].as_object().cloned().unwrap_or_default();
                item.insert(field.to_string(), value);
                items[index] = Value::Object(item);
                self.update_section(section_path, Value::Array(items));
            }
            None => {
                let mut section = self
                    .document
                    .get_path(section_path)
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_else(Map::new);
                section.insert(field.to_string(), value);
                self.update_section(section_path, Value::Object(section));
            }
        }
        Ok(())
    }

    /// Replace the whole document with an edited value (whole-document
    /// mode). An edit like any other: dirty, versioned.
    pub fn set_document(&mut self, document: ContentDocument) {
        self.document = document;
        self.dirty = true;
        self.version += 1;
        self.phase = DocumentPhase::Editing;
    }

    /// Adopt a document re-fetched mid-save (section-scoped reload).
    /// Phase and dirtiness are settled by the save outcome.
    pub fn adopt_reloaded(&mut self, loaded: LoadedDocument) {
        self.document = loaded.document;
        self.source = loaded.source;
    }

    pub fn begin_save(&mut self) {
        self.phase = DocumentPhase::Saving;
    }

    pub fn save_succeeded(&mut self) {
        self.dirty = false;
        self.phase = DocumentPhase::Loaded(self.source);
    }

    pub fn save_failed(&mut self) {
        self.phase = DocumentPhase::SaveFailed;
    }

    /// Reset straight to the migrated compiled defaults.
    pub fn reset_to_defaults(&mut self) {
        self.finish_load(LoadedDocument {
            document: complete(baseline_document()),
            source: LoadSource::Defaults,
        });
    }
}
