//! The generic catalog engine.
//!
//! Composes one collection mirror with one edit session and the catalog's
//! schema rules (required fields, normalization, ordering, authorship,
//! search). Instantiated once per catalog; the differences between the
//! four catalogs are configuration data, not code.

use std::sync::Arc;

use tracing::debug;

use labhub_core::catalog::{Catalog, CatalogSchema};
use labhub_core::document::{Document, DocumentId, FieldMap, Value};
use labhub_core::store::{CollectionPath, DocumentStore};

use crate::edit::{EditMode, EditSession};
use crate::error::{Result, SyncError};
use crate::session::SessionIdentity;
use crate::sync::{CollectionSync, SyncState};

/// Outcome of the destructive-action confirmation prompt, decided by the
/// presentation layer before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// One catalog's controller: live snapshot, edit state, and write paths.
pub struct CatalogController {
    schema: CatalogSchema,
    path: CollectionPath,
    store: Arc<dyn DocumentStore>,
    sync: CollectionSync,
    edit: EditSession,
    identity: SessionIdentity,
}

impl CatalogController {
    /// Open the catalog's live query with an idle edit session.
    pub fn open(
        store: Arc<dyn DocumentStore>,
        namespace: &str,
        schema: CatalogSchema,
        identity: SessionIdentity,
    ) -> Self {
        let path = CollectionPath::new(namespace, schema.catalog.collection());
        let sync = CollectionSync::open(store.as_ref(), path.clone(), schema.order.clone());
        Self {
            schema,
            path,
            store,
            sync,
            edit: EditSession::new(),
            identity,
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.schema.catalog
    }

    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    pub fn snapshot(&self) -> &[Document] {
        self.sync.snapshot()
    }

    pub fn sync_state(&self) -> &SyncState {
        self.sync.state()
    }

    pub fn edit_state(&self) -> &EditMode {
        self.edit.mode()
    }

    pub fn draft(&self) -> &FieldMap {
        self.edit.draft()
    }

    /// Apply pending remote deliveries. The edit state is deliberately left
    /// alone: an in-progress draft survives snapshot replacements.
    pub fn pump(&mut self) -> bool {
        self.sync.pump()
    }

    /// Begin composing a new item from the schema's initial values.
    pub fn start_create(&mut self) {
        self.edit.start_create(self.schema.initial_draft());
    }

    /// Begin editing an item from the current snapshot.
    pub fn start_edit(&mut self, id: &DocumentId) -> Result<()> {
        let item = self
            .sync
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::NotInSnapshot(id.clone()))?;
        self.edit.start_edit(&item);
        Ok(())
    }

    /// Select an item. While a draft is open the call is ignored, except in
    /// catalogs with exclusive selection, where selecting discards the
    /// draft first (the wiki list behaves this way).
    pub fn select(&mut self, id: DocumentId) {
        if self.edit.mode().is_viewing() {
            self.edit.select(id);
        } else if self.schema.exclusive_selection {
            self.edit.cancel();
            self.edit.select(id);
        }
    }

    pub fn selected(&self) -> Option<&Document> {
        self.edit.selected().and_then(|id| self.sync.get(id))
    }

    /// Set one draft field. Unknown fields are rejected up front; there
    /// must be a live draft.
    pub fn update_draft_field(&mut self, name: &str, value: Value) -> Result<()> {
        if !self.edit.mode().has_draft() {
            return Err(SyncError::NoActiveDraft);
        }
        if self.schema.field(name).is_none() {
            return Err(SyncError::UnknownField(name.to_string()));
        }
        self.edit.set_field(name, value);
        Ok(())
    }

    /// Persist the draft.
    ///
    /// Validation failure issues no store call; store failure leaves the
    /// mode and draft untouched, so the user's input is never lost. Saving
    /// a draft started from a since-updated copy overwrites the remote
    /// change: last write wins, no conflict detection.
    pub fn save(&mut self) -> Result<DocumentId> {
        let target = match self.edit.mode() {
            EditMode::Creating => None,
            EditMode::Editing { target } => Some(target.clone()),
            EditMode::Viewing { .. } => return Err(SyncError::NoActiveDraft),
        };

        let mut fields = self.schema.normalized(self.edit.draft());
        self.schema.validate(&fields).map_err(SyncError::Validation)?;
        fields.insert(
            self.schema.author_field.clone(),
            Value::text(self.identity.short_id()),
        );

        let id = match target {
            Some(id) => {
                self.store.update(&self.path, &id, fields)?;
                id
            }
            None => self.store.create(&self.path, fields)?,
        };
        debug!(path = %self.path, id = %id, "draft persisted");
        self.edit.finish_save();
        Ok(id)
    }

    /// Discard the draft and return to viewing nothing.
    pub fn cancel(&mut self) {
        self.edit.cancel();
    }

    /// Delete after explicit confirmation; declining is a pure no-op. If
    /// the deleted id was selected, the selection clears.
    pub fn delete(&mut self, id: &DocumentId, confirmation: Confirmation) -> Result<()> {
        if confirmation == Confirmation::Declined {
            return Ok(());
        }
        self.store.delete(&self.path, id)?;
        debug!(path = %self.path, id = %id, "document deleted");
        self.edit.deselect(id);
        Ok(())
    }

    /// Case-insensitive substring search over the schema's search fields,
    /// evaluated against the full current snapshot. Catalogs without
    /// search fields return the snapshot unfiltered.
    pub fn search(&self, term: &str) -> Vec<&Document> {
        let needle = term.to_lowercase();
        self.sync
            .snapshot()
            .iter()
            .filter(|doc| {
                needle.is_empty()
                    || self.schema.search_fields.is_empty()
                    || matches(&self.schema, doc, &needle)
            })
            .collect()
    }

    /// Close the live query. Idempotent; the edit state is dropped with
    /// the controller.
    pub fn close(&mut self) {
        self.sync.close();
    }
}

fn matches(schema: &CatalogSchema, doc: &Document, needle: &str) -> bool {
    schema
        .search_fields
        .iter()
        .any(|field| match doc.fields.get(field.as_str()) {
            Some(Value::Text(text)) => text.to_lowercase().contains(needle),
            Some(Value::TextList(items)) => {
                items.iter().any(|item| item.to_lowercase().contains(needle))
            }
            None => false,
        })
}
