//! The remote multi-document store boundary.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Receiver;

use crate::document::{DocumentId, FieldMap, Snapshot};
use crate::ordering::SortKey;

/// Default application namespace shared by every catalog.
pub const DEFAULT_NAMESPACE: &str = "lab-hub";

/// Address of one collection inside the store.
///
/// All catalogs live under one fixed application namespace, isolating this
/// deployment's data from any other tenant of the same store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionPath {
    namespace: String,
    collection: String,
}

impl CollectionPath {
    pub fn new(namespace: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collection: collection.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.collection)
    }
}

/// One delivery on a live query subscription.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// The full ordered result set after a change.
    Snapshot(Snapshot),
    /// Terminal subscription failure; no further deliveries follow.
    Failed(StoreError),
}

/// The trait all document store backends implement.
///
/// Writes are not cancellable once issued; a caller that changes mode while
/// a write is pending must tolerate the write completing and a later
/// snapshot including its effect.
pub trait DocumentStore: Send + Sync {
    /// Create a document; the store assigns its id and timestamps.
    fn create(&self, path: &CollectionPath, fields: FieldMap) -> Result<DocumentId, StoreError>;

    /// Overwrite a document's fields wholesale, preserving its creation
    /// timestamp. No field-level merge.
    fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting an unknown id is not an error.
    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<(), StoreError>;

    /// Open a live query. The current snapshot is delivered immediately,
    /// then the full re-sorted result set after every change to the
    /// collection. Dropping the receiver detaches the subscription.
    fn subscribe(
        &self,
        path: &CollectionPath,
        sort: SortKey,
    ) -> Result<Receiver<SnapshotEvent>, StoreError>;
}

/// Errors from the document store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("storage error: {0}")]
    Storage(String),
}
