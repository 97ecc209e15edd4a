//! In-memory document store with live queries.
//!
//! The local stand-in for the remote multi-document store: per-collection
//! document maps, point writes, and per-subscription fan-out of full,
//! freshly sorted snapshots on every mutation. Never delivers deltas.

use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::document::{Document, DocumentId, FieldMap, Snapshot, Timestamp};
use crate::ordering::SortKey;
use crate::store::{CollectionPath, DocumentStore, SnapshotEvent, StoreError};

struct Subscriber {
    path: CollectionPath,
    sort: SortKey,
    tx: Sender<SnapshotEvent>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<CollectionPath, BTreeMap<DocumentId, Document>>,
    subscribers: Vec<Subscriber>,
    tick: u64,
    offline: bool,
}

impl Inner {
    fn next_tick(&mut self) -> Timestamp {
        self.tick += 1;
        Timestamp::from_tick(self.tick)
    }

    fn documents(&self, path: &CollectionPath) -> Snapshot {
        self.collections
            .get(path)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Push the current result set to every subscriber of `path`, pruning
    /// subscribers whose receiver is gone.
    fn notify(&mut self, path: &CollectionPath) {
        let docs = self.documents(path);
        self.subscribers.retain(|sub| {
            if sub.path != *path {
                return true;
            }
            let mut snapshot = docs.clone();
            sub.sort.sort(&mut snapshot);
            sub.tx.send(SnapshotEvent::Snapshot(snapshot)).is_ok()
        });
    }
}

/// In-memory implementation of the DocumentStore trait.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: Mutex<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate lost connectivity: writes fail until cleared. Open
    /// subscriptions stay attached.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.offline = offline;
        }
    }

    /// Terminate every subscription on one collection with a permission
    /// error. Sibling collections are untouched.
    pub fn revoke(&self, path: &CollectionPath) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.subscribers.retain(|sub| {
                if sub.path != *path {
                    return true;
                }
                let _ = sub.tx.send(SnapshotEvent::Failed(StoreError::PermissionDenied(
                    path.to_string(),
                )));
                false
            });
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn create(&self, path: &CollectionPath, fields: FieldMap) -> Result<DocumentId, StoreError> {
        let mut inner = self.lock()?;
        if inner.offline {
            return Err(StoreError::Unavailable("offline".into()));
        }
        let id = DocumentId::new(Uuid::new_v4().simple().to_string());
        let stamp = inner.next_tick();
        let document = Document {
            id: id.clone(),
            fields,
            created_at: stamp,
            updated_at: stamp,
        };
        inner
            .collections
            .entry(path.clone())
            .or_default()
            .insert(id.clone(), document);
        inner.notify(path);
        Ok(id)
    }

    fn update(
        &self,
        path: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.offline {
            return Err(StoreError::Unavailable("offline".into()));
        }
        let stamp = inner.next_tick();
        let document = inner
            .collections
            .get_mut(path)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        document.fields = fields;
        document.updated_at = stamp;
        inner.notify(path);
        Ok(())
    }

    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.offline {
            return Err(StoreError::Unavailable("offline".into()));
        }
        let removed = inner
            .collections
            .get_mut(path)
            .and_then(|docs| docs.remove(id));
        if removed.is_some() {
            inner.notify(path);
        }
        Ok(())
    }

    fn subscribe(
        &self,
        path: &CollectionPath,
        sort: SortKey,
    ) -> Result<Receiver<SnapshotEvent>, StoreError> {
        let mut inner = self.lock()?;
        let (tx, rx) = mpsc::channel();
        let mut snapshot = inner.documents(path);
        sort.sort(&mut snapshot);
        let _ = tx.send(SnapshotEvent::Snapshot(snapshot));
        inner.subscribers.push(Subscriber {
            path: path.clone(),
            sort,
            tx,
        });
        Ok(rx)
    }
}
