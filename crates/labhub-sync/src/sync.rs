//! Live mirror of one remote collection.

use std::sync::mpsc::Receiver;

use tracing::{debug, warn};

use labhub_core::document::{Document, DocumentId, Snapshot};
use labhub_core::ordering::SortKey;
use labhub_core::store::{CollectionPath, DocumentStore, SnapshotEvent, StoreError};

/// Lifecycle state of one collection subscription.
#[derive(Debug, Clone)]
pub enum SyncState {
    /// Subscribed, nothing delivered yet.
    Loading,
    /// At least one snapshot applied; mirroring the remote state.
    Live,
    /// Terminal subscription failure, scoped to this handle. The snapshot
    /// stays at its last applied value.
    Failed(StoreError),
    /// Closed by the owner.
    Closed,
}

impl SyncState {
    pub fn is_live(&self) -> bool {
        matches!(self, SyncState::Live)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncState::Failed(_))
    }
}

/// Mirrors the authoritative remote state of one collection into a local,
/// renderable snapshot.
///
/// The snapshot is replaced wholesale on every applied delivery; it is
/// never patched incrementally, so missed intermediate deliveries cannot
/// cause drift.
pub struct CollectionSync {
    path: CollectionPath,
    rx: Option<Receiver<SnapshotEvent>>,
    snapshot: Snapshot,
    state: SyncState,
}

impl CollectionSync {
    /// Open a live query. A failed subscribe yields a handle already in
    /// `SyncState::Failed`; the error never crosses to sibling handles.
    pub fn open(store: &dyn DocumentStore, path: CollectionPath, sort: SortKey) -> Self {
        match store.subscribe(&path, sort) {
            Ok(rx) => Self {
                path,
                rx: Some(rx),
                snapshot: Vec::new(),
                state: SyncState::Loading,
            },
            Err(err) => {
                warn!(path = %path, error = %err, "subscription failed to open");
                Self {
                    path,
                    rx: None,
                    snapshot: Vec::new(),
                    state: SyncState::Failed(err),
                }
            }
        }
    }

    /// Drain queued deliveries and apply the newest snapshot.
    ///
    /// Deliveries are consumed in arrival order; when several snapshots
    /// queued up between pumps, intermediate ones are dropped and only the
    /// latest is applied. A terminal failure detaches the subscription.
    /// Returns true when the snapshot was replaced.
    pub fn pump(&mut self) -> bool {
        let Some(rx) = &self.rx else {
            return false;
        };

        let mut latest: Option<Snapshot> = None;
        let mut failure: Option<StoreError> = None;
        for event in rx.try_iter() {
            match event {
                SnapshotEvent::Snapshot(snapshot) => latest = Some(snapshot),
                SnapshotEvent::Failed(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let mut applied = false;
        if let Some(snapshot) = latest {
            debug!(path = %self.path, len = snapshot.len(), "snapshot applied");
            self.snapshot = snapshot;
            self.state = SyncState::Live;
            applied = true;
        }
        if let Some(err) = failure {
            warn!(path = %self.path, error = %err, "subscription terminated");
            self.rx = None;
            self.state = SyncState::Failed(err);
        }
        applied
    }

    /// Stop delivery and release the subscription. Idempotent; deliveries
    /// still queued at close time are discarded, never applied.
    pub fn close(&mut self) {
        if self.rx.take().is_some() {
            debug!(path = %self.path, "subscription closed");
        }
        self.state = SyncState::Closed;
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn snapshot(&self) -> &[Document] {
        &self.snapshot
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.snapshot.iter().find(|doc| doc.id == *id)
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}
