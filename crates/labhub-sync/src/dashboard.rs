//! Aggregated catalog sizes for the dashboard.

use serde::{Deserialize, Serialize};

use labhub_core::catalog::Catalog;
use labhub_core::store::{CollectionPath, DocumentStore};

use crate::sync::CollectionSync;

/// Cardinality of each catalog.
///
/// The four counts update field-by-field as each underlying subscription
/// delivers; they are never atomically consistent with one another, only
/// eventually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub projects: usize,
    pub experiments: usize,
    pub wiki_pages: usize,
    pub references: usize,
}

/// Four independent count-only subscriptions, one per catalog, each with
/// its own lifecycle and failure domain.
pub struct DashboardAggregator {
    projects: CollectionSync,
    experiments: CollectionSync,
    wiki: CollectionSync,
    references: CollectionSync,
}

impl DashboardAggregator {
    pub fn open(store: &dyn DocumentStore, namespace: &str) -> Self {
        let open = |catalog: Catalog| {
            let schema = catalog.schema();
            CollectionSync::open(
                store,
                CollectionPath::new(namespace, catalog.collection()),
                schema.order,
            )
        };
        Self {
            projects: open(Catalog::Projects),
            experiments: open(Catalog::Experiments),
            wiki: open(Catalog::Wiki),
            references: open(Catalog::References),
        }
    }

    /// Drain pending deliveries on every catalog; each advances on its own
    /// schedule. Returns true if any count may have changed.
    pub fn pump(&mut self) -> bool {
        let projects = self.projects.pump();
        let experiments = self.experiments.pump();
        let wiki = self.wiki.pump();
        let references = self.references.pump();
        projects || experiments || wiki || references
    }

    pub fn counts(&self) -> DashboardCounts {
        DashboardCounts {
            projects: self.projects.len(),
            experiments: self.experiments.len(),
            wiki_pages: self.wiki.len(),
            references: self.references.len(),
        }
    }

    /// Release all four subscriptions. Idempotent.
    pub fn close(&mut self) {
        self.projects.close();
        self.experiments.close();
        self.wiki.close();
        self.references.close();
    }
}
