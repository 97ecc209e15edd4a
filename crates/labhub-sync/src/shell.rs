//! Top-level session holder and view mounting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use labhub_core::catalog::Catalog;
use labhub_core::store::{DocumentStore, DEFAULT_NAMESPACE};

use crate::controller::CatalogController;
use crate::dashboard::DashboardAggregator;
use crate::error::{Result, SyncError};
use crate::session::{SessionIdentity, SessionLifecycle, SessionProvider};

/// Deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Application namespace isolating this deployment's collections from
    /// other tenants of the same store.
    pub namespace: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// The currently mounted view.
pub enum ActiveView {
    None,
    Dashboard(DashboardAggregator),
    Catalog(CatalogController),
}

/// Owns the session lifecycle and whichever view is mounted.
///
/// Opening a view tears the previous one down, unconditionally releasing
/// its subscriptions. Until a session is acquired every view open fails
/// and the shell stays in its loading state.
pub struct Shell {
    store: Arc<dyn DocumentStore>,
    config: ShellConfig,
    session: SessionLifecycle,
    view: ActiveView,
}

impl Shell {
    pub fn new(store: Arc<dyn DocumentStore>, config: ShellConfig) -> Self {
        Self {
            store,
            config,
            session: SessionLifecycle::new(),
            view: ActiveView::None,
        }
    }

    /// Acquire the session through the given boundary; idempotent.
    pub fn sign_in(&mut self, provider: &dyn SessionProvider) -> Result<SessionIdentity> {
        Ok(self.session.acquire(provider)?)
    }

    pub fn session(&mut self) -> &mut SessionLifecycle {
        &mut self.session
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.current().is_some()
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    /// The mounted catalog controller, if one is mounted.
    pub fn catalog(&mut self) -> Option<&mut CatalogController> {
        match &mut self.view {
            ActiveView::Catalog(controller) => Some(controller),
            _ => None,
        }
    }

    /// The mounted dashboard, if mounted.
    pub fn dashboard(&mut self) -> Option<&mut DashboardAggregator> {
        match &mut self.view {
            ActiveView::Dashboard(dashboard) => Some(dashboard),
            _ => None,
        }
    }

    /// Mount the dashboard, unmounting whatever was active.
    pub fn open_dashboard(&mut self) -> Result<()> {
        self.require_session()?;
        self.unmount();
        info!("dashboard mounted");
        self.view = ActiveView::Dashboard(DashboardAggregator::open(
            self.store.as_ref(),
            &self.config.namespace,
        ));
        Ok(())
    }

    /// Mount one catalog, unmounting whatever was active.
    pub fn open_catalog(&mut self, catalog: Catalog) -> Result<()> {
        let identity = self.require_session()?;
        self.unmount();
        info!(catalog = %catalog, "catalog mounted");
        self.view = ActiveView::Catalog(CatalogController::open(
            self.store.clone(),
            &self.config.namespace,
            catalog.schema(),
            identity,
        ));
        Ok(())
    }

    /// Tear down the mounted view, releasing its subscriptions.
    pub fn unmount(&mut self) {
        match &mut self.view {
            ActiveView::Dashboard(dashboard) => dashboard.close(),
            ActiveView::Catalog(controller) => controller.close(),
            ActiveView::None => {}
        }
        self.view = ActiveView::None;
    }

    /// Drive pending deliveries for the mounted view.
    pub fn pump(&mut self) -> bool {
        match &mut self.view {
            ActiveView::Dashboard(dashboard) => dashboard.pump(),
            ActiveView::Catalog(controller) => controller.pump(),
            ActiveView::None => false,
        }
    }

    fn require_session(&self) -> Result<SessionIdentity> {
        self.session
            .current()
            .cloned()
            .ok_or(SyncError::SessionUnavailable)
    }
}
