//! Session identity and lifecycle.
//!
//! The identity is an explicit value threaded into every component that
//! stamps authorship; the lifecycle object acquires it once and broadcasts
//! changes to watchers.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use uuid::Uuid;

use crate::error::SessionError;

/// Length of the short attribution form of a session id.
const SHORT_ID_LEN: usize = 6;

/// An authenticated session identity with a stable opaque id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    id: String,
}

impl SessionIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Short display form used for authorship attribution.
    pub fn short_id(&self) -> &str {
        self.id.get(..SHORT_ID_LEN).unwrap_or(&self.id)
    }
}

/// Boundary able to mint an authenticated session.
pub trait SessionProvider: Send + Sync {
    fn acquire_anonymous(&self) -> Result<SessionIdentity, SessionError>;
}

/// Local provider minting anonymous uuid-backed identities.
#[derive(Debug, Default)]
pub struct AnonymousSessions;

impl SessionProvider for AnonymousSessions {
    fn acquire_anonymous(&self) -> Result<SessionIdentity, SessionError> {
        Ok(SessionIdentity::new(Uuid::new_v4().simple().to_string()))
    }
}

/// Process-wide session holder: acquire once, broadcast changes.
#[derive(Default)]
pub struct SessionLifecycle {
    current: Option<SessionIdentity>,
    watchers: Vec<Sender<Option<SessionIdentity>>>,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a session if none is held yet; idempotent once one exists.
    pub fn acquire(
        &mut self,
        provider: &dyn SessionProvider,
    ) -> Result<SessionIdentity, SessionError> {
        if let Some(current) = &self.current {
            return Ok(current.clone());
        }
        let identity = provider.acquire_anonymous()?;
        tracing::info!(session = identity.short_id(), "session acquired");
        self.current = Some(identity.clone());
        self.broadcast();
        Ok(identity)
    }

    pub fn current(&self) -> Option<&SessionIdentity> {
        self.current.as_ref()
    }

    /// Observe identity changes. The current value (or none) is delivered
    /// immediately, then once per change.
    pub fn watch(&mut self) -> Receiver<Option<SessionIdentity>> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.current.clone());
        self.watchers.push(tx);
        rx
    }

    fn broadcast(&mut self) {
        let current = self.current.clone();
        self.watchers.retain(|tx| tx.send(current.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_to_six() {
        let identity = SessionIdentity::new("abcdef123456");
        assert_eq!(identity.short_id(), "abcdef");

        let tiny = SessionIdentity::new("ab");
        assert_eq!(tiny.short_id(), "ab");
    }

    #[test]
    fn acquire_is_idempotent() {
        let mut lifecycle = SessionLifecycle::new();
        let first = lifecycle.acquire(&AnonymousSessions).unwrap();
        let second = lifecycle.acquire(&AnonymousSessions).unwrap();
        assert_eq!(first, second);
        assert_eq!(lifecycle.current(), Some(&first));
    }

    #[test]
    fn watchers_see_the_current_identity_immediately() {
        let mut lifecycle = SessionLifecycle::new();
        let before = lifecycle.watch();
        assert_eq!(before.try_recv().unwrap(), None);

        let identity = lifecycle.acquire(&AnonymousSessions).unwrap();
        assert_eq!(before.try_recv().unwrap(), Some(identity.clone()));

        let after = lifecycle.watch();
        assert_eq!(after.try_recv().unwrap(), Some(identity));
    }

    #[test]
    fn failing_provider_leaves_no_session() {
        struct Failing;
        impl SessionProvider for Failing {
            fn acquire_anonymous(&self) -> Result<SessionIdentity, SessionError> {
                Err(SessionError::Unavailable("auth backend down".into()))
            }
        }

        let mut lifecycle = SessionLifecycle::new();
        assert!(lifecycle.acquire(&Failing).is_err());
        assert!(lifecycle.current().is_none());
    }
}
