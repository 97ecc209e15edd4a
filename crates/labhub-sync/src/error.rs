//! Error types for the synchronization layer.
//!
//! No error here is fatal: connectivity failures surface as banners,
//! validation failures keep the draft, and subscription failures stay
//! scoped to their own collection.

use thiserror::Error;

use labhub_core::catalog::ValidationError;
use labhub_core::document::DocumentId;
use labhub_core::store::StoreError;

/// Result alias for sync-layer operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors surfaced by the synchronization and editing layer.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The store could not be reached or refused the operation. The draft,
    /// if any, is retained.
    #[error("store error: {0}")]
    Connectivity(#[from] StoreError),

    /// The draft failed schema validation; no request was issued.
    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The field is not part of the catalog schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The document is not in the current snapshot.
    #[error("document not in snapshot: {0}")]
    NotInSnapshot(DocumentId),

    /// save() or a draft edit was attempted outside Creating/Editing.
    #[error("no active draft")]
    NoActiveDraft,

    /// No session has been acquired yet.
    #[error("session unavailable")]
    SessionUnavailable,

    /// The session boundary failed to produce an identity.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors from the session boundary.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("session unavailable: {0}")]
    Unavailable(String),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
