//! Realtime synchronization and editing-state layer for the labhub
//! workspace.
//!
//! Each catalog's authoritative remote state is mirrored into a local
//! snapshot ([`sync::CollectionSync`]), combined with an in-place
//! create/edit/view state machine ([`edit::EditSession`]) behind one
//! generic per-catalog engine ([`controller::CatalogController`]). The
//! dashboard aggregates catalog sizes over four independent subscriptions
//! ([`dashboard::DashboardAggregator`]); [`shell::Shell`] owns the session
//! and whichever view is mounted.

pub mod controller;
pub mod dashboard;
pub mod edit;
pub mod error;
pub mod session;
pub mod shell;
pub mod summary;
pub mod sync;

pub use controller::*;
pub use dashboard::*;
pub use edit::*;
pub use error::*;
pub use session::*;
pub use shell::*;
pub use summary::*;
pub use sync::*;
