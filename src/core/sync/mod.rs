//! Sync orchestration
//!
//! - [`coordinator`] - one pass over all mappings with per-item failure isolation
//! - [`summary`] - run statistics

pub mod coordinator;
pub mod summary;

pub use coordinator::{SyncContext, SyncCoordinator, SyncMapping};
pub use summary::{RunError, RunErrorKind, RunStats};
