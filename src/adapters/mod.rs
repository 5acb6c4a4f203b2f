//! External system integrations.
//!
//! - [`drive`] - Google Drive document source (trait-based, with an
//!   in-memory implementation for tests)

pub mod drive;
