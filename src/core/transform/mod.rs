//! Note transformation
//!
//! Turns a downloaded transcript into the Markdown note written to the vault:
//!
//! - [`related`] - per-folder related-notes annotation strategies
//! - [`note`] - header and callout assembly

pub mod note;
pub mod related;

pub use note::{NoteBuilder, DEFAULT_CREATOR_LINK};
pub use related::{RelatedNotes, DEFAULT_DAILY_NOTE_FORMAT};
