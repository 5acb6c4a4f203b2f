//! Filename date extraction and canonical note naming

pub mod date;
pub mod filename;

pub use date::{DateExtractor, DateStrategy, ExtractedDate, DEFAULT_LABELED_MARKER};
pub use filename::{
    canonical_filename, sanitize_name, NoteName, NoteNamer, DEFAULT_NOTE_LABEL,
};
