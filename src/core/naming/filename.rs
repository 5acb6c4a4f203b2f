//! Canonical note filenames
//!
//! The same name is used to look up destinations during dedup and to write the
//! output file, so it must be a pure function of the remote name and label.

use super::date::{DateExtractor, ExtractedDate};
use chrono::NaiveDate;

/// Default label prefixed to every note filename
pub const DEFAULT_NOTE_LABEL: &str = "TS";

/// Replace characters that are unsafe in a filename on the destination volumes
pub fn sanitize_name(name: &str) -> String {
    name.replace(['/', ':'], "-")
}

/// Build `"<label>. <YYYY-MM-DD> - <sanitized-name>.md"`
pub fn canonical_filename(label: &str, date: NaiveDate, name: &str) -> String {
    format!(
        "{label}. {} - {}.md",
        date.format("%Y-%m-%d"),
        sanitize_name(name)
    )
}

/// The resolved output name for one remote item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteName {
    pub date: ExtractedDate,
    pub file_name: String,
}

/// Derives canonical filenames from remote item names
#[derive(Debug, Clone)]
pub struct NoteNamer {
    label: String,
    extractor: DateExtractor,
}

impl Default for NoteNamer {
    fn default() -> Self {
        Self::new(DEFAULT_NOTE_LABEL, DateExtractor::default())
    }
}

impl NoteNamer {
    pub fn new(label: impl Into<String>, extractor: DateExtractor) -> Self {
        Self {
            label: label.into(),
            extractor,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extractor(&self) -> &DateExtractor {
        &self.extractor
    }

    /// Resolve the extracted date and canonical filename for `remote_name`
    pub fn name_for(&self, remote_name: &str) -> NoteName {
        let date = self.extractor.extract_detailed(remote_name);
        NoteName {
            file_name: canonical_filename(&self.label, date.date, remote_name),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::naming::DateStrategy;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("a/b:c"), "a-b-c");
        assert_eq!(sanitize_name("12:58 PST"), "12-58 PST");
        assert_eq!(sanitize_name("plain"), "plain");
    }

    #[test]
    fn test_canonical_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 26).unwrap();
        let name = canonical_filename("TS", date, "Weekly Sync - 2024/11/26 12:58 PST - notes");
        assert_eq!(
            name,
            "TS. 2024-11-26 - Weekly Sync - 2024-11-26 12-58 PST - notes.md"
        );
    }

    #[test]
    fn test_note_namer_uses_extracted_date() {
        let namer = NoteNamer::default();
        let note = namer.name_for("Call (2024-07-11 15:23 GMT-7) notes");

        assert_eq!(note.date.strategy, DateStrategy::ParenthesizedIso);
        assert_eq!(note.file_name, "TS. 2024-07-11 - Call (2024-07-11 15-23 GMT-7) notes.md");
    }

    #[test]
    fn test_note_namer_custom_label() {
        let namer = NoteNamer::new("MTG", DateExtractor::default());
        let note = namer.name_for("Sync - 2024/01/02 - Transcript");
        assert!(note.file_name.starts_with("MTG. 2024-01-02 - "));
        assert_eq!(namer.label(), "MTG");
    }
}
