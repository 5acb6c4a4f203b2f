//! Markdown note assembly
//!
//! Each note is the downloaded transcript prefixed with a provenance header
//! and a collapsible related-notes callout:
//!
//! ```text
//! *Created by [[Transcript Syncer]] at 2024-11-26 13.05.42*
//!
//! > [!-cf-]+ [[Related notes]]
//! > - [[Dashboard. Dragon]]
//!
//!
//!
//!
//! ---
//!
//! <transcript body>
//! ```

use super::related::RelatedNotes;
use crate::core::naming::DateExtractor;
use crate::domain::FolderId;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Default wiki-link naming the tool in the provenance line
pub const DEFAULT_CREATOR_LINK: &str = "[[Transcript Syncer]]";

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H.%M.%S";

/// Builds the final note text for a transcript
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    creator_link: String,
    related: HashMap<FolderId, RelatedNotes>,
    default_related: RelatedNotes,
    extractor: DateExtractor,
}

impl Default for NoteBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CREATOR_LINK, RelatedNotes::default())
    }
}

impl NoteBuilder {
    pub fn new(creator_link: impl Into<String>, default_related: RelatedNotes) -> Self {
        Self {
            creator_link: creator_link.into(),
            related: HashMap::new(),
            default_related,
            extractor: DateExtractor::default(),
        }
    }

    /// Use `extractor` when the date has to be recovered from a remote name
    pub fn with_extractor(mut self, extractor: DateExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Register the related-notes strategy for one source folder
    pub fn with_related(mut self, folder: FolderId, related: RelatedNotes) -> Self {
        self.related.insert(folder, related);
        self
    }

    /// Strategy used for `folder`, falling back to the default
    pub fn related_for(&self, folder: &FolderId) -> &RelatedNotes {
        self.related.get(folder).unwrap_or(&self.default_related)
    }

    /// Build a note for the remote item called `remote_name`
    ///
    /// The date is extracted from the remote name, not the canonical file
    /// name: sanitizing rewrites the slash dates the extractor looks for.
    pub fn build_note(&self, content: &str, remote_name: &str, folder: &FolderId) -> String {
        let date = self.extractor.extract(remote_name);
        self.build_note_for_date(content, date, folder)
    }

    /// Build a note when the transcript date is already known
    pub fn build_note_for_date(&self, content: &str, date: NaiveDate, folder: &FolderId) -> String {
        self.render(content, date, folder, Local::now().naive_local())
    }

    fn render(
        &self,
        content: &str,
        date: NaiveDate,
        folder: &FolderId,
        created_at: NaiveDateTime,
    ) -> String {
        let related = self.related_for(folder).render(date);
        format!(
            "*Created by {creator} at {created}*\n\
             \n\
             > [!-cf-]+ [[Related notes]]\n\
             > - {related}\n\
             \n\
             \n\
             \n\
             \n\
             ---\n\
             \n\
             {content}",
            creator = self.creator_link,
            created = created_at.format(CREATED_AT_FORMAT),
        )
    }
}
