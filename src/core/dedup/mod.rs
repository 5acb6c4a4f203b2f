//! At-most-once processing decision
//!
//! An item is processed only if neither the ledger nor any configured
//! destination directory shows evidence that it was already handled. The
//! filesystem check makes the pipeline idempotent even when the ledger is
//! lost or reset: a missing ledger costs extra disk lookups, never duplicate
//! output.
//!
//! Every destination is checked, not just the one the item's own folder maps
//! to, so a note that landed under a different mapping is not re-created.

use crate::core::naming::{NoteName, NoteNamer};
use crate::core::state::TrackedLedger;
use crate::domain::{RemoteItem, Result};
use std::path::PathBuf;

/// Outcome of the dedup check for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Not seen before; write it as `note`
    Process(NoteName),
    /// Already recorded in the ledger
    InLedger,
    /// Not in the ledger, but the note exists on disk; the ledger was healed
    FoundOnDisk { path: PathBuf },
}

impl Decision {
    pub fn should_process(&self) -> bool {
        matches!(self, Decision::Process(_))
    }
}

/// Ledger + filesystem dedup check
#[derive(Debug, Clone)]
pub struct DedupEngine {
    namer: NoteNamer,
    destinations: Vec<PathBuf>,
}

impl DedupEngine {
    /// Create an engine checking `destinations` in order
    pub fn new(namer: NoteNamer, destinations: Vec<PathBuf>) -> Self {
        Self {
            namer,
            destinations,
        }
    }

    pub fn namer(&self) -> &NoteNamer {
        &self.namer
    }

    pub fn destinations(&self) -> &[PathBuf] {
        &self.destinations
    }

    /// Decide whether `item` needs processing
    ///
    /// When the note is found on disk but missing from the ledger, a record is
    /// committed immediately so later runs take the ledger fast path.
    ///
    /// # Errors
    ///
    /// Returns an error only if that self-healing commit cannot be saved.
    pub fn decide(&self, item: &RemoteItem, ledger: &mut TrackedLedger) -> Result<Decision> {
        if ledger.contains(&item.id) {
            return Ok(Decision::InLedger);
        }

        let note = self.namer.name_for(&item.name);

        if let Some(path) = self.find_existing(&note.file_name) {
            tracing::info!(
                item_id = %item.id,
                path = %path.display(),
                "File already exists locally, recording in ledger"
            );
            ledger.commit(item.id.clone(), &item.name)?;
            return Ok(Decision::FoundOnDisk { path });
        }

        Ok(Decision::Process(note))
    }

    /// Boolean form of [`decide`](Self::decide)
    pub fn should_process(&self, item: &RemoteItem, ledger: &mut TrackedLedger) -> Result<bool> {
        Ok(self.decide(item, ledger)?.should_process())
    }

    fn find_existing(&self, file_name: &str) -> Option<PathBuf> {
        self.destinations
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file())
    }
}
