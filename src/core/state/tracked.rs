//! Ledger held in memory for the duration of a run
//!
//! Pairs the loaded [`Ledger`] with its [`LedgerStore`] so every commit is
//! persisted immediately: a crash between items loses at most the in-flight
//! item's record.

use crate::core::state::ledger::{Ledger, ProcessingRecord};
use crate::core::state::store::LedgerStore;
use crate::domain::ids::ItemId;
use crate::domain::Result;

/// Run-scoped ledger with write-through persistence
#[derive(Debug)]
pub struct TrackedLedger {
    ledger: Ledger,
    store: LedgerStore,
    persist: bool,
}

impl TrackedLedger {
    /// Load the ledger from `store`
    pub fn open(store: LedgerStore) -> Self {
        let ledger = store.load();
        Self {
            ledger,
            store,
            persist: true,
        }
    }

    /// Keep commits in memory only (dry-run)
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.ledger.contains(id)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Record `id` as processed and write the whole ledger back
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be saved. The in-memory record is
    /// kept and will be written with the next successful commit.
    pub fn commit(&mut self, id: ItemId, name: &str) -> Result<ProcessingRecord> {
        let record = self.ledger.record(id.clone(), name).clone();

        if !self.persist {
            tracing::debug!(item_id = %id, "Dry run, ledger commit not persisted");
            return Ok(record);
        }

        self.store.save(&self.ledger)?;
        tracing::debug!(item_id = %id, entries = self.ledger.len(), "Committed ledger entry");
        Ok(record)
    }
}
