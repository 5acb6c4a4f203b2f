//! Ledger persistence
//!
//! The ledger lives in a single pretty-printed JSON file that is read once per
//! run and rewritten in full after every processed item. Writes go to a
//! sibling `<ledger>.tmp` file that is then renamed over the real path, so the
//! canonical file is always either the previous or the new ledger.

use crate::core::state::ledger::Ledger;
use crate::domain::{Result, SyncError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Number of read attempts before a malformed ledger is given up on
pub const DEFAULT_LOAD_ATTEMPTS: u32 = 3;

/// Fixed delay between read attempts
pub const DEFAULT_LOAD_RETRY_DELAY: Duration = Duration::from_millis(100);

/// File-backed ledger store
///
/// Assumes a single writer; there is no file locking.
///
/// # Example
///
/// ```no_run
/// use transcript_syncer::core::state::LedgerStore;
/// use transcript_syncer::domain::ItemId;
///
/// # fn example() -> transcript_syncer::domain::Result<()> {
/// let store = LedgerStore::new("state/processed_files.json");
/// let mut ledger = store.load();
///
/// ledger.record(ItemId::new("1AbC").unwrap(), "Weekly Sync - 2024/11/26");
/// store.save(&ledger)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
    load_attempts: u32,
    retry_delay: Duration,
}

impl LedgerStore {
    /// Create a store for the ledger file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            load_attempts: DEFAULT_LOAD_ATTEMPTS,
            retry_delay: DEFAULT_LOAD_RETRY_DELAY,
        }
    }

    /// Override the bounded read retry
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.load_attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    /// Path of the canonical ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temporary file used during [`save`](Self::save)
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load the ledger
    ///
    /// Never fails. A missing or blank file yields an empty ledger. A file that
    /// cannot be read or parsed is retried a bounded number of times to ride
    /// out a concurrent write, then abandoned in favor of an empty ledger.
    /// Re-processing is safe because dedup also checks the filesystem.
    pub fn load(&self) -> Ledger {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.read_once() {
                Ok(ledger) => {
                    tracing::debug!(
                        path = %self.path.display(),
                        entries = ledger.len(),
                        "Loaded ledger"
                    );
                    return ledger;
                }
                Err(e) if attempt >= self.load_attempts => {
                    tracing::error!(
                        path = %self.path.display(),
                        attempts = attempt,
                        error = %e,
                        "Error reading ledger file, starting with an empty ledger"
                    );
                    return Ledger::new();
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = self.load_attempts,
                        error = %e,
                        "Retrying ledger read"
                    );
                    // Loading happens once, before the first item; every
                    // ledger and note write of a run blocks the same way.
                    thread::sleep(self.retry_delay);
                }
            }
        }
    }

    fn read_once(&self) -> Result<Ledger> {
        if !self.path.exists() {
            return Ok(Ledger::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            SyncError::Ledger(format!("failed to read {}: {e}", self.path.display()))
        })?;
        if contents.trim().is_empty() {
            return Ok(Ledger::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            SyncError::Ledger(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    /// Persist the ledger atomically
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be written or renamed. The
    /// previous ledger file is left untouched and no temp file remains.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        self.write_atomic(|writer| {
            serde_json::to_writer_pretty(&mut *writer, ledger)?;
            writer.write_all(b"\n")?;
            Ok(())
        })?;

        tracing::debug!(
            path = %self.path.display(),
            entries = ledger.len(),
            "Saved ledger"
        );
        Ok(())
    }

    fn write_atomic<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<()>,
    {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let result = File::create(&temp)
            .map_err(SyncError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                write(&mut writer)?;
                let file = writer
                    .into_inner()
                    .map_err(|e| SyncError::Io(e.error().to_string()))?;
                file.sync_all()?;
                Ok(())
            })
            .and_then(|()| fs::rename(&temp, &self.path).map_err(SyncError::from));

        if let Err(e) = result {
            self.discard_temp(&temp);
            return Err(SyncError::Ledger(format!(
                "failed to save {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn discard_temp(&self, temp: &Path) {
        if !temp.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(temp) {
            tracing::error!(
                temp = %temp.display(),
                error = %e,
                "Failed to remove temporary ledger file"
            );
        }
    }
}
