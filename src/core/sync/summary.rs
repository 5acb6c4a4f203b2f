//! Run statistics and reporting

use crate::domain::SyncError;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Counters and error details for one sync pass
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Items written (or, in dry-run mode, that would have been written)
    pub processed: usize,

    /// Items skipped because the ledger or the filesystem already had them
    pub skipped: usize,

    /// Failures, in the order they happened
    pub errors: Vec<RunError>,

    /// Mappings whose listing was attempted
    pub mappings_visited: usize,

    /// Notes written during the run
    pub written: Vec<PathBuf>,

    /// Whether a shutdown signal stopped the run between items
    pub interrupted: bool,

    /// Whether the run was a dry run
    pub dry_run: bool,

    /// Wall-clock start of the run
    pub started_at: DateTime<Local>,

    /// Duration of the run
    pub duration: Duration,
}

impl RunStats {
    /// Start a new, empty run
    pub fn new(dry_run: bool) -> Self {
        Self {
            processed: 0,
            skipped: 0,
            errors: Vec::new(),
            mappings_visited: 0,
            written: Vec::new(),
            interrupted: false,
            dry_run,
            started_at: Local::now(),
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: RunError) {
        self.errors.push(error);
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Check if the run finished without errors or interruption
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            processed = self.processed,
            skipped = self.skipped,
            errors = self.errors.len(),
            mappings = self.mappings_visited,
            dry_run = self.dry_run,
            interrupted = self.interrupted,
            duration_secs = format!("{:.2}", self.duration.as_secs_f64()),
            "Sync completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Sync completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    kind = %error.kind,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Sync error"
                );
            }
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sync Summary:")?;
        writeln!(f, "------------")?;
        writeln!(f, "Started: {}", self.started_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Duration: {:.2}s", self.duration.as_secs_f64())?;
        writeln!(f, "Mappings visited: {}", self.mappings_visited)?;
        writeln!(f, "Files processed: {}", self.processed)?;
        writeln!(f, "Files skipped: {}", self.skipped)?;
        write!(f, "Errors: {}", self.errors.len())?;
        if self.dry_run {
            write!(f, "\nDry run: no files or ledger entries were written")?;
        }
        if self.interrupted {
            write!(f, "\nInterrupted: remaining items are left for the next run")?;
        }
        Ok(())
    }
}

/// Stage at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    /// Building collaborators before the first listing
    Setup,
    /// Listing a source folder
    Listing,
    /// Listing entry without an id or name
    MalformedItem,
    /// Downloading or exporting content
    Download,
    /// Writing the note
    Write,
    /// Persisting the ledger
    Ledger,
    /// Anything else
    Unknown,
}

impl RunErrorKind {
    /// Classify an error raised while handling one item
    pub fn for_item_error(error: &SyncError) -> Self {
        match error {
            SyncError::Validation(_) => RunErrorKind::MalformedItem,
            SyncError::Drive(_) => RunErrorKind::Download,
            SyncError::Io(_) => RunErrorKind::Write,
            SyncError::Ledger(_) => RunErrorKind::Ledger,
            _ => RunErrorKind::Unknown,
        }
    }
}

impl fmt::Display for RunErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunErrorKind::Setup => "setup",
            RunErrorKind::Listing => "listing",
            RunErrorKind::MalformedItem => "malformed_item",
            RunErrorKind::Download => "download",
            RunErrorKind::Write => "write",
            RunErrorKind::Ledger => "ledger",
            RunErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A failure with context
#[derive(Debug, Clone)]
pub struct RunError {
    pub kind: RunErrorKind,
    pub message: String,
    /// e.g. `folder=dragon, item=1AbC`
    pub context: Option<String>,
}

impl RunError {
    pub fn new(kind: RunErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
