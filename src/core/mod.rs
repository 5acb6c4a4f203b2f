//! Core sync logic.
//!
//! # Modules
//!
//! - [`naming`] - Date extraction and canonical note file names
//! - [`state`] - The processed-items ledger and its crash-safe store
//! - [`dedup`] - Ledger plus filesystem at-most-once decision
//! - [`transform`] - Note header and related-notes annotation
//! - [`sync`] - Run orchestration and statistics
//!
//! # Sync Workflow
//!
//! 1. **Load Ledger**: Read the processed-items ledger (empty if missing or corrupt)
//! 2. **List**: Enumerate transcripts in each configured Drive folder
//! 3. **Decide**: Skip items found in the ledger or already present on disk
//! 4. **Fetch and Transform**: Download as Markdown and prepend the note header
//! 5. **Write and Commit**: Write the note, then record the item in the ledger
//! 6. **Report**: Log the run statistics
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use transcript_syncer::adapters::drive::GoogleDriveClient;
//! use transcript_syncer::config::load_config;
//! use transcript_syncer::core::sync::{SyncContext, SyncCoordinator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("syncer.toml")?;
//! config.ensure_directories()?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let context = SyncContext::from_config(&config, &[])?;
//! let source = Arc::new(GoogleDriveClient::new(&config.drive)?);
//!
//! let stats = SyncCoordinator::new(context, source, shutdown_rx).run().await;
//! println!("processed {}, skipped {}", stats.processed, stats.skipped);
//! # Ok(())
//! # }
//! ```

pub mod dedup;
pub mod naming;
pub mod state;
pub mod sync;
pub mod transform;
