//! Sync command implementation
//!
//! Runs one sync pass: list every configured Drive folder, write new
//! transcripts into the vault and record them in the ledger.

use crate::adapters::drive::{DocumentSource, GoogleDriveClient};
use crate::config::load_config;
use crate::core::sync::{RunError, RunErrorKind, RunStats, SyncContext, SyncCoordinator};
use clap::Args;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Arguments for the sync command
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Dry run mode - log what would be written without touching the vault or ledger
    #[arg(long)]
    pub dry_run: bool,

    /// Only sync the folder mapping with this key (repeatable)
    #[arg(long = "folder", value_name = "KEY")]
    pub folders: Vec<String>,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let context = match SyncContext::from_config(&config, &self.folders) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Invalid sync selection");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - no notes or ledger entries will be written");
            println!();
        }

        let start_time = Instant::now();
        let stats = match Self::prepare_source(&config) {
            Ok(source) => {
                if let Err(e) = config.ensure_directories() {
                    Self::setup_failure(config.application.dry_run, start_time, e.to_string())
                } else {
                    SyncCoordinator::new(context, source, shutdown_signal)
                        .run()
                        .await
                }
            }
            Err(message) => Self::setup_failure(config.application.dry_run, start_time, message),
        };

        println!();
        println!("{stats}");

        if !stats.errors.is_empty() {
            println!();
            println!("⚠️  Errors encountered:");
            for error in &stats.errors {
                println!("  - {}: {}", error.kind, error.message);
                if let Some(context) = &error.context {
                    println!("    Context: {context}");
                }
            }
        }

        let exit_code = if stats.interrupted {
            println!();
            println!("⚠️  Sync interrupted gracefully. Run the same command to pick up the rest.");
            130 // SIGINT exit code (standard Unix convention)
        } else {
            0
        };

        Ok(exit_code)
    }

    fn prepare_source(
        config: &crate::config::SyncConfig,
    ) -> Result<Arc<dyn DocumentSource>, String> {
        GoogleDriveClient::new(&config.drive)
            .map(|client| Arc::new(client) as Arc<dyn DocumentSource>)
            .map_err(|e| e.to_string())
    }

    /// Stats for a run that failed before the first listing
    fn setup_failure(dry_run: bool, start_time: Instant, message: String) -> RunStats {
        tracing::error!(error = %message, "Sync setup failed");
        let mut stats = RunStats::new(dry_run);
        stats.add_error(RunError::new(RunErrorKind::Setup, message));
        let stats = stats.with_duration(start_time.elapsed());
        stats.log_summary();
        stats
    }
}
