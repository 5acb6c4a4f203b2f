// Transcript Syncer - Google Drive to Markdown vault sync
// Copyright (c) 2025 Transcript Syncer Contributors
// Licensed under the MIT License

//! # Transcript Syncer
//!
//! Pulls transcript documents from Google Drive folders and writes each one
//! exactly once as a dated Markdown note into a local vault.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Listing** transcripts per Drive folder and fetching them as Markdown
//! - **Naming** notes from a date found in the item name
//! - **Deduplicating** against a durable ledger and the vault itself
//! - **Writing** notes with a creator header and a related-notes callout
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (naming, ledger, dedup, note building, sync)
//! - [`adapters`] - External integrations (Google Drive)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use transcript_syncer::adapters::drive::GoogleDriveClient;
//! use transcript_syncer::config::load_config;
//! use transcript_syncer::core::sync::{SyncContext, SyncCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("syncer.toml")?;
//!     let context = SyncContext::from_config(&config, &[])?;
//!     let source = Arc::new(GoogleDriveClient::new(&config.drive)?);
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!
//!     let stats = SyncCoordinator::new(context, source, shutdown).run().await;
//!     println!("{stats}");
//!     Ok(())
//! }
//! ```
//!
//! ## At-most-once Writes
//!
//! An item is committed to the ledger only after its note is on disk. A
//! note already in the vault but missing from the ledger is recorded without
//! being fetched again, so a crash between the write and the commit heals on
//! the next run.
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], built on [`domain::SyncError`].
//! A failing item is counted and logged, and the run moves on to the next one.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
