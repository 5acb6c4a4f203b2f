//! Remote document sources
//!
//! The sync engine only needs two operations from a provider: list the
//! transcripts in a folder and fetch one as Markdown text. [`DocumentSource`]
//! is that seam; [`GoogleDriveClient`] is the production implementation and
//! [`MemorySource`] backs tests and offline runs.

pub mod auth;
pub mod client;
pub mod memory;
pub mod models;

pub use auth::{ServiceAccountAuth, TokenProvider};
pub use client::GoogleDriveClient;
pub use memory::MemorySource;

use crate::domain::{FolderId, ItemId, RemoteItemPayload, Result};
use async_trait::async_trait;

/// A provider of transcript documents
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List the transcripts in `folder`, newest first
    ///
    /// Payloads are returned as received; validation happens per item in the
    /// orchestrator so one malformed entry cannot fail the whole listing.
    async fn list_items(&self, folder: &FolderId) -> Result<Vec<RemoteItemPayload>>;

    /// Fetch an item's content as Markdown text
    async fn fetch_as_text(&self, id: &ItemId, mime_type: &str) -> Result<String>;
}
