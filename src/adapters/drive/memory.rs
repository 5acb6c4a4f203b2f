//! In-memory document source

use super::DocumentSource;
use crate::domain::{DriveError, FolderId, ItemId, RemoteItemPayload, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// [`DocumentSource`] backed by maps, with failure injection
///
/// ```
/// use transcript_syncer::adapters::drive::{DocumentSource, MemorySource};
/// use transcript_syncer::domain::{FolderId, RemoteItemPayload};
///
/// # async fn example() -> transcript_syncer::domain::Result<()> {
/// let folder = FolderId::new("folder-a").unwrap();
/// let source = MemorySource::new().with_document(
///     &folder,
///     RemoteItemPayload::new("id-1", "Transcript - 2024/11/26", "text/markdown"),
///     "# Notes",
/// );
///
/// assert_eq!(source.list_items(&folder).await?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    listings: HashMap<FolderId, Vec<RemoteItemPayload>>,
    contents: HashMap<String, String>,
    failing_folders: HashSet<FolderId>,
    failing_items: HashSet<String>,
    fetches: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listing entry and its content
    pub fn with_document(
        mut self,
        folder: &FolderId,
        payload: RemoteItemPayload,
        content: impl Into<String>,
    ) -> Self {
        if let Some(id) = payload.id.clone() {
            self.contents.insert(id, content.into());
        }
        self.listings.entry(folder.clone()).or_default().push(payload);
        self
    }

    /// Add a listing entry with no content behind it
    pub fn with_payload(mut self, folder: &FolderId, payload: RemoteItemPayload) -> Self {
        self.listings.entry(folder.clone()).or_default().push(payload);
        self
    }

    /// Make listing `folder` fail with a connection error
    pub fn failing_listing(mut self, folder: &FolderId) -> Self {
        self.failing_folders.insert(folder.clone());
        self
    }

    /// Make fetching `id` fail with a server error
    pub fn failing_fetch(mut self, id: impl Into<String>) -> Self {
        self.failing_items.insert(id.into());
        self
    }

    /// Ids fetched so far, in order
    pub fn fetched(&self) -> Vec<String> {
        self.fetches
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn list_items(&self, folder: &FolderId) -> Result<Vec<RemoteItemPayload>> {
        if self.failing_folders.contains(folder) {
            return Err(DriveError::ConnectionFailed(format!("listing {folder} failed")).into());
        }
        Ok(self.listings.get(folder).cloned().unwrap_or_default())
    }

    async fn fetch_as_text(&self, id: &ItemId, _mime_type: &str) -> Result<String> {
        if let Ok(mut fetches) = self.fetches.lock() {
            fetches.push(id.as_str().to_string());
        }

        if self.failing_items.contains(id.as_str()) {
            return Err(DriveError::ServerError {
                status: 500,
                message: format!("download of {id} failed"),
            }
            .into());
        }

        self.contents
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| DriveError::NotFound(id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_folder_is_empty() {
        let source = MemorySource::new();
        let items = source
            .list_items(&FolderId::new("missing").unwrap())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_records_calls() {
        let folder = FolderId::new("f").unwrap();
        let source = MemorySource::new()
            .with_document(&folder, RemoteItemPayload::new("a", "A", "text/markdown"), "body")
            .failing_fetch("b");

        let id_a = ItemId::new("a").unwrap();
        let id_b = ItemId::new("b").unwrap();
        assert_eq!(source.fetch_as_text(&id_a, "text/markdown").await.unwrap(), "body");
        assert!(source.fetch_as_text(&id_b, "text/markdown").await.is_err());
        assert_eq!(source.fetched(), vec!["a".to_string(), "b".to_string()]);
    }
}
