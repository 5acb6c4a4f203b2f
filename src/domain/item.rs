//! Remote document model
//!
//! The Drive listing hands back loosely-typed payloads; [`RemoteItem`] is the
//! validated form the rest of the engine works with.

use super::errors::SyncError;
use super::ids::ItemId;
use serde::{Deserialize, Serialize};

/// Mime type of Google Docs native documents (exported, not downloaded)
pub const GOOGLE_DOC_MIME_TYPE: &str = "application/vnd.google-apps.document";

/// Mime type of plain Markdown uploads (downloaded as-is)
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";

/// A listing entry exactly as the remote provider returned it
///
/// Any field may be absent; see [`RemoteItem::try_from`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItemPayload {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub mime_type: Option<String>,
}

impl RemoteItemPayload {
    /// Convenience constructor for a fully populated payload
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            mime_type: Some(mime_type.into()),
        }
    }
}

/// A remote document this engine may sync
///
/// Immutable from the engine's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub id: ItemId,
    pub name: String,
    pub mime_type: String,
}

impl RemoteItem {
    /// Whether the content must go through the Drive export endpoint
    pub fn needs_export(&self) -> bool {
        self.mime_type != MARKDOWN_MIME_TYPE
    }
}

impl TryFrom<RemoteItemPayload> for RemoteItem {
    type Error = SyncError;

    fn try_from(payload: RemoteItemPayload) -> Result<Self, Self::Error> {
        let id = payload
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| SyncError::Validation("remote item is missing an id".to_string()))?;
        let name = payload
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                SyncError::Validation(format!("remote item {id} is missing a name"))
            })?;

        Ok(Self {
            id: ItemId::new(id).map_err(SyncError::Validation)?,
            name,
            mime_type: payload
                .mime_type
                .unwrap_or_else(|| GOOGLE_DOC_MIME_TYPE.to_string()),
        })
    }
}
