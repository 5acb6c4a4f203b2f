//! Google Drive REST client
//!
//! Talks to the Drive v3 API directly with `reqwest`: one paged `files.list`
//! query per folder, then `alt=media` downloads for Markdown uploads and
//! `files.export` for native Google Docs. Every request carries a bearer
//! token from the client's [`TokenProvider`].

use super::auth::TokenProvider;
use super::models::{ApiErrorBody, FileListPage};
use super::DocumentSource;
use crate::config::{DriveConfig, SecretString};
use crate::domain::{
    DriveError, FolderId, ItemId, RemoteItemPayload, Result, SyncError, MARKDOWN_MIME_TYPE,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";
const LIST_ORDER: &str = "createdTime desc";

/// Drive v3 implementation of [`DocumentSource`]
///
/// # Example
///
/// ```no_run
/// use transcript_syncer::adapters::drive::{DocumentSource, GoogleDriveClient};
/// use transcript_syncer::config::DriveConfig;
/// use transcript_syncer::domain::FolderId;
///
/// # async fn example(config: DriveConfig) -> transcript_syncer::domain::Result<()> {
/// let client = GoogleDriveClient::new(&config)?;
/// let items = client
///     .list_items(&FolderId::new("1FsPM-xB7EH6Fc2CCu67EHDhYMotx0EYc").unwrap())
///     .await?;
/// println!("{} transcripts", items.len());
/// # Ok(())
/// # }
/// ```
pub struct GoogleDriveClient {
    base_url: Url,
    client: Client,
    tokens: TokenProvider,
    name_contains: String,
    mime_types: Vec<String>,
    export_mime_type: String,
    page_size: u32,
}

impl GoogleDriveClient {
    /// Create a client, resolving credentials from `config`
    ///
    /// Service-account keys are validated here; the first token is only
    /// requested with the first Drive call.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable credentials are configured, the base URL
    /// is invalid, or the HTTP client cannot be built.
    pub fn new(config: &DriveConfig) -> Result<Self> {
        let tokens = TokenProvider::from_config(config)?;
        Self::with_tokens(config, tokens)
    }

    /// Create a client with an explicit access token
    pub fn with_token(config: &DriveConfig, token: SecretString) -> Result<Self> {
        Self::with_tokens(config, TokenProvider::Static(token))
    }

    fn with_tokens(config: &DriveConfig, tokens: TokenProvider) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            SyncError::Configuration(format!(
                "Invalid drive.api_base_url '{}': {e}",
                config.api_base_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::Configuration(format!(
                "drive.api_base_url '{}' cannot be used as a base URL",
                config.api_base_url
            )));
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            tokens,
            name_contains: config.name_contains.clone(),
            mime_types: config.mime_types.clone(),
            export_mime_type: config.export_mime_type.clone(),
            page_size: config.page_size,
        })
    }

    /// The `q` parameter for listing transcripts in `folder`
    pub fn listing_query(&self, folder: &FolderId) -> String {
        let mime_clause = self
            .mime_types
            .iter()
            .map(|m| format!("mimeType = '{}'", escape_literal(m)))
            .collect::<Vec<_>>()
            .join(" or ");

        format!(
            "'{}' in parents and (name contains '{}' and ({mime_clause})) and trashed = false",
            escape_literal(folder.as_str()),
            escape_literal(&self.name_contains),
        )
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in with_tokens
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.tokens.access_token(&self.client).await?;
        Ok(request.bearer_auth(token.expose_secret().as_ref()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorized(request)
            .await?
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        Err(DriveError::from_status(status.as_u16(), message).into())
    }
}

#[async_trait]
impl DocumentSource for GoogleDriveClient {
    async fn list_items(&self, folder: &FolderId) -> Result<Vec<RemoteItemPayload>> {
        let url = self.endpoint(&["files"]);
        let query = self.listing_query(folder);
        let page_size = self.page_size.to_string();
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![
                ("q", query.as_str()),
                ("orderBy", LIST_ORDER),
                ("fields", LIST_FIELDS),
                ("pageSize", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let response = self
                .send(self.client.get(url.clone()).query(&params))
                .await?;
            let page: FileListPage = response.json().await.map_err(|e| {
                DriveError::InvalidResponse(format!("Failed to decode file list: {e}"))
            })?;

            tracing::debug!(
                folder_id = %folder,
                page_items = page.files.len(),
                has_more = page.next_page_token.is_some(),
                "Fetched listing page"
            );
            items.extend(page.files);

            match page.next_page_token {
                Some(next) if !next.is_empty() && page_token.as_deref() != Some(next.as_str()) => {
                    page_token = Some(next);
                }
                _ => break,
            }
        }

        Ok(items)
    }

    async fn fetch_as_text(&self, id: &ItemId, mime_type: &str) -> Result<String> {
        let request = if mime_type == MARKDOWN_MIME_TYPE {
            self.client
                .get(self.endpoint(&["files", id.as_str()]))
                .query(&[("alt", "media")])
        } else {
            self.client
                .get(self.endpoint(&["files", id.as_str(), "export"]))
                .query(&[("mimeType", self.export_mime_type.as_str())])
        };

        let response = self.send(request).await?;
        let text = response.text().await.map_err(|e| {
            DriveError::InvalidResponse(format!("Failed to read content of {id}: {e}"))
        })?;
        Ok(text)
    }
}

pub(super) fn map_transport_error(e: reqwest::Error) -> SyncError {
    if e.is_timeout() {
        DriveError::Timeout(e.to_string()).into()
    } else {
        DriveError::ConnectionFailed(e.to_string()).into()
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
