//! Drive v3 API models
//!
//! Wire shapes for the `files.list` response, the credentials file and the
//! OAuth token endpoint. These stay inside the adapter; the rest of the crate
//! sees [`RemoteItemPayload`](crate::domain::RemoteItemPayload).

use crate::config::SecretString;
use crate::domain::RemoteItemPayload;
use serde::Deserialize;

/// One page of `GET /files`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListPage {
    #[serde(default)]
    pub files: Vec<RemoteItemPayload>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google's token endpoint, used when a service-account key omits `token_uri`
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Credentials file: a pre-issued token or a service-account key
///
/// A pre-issued token is read from `access_token` (the OAuth token endpoint's
/// field name) or `token` (written by the Google client libraries'
/// authorized-user files). A file with `"type": "service_account"` is a key
/// downloaded from the Cloud console.
#[derive(Debug, Deserialize)]
pub struct CredentialsFile {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default, alias = "token")]
    pub access_token: Option<SecretString>,

    #[serde(default)]
    pub client_email: Option<String>,

    #[serde(default)]
    pub private_key_id: Option<String>,

    #[serde(default)]
    pub private_key: Option<SecretString>,

    #[serde(default)]
    pub token_uri: Option<String>,
}

impl CredentialsFile {
    pub fn is_service_account(&self) -> bool {
        self.kind.as_deref() == Some("service_account")
    }
}

/// Successful response of the OAuth token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,

    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Error response of the OAuth token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenErrorBody {
    pub error: String,

    #[serde(default)]
    pub error_description: Option<String>,
}

/// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
}
