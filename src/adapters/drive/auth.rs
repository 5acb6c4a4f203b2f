//! Drive access tokens
//!
//! A token is either pre-issued (inline in the config or in a credentials
//! file) or minted from a service-account key: an RS256-signed JWT is posted
//! to the key's `token_uri` using the JWT-bearer grant, and the returned
//! access token is cached until shortly before it expires.

use super::models::{CredentialsFile, TokenErrorBody, TokenResponse, DEFAULT_TOKEN_URI};
use crate::config::{DriveConfig, SecretString};
use crate::domain::{DriveError, Result, SyncError};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Read-only Drive scope requested for service-account tokens
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Tokens this close to expiry are refreshed before use
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of the bearer token sent with every Drive request
#[derive(Debug)]
pub enum TokenProvider {
    Static(SecretString),
    ServiceAccount(ServiceAccountAuth),
}

impl TokenProvider {
    /// Resolve the token source from the inline token or the credentials file
    ///
    /// # Errors
    ///
    /// Returns an authentication error if neither source is usable, or if a
    /// service-account key is incomplete or its private key is not RSA PEM.
    pub fn from_config(config: &DriveConfig) -> Result<Self> {
        if let Some(token) = config
            .access_token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
        {
            return Ok(Self::Static(token.clone()));
        }

        let path = config.credentials_path.as_ref().ok_or_else(|| {
            DriveError::AuthenticationFailed(
                "no access token or credentials file configured".into(),
            )
        })?;
        let credentials = read_credentials(path)?;

        if credentials.is_service_account() {
            tracing::debug!(path = %path.display(), "Using service-account credentials");
            return ServiceAccountAuth::from_credentials(credentials, path).map(Self::ServiceAccount);
        }

        credentials
            .access_token
            .filter(|t| !t.expose_secret().is_empty())
            .map(Self::Static)
            .ok_or_else(|| {
                DriveError::AuthenticationFailed(format!(
                    "credentials file {} has no access_token",
                    path.display()
                ))
                .into()
            })
    }

    /// The current access token, exchanging a fresh one when needed
    pub async fn access_token(&self, client: &Client) -> Result<SecretString> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount(auth) => auth.access_token(client).await,
        }
    }
}

fn read_credentials(path: &Path) -> Result<CredentialsFile> {
    let contents = fs::read_to_string(path).map_err(|e| {
        DriveError::AuthenticationFailed(format!(
            "cannot read credentials file {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        DriveError::AuthenticationFailed(format!(
            "invalid credentials file {}: {e}",
            path.display()
        ))
        .into()
    })
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

struct CachedToken {
    token: SecretString,
    expires_at: Instant,
}

/// Service-account key and the token minted from it
pub struct ServiceAccountAuth {
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    scope: String,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountAuth {
    fn from_credentials(credentials: CredentialsFile, path: &Path) -> Result<Self> {
        let missing = |field: &str| {
            SyncError::from(DriveError::AuthenticationFailed(format!(
                "service-account key {} has no {field}",
                path.display()
            )))
        };

        let client_email = credentials
            .client_email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| missing("client_email"))?;
        let private_key = credentials
            .private_key
            .filter(|key| !key.expose_secret().is_empty())
            .ok_or_else(|| missing("private_key"))?;
        let token_uri = credentials
            .token_uri
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        let key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_ref().as_bytes())
            .map_err(|e| {
                DriveError::AuthenticationFailed(format!(
                    "invalid private_key in {}: {e}",
                    path.display()
                ))
            })?;

        Ok(Self {
            client_email,
            key_id: credentials.private_key_id,
            token_uri,
            scope: DRIVE_READONLY_SCOPE.to_string(),
            key,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Signed JWT asserting the service account's identity at `issued_at`
    fn assertion(&self, issued_at: i64) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        let claims = Claims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &self.key).map_err(|e| {
            DriveError::AuthenticationFailed(format!("failed to sign token request: {e}")).into()
        })
    }

    async fn access_token(&self, client: &Client) -> Result<SecretString> {
        // Held across the exchange so concurrent callers share one request
        let mut cached = self.cached.lock().await;
        if let Some(current) = cached.as_ref() {
            if Instant::now() + EXPIRY_MARGIN < current.expires_at {
                return Ok(current.token.clone());
            }
        }

        let fresh = self.exchange(client).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn exchange(&self, client: &Client) -> Result<CachedToken> {
        let assertion = self.assertion(Utc::now().timestamp())?;
        tracing::debug!(
            client_email = %self.client_email,
            token_uri = %self.token_uri,
            "Requesting service-account access token"
        );

        let response = client
            .post(self.token_uri.as_str())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(super::client::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TokenErrorBody>(&body)
                .map(|b| match b.error_description {
                    Some(description) => format!("{}: {description}", b.error),
                    None => b.error,
                })
                .unwrap_or(body);
            return Err(DriveError::AuthenticationFailed(format!(
                "token exchange failed ({status}): {message}"
            ))
            .into());
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            DriveError::InvalidResponse(format!("Failed to decode token response: {e}"))
        })?;
        if body.access_token.expose_secret().is_empty() {
            return Err(DriveError::AuthenticationFailed(
                "token endpoint returned an empty access_token".into(),
            )
            .into());
        }

        let lifetime = body.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        tracing::info!(expires_in = lifetime, "Obtained service-account access token");

        Ok(CachedToken {
            token: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use jsonwebtoken::{DecodingKey, Validation};
    use mockito::{Matcher, Server};
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PRIVATE_KEY: &str = include_str!("../../../tests/fixtures/service_account_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../../tests/fixtures/service_account_pub.pem");

    fn key_file(token_uri: Option<&str>) -> NamedTempFile {
        let mut key = serde_json::json!({
            "type": "service_account",
            "project_id": "transcripts",
            "private_key_id": "key-1",
            "private_key": PRIVATE_KEY,
            "client_email": "syncer@transcripts.iam.gserviceaccount.com",
        });
        if let Some(uri) = token_uri {
            key["token_uri"] = serde_json::Value::String(uri.to_string());
        }
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(key.to_string().as_bytes()).unwrap();
        file
    }

    fn config_for(file: &NamedTempFile) -> DriveConfig {
        DriveConfig {
            credentials_path: Some(file.path().to_path_buf()),
            ..DriveConfig::default()
        }
    }

    fn service_account(file: &NamedTempFile) -> ServiceAccountAuth {
        match TokenProvider::from_config(&config_for(file)).unwrap() {
            TokenProvider::ServiceAccount(auth) => auth,
            other => panic!("expected service account, got {other:?}"),
        }
    }

    #[derive(Debug, Deserialize)]
    struct DecodedClaims {
        iss: String,
        scope: String,
        aud: String,
        iat: i64,
        exp: i64,
    }

    #[test]
    fn test_assertion_is_signed_rs256_with_expected_claims() {
        let file = key_file(Some("https://oauth2.example.test/token"));
        let auth = service_account(&file);
        let now = Utc::now().timestamp();

        let jwt = auth.assertion(now).unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["https://oauth2.example.test/token"]);
        let decoded = jsonwebtoken::decode::<DecodedClaims>(
            &jwt,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.header.kid.as_deref(), Some("key-1"));
        assert_eq!(decoded.claims.iss, "syncer@transcripts.iam.gserviceaccount.com");
        assert_eq!(decoded.claims.scope, DRIVE_READONLY_SCOPE);
        assert_eq!(decoded.claims.aud, "https://oauth2.example.test/token");
        assert_eq!(decoded.claims.iat, now);
        assert_eq!(decoded.claims.exp, now + 3600);
    }

    #[test]
    fn test_missing_token_uri_uses_google_endpoint() {
        let file = key_file(None);
        assert_eq!(service_account(&file).token_uri(), DEFAULT_TOKEN_URI);
    }

    #[tokio::test]
    async fn test_exchanges_jwt_and_caches_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), JWT_BEARER_GRANT.into()),
                Matcher::Regex(r"assertion=[\w-]+\.[\w-]+\.[\w-]+".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "ya29.minted", "expires_in": 3599, "token_type": "Bearer"}"#)
            .expect(1)
            .create_async()
            .await;

        let file = key_file(Some(&format!("{}/token", server.url())));
        let provider = TokenProvider::from_config(&config_for(&file)).unwrap();
        let client = Client::new();

        let first = provider.access_token(&client).await.unwrap();
        let second = provider.access_token(&client).await.unwrap();

        mock.assert_async().await;
        assert_eq!(first.expose_secret(), "ya29.minted");
        assert_eq!(second.expose_secret(), "ya29.minted");
    }

    #[tokio::test]
    async fn test_token_close_to_expiry_is_refreshed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            // Inside the refresh margin, so every call exchanges again
            .with_body(r#"{"access_token": "short-lived", "expires_in": 30}"#)
            .expect(2)
            .create_async()
            .await;

        let file = key_file(Some(&format!("{}/token", server.url())));
        let provider = TokenProvider::from_config(&config_for(&file)).unwrap();
        let client = Client::new();

        provider.access_token(&client).await.unwrap();
        provider.access_token(&client).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_grant_is_authentication_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "invalid_grant", "error_description": "Invalid JWT Signature."}"#)
            .create_async()
            .await;

        let file = key_file(Some(&format!("{}/token", server.url())));
        let provider = TokenProvider::from_config(&config_for(&file)).unwrap();

        match provider.access_token(&Client::new()).await.unwrap_err() {
            SyncError::Drive(DriveError::AuthenticationFailed(message)) => {
                assert!(message.contains("invalid_grant: Invalid JWT Signature."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_service_account_key_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"type": "service_account", "client_email": "a@b.c"}"#)
            .unwrap();

        let err = TokenProvider::from_config(&config_for(&file)).unwrap_err();
        assert!(err.to_string().contains("private_key"));
    }

    #[test]
    fn test_non_pem_private_key_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"type": "service_account", "client_email": "a@b.c", "private_key": "not a key"}"#,
        )
        .unwrap();

        assert!(matches!(
            TokenProvider::from_config(&config_for(&file)),
            Err(SyncError::Drive(DriveError::AuthenticationFailed(_)))
        ));
    }

    #[test]
    fn test_token_file_is_static() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"access_token": "from-file"}"#).unwrap();

        match TokenProvider::from_config(&config_for(&file)).unwrap() {
            TokenProvider::Static(token) => assert_eq!(token.expose_secret(), "from-file"),
            other => panic!("unexpected provider: {other:?}"),
        }
    }

    #[test]
    fn test_inline_token_takes_precedence() {
        let config = DriveConfig {
            access_token: Some(secret_string("inline".to_string())),
            credentials_path: Some("/does/not/exist.json".into()),
            ..DriveConfig::default()
        };
        assert!(matches!(
            TokenProvider::from_config(&config).unwrap(),
            TokenProvider::Static(token) if token.expose_secret() == "inline"
        ));
    }

    #[test]
    fn test_no_credentials_configured() {
        assert!(matches!(
            TokenProvider::from_config(&DriveConfig::default()),
            Err(SyncError::Drive(DriveError::AuthenticationFailed(_)))
        ));
    }
}
