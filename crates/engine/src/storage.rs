//! Object-storage client for the packaged theme ZIP.
//!
//! Issues short-lived signed URLs in the Supabase storage style:
//! `POST /storage/v1/object/sign/{bucket}/{path}` with an `expiresIn`
//! budget, returning a relative `signedURL` that is resolved against the
//! storage origin. Shopify consumes the result as the `src` of a new theme.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

/// Signed URLs expire after ten minutes - enough for Shopify to download
/// the ZIP, short enough not to leak a durable link.
const SIGNED_URL_EXPIRY_SECS: u32 = 600;

/// Object storage configuration.
#[derive(Clone)]
pub struct StorageConfig {
    /// Storage origin (e.g., `https://project.supabase.co`).
    pub base_url: String,
    /// Service-role key used to sign URLs.
    pub service_key: SecretString,
    /// Bucket holding packaged themes.
    pub bucket: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Errors from the storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the signing response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Client issuing signed URLs for stored objects.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl StorageClient {
    /// Create a storage client.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Parse`] if the service key cannot be used as
    /// a header value, or [`StorageError::Http`] if the client fails to build.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.service_key.expose_secret());
        let mut auth = HeaderValue::from_str(&auth)
            .map_err(|e| StorageError::Parse(format!("invalid service key for header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        })
    }

    /// Issue a signed URL for an object, valid for ten minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is not the
    /// expected `{"signedURL": ...}` shape.
    #[instrument(skip(self))]
    pub async fn signed_url(&self, object_path: &str) -> Result<String, StorageError> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.base_url,
            self.bucket,
            object_path.trim_start_matches('/')
        );
        let body = serde_json::json!({ "expiresIn": SIGNED_URL_EXPIRY_SECS });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let signed: SignResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(e.to_string()))?;

        // The API returns a path relative to the storage root.
        let relative = signed.signed_url;
        if relative.starts_with("http://") || relative.starts_with("https://") {
            Ok(relative)
        } else {
            Ok(format!(
                "{}/storage/v1/{}",
                self.base_url,
                relative.trim_start_matches('/')
            ))
        }
    }
}
