//! Shopify Admin REST API client.
//!
//! One method per endpoint, no retry logic of its own - the provisioning
//! workflow decides which calls retry and which fail fast, via
//! [`crate::retry::with_backoff`]. Auth is the `X-Shopify-Access-Token`
//! header, installed as a default header so it never appears at call sites.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::retry::RetriableError;

mod products;
mod themes;
pub mod types;

/// Default Admin API version.
pub const DEFAULT_API_VERSION: &str = "2024-10";

/// Request timeout for all Admin API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials for one store: domain plus a write-capable access token.
///
/// The token is write-once from the wizard's perspective; it only ever
/// travels server-side. Implements `Debug` manually to redact it.
#[derive(Clone)]
pub struct StoreCredentials {
    /// Store domain (e.g., `your-store.myshopify.com`) or full URL.
    pub shop_url: String,
    /// Admin API access token.
    pub access_token: SecretString,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("shop_url", &self.shop_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Errors that can occur when interacting with the Admin REST API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (network, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429; `retry_after_secs` comes from the `Retry-After` header.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// HTTP 401/403 - the access token is invalid or missing scopes.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-2xx response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// The shop URL could not be normalized into an API base.
    #[error("invalid shop URL: {0}")]
    InvalidShopUrl(String),
}

impl RetriableError for ShopifyError {
    fn is_retriable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Unauthorized(_) | Self::Parse(_) | Self::InvalidShopUrl(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs } => {
                Some(Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }
}

/// Shopify Admin REST API client for one store.
///
/// # Security
///
/// The access token has HIGH PRIVILEGE access to the store. The client is
/// constructed per store session and dropped after the run.
#[derive(Debug, Clone)]
pub struct AdminRestClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl AdminRestClient {
    /// Create a client for one store.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopUrl`] when the shop URL has no
    /// usable host, or [`ShopifyError::Parse`] if the access token cannot
    /// be used as a header value.
    pub fn new(credentials: &StoreCredentials, api_version: &str) -> Result<Self, ShopifyError> {
        let base_url = normalize_shop_origin(&credentials.shop_url)?;

        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(credentials.access_token.expose_secret())
            .map_err(|e| ShopifyError::Parse(format!("invalid access token for header: {e}")))?;
        token.set_sensitive(true);
        headers.insert("X-Shopify-Access-Token", token);
        headers.insert(
            "Content-Type",
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_version: api_version.to_string(),
        })
    }

    /// The normalized store origin (scheme + host).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a versioned Admin API URL: `{origin}/admin/api/{v}/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/admin/api/{}/{path}", self.base_url, self.api_version)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Map a non-2xx response into a typed error, consuming the body.
    pub(crate) async fn error_for_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ShopifyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }

        let message = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ShopifyError::Unauthorized(message));
        }

        Err(ShopifyError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Normalize a user-supplied shop URL to its `https` origin.
///
/// Accepts `store.myshopify.com`, `https://store.myshopify.com`, or a full
/// URL with a path, and always yields `https://store.myshopify.com`.
fn normalize_shop_origin(shop_url: &str) -> Result<String, ShopifyError> {
    let trimmed = shop_url.trim().trim_end_matches('/');
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = url::Url::parse(&with_scheme)
        .map_err(|e| ShopifyError::InvalidShopUrl(format!("{shop_url}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ShopifyError::InvalidShopUrl(format!("{shop_url}: missing host")))?;

    // Keep explicit ports so tests can point at a local mock server.
    Ok(parsed.port().map_or_else(
        || format!("https://{host}"),
        |port| format!("{}://{host}:{port}", parsed.scheme()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_domain() {
        assert_eq!(
            normalize_shop_origin("my-store.myshopify.com").unwrap(),
            "https://my-store.myshopify.com"
        );
    }

    #[test]
    fn test_normalize_strips_path_and_trailing_slash() {
        assert_eq!(
            normalize_shop_origin("https://my-store.myshopify.com/admin/").unwrap(),
            "https://my-store.myshopify.com"
        );
    }

    #[test]
    fn test_normalize_keeps_local_port() {
        assert_eq!(
            normalize_shop_origin("http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_normalize_rejects_empty_input() {
        assert!(normalize_shop_origin("").is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = StoreCredentials {
            shop_url: "my-store.myshopify.com".to_string(),
            access_token: SecretString::from("shpat_super_secret"),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("shpat_super_secret"));
    }
}
