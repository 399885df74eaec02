//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFORGE_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `STOREFORGE_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFORGE_PORT` - Listen port (default: 8080)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-10)
//! - `OPENAI_API_KEY` - Language-model backend key; absent means templated copy only
//! - `OPENAI_MODEL` - Model override
//! - `OPENAI_BASE_URL` - Endpoint override (tests, proxies)
//! - `STORAGE_URL` / `STORAGE_SERVICE_KEY` / `STORAGE_BUCKET` - Object storage
//!   holding the packaged theme ZIP; all three present enables theme install
//! - `THEME_ZIP_PATH` - Object path of the theme ZIP (default: refresh-theme.zip)
//! - `AUTOMATION_PRODUCT_COUNT` - Products per automation run (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use storeforge_engine::content::LlmConfig;
use storeforge_engine::storage::StorageConfig;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API version used for every store
    pub shopify_api_version: String,
    /// Language-model backend, when configured
    pub llm: Option<LlmConfig>,
    /// Object storage for the packaged theme ZIP, when configured
    pub storage: Option<StorageConfig>,
    /// Object path of the packaged theme ZIP
    pub theme_zip_path: String,
    /// Products generated per automation run
    pub automation_product_count: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFORGE_DATABASE_URL")?;
        let host = get_env_or_default("STOREFORGE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFORGE_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFORGE_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFORGE_PORT".to_string(), e.to_string())
            })?;

        let shopify_api_version = get_env_or_default("SHOPIFY_API_VERSION", "2024-10");
        let llm = llm_from_env();
        let storage = storage_from_env()?;
        let theme_zip_path = get_env_or_default("THEME_ZIP_PATH", "refresh-theme.zip");
        let automation_product_count = get_env_or_default("AUTOMATION_PRODUCT_COUNT", "10")
            .parse::<usize>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("AUTOMATION_PRODUCT_COUNT".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            shopify_api_version,
            llm,
            storage,
            theme_zip_path,
            automation_product_count,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Build the language-model config when a key is present.
fn llm_from_env() -> Option<LlmConfig> {
    let api_key = get_optional_env("OPENAI_API_KEY")?;
    let mut config = LlmConfig::new(SecretString::from(api_key));
    if let Some(model) = get_optional_env("OPENAI_MODEL") {
        config.model = model;
    }
    if let Some(base_url) = get_optional_env("OPENAI_BASE_URL") {
        config.base_url = base_url;
    }
    Some(config)
}

/// Build the storage config when the full variable group is present.
fn storage_from_env() -> Result<Option<StorageConfig>, ConfigError> {
    let Some(base_url) = get_optional_env("STORAGE_URL") else {
        return Ok(None);
    };
    let service_key = get_validated_secret("STORAGE_SERVICE_KEY")?;
    let bucket = get_env_or_default("STORAGE_BUCKET", "themes");

    Ok(Some(StorageConfig {
        base_url,
        service_key,
        bucket,
    }))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real service keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the real service key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
