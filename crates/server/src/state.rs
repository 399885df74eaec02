//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use storeforge_engine::content::{ContentGenerator, GeneratorOptions, LlmClient};
use storeforge_engine::storage::StorageClient;

use crate::config::ServerConfig;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("language model client: {0}")]
    Llm(#[from] storeforge_engine::content::LlmError),
    #[error("storage client: {0}")]
    Storage(#[from] storeforge_engine::storage::StorageError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool, the
/// content generator, and the optional storage client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    content: ContentGenerator,
    storage: Option<StorageClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the language-model and storage clients up front when their
    /// configuration is present.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured client fails to build.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, StateError> {
        let llm = config
            .llm
            .as_ref()
            .map(LlmClient::new)
            .transpose()?;
        let content = ContentGenerator::new(llm, GeneratorOptions::default());
        let storage = config
            .storage
            .as_ref()
            .map(StorageClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                content,
                storage,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the content generator.
    #[must_use]
    pub fn content(&self) -> &ContentGenerator {
        &self.inner.content
    }

    /// Get a reference to the object storage client, when configured.
    #[must_use]
    pub fn storage(&self) -> Option<&StorageClient> {
        self.inner.storage.as_ref()
    }
}
