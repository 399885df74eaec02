//! Database operations for the StoreForge `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `store_sessions` - Store-builder wizard state, one row per session
//! - `upload_sessions` - One row per store per provisioning batch, date-keyed
//!   for the once-per-day automation dedup
//! - `automation_results` - Aggregate outcome of each automation batch
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p storeforge-cli -- migrate
//! ```
//!
//! Queries are runtime-checked (`sqlx::query_as`) rather than macro-checked,
//! so the workspace builds without a live database.

pub mod automation;
pub mod sessions;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data violated an invariant.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
