//! Automation batch command - the cron entry point.
//!
//! Loads the same configuration as the server, builds the shared state, and
//! runs one batch. Scheduling lives outside the process (cron, systemd
//! timer); this command is only ever a trigger.

use storeforge_server::config::ServerConfig;
use storeforge_server::services::automation::AutomationService;
use storeforge_server::state::AppState;
use storeforge_server::{db, error::AppError};
use thiserror::Error;

/// Errors from the automation command.
#[derive(Debug, Error)]
pub enum AutomationCommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] storeforge_server::config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("State error: {0}")]
    State(#[from] storeforge_server::state::StateError),

    #[error("Batch error: {0}")]
    Batch(#[from] AppError),
}

/// Run the automation batch once.
///
/// # Errors
///
/// Returns an error when configuration, the database connection, or batch
/// bookkeeping fails. Per-store failures are summarized, not propagated.
pub async fn run() -> Result<(), AutomationCommandError> {
    let config = ServerConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let state = AppState::new(config, pool)?;

    let outcome = AutomationService::new(&state).run(false).await?;

    tracing::info!(
        stores_processed = outcome.stores_processed,
        stores_successful = outcome.stores_successful,
        "{}",
        outcome.message
    );
    for summary in &outcome.results {
        tracing::info!(
            session_id = %summary.session_id,
            niche = %summary.niche,
            products_added = summary.products_added,
            success = summary.success,
            "store summary"
        );
    }

    Ok(())
}
