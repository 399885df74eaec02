//! Repository for provisioning batches and automation results.
//!
//! `upload_sessions` gets one row per store per provisioning batch, keyed by
//! `execution_date` - that row is what makes the daily automation dedup
//! work. `automation_results` stores one aggregate row per batch trigger for
//! historical display.

use chrono::NaiveDate;
use sqlx::PgPool;
use storeforge_core::AutomationResult;
use uuid::Uuid;

use super::RepositoryError;

/// Repository for automation bookkeeping.
pub struct AutomationRepository<'a> {
    pool: &'a PgPool,
}

/// A persisted automation batch row, results decoded from JSONB.
#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct AutomationResultRow {
    pub id: Uuid,
    pub execution_date: NaiveDate,
    pub stores_processed: i32,
    pub stores_successful: i32,
    pub total_products_added: i32,
    pub results: serde_json::Value,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl<'a> AutomationRepository<'a> {
    /// Create a new automation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// True when the session already has an upload batch recorded for `date`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_batch_for_date(
        &self,
        session_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(\
                 SELECT 1 FROM upload_sessions \
                 WHERE session_id = $1 AND execution_date = $2\
             )",
        )
        .bind(session_id)
        .bind(date)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Record one store's provisioning batch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record_batch(
        &self,
        session_id: Uuid,
        niche: &str,
        products_added: u32,
        date: NaiveDate,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO upload_sessions (id, session_id, niche, products_added, execution_date) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(niche)
        .bind(i32::try_from(products_added).unwrap_or(i32::MAX))
        .bind(date)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Persist one automation batch aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails, or
    /// `RepositoryError::DataCorruption` if the results cannot be serialized.
    pub async fn insert_result(&self, result: &AutomationResult) -> Result<(), RepositoryError> {
        let results_json = serde_json::to_value(&result.results)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        sqlx::query(
            "INSERT INTO automation_results \
                 (id, execution_date, stores_processed, stores_successful, \
                  total_products_added, results, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(result.id)
        .bind(result.execution_date)
        .bind(i32::try_from(result.stores_processed).unwrap_or(i32::MAX))
        .bind(i32::try_from(result.stores_successful).unwrap_or(i32::MAX))
        .bind(i32::try_from(result.total_products_added).unwrap_or(i32::MAX))
        .bind(results_json)
        .bind(result.completed_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Most recent automation batches, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<AutomationResultRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, AutomationResultRow>(
            "SELECT id, execution_date, stores_processed, stores_successful, \
                    total_products_added, results, completed_at \
             FROM automation_results \
             ORDER BY completed_at DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
