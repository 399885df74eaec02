//! Repository for store-builder sessions.
//!
//! Client-facing queries select an explicit column list that never includes
//! `access_token`; the token is only readable through
//! [`SessionRepository::credentials`], which services call server-side.

use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AutomationCandidate, SessionCredentials, SessionRow, SessionUpdate};

use super::RepositoryError;

/// Column list for every client-facing session read. No `access_token`.
const SESSION_COLUMNS: &str = "session_id, niche, target_audience, business_type, store_style, \
     shopify_url, theme_color, access_token IS NOT NULL AS has_access_token, \
     products_added, completed_steps, mentorship_requested, created_at, updated_at";

/// Repository for session database operations.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a fresh session and return its handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self) -> Result<SessionRow, RepositoryError> {
        let query = format!(
            "INSERT INTO store_sessions (session_id) VALUES ($1) RETURNING {SESSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(Uuid::new_v4())
            .fetch_one(self.pool)
            .await?;
        Ok(row)
    }

    /// Get a session by handle, without the access token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, session_id: Uuid) -> Result<Option<SessionRow>, RepositoryError> {
        let query =
            format!("SELECT {SESSION_COLUMNS} FROM store_sessions WHERE session_id = $1");
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(session_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Apply a wizard-step update.
    ///
    /// Omitted fields are untouched. The access token is write-once:
    /// `COALESCE(access_token, $new)` keeps the first stored value forever.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        session_id: Uuid,
        update: SessionUpdate,
    ) -> Result<Option<SessionRow>, RepositoryError> {
        let query = format!(
            "UPDATE store_sessions SET \
                 niche = COALESCE($2, niche), \
                 target_audience = COALESCE($3, target_audience), \
                 business_type = COALESCE($4, business_type), \
                 store_style = COALESCE($5, store_style), \
                 shopify_url = COALESCE($6, shopify_url), \
                 access_token = COALESCE(access_token, $7), \
                 theme_color = COALESCE($8, theme_color), \
                 completed_steps = GREATEST(completed_steps, COALESCE($9, completed_steps)), \
                 mentorship_requested = COALESCE($10, mentorship_requested), \
                 updated_at = now() \
             WHERE session_id = $1 \
             RETURNING {SESSION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(session_id)
            .bind(update.niche)
            .bind(update.target_audience)
            .bind(update.business_type)
            .bind(update.store_style)
            .bind(update.shopify_url)
            .bind(update.access_token)
            .bind(update.theme_color)
            .bind(update.completed_steps)
            .bind(update.mentorship_requested)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Fetch a session's store credentials. Server-side only.
    ///
    /// Returns `None` when the session is missing or has no stored
    /// credentials yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn credentials(
        &self,
        session_id: Uuid,
    ) -> Result<Option<SessionCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT shopify_url, access_token FROM store_sessions \
             WHERE session_id = $1 AND shopify_url IS NOT NULL AND access_token IS NOT NULL",
        )
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(shopify_url, access_token)| SessionCredentials {
            shopify_url,
            access_token: SecretString::from(access_token),
        }))
    }

    /// Mark a session as having products on its store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_products_added(&self, session_id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE store_sessions SET products_added = TRUE, updated_at = now() \
             WHERE session_id = $1",
        )
        .bind(session_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Sessions eligible for the automation batch: products already added
    /// once and full store credentials present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn automation_candidates(
        &self,
    ) -> Result<Vec<AutomationCandidate>, RepositoryError> {
        let rows = sqlx::query_as::<_, AutomationCandidate>(
            "SELECT session_id, niche, theme_color, store_style FROM store_sessions \
             WHERE products_added = TRUE \
               AND niche IS NOT NULL \
               AND shopify_url IS NOT NULL \
               AND access_token IS NOT NULL \
             ORDER BY created_at",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
