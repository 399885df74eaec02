//! Store-builder session models.
//!
//! The session row type deliberately has no access-token field: token reads
//! go through [`SessionCredentials`], which only server-side services touch.
//! Serializing a [`SessionRow`] can therefore never leak the token.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's store-builder wizard state, as stored.
///
/// Every column a client-facing route can see. `FromRow` maps it from the
/// explicit column list the repository selects.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SessionRow {
    pub session_id: Uuid,
    pub niche: Option<String>,
    pub target_audience: Option<String>,
    pub business_type: Option<String>,
    pub store_style: Option<String>,
    pub shopify_url: Option<String>,
    pub theme_color: Option<String>,
    /// Whether the session's store credentials have been stored.
    pub has_access_token: bool,
    pub products_added: bool,
    pub completed_steps: i32,
    pub mentorship_requested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wizard-step update. Every field optional; omitted fields are untouched.
///
/// `access_token` is write-once: the repository only stores it when the
/// column is still NULL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionUpdate {
    pub niche: Option<String>,
    pub target_audience: Option<String>,
    pub business_type: Option<String>,
    pub store_style: Option<String>,
    pub shopify_url: Option<String>,
    pub access_token: Option<String>,
    pub theme_color: Option<String>,
    pub completed_steps: Option<i32>,
    pub mentorship_requested: Option<bool>,
}

/// Store credentials for one session. Server-side only, never serialized.
pub struct SessionCredentials {
    pub shopify_url: String,
    pub access_token: SecretString,
}

impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("shopify_url", &self.shopify_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// A session eligible for the daily automation batch.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AutomationCandidate {
    pub session_id: Uuid,
    pub niche: String,
    pub theme_color: Option<String>,
    pub store_style: Option<String>,
}
