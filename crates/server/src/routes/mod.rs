//! HTTP route handlers for the StoreForge API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (DB ping)
//!
//! # Sessions (store-builder wizard)
//! POST  /api/sessions                 - Create a session, returns its handle
//! GET   /api/sessions/{id}            - Session state (never the access token)
//! PATCH /api/sessions/{id}            - Update wizard fields (token write-once)
//!
//! # Provisioning
//! POST /api/sessions/{id}/provision   - Generate and upload a product catalog
//!
//! # Automation
//! POST /api/automation/run            - Run the daily batch {manual_trigger}
//! GET  /api/automation/results        - Recent batch aggregates
//! ```

pub mod automation;
pub mod provision;
pub mod sessions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(sessions::create))
        .route(
            "/api/sessions/{id}",
            get(sessions::show).patch(sessions::update),
        )
        .route("/api/sessions/{id}/provision", post(provision::run))
        .route("/api/automation/run", post(automation::run))
        .route("/api/automation/results", get(automation::results))
}
