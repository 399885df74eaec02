//! Session lifecycle route handlers.
//!
//! The session handle is returned once from `create` and passed explicitly
//! on every later call - there is no ambient client-side identifier. Reads
//! never include the access token; updates accept it write-once.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::sessions::SessionRepository;
use crate::error::{AppError, Result};
use crate::models::{SessionRow, SessionUpdate};
use crate::state::AppState;

/// Create a fresh session and return its handle.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<(StatusCode, Json<SessionRow>)> {
    let session = SessionRepository::new(state.pool()).create().await?;
    tracing::info!(session_id = %session.session_id, "session created");
    Ok((StatusCode::CREATED, Json(session)))
}

/// Fetch a session's state, without the access token.
#[instrument(skip(state), fields(session_id = %session_id))]
pub async fn show(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionRow>> {
    let session = SessionRepository::new(state.pool())
        .get(session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;
    Ok(Json(session))
}

/// Apply a wizard-step update.
#[instrument(skip(state, update), fields(session_id = %session_id))]
pub async fn update(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<SessionUpdate>,
) -> Result<Json<SessionRow>> {
    if let Some(steps) = update.completed_steps
        && steps < 0
    {
        return Err(AppError::BadRequest(
            "completed_steps must be non-negative".to_string(),
        ));
    }

    let session = SessionRepository::new(state.pool())
        .update(session_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;
    Ok(Json(session))
}
