//! Automation trigger and history route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::db::automation::{AutomationRepository, AutomationResultRow};
use crate::error::Result;
use crate::services::automation::{AutomationRunOutcome, AutomationService};
use crate::state::AppState;

/// Batches shown on the history endpoint.
const RESULT_HISTORY_LIMIT: i64 = 30;

/// Trigger request body.
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub manual_trigger: bool,
}

/// Run the automation batch across all eligible sessions.
#[instrument(skip(state, request))]
pub async fn run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Json<AutomationRunOutcome>> {
    let outcome = AutomationService::new(&state)
        .run(request.manual_trigger)
        .await?;
    Ok(Json(outcome))
}

/// Recent automation batch aggregates, newest first.
#[instrument(skip(state))]
pub async fn results(
    State(state): State<AppState>,
) -> Result<Json<Vec<AutomationResultRow>>> {
    let rows = AutomationRepository::new(state.pool())
        .list_recent(RESULT_HISTORY_LIMIT)
        .await?;
    Ok(Json(rows))
}
