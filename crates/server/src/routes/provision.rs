//! Provisioning trigger route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use storeforge_core::ProvisioningReport;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::services::provisioning::ProvisioningService;
use crate::state::AppState;

/// Run a full provisioning pass for one session.
///
/// Synchronous from the client's view: the response is the finished report.
/// A retry from the UI simply calls this again - runs are never resumed.
#[instrument(skip(state), fields(session_id = %session_id))]
pub async fn run(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ProvisioningReport>> {
    let report = ProvisioningService::new(&state)
        .provision_session(session_id)
        .await?;
    Ok(Json(report))
}
