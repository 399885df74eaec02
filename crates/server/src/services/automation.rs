//! The daily automation batch.
//!
//! Trigger-only: an external cron (or a manual request) invokes
//! [`AutomationService::run`]. For every eligible session it re-runs the
//! provisioning workflow, once per calendar day per store, isolating each
//! store's failure so the batch always finishes and always records one
//! aggregate row.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use storeforge_core::{AutomationResult, Niche, StoreRunSummary};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::automation::AutomationRepository;
use crate::db::sessions::SessionRepository;
use crate::error::Result;
use crate::models::AutomationCandidate;
use crate::services::provisioning::ProvisioningService;
use crate::state::AppState;

/// Pause between stores, informal rate limiting across the batch.
const STORE_DELAY: Duration = Duration::from_secs(2);

/// Response shape of the automation trigger.
#[derive(Debug, Serialize)]
pub struct AutomationRunOutcome {
    pub success: bool,
    pub message: String,
    pub stores_processed: u32,
    pub stores_successful: u32,
    pub results: Vec<StoreRunSummary>,
}

/// Runs the automation batch over all eligible sessions.
pub struct AutomationService<'a> {
    state: &'a AppState,
}

impl<'a> AutomationService<'a> {
    /// Create the service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Run the batch. `manual_trigger` is recorded in logs only; manual and
    /// cron runs behave identically, including the daily dedup.
    ///
    /// # Errors
    ///
    /// Returns database errors from candidate listing and result recording.
    /// Per-store failures never propagate - they become failed summaries.
    #[instrument(skip(self))]
    pub async fn run(&self, manual_trigger: bool) -> Result<AutomationRunOutcome> {
        let sessions = SessionRepository::new(self.state.pool());
        let automation = AutomationRepository::new(self.state.pool());
        let today = Utc::now().date_naive();

        let candidates = sessions.automation_candidates().await?;
        info!(
            manual_trigger,
            candidates = candidates.len(),
            "automation batch starting"
        );

        let mut results: Vec<StoreRunSummary> = Vec::with_capacity(candidates.len());
        let mut stores_processed = 0u32;

        for (index, candidate) in candidates.iter().enumerate() {
            if automation
                .has_batch_for_date(candidate.session_id, today)
                .await?
            {
                info!(session_id = %candidate.session_id, "already ran today, skipping");
                continue;
            }

            if index > 0 {
                tokio::time::sleep(STORE_DELAY).await;
            }

            stores_processed += 1;
            let summary = self.run_store(candidate).await;
            if summary.success {
                automation
                    .record_batch(
                        candidate.session_id,
                        &candidate.niche,
                        summary.products_added,
                        today,
                    )
                    .await?;
            }
            results.push(summary);
        }

        let stores_successful =
            u32::try_from(results.iter().filter(|r| r.success).count()).unwrap_or(u32::MAX);
        let total_products_added = results.iter().map(|r| r.products_added).sum();

        let aggregate = AutomationResult {
            id: Uuid::new_v4(),
            execution_date: today,
            stores_processed,
            stores_successful,
            total_products_added,
            results: results.clone(),
            completed_at: Utc::now(),
        };
        automation.insert_result(&aggregate).await?;

        info!(
            stores_processed,
            stores_successful, total_products_added, "automation batch finished"
        );

        Ok(AutomationRunOutcome {
            success: true,
            message: format!(
                "processed {stores_processed} stores, {stores_successful} successful, \
                 {total_products_added} products added"
            ),
            stores_processed,
            stores_successful,
            results,
        })
    }

    /// One store's run, with every failure folded into the summary.
    async fn run_store(&self, candidate: &AutomationCandidate) -> StoreRunSummary {
        let niche = Niche::new(&candidate.niche);
        match self.try_run_store(candidate, &niche).await {
            Ok(products_added) => StoreRunSummary {
                session_id: candidate.session_id,
                niche: niche.to_string(),
                products_added,
                success: true,
                error: None,
            },
            Err(e) => {
                warn!(session_id = %candidate.session_id, error = %e, "store run failed");
                StoreRunSummary {
                    session_id: candidate.session_id,
                    niche: niche.to_string(),
                    products_added: 0,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn try_run_store(
        &self,
        candidate: &AutomationCandidate,
        niche: &Niche,
    ) -> Result<u32> {
        let sessions = SessionRepository::new(self.state.pool());
        let session = sessions
            .get(candidate.session_id)
            .await?
            .ok_or_else(|| {
                crate::error::AppError::NotFound(format!("session {}", candidate.session_id))
            })?;
        let credentials = sessions
            .credentials(candidate.session_id)
            .await?
            .ok_or_else(|| {
                crate::error::AppError::Configuration(
                    "session lost its credentials".to_string(),
                )
            })?;

        let provisioning = ProvisioningService::new(self.state);
        let report = provisioning.run(&session, niche, &credentials).await?;
        Ok(report.products_added())
    }
}
