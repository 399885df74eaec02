//! Provisioning service: one session → one populated, branded store.
//!
//! Bridges stored sessions to the engine: loads credentials, generates a
//! catalog, runs the upload workflow and branding pass, then records the
//! batch so the automation dedup can see it.

use chrono::Utc;
use storeforge_core::{Niche, ProvisioningReport};
use storeforge_engine::provision::{BrandingOptions, WorkflowOptions};
use storeforge_engine::{AdminRestClient, Provisioner, StoreCredentials};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::automation::AutomationRepository;
use crate::db::sessions::SessionRepository;
use crate::error::{AppError, Result};
use crate::models::SessionRow;
use crate::state::AppState;

/// Default brand color when the wizard has not picked one yet.
const DEFAULT_THEME_COLOR: &str = "#2563eb";

/// Runs provisioning for stored sessions.
pub struct ProvisioningService<'a> {
    state: &'a AppState,
}

impl<'a> ProvisioningService<'a> {
    /// Create the service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Provision the store behind a session: generate products, upload them,
    /// apply branding, and record the batch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown sessions, `Configuration` when the
    /// session has no niche or credentials, and database errors as-is.
    /// Upload and branding failures inside the run degrade the report
    /// instead of erroring.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn provision_session(&self, session_id: Uuid) -> Result<ProvisioningReport> {
        let sessions = SessionRepository::new(self.state.pool());
        let session = sessions
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;

        let niche = session
            .niche
            .as_deref()
            .map(Niche::new)
            .ok_or_else(|| AppError::Configuration("session has no niche yet".to_string()))?;
        let credentials = sessions
            .credentials(session_id)
            .await?
            .ok_or_else(|| {
                AppError::Configuration("session has no Shopify credentials yet".to_string())
            })?;

        let report = self.run(&session, &niche, &credentials).await?;

        let automation = AutomationRepository::new(self.state.pool());
        automation
            .record_batch(
                session_id,
                niche.as_str(),
                report.products_added(),
                Utc::now().date_naive(),
            )
            .await?;
        if report.products_added() > 0 {
            sessions.mark_products_added(session_id).await?;
        }

        Ok(report)
    }

    /// The engine-facing half: build clients and run the workflow.
    ///
    /// Used directly by the automation batch, which does its own
    /// bookkeeping around it.
    pub(crate) async fn run(
        &self,
        session: &SessionRow,
        niche: &Niche,
        credentials: &crate::models::SessionCredentials,
    ) -> Result<ProvisioningReport> {
        let store = StoreCredentials {
            shop_url: credentials.shopify_url.clone(),
            access_token: credentials.access_token.clone(),
        };
        let shopify =
            AdminRestClient::new(&store, &self.state.config().shopify_api_version)?;
        let provisioner = Provisioner::new(shopify, WorkflowOptions::default());

        let theme_color = session
            .theme_color
            .clone()
            .unwrap_or_else(|| DEFAULT_THEME_COLOR.to_string());

        let products = self
            .state
            .content()
            .generate_catalog(
                niche,
                self.state.config().automation_product_count,
                &theme_color,
                session.store_style.as_deref(),
            )
            .await;

        let mut report = provisioner.upload_catalog(niche, &products).await;

        let branding = BrandingOptions {
            brand_color: theme_color,
            shop_name: None,
            shop_email: None,
            theme_zip_url: self.signed_theme_url().await,
        };
        report.branding = Some(provisioner.apply_branding(&branding).await);

        info!(
            added = report.products_added(),
            total = products.len(),
            "provisioning run finished"
        );
        Ok(report)
    }

    /// Signed URL for the packaged theme ZIP, when storage is configured.
    ///
    /// Storage failures degrade to "brand the live theme" rather than
    /// failing the run.
    async fn signed_theme_url(&self) -> Option<String> {
        let storage = self.state.storage()?;
        match storage
            .signed_url(&self.state.config().theme_zip_path)
            .await
        {
            Ok(signed) => Some(signed),
            Err(e) => {
                warn!(error = %e, "signing theme ZIP URL failed, skipping theme install");
                None
            }
        }
    }
}
