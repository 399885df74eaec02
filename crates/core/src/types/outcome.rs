//! Outcome records for provisioning runs and automation batches.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal status of one product upload.
///
/// A product is `Success` iff its create call succeeded - partial image or
/// variant failures degrade the counts but never flip the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Success,
    Failed,
}

/// Result of uploading a single generated product to one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// Shopify product id, present iff creation succeeded.
    pub product_id: Option<u64>,
    /// Title of the generated product.
    pub title: String,
    /// Base price that was applied to the default variant.
    pub price: Decimal,
    /// Images actually attached (including the emergency fallback).
    pub images_uploaded: u32,
    /// Variants actually created beyond the default.
    pub variants_created: u32,
    /// Terminal status for this product.
    pub status: UploadStatus,
    /// Failure detail when `status` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    /// Shorthand for a product whose create call failed outright.
    #[must_use]
    pub fn failed(title: impl Into<String>, price: Decimal, error: impl Into<String>) -> Self {
        Self {
            product_id: None,
            title: title.into(),
            price,
            images_uploaded: 0,
            variants_created: 0,
            status: UploadStatus::Failed,
            error: Some(error.into()),
        }
    }

    /// True when the product landed on the store.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, UploadStatus::Success)
    }
}

/// How far the branding pass got: settings applied out of settings attempted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BrandingReport {
    /// Theme settings successfully written.
    pub settings_applied: u32,
    /// Theme settings attempted.
    pub settings_total: u32,
    /// Whether a theme install was skipped because a matching theme existed.
    pub theme_already_installed: bool,
}

/// Aggregate of one end-to-end provisioning run against a single store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningReport {
    /// Per-product outcomes in upload order.
    pub results: Vec<UploadResult>,
    /// Branding pass summary, absent when branding was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<BrandingReport>,
}

impl ProvisioningReport {
    /// Count of products that reached the store.
    #[must_use]
    pub fn products_added(&self) -> u32 {
        u32::try_from(self.results.iter().filter(|r| r.is_success()).count()).unwrap_or(u32::MAX)
    }
}

/// Aggregate of one automation batch across all eligible store sessions.
///
/// Persisted for historical display; one row per trigger invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationResult {
    /// Batch identifier.
    pub id: Uuid,
    /// Calendar day the batch ran (drives the once-per-day dedup).
    pub execution_date: NaiveDate,
    /// Sessions that were picked up by this batch.
    pub stores_processed: u32,
    /// Sessions whose run added at least one product.
    pub stores_successful: u32,
    /// Products added across all stores in this batch.
    pub total_products_added: u32,
    /// Per-store outcome summaries.
    pub results: Vec<StoreRunSummary>,
    /// When the batch finished.
    pub completed_at: DateTime<Utc>,
}

/// One store's outcome inside an automation batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRunSummary {
    /// Session the store belongs to.
    pub session_id: Uuid,
    /// Niche the products were generated for.
    pub niche: String,
    /// Products added to this store.
    pub products_added: u32,
    /// Whether the store's run completed without a fatal error.
    pub success: bool,
    /// Failure detail for stores that errored or were skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_has_no_product_id() {
        let result = UploadResult::failed("Widget", Decimal::new(1999, 2), "create returned 422");
        assert!(!result.is_success());
        assert!(result.product_id.is_none());
        assert_eq!(result.images_uploaded, 0);
    }

    #[test]
    fn test_products_added_counts_only_successes() {
        let report = ProvisioningReport {
            results: vec![
                UploadResult {
                    product_id: Some(1),
                    title: "A".into(),
                    price: Decimal::new(999, 2),
                    images_uploaded: 8,
                    variants_created: 2,
                    status: UploadStatus::Success,
                    error: None,
                },
                UploadResult::failed("B", Decimal::new(999, 2), "boom"),
            ],
            branding: None,
        };
        assert_eq!(report.products_added(), 1);
    }

    #[test]
    fn test_upload_status_serializes_screaming() {
        let json = serde_json::to_string(&UploadStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
    }
}
