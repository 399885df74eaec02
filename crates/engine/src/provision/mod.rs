//! The store provisioning workflow.
//!
//! For each generated product: create it, re-price the default variant,
//! upload images, create variants, record the outcome. Errors are caught at
//! the smallest unit (one image, one variant) and folded into counts so a
//! partial failure degrades a product instead of aborting the batch. Only a
//! failed create call marks a product FAILED.

pub mod branding;

use std::time::Duration;

use chrono::Utc;
use storeforge_core::{GeneratedProduct, Niche, ProvisioningReport, UploadResult, UploadStatus};
use tracing::{info, instrument, warn};

use crate::images;
use crate::pricing;
use crate::retry::{self, RetryPolicy};
use crate::shopify::types::NewProduct;
use crate::shopify::AdminRestClient;

pub use branding::BrandingOptions;

/// Option name declared when a product gets real variants.
const VARIANT_OPTION_NAME: &str = "Style";

/// Hard cap on images per product.
const MAX_IMAGES_PER_PRODUCT: usize = 8;

/// Delays and retry policies for the workflow.
///
/// The delays are informal rate limiting for Shopify's REST bucket, not
/// correctness. Tests zero them via [`Self::immediate`].
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Vendor stamped on created products.
    pub vendor: String,
    /// Retry policy for single image uploads.
    pub image_retry: RetryPolicy,
    /// Retry policy for branding/theme calls.
    pub branding_retry: RetryPolicy,
    /// Pause between image uploads.
    pub image_upload_delay: Duration,
    /// Pause between variant creations.
    pub variant_delay: Duration,
    /// Pause between products.
    pub product_delay: Duration,
    /// Pause between theme-install processing polls.
    pub theme_poll_delay: Duration,
    /// HEAD-check each image URL before handing it to Shopify, substituting
    /// the emergency URL when the CDN does not answer.
    pub preflight_images: bool,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            vendor: "StoreForge".to_string(),
            image_retry: RetryPolicy::new(3, Duration::from_millis(500)),
            branding_retry: RetryPolicy::new(3, Duration::from_secs(1)),
            image_upload_delay: Duration::from_millis(300),
            variant_delay: Duration::from_millis(300),
            product_delay: Duration::from_secs(1),
            theme_poll_delay: Duration::from_secs(2),
            preflight_images: true,
        }
    }
}

impl WorkflowOptions {
    /// Options with every delay zeroed and no outbound preflight, for tests
    /// against a local mock.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            image_retry: RetryPolicy::new(3, Duration::ZERO),
            branding_retry: RetryPolicy::new(3, Duration::ZERO),
            image_upload_delay: Duration::ZERO,
            variant_delay: Duration::ZERO,
            product_delay: Duration::ZERO,
            theme_poll_delay: Duration::ZERO,
            preflight_images: false,
            ..Self::default()
        }
    }
}

/// Runs the upload workflow against one store.
#[derive(Debug, Clone)]
pub struct Provisioner {
    shopify: AdminRestClient,
    /// Plain client for CDN preflight checks (no Shopify auth headers).
    http: reqwest::Client,
    options: WorkflowOptions,
}

impl Provisioner {
    /// Create a provisioner for one store.
    #[must_use]
    pub fn new(shopify: AdminRestClient, options: WorkflowOptions) -> Self {
        Self {
            shopify,
            http: reqwest::Client::new(),
            options,
        }
    }

    /// Borrow the underlying client (used by the branding pass).
    #[must_use]
    pub const fn shopify(&self) -> &AdminRestClient {
        &self.shopify
    }

    /// Upload a whole catalog sequentially, one product at a time.
    ///
    /// A failed product is recorded and the loop continues; the report is
    /// never cut short.
    #[instrument(skip(self, products), fields(niche = %niche, count = products.len()))]
    pub async fn upload_catalog(
        &self,
        niche: &Niche,
        products: &[GeneratedProduct],
    ) -> ProvisioningReport {
        let mut results = Vec::with_capacity(products.len());

        for (index, product) in products.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.options.product_delay).await;
            }
            results.push(self.upload_product(niche, product).await);
        }

        let report = ProvisioningReport {
            results,
            branding: None,
        };
        info!(
            niche = %niche,
            added = report.products_added(),
            total = products.len(),
            "catalog upload finished"
        );
        report
    }

    /// Run the per-product state machine: create, price, images, variants.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn upload_product(&self, niche: &Niche, product: &GeneratedProduct) -> UploadResult {
        // Step 1: create. Fatal for this product on failure - no retry; the
        // caller's "retry" restarts the whole run with fresh content.
        let new_product = NewProduct {
            title: product.title.clone(),
            body_html: product.description.clone(),
            vendor: self.options.vendor.clone(),
            product_type: niche.as_str().to_string(),
            handle: unique_handle(&product.title),
            tags: vec![niche.as_str().to_string(), "storeforge".to_string()],
        };

        let created = match self.shopify.create_product(&new_product).await {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, "product creation failed");
                return UploadResult::failed(&product.title, product.price, e.to_string());
            }
        };

        // Step 2: price the auto-created default variant. Non-fatal.
        if let Some(default_variant) = created.default_variant() {
            let compare_at = pricing::compare_at(product.price);
            if let Err(e) = self
                .shopify
                .update_variant_price(default_variant.id, product.price, compare_at)
                .await
            {
                warn!(error = %e, "default variant pricing failed, keeping auto price");
            }
        }

        // Step 3: images, each retried, with an emergency fallback.
        let images_uploaded = self.upload_images(created.id, &product.images).await;

        // Step 4: variants, only when there is more than one logical variant.
        let variants_created = if product.variants.len() > 1 {
            let default_variant_id = created.default_variant().map(|v| v.id);
            self.create_variants(created.id, default_variant_id, product)
                .await
        } else {
            0
        };

        UploadResult {
            product_id: Some(created.id),
            title: product.title.clone(),
            price: product.price,
            images_uploaded,
            variants_created,
            status: UploadStatus::Success,
            error: None,
        }
    }

    /// Upload up to eight images, substituting disallowed hosts and falling
    /// back to the emergency URL when nothing else lands.
    async fn upload_images(&self, product_id: u64, image_urls: &[String]) -> u32 {
        let mut uploaded = 0u32;

        for (position, image_url) in image_urls.iter().take(MAX_IMAGES_PER_PRODUCT).enumerate() {
            if position > 0 {
                tokio::time::sleep(self.options.image_upload_delay).await;
            }

            let src = if !images::is_allowed_image_url(image_url) {
                warn!(rejected = %image_url, "image host not allow-listed, using emergency URL");
                images::EMERGENCY_IMAGE_URL
            } else if self.options.preflight_images && !self.head_check(image_url).await {
                warn!(rejected = %image_url, "image URL failed HEAD check, using emergency URL");
                images::EMERGENCY_IMAGE_URL
            } else {
                image_url.as_str()
            };

            let position_number = u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1);
            let attempt = retry::with_backoff(self.options.image_retry, || {
                self.shopify
                    .create_product_image(product_id, src, position_number)
            })
            .await;

            match attempt {
                Ok(_) => uploaded += 1,
                Err(e) => warn!(position, error = %e, "image upload failed after retries"),
            }
        }

        // Never leave a product imageless: one last hard-coded URL.
        if uploaded == 0 {
            let emergency = retry::with_backoff(self.options.image_retry, || {
                self.shopify
                    .create_product_image(product_id, images::EMERGENCY_IMAGE_URL, 1)
            })
            .await;
            match emergency {
                Ok(_) => {
                    info!(product_id, "emergency image attached");
                    uploaded = 1;
                }
                Err(e) => warn!(product_id, error = %e, "emergency image failed, product left imageless"),
            }
        }

        uploaded
    }

    /// True when the CDN answers a HEAD request with a 2xx.
    async fn head_check(&self, image_url: &str) -> bool {
        match self.http.head(image_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Declare the option, drop the auto-created default variant, then
    /// create each variant once. Failures are logged and skipped, so a
    /// product can end up with fewer variants than generated.
    async fn create_variants(
        &self,
        product_id: u64,
        default_variant_id: Option<u64>,
        product: &GeneratedProduct,
    ) -> u32 {
        if let Err(e) = self
            .shopify
            .set_product_option(product_id, VARIANT_OPTION_NAME)
            .await
        {
            warn!(error = %e, "declaring variant option failed, keeping default variant");
            return 0;
        }

        // The stray "Default Title" variant conflicts with the new option set.
        if let Some(variant_id) = default_variant_id
            && let Err(e) = self.shopify.delete_variant(product_id, variant_id).await
        {
            warn!(variant_id, error = %e, "deleting default variant failed");
        }

        let mut created = 0u32;
        for (index, variant) in product.variants.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.options.variant_delay).await;
            }
            match self
                .shopify
                .create_variant(product_id, &variant.title, variant.price, &variant.sku)
                .await
            {
                Ok(_) => created += 1,
                Err(e) => {
                    warn!(variant = %variant.title, error = %e, "variant creation failed, skipping");
                }
            }
        }
        created
    }
}

/// Slugified title plus a millisecond timestamp, guaranteeing uniqueness.
fn unique_handle(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    let collapsed = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("{collapsed}-{}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_handle_slugifies_and_appends_timestamp() {
        let handle = unique_handle("🐾 Ultimate Must-Have Pet Comfort Bed!");
        assert!(handle.contains("ultimate-must-have-pet-comfort-bed"));
        let suffix = handle.rsplit('-').next().unwrap_or_default();
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        assert!(suffix.len() >= 13, "millisecond timestamps are 13 digits");
    }

    #[test]
    fn test_unique_handle_collapses_runs_of_separators() {
        let handle = unique_handle("A  --  B");
        assert!(handle.starts_with("a-b-"));
    }
}
