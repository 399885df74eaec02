//! Ad-hoc provisioning command.
//!
//! Runs the full engine workflow against one store from explicit
//! credentials, bypassing the session database entirely. Useful for
//! smoke-testing a development store and for support runs.

use secrecy::SecretString;
use storeforge_core::Niche;
use storeforge_engine::content::ContentGenerator;
use storeforge_engine::provision::{BrandingOptions, WorkflowOptions};
use storeforge_engine::shopify::DEFAULT_API_VERSION;
use storeforge_engine::{AdminRestClient, Provisioner, ShopifyError, StoreCredentials};

/// Generate `count` products and push them (plus branding) to one store.
///
/// # Errors
///
/// Returns an error when the Shopify client cannot be constructed. Upload
/// and branding failures are reported in the printed summary instead.
pub async fn run(
    shop: &str,
    token: &str,
    niche: &str,
    count: usize,
    color: &str,
    skip_branding: bool,
) -> Result<(), ShopifyError> {
    dotenvy::dotenv().ok();

    let niche = Niche::new(niche);
    let credentials = StoreCredentials {
        shop_url: shop.to_string(),
        access_token: SecretString::from(token.to_string()),
    };
    let shopify = AdminRestClient::new(&credentials, DEFAULT_API_VERSION)?;
    let provisioner = Provisioner::new(shopify, WorkflowOptions::default());

    // CLI runs are templated-only; the LLM backend is a server concern.
    let generator = ContentGenerator::templated();

    tracing::info!(niche = %niche, count, "generating catalog");
    let products = generator.generate_catalog(&niche, count, color, None).await;

    let mut report = provisioner.upload_catalog(&niche, &products).await;

    if !skip_branding {
        let branding = BrandingOptions {
            brand_color: color.to_string(),
            shop_name: None,
            shop_email: None,
            // No object storage here: brand whatever theme is live.
            theme_zip_url: None,
        };
        report.branding = Some(provisioner.apply_branding(&branding).await);
    }

    for result in &report.results {
        tracing::info!(
            title = %result.title,
            status = ?result.status,
            images = result.images_uploaded,
            variants = result.variants_created,
            "product uploaded"
        );
    }
    if let Some(branding) = &report.branding {
        tracing::info!(
            applied = branding.settings_applied,
            total = branding.settings_total,
            "branding applied"
        );
    }
    tracing::info!(
        added = report.products_added(),
        total = report.results.len(),
        "provisioning finished"
    );

    Ok(())
}
