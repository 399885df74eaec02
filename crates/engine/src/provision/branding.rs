//! Theme install and brand-color application.
//!
//! Decoupled from the per-product upload: runs once per provisioning run,
//! best-effort across every step. Each external call goes through the shared
//! retry helper; a failed step is logged and the pass moves on, reporting
//! "N of M settings applied" at the end.

use storeforge_core::BrandingReport;
use tracing::{info, instrument, warn};

use crate::retry;
use crate::shopify::types::Theme;

use super::Provisioner;

/// Case-insensitive marker: a theme whose name contains this is considered
/// already installed and no new install happens.
const THEME_NAME_MARKER: &str = "refresh";

/// Name given to a freshly installed theme.
const INSTALLED_THEME_NAME: &str = "StoreForge Refresh";

/// Polls of the `processing` flag before giving up on a theme install.
const THEME_POLL_ATTEMPTS: u32 = 30;

/// Asset key for the injected brand stylesheet.
const BRAND_CSS_ASSET_KEY: &str = "assets/storeforge-brand.css";

/// Asset key for the theme settings file.
const SETTINGS_ASSET_KEY: &str = "config/settings_data.json";

/// Theme settings forced to the brand color.
///
/// Buttons, links, headers, badges, and the announcement bar - the named
/// settings the packaged theme exposes for its accent color.
const BRAND_COLOR_SETTINGS: &[&str] = &[
    "colors_accent_1",
    "colors_accent_2",
    "colors_solid_button_labels",
    "colors_outline_button_labels",
    "colors_text_links",
    "colors_heading",
    "colors_primary_button",
    "colors_primary_button_hover",
    "colors_secondary_button",
    "colors_secondary_button_border",
    "colors_sale_badge",
    "colors_sold_out_badge",
    "colors_announcement_bar_background",
    "colors_announcement_bar_text",
    "colors_cart_icon",
    "colors_footer_background",
    "colors_footer_links",
    "colors_header_icons",
    "colors_newsletter_button",
    "colors_price_highlight",
    "colors_product_card_border",
    "colors_rating_stars",
    "colors_search_highlight",
    "colors_focus_outline",
];

/// Inputs for the branding pass.
#[derive(Debug, Clone)]
pub struct BrandingOptions {
    /// Brand color as a CSS value (e.g., `#2563eb`).
    pub brand_color: String,
    /// New shop display name, when the wizard collected one.
    pub shop_name: Option<String>,
    /// New shop contact email.
    pub shop_email: Option<String>,
    /// Signed URL of the packaged theme ZIP. `None` skips install and brands
    /// whatever theme is live.
    pub theme_zip_url: Option<String>,
}

impl Provisioner {
    /// Apply theme and brand color to the store. Best-effort throughout.
    #[instrument(skip(self, options), fields(color = %options.brand_color))]
    pub async fn apply_branding(&self, options: &BrandingOptions) -> BrandingReport {
        let mut report = BrandingReport {
            settings_applied: 0,
            settings_total: u32::try_from(BRAND_COLOR_SETTINGS.len()).unwrap_or(u32::MAX),
            theme_already_installed: false,
        };
        let policy = self.options.branding_retry;

        let themes = match retry::with_backoff(policy, || self.shopify().list_themes()).await {
            Ok(themes) => themes,
            Err(e) => {
                warn!(error = %e, "listing themes failed, skipping branding pass");
                return report;
            }
        };

        let target = match self.resolve_target_theme(&themes, options, &mut report).await {
            Some(theme) => theme,
            None => {
                warn!("no target theme available, skipping branding pass");
                return report;
            }
        };

        if !target.is_published() {
            if let Err(e) =
                retry::with_backoff(policy, || self.shopify().publish_theme(target.id)).await
            {
                warn!(theme_id = target.id, error = %e, "publishing theme failed");
            }
        }

        for theme in themes.iter().filter(|t| t.id != target.id) {
            if let Err(e) =
                retry::with_backoff(policy, || self.shopify().delete_theme(theme.id)).await
            {
                warn!(theme_id = theme.id, error = %e, "deleting stale theme failed");
            }
        }

        let stylesheet = brand_css(&options.brand_color);
        if let Err(e) = retry::with_backoff(policy, || {
            self.shopify()
                .put_asset(target.id, BRAND_CSS_ASSET_KEY, &stylesheet)
        })
        .await
        {
            warn!(error = %e, "pushing brand stylesheet failed");
        }

        report.settings_applied = self
            .patch_color_settings(target.id, &options.brand_color)
            .await;

        if let (Some(name), Some(email)) = (&options.shop_name, &options.shop_email) {
            if let Err(e) =
                retry::with_backoff(policy, || self.shopify().update_shop(name, email)).await
            {
                warn!(error = %e, "shop metadata update failed");
            }
        }

        info!(
            applied = report.settings_applied,
            total = report.settings_total,
            "branding pass finished: {} of {} settings applied",
            report.settings_applied,
            report.settings_total
        );
        report
    }

    /// Pick the theme to brand: an existing "refresh" theme, a fresh install
    /// from the packaged ZIP, or - as a last resort - the live theme.
    async fn resolve_target_theme(
        &self,
        themes: &[Theme],
        options: &BrandingOptions,
        report: &mut BrandingReport,
    ) -> Option<Theme> {
        if let Some(existing) = themes
            .iter()
            .find(|t| t.name.to_lowercase().contains(THEME_NAME_MARKER))
        {
            info!(theme = %existing.name, "matching theme already installed, skipping install");
            report.theme_already_installed = true;
            return Some(existing.clone());
        }

        if let Some(zip_url) = &options.theme_zip_url {
            match retry::with_backoff(self.options.branding_retry, || {
                self.shopify().install_theme(INSTALLED_THEME_NAME, zip_url)
            })
            .await
            {
                Ok(installed) => return self.await_theme_processing(installed).await,
                Err(e) => warn!(error = %e, "theme install failed, branding the live theme"),
            }
        }

        themes.iter().find(|t| t.is_published()).cloned()
    }

    /// Poll until Shopify finishes unpacking an installed theme ZIP.
    async fn await_theme_processing(&self, theme: Theme) -> Option<Theme> {
        if !theme.processing {
            return Some(theme);
        }

        for _ in 0..THEME_POLL_ATTEMPTS {
            tokio::time::sleep(self.options.theme_poll_delay).await;
            match self.shopify().get_theme(theme.id).await {
                Ok(polled) if !polled.processing => return Some(polled),
                Ok(_) => {}
                Err(e) => warn!(theme_id = theme.id, error = %e, "theme processing poll failed"),
            }
        }

        warn!(theme_id = theme.id, "theme still processing after {THEME_POLL_ATTEMPTS} polls");
        None
    }

    /// Force the brand color into every named color setting.
    ///
    /// Returns how many settings were written. The settings file is patched
    /// in memory and saved with one PUT; a failed save applies nothing.
    async fn patch_color_settings(&self, theme_id: u64, brand_color: &str) -> u32 {
        let policy = self.options.branding_retry;

        let settings_source = match retry::with_backoff(policy, || {
            self.shopify().get_asset(theme_id, SETTINGS_ASSET_KEY)
        })
        .await
        {
            Ok(asset) => asset.value.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "reading settings_data.json failed, starting from empty settings");
                String::new()
            }
        };

        let mut settings: serde_json::Value = serde_json::from_str(&settings_source)
            .unwrap_or_else(|_| serde_json::json!({ "current": {} }));
        if !settings.is_object() {
            settings = serde_json::json!({ "current": {} });
        }
        if !settings.get("current").is_some_and(serde_json::Value::is_object) {
            settings["current"] = serde_json::json!({});
        }

        let mut patched = 0u32;
        if let Some(current) = settings
            .get_mut("current")
            .and_then(serde_json::Value::as_object_mut)
        {
            for key in BRAND_COLOR_SETTINGS {
                current.insert(
                    (*key).to_string(),
                    serde_json::Value::String(brand_color.to_string()),
                );
                patched += 1;
            }
        }

        let serialized = settings.to_string();
        match retry::with_backoff(policy, || {
            self.shopify()
                .put_asset(theme_id, SETTINGS_ASSET_KEY, &serialized)
        })
        .await
        {
            Ok(()) => patched,
            Err(e) => {
                warn!(error = %e, "saving settings_data.json failed, no settings applied");
                0
            }
        }
    }
}

/// Stylesheet forcing the brand color onto elements the settings file
/// cannot reach.
fn brand_css(brand_color: &str) -> String {
    format!(
        ":root {{ --storeforge-brand: {brand_color}; }}\n\
         .btn, .button, button[type=\"submit\"] {{ background-color: {brand_color}; border-color: {brand_color}; }}\n\
         a, .link {{ color: {brand_color}; }}\n\
         h1, h2, h3 {{ color: {brand_color}; }}\n\
         .badge, .announcement-bar {{ background-color: {brand_color}; }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_css_contains_color_everywhere() {
        let css = brand_css("#ff5733");
        assert_eq!(css.matches("#ff5733").count(), 6);
        assert!(css.contains("--storeforge-brand"));
    }

    #[test]
    fn test_settings_list_is_substantial() {
        // "dozens of named theme settings" - the table must stay big enough
        // for the N-of-M report to mean something.
        assert!(BRAND_COLOR_SETTINGS.len() >= 20);
    }
}
