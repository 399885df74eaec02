//! Theme, asset, and shop operations for the Admin REST API.

use tracing::instrument;

use super::types::{Asset, AssetEnvelope, Theme, ThemeEnvelope, ThemesEnvelope};
use super::{AdminRestClient, ShopifyError};

impl AdminRestClient {
    /// List all installed themes.
    ///
    /// `GET /admin/api/{v}/themes.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn list_themes(&self) -> Result<Vec<Theme>, ShopifyError> {
        let url = self.api_url("themes.json");

        let response = self.http().get(&url).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: ThemesEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.themes)
    }

    /// Get one theme (used to poll the `processing` flag after install).
    ///
    /// `GET /admin/api/{v}/themes/{id}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn get_theme(&self, theme_id: u64) -> Result<Theme, ShopifyError> {
        let url = self.api_url(&format!("themes/{theme_id}.json"));

        let response = self.http().get(&url).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: ThemeEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.theme)
    }

    /// Install a theme from a (signed) ZIP URL.
    ///
    /// `POST /admin/api/{v}/themes.json`. Shopify downloads and unpacks the
    /// ZIP asynchronously; poll [`Self::get_theme`] until `processing` clears.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self, src))]
    pub async fn install_theme(&self, name: &str, src: &str) -> Result<Theme, ShopifyError> {
        let url = self.api_url("themes.json");
        let body = serde_json::json!({
            "theme": {
                "name": name,
                "src": src,
                "role": "unpublished",
            }
        });

        let response = self.http().post(&url).json(&body).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: ThemeEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.theme)
    }

    /// Publish a theme as the live theme.
    ///
    /// `PUT /admin/api/{v}/themes/{id}.json` with `role: "main"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn publish_theme(&self, theme_id: u64) -> Result<Theme, ShopifyError> {
        let url = self.api_url(&format!("themes/{theme_id}.json"));
        let body = serde_json::json!({
            "theme": {
                "id": theme_id,
                "role": "main",
            }
        });

        let response = self.http().put(&url).json(&body).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: ThemeEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.theme)
    }

    /// Delete a theme.
    ///
    /// `DELETE /admin/api/{v}/themes/{id}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn delete_theme(&self, theme_id: u64) -> Result<(), ShopifyError> {
        let url = self.api_url(&format!("themes/{theme_id}.json"));

        let response = self.http().delete(&url).send().await?;
        Self::error_for_status(response).await?;
        Ok(())
    }

    /// Fetch a single theme asset by key.
    ///
    /// `GET /admin/api/{v}/themes/{id}/assets.json?asset[key]=...`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn get_asset(&self, theme_id: u64, key: &str) -> Result<Asset, ShopifyError> {
        let url = self.api_url(&format!("themes/{theme_id}/assets.json"));

        let response = self
            .http()
            .get(&url)
            .query(&[("asset[key]", key)])
            .send()
            .await?;
        let response = Self::error_for_status(response).await?;

        let envelope: AssetEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.asset)
    }

    /// Create or replace a text asset.
    ///
    /// `PUT /admin/api/{v}/themes/{id}/assets.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self, value))]
    pub async fn put_asset(
        &self,
        theme_id: u64,
        key: &str,
        value: &str,
    ) -> Result<(), ShopifyError> {
        let url = self.api_url(&format!("themes/{theme_id}/assets.json"));
        let body = serde_json::json!({
            "asset": {
                "key": key,
                "value": value,
            }
        });

        let response = self.http().put(&url).json(&body).send().await?;
        Self::error_for_status(response).await?;
        Ok(())
    }

    /// Update shop metadata (name and customer-facing email).
    ///
    /// `PUT /admin/api/{v}/shop.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn update_shop(&self, name: &str, email: &str) -> Result<(), ShopifyError> {
        let url = self.api_url("shop.json");
        let body = serde_json::json!({
            "shop": {
                "name": name,
                "email": email,
                "customer_email": email,
            }
        });

        let response = self.http().put(&url).json(&body).send().await?;
        Self::error_for_status(response).await?;
        Ok(())
    }
}
