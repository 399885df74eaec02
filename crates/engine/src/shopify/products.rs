//! Product, variant, and image operations for the Admin REST API.

use rust_decimal::Decimal;
use tracing::instrument;

use super::types::{
    ImageEnvelope, NewProduct, Product, ProductEnvelope, ProductImage, Variant, VariantEnvelope,
};
use super::{AdminRestClient, ShopifyError};

impl AdminRestClient {
    /// Create a product without variants.
    ///
    /// `POST /admin/api/{v}/products.json`. Shopify auto-creates a single
    /// default variant; callers re-price or replace it afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ShopifyError> {
        let url = self.api_url("products.json");
        let body = serde_json::json!({
            "product": {
                "title": product.title,
                "body_html": product.body_html,
                "vendor": product.vendor,
                "product_type": product.product_type,
                "handle": product.handle,
                "tags": product.tags.join(", "),
                "status": "active",
            }
        });

        let response = self.http().post(&url).json(&body).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: ProductEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.product)
    }

    /// Re-price a variant and mark its inventory unlimited.
    ///
    /// `PUT /admin/api/{v}/variants/{id}.json` with the computed price, a
    /// compare-at price, `inventory_policy: "continue"`, and inventory
    /// management disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn update_variant_price(
        &self,
        variant_id: u64,
        price: Decimal,
        compare_at_price: Decimal,
    ) -> Result<Variant, ShopifyError> {
        let url = self.api_url(&format!("variants/{variant_id}.json"));
        let body = serde_json::json!({
            "variant": {
                "id": variant_id,
                "price": price.to_string(),
                "compare_at_price": compare_at_price.to_string(),
                "inventory_policy": "continue",
                "inventory_management": null,
            }
        });

        let response = self.http().put(&url).json(&body).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: VariantEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.variant)
    }

    /// Attach an image to a product by source URL.
    ///
    /// `POST /admin/api/{v}/products/{id}/images.json`. Shopify fetches the
    /// URL itself, so the URL must resolve from Shopify's side.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self, src))]
    pub async fn create_product_image(
        &self,
        product_id: u64,
        src: &str,
        position: u32,
    ) -> Result<ProductImage, ShopifyError> {
        let url = self.api_url(&format!("products/{product_id}/images.json"));
        let body = serde_json::json!({
            "image": {
                "src": src,
                "position": position,
            }
        });

        let response = self.http().post(&url).json(&body).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: ImageEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.image)
    }

    /// Declare a single named option on a product.
    ///
    /// `PUT /admin/api/{v}/products/{id}.json`. Required before pushing
    /// variants with `option1` values, otherwise the stray "Default Title"
    /// option conflicts with the new set.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn set_product_option(
        &self,
        product_id: u64,
        option_name: &str,
    ) -> Result<(), ShopifyError> {
        let url = self.api_url(&format!("products/{product_id}.json"));
        let body = serde_json::json!({
            "product": {
                "id": product_id,
                "options": [{"name": option_name}],
            }
        });

        let response = self.http().put(&url).json(&body).send().await?;
        Self::error_for_status(response).await?;
        Ok(())
    }

    /// Delete a variant (used to drop the auto-created default).
    ///
    /// `DELETE /admin/api/{v}/products/{pid}/variants/{vid}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self))]
    pub async fn delete_variant(
        &self,
        product_id: u64,
        variant_id: u64,
    ) -> Result<(), ShopifyError> {
        let url = self.api_url(&format!("products/{product_id}/variants/{variant_id}.json"));

        let response = self.http().delete(&url).send().await?;
        Self::error_for_status(response).await?;
        Ok(())
    }

    /// Create a variant with its own price, SKU, and unlimited inventory.
    ///
    /// `POST /admin/api/{v}/products/{id}/variants.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-2xx status.
    #[instrument(skip(self), fields(option_value = %option_value))]
    pub async fn create_variant(
        &self,
        product_id: u64,
        option_value: &str,
        price: Decimal,
        sku: &str,
    ) -> Result<Variant, ShopifyError> {
        let url = self.api_url(&format!("products/{product_id}/variants.json"));
        let body = serde_json::json!({
            "variant": {
                "option1": option_value,
                "price": price.to_string(),
                "sku": sku,
                "inventory_policy": "continue",
                "inventory_management": null,
            }
        });

        let response = self.http().post(&url).json(&body).send().await?;
        let response = Self::error_for_status(response).await?;

        let envelope: VariantEnvelope = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;
        Ok(envelope.variant)
    }
}
