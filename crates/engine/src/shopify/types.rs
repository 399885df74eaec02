//! Wire types for the Shopify Admin REST API.
//!
//! Response envelopes mirror the REST payload shapes (`{"product": {...}}`),
//! request bodies are built with `serde_json::json!` at the call sites.

use serde::Deserialize;

/// Fields for creating a product (step 1 of the upload workflow).
///
/// Variants are intentionally absent - the default variant Shopify creates
/// is re-priced and, when needed, replaced in later steps.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub body_html: String,
    pub vendor: String,
    pub product_type: String,
    /// Unique handle: slugified title plus a millisecond timestamp.
    pub handle: String,
    pub tags: Vec<String>,
}

/// `{"product": {...}}` envelope.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: Product,
}

/// A product as returned by the Admin REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// The auto-created default variant, if present.
    #[must_use]
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}

/// `{"variant": {...}}` envelope.
#[derive(Debug, Deserialize)]
pub struct VariantEnvelope {
    pub variant: Variant,
}

/// A product variant.
#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    pub id: u64,
    pub title: String,
    /// Decimal string per the REST API (e.g., "19.99").
    pub price: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub option1: Option<String>,
}

/// `{"image": {...}}` envelope.
#[derive(Debug, Deserialize)]
pub struct ImageEnvelope {
    pub image: ProductImage,
}

/// A product image record.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    pub src: String,
    #[serde(default)]
    pub position: Option<u32>,
}

/// `{"themes": [...]}` envelope.
#[derive(Debug, Deserialize)]
pub struct ThemesEnvelope {
    pub themes: Vec<Theme>,
}

/// `{"theme": {...}}` envelope.
#[derive(Debug, Deserialize)]
pub struct ThemeEnvelope {
    pub theme: Theme,
}

/// An installed theme.
#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    pub id: u64,
    pub name: String,
    /// "main" for the published theme, "unpublished" otherwise.
    pub role: String,
    /// True while Shopify is still unpacking an uploaded theme ZIP.
    #[serde(default)]
    pub processing: bool,
}

impl Theme {
    /// True when this is the live (published) theme.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.role == "main"
    }
}

/// `{"asset": {...}}` envelope.
#[derive(Debug, Deserialize)]
pub struct AssetEnvelope {
    pub asset: Asset,
}

/// A theme asset (template, settings file, stylesheet).
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub key: String,
    /// Text content; absent for binary assets.
    #[serde(default)]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_envelope_deserializes_rest_shape() {
        let json = r#"{
            "product": {
                "id": 123,
                "title": "Widget",
                "handle": "widget-17",
                "status": "active",
                "variants": [{"id": 9, "title": "Default Title", "price": "0.00"}],
                "images": []
            }
        }"#;
        let envelope: ProductEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.product.id, 123);
        assert_eq!(envelope.product.default_variant().unwrap().id, 9);
    }

    #[test]
    fn test_theme_published_role() {
        let theme: Theme = serde_json::from_str(
            r#"{"id": 1, "name": "Refresh", "role": "main"}"#,
        )
        .unwrap();
        assert!(theme.is_published());
        assert!(!theme.processing);
    }
}
