//! Generated product records produced by the content pipeline.
//!
//! A [`GeneratedProduct`] is created fresh for every provisioning run and is
//! immutable once built - the upload workflow reads it, it never writes back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a product's title/description came from.
///
/// The language-model backend gets a single attempt; on any failure the
/// templated generator fills in and the product is marked [`Self::Template`].
/// Callers can distinguish "real" model output from fallback content without
/// digging through logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// Copy produced by the configured language-model backend.
    LanguageModel,
    /// Copy assembled from the niche-keyed templates (fallback path, or the
    /// only path when no backend is configured).
    Template,
}

impl ContentSource {
    /// True when the templated fallback produced this content.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Template)
    }
}

/// One logical variant of a generated product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Customer-facing option value (e.g., "Standard", "Premium Bundle").
    pub title: String,
    /// Variant price, already psychologically rounded.
    pub price: Decimal,
    /// Stock-keeping unit pushed to Shopify.
    pub sku: String,
}

/// A fully generated product ready for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProduct {
    /// Product title (power word + urgency word + niche noun phrase).
    pub title: String,
    /// HTML description styled with the store's theme color.
    pub description: String,
    /// Base price with a `.99`/`.95` ending, in [5, 120].
    pub price: Decimal,
    /// Short selling points rendered into the description.
    pub features: Vec<String>,
    /// 1-8 image URLs, all from the trusted-CDN allow-list.
    pub images: Vec<String>,
    /// Logical variants; a single entry means the product keeps Shopify's
    /// auto-created default variant.
    pub variants: Vec<VariantSpec>,
    /// Provenance of the title/description copy.
    pub source: ContentSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_source_fallback_flag() {
        assert!(ContentSource::Template.is_fallback());
        assert!(!ContentSource::LanguageModel.is_fallback());
    }
}
