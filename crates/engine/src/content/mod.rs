//! Product copy generation.
//!
//! Titles and descriptions come from niche-keyed templates, indexed
//! deterministically so the same (niche, index) pair always produces the
//! same copy. When a language-model backend is configured it gets a single
//! attempt per product; its output replaces the templated title/description
//! and any failure silently falls back to the templates, recorded as
//! [`ContentSource::Template`].

pub mod llm;
pub mod tables;

use rust_decimal::Decimal;
use storeforge_core::{ContentSource, GeneratedProduct, Niche, VariantSpec};
use tracing::{debug, warn};

pub use llm::{LlmClient, LlmConfig, LlmError};

use crate::{images, pricing};

/// "Was" price factors, rotated by index (now × 1.5–1.6).
const WAS_PRICE_PERCENTS: &[i64] = &[150, 155, 160];

/// Variant tiers for products that get more than the default variant.
const VARIANT_TIERS: &[&str] = &["Standard", "Premium", "Deluxe"];

/// Options controlling generated copy.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Prefix titles with the niche emoji.
    pub include_emoji: bool,
    /// Images selected per product (1-8).
    pub image_count: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            include_emoji: true,
            image_count: 8,
        }
    }
}

/// Product copy generator with optional language-model backend.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    llm: Option<LlmClient>,
    options: GeneratorOptions,
}

impl ContentGenerator {
    /// Generator using only the templated path.
    #[must_use]
    pub fn templated() -> Self {
        Self {
            llm: None,
            options: GeneratorOptions::default(),
        }
    }

    /// Generator with an optional language-model backend.
    #[must_use]
    pub fn new(llm: Option<LlmClient>, options: GeneratorOptions) -> Self {
        Self { llm, options }
    }

    /// Generate one product for a niche.
    ///
    /// Price, images, features, and variants always come from the local
    /// generators; only title/description may be replaced by the model.
    pub async fn generate_product(
        &self,
        niche: &Niche,
        index: usize,
        theme_color: &str,
        store_style: Option<&str>,
    ) -> GeneratedProduct {
        let price = pricing::calculate(niche, index);
        let images = images::select_images(niche, index, self.options.image_count.clamp(1, 8))
            .into_iter()
            .enumerate()
            .map(|(position, url)| images::validate_image_url(niche, &url, position).into_inner())
            .collect();
        let content = lookup_content(niche);
        let features: Vec<String> = rotated(content.features, index)
            .map(ToString::to_string)
            .collect();

        let (title, description, source) = match self.llm.as_ref() {
            Some(llm) => match llm.generate_copy(niche.as_str(), index, store_style).await {
                Ok(copy) => {
                    debug!(niche = %niche, index, "language model produced product copy");
                    (copy.title, copy.description_html, ContentSource::LanguageModel)
                }
                Err(e) => {
                    warn!(niche = %niche, index, error = %e, "language model failed, using templated copy");
                    self.templated_copy(niche, index, price, theme_color, &features)
                }
            },
            None => self.templated_copy(niche, index, price, theme_color, &features),
        };

        let variants = variant_specs(niche, index, price);

        GeneratedProduct {
            title,
            description,
            price,
            features,
            images,
            variants,
            source,
        }
    }

    /// Generate a catalog of `count` products, sequentially.
    pub async fn generate_catalog(
        &self,
        niche: &Niche,
        count: usize,
        theme_color: &str,
        store_style: Option<&str>,
    ) -> Vec<GeneratedProduct> {
        let mut products = Vec::with_capacity(count);
        for index in 0..count {
            products.push(
                self.generate_product(niche, index, theme_color, store_style)
                    .await,
            );
        }
        products
    }

    /// The templated title/description pair.
    fn templated_copy(
        &self,
        niche: &Niche,
        index: usize,
        price: Decimal,
        theme_color: &str,
        features: &[String],
    ) -> (String, String, ContentSource) {
        let title = self.unique_title(niche, index);
        let description = templated_description(niche, index, price, theme_color, features);
        (title, description, ContentSource::Template)
    }

    /// Deterministic title: power word + urgency word + niche noun phrase.
    #[must_use]
    pub fn unique_title(&self, niche: &Niche, index: usize) -> String {
        let content = lookup_content(niche);
        let power = pick(tables::POWER_WORDS, index);
        let urgency = pick(tables::URGENCY_WORDS, index);
        let noun = pick(content.noun_phrases, index);

        if self.options.include_emoji {
            format!("{} {power} {urgency} {noun}", content.emoji)
        } else {
            format!("{power} {urgency} {noun}")
        }
    }
}

/// Resolve the copy table, logging the fallback branch for unknown niches.
fn lookup_content(niche: &Niche) -> &'static tables::NicheContent {
    tables::content_for(niche.as_str()).unwrap_or_else(|| {
        warn!(niche = %niche, "no copy table for niche, using generic copy");
        &tables::GENERIC
    })
}

/// `list[index % len]` without panicking on empty lists.
fn pick<'a>(list: &[&'a str], index: usize) -> &'a str {
    if list.is_empty() {
        return "";
    }
    list.get(index % list.len()).copied().unwrap_or("")
}

/// Iterator over a list starting at `index % len`, one full rotation.
fn rotated<'a>(list: &'a [&'a str], index: usize) -> impl Iterator<Item = &'a str> {
    let offset = if list.is_empty() { 0 } else { index % list.len() };
    list.iter().cycle().skip(offset).take(list.len()).copied()
}

/// Assemble the templated HTML description.
fn templated_description(
    niche: &Niche,
    index: usize,
    price: Decimal,
    theme_color: &str,
    features: &[String],
) -> String {
    let content = lookup_content(niche);
    let hook = pick(content.hooks, index);
    let testimonial = pick(content.testimonials, index);
    let customer = pick(tables::CUSTOMER_NAMES, index);
    let was_percent = WAS_PRICE_PERCENTS
        .get(index % WAS_PRICE_PERCENTS.len())
        .copied()
        .unwrap_or(155);
    let was_price = (price * Decimal::new(was_percent, 2)).round_dp(2);

    let feature_items: String = features
        .iter()
        .map(|feature| format!("<li>{feature}</li>"))
        .collect();

    format!(
        "<div>\
         <p style=\"color: {theme_color}; font-weight: bold;\">{hook}</p>\
         <p>{} {}</p>\
         <h3 style=\"color: {theme_color};\">Why you'll love it</h3>\
         <ul>{feature_items}</ul>\
         <p><em>{}</em></p>\
         <blockquote>\u{201c}{testimonial}\u{201d} &mdash; {customer}</blockquote>\
         <p><s>${was_price}</s> <strong style=\"color: {theme_color};\">${price}</strong> \
         &mdash; launch pricing, while stock lasts.</p>\
         </div>",
        content.problem, content.solution, content.social_proof,
    )
}

/// Variant set for a product.
///
/// Even indices get the three-tier set; odd indices keep the single default
/// variant. Tier prices scale the base price by 12% per step.
fn variant_specs(niche: &Niche, index: usize, price: Decimal) -> Vec<VariantSpec> {
    let tier_count = if index % 2 == 0 { VARIANT_TIERS.len() } else { 1 };
    VARIANT_TIERS
        .iter()
        .take(tier_count)
        .enumerate()
        .map(|(tier_index, tier)| VariantSpec {
            title: (*tier).to_string(),
            price: pricing::variant_price(price, tier_index),
            sku: format!(
                "SF-{}-{:02}-{}",
                niche.as_str().to_uppercase().replace(' ', "-"),
                index,
                tier_index + 1
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime")
            .block_on(future)
    }

    #[test]
    fn test_title_is_stable_for_same_inputs() {
        let generator = ContentGenerator::templated();
        let niche = Niche::new("pets");
        assert_eq!(
            generator.unique_title(&niche, 4),
            generator.unique_title(&niche, 4)
        );
    }

    #[test]
    fn test_title_contains_power_and_urgency_words() {
        let generator = ContentGenerator::templated();
        let title = generator.unique_title(&Niche::new("pets"), 0);
        assert!(tables::POWER_WORDS.iter().any(|w| title.contains(w)), "{title}");
        assert!(tables::URGENCY_WORDS.iter().any(|w| title.contains(w)), "{title}");
    }

    #[test]
    fn test_titles_rotate_with_index() {
        let generator = ContentGenerator::templated();
        let niche = Niche::new("tech");
        let first = generator.unique_title(&niche, 0);
        let second = generator.unique_title(&niche, 1);
        assert_ne!(first, second);
    }

    #[test]
    fn test_generated_product_has_full_shape() {
        let generator = ContentGenerator::templated();
        let product = block_on(generator.generate_product(
            &Niche::new("pets"),
            0,
            "#2563eb",
            None,
        ));

        assert_eq!(product.source, ContentSource::Template);
        assert_eq!(product.images.len(), 8);
        assert!(!product.features.is_empty());
        assert!(product.description.contains("#2563eb"));
        assert!(product.description.contains("blockquote"));
        assert!(
            product.description.contains(&format!("${}", product.price)),
            "description must quote the generated price"
        );
    }

    #[test]
    fn test_variant_tiering_alternates() {
        let generator = ContentGenerator::templated();
        let even = block_on(generator.generate_product(&Niche::new("home"), 0, "#000", None));
        let odd = block_on(generator.generate_product(&Niche::new("home"), 1, "#000", None));
        assert_eq!(even.variants.len(), 3);
        assert_eq!(odd.variants.len(), 1);
        assert!(even.variants.iter().all(|v| v.sku.starts_with("SF-HOME-")));
    }

    #[test]
    fn test_unknown_niche_generates_generic_copy() {
        let generator = ContentGenerator::templated();
        let product = block_on(generator.generate_product(
            &Niche::new("submarine-parts"),
            2,
            "#111",
            None,
        ));
        assert!(!product.title.is_empty());
        assert!(!product.description.is_empty());
    }

    #[test]
    fn test_catalog_generates_requested_count() {
        let generator = ContentGenerator::templated();
        let products = block_on(generator.generate_catalog(&Niche::new("beauty"), 10, "#333", None));
        assert_eq!(products.len(), 10);
    }
}
